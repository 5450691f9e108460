//! Listener, log output and browser-facing settings.
//!
//! The two public routes have different time budgets: checkout makes one
//! Stripe call while the shopper waits, the webhook makes a line-item lookup
//! and two email sends before Stripe's own delivery timeout.

use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use super::error::ValidationError;

/// Longest inbound budget accepted for either route. Stripe abandons a
/// webhook delivery after roughly this long.
const MAX_ROUTE_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,

    #[serde(default = "default_port")]
    pub port: u16,

    /// `EnvFilter` directive, overridden by `RUST_LOG`.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub log_format: LogFormat,

    /// Budget for `POST /checkout`.
    #[serde(default = "default_checkout_timeout")]
    pub checkout_timeout_secs: u64,

    /// Budget for `POST /webhooks/stripe`.
    #[serde(default = "default_webhook_timeout")]
    pub webhook_timeout_secs: u64,

    /// Comma-separated storefront origins allowed by CORS. Any origin when unset.
    pub allowed_origins: Option<String>,
}

/// Log line rendering.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    /// One JSON object per line, for log shippers.
    Json,
}

impl ServerConfig {
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub fn checkout_timeout(&self) -> Duration {
        Duration::from_secs(self.checkout_timeout_secs)
    }

    pub fn webhook_timeout(&self) -> Duration {
        Duration::from_secs(self.webhook_timeout_secs)
    }

    /// Configured storefront origins, blanks dropped.
    pub fn storefront_origins(&self) -> Vec<&str> {
        self.allowed_origins
            .as_deref()
            .map(|s| s.split(',').map(str::trim).filter(|s| !s.is_empty()).collect())
            .unwrap_or_default()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        for secs in [self.checkout_timeout_secs, self.webhook_timeout_secs] {
            if secs == 0 || secs > MAX_ROUTE_TIMEOUT_SECS {
                return Err(ValidationError::InvalidTimeout);
            }
        }

        // Browsers send the scheme and host only, so a path never matches
        if let Some(bad) = self.storefront_origins().into_iter().find(|origin| {
            let rest = origin
                .strip_prefix("https://")
                .or_else(|| origin.strip_prefix("http://"));
            !matches!(rest, Some(host) if !host.is_empty() && !host.contains('/'))
        }) {
            return Err(ValidationError::InvalidOrigin(bad.to_string()));
        }

        Ok(())
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
            log_format: LogFormat::default(),
            checkout_timeout_secs: default_checkout_timeout(),
            webhook_timeout_secs: default_webhook_timeout(),
            allowed_origins: None,
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::UNSPECIFIED)
}

fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info,storefront_payments=debug,tower_http=info".to_string()
}

fn default_checkout_timeout() -> u64 {
    15
}

fn default_webhook_timeout() -> u64 {
    30
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_listen_on_all_interfaces() {
        let config = ServerConfig::default();

        assert_eq!(config.bind_addr().to_string(), "0.0.0.0:8080");
        assert_eq!(config.log_format, LogFormat::Text);
        assert!(config.storefront_origins().is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn webhook_gets_a_longer_budget_than_checkout() {
        let config = ServerConfig::default();

        assert_eq!(config.checkout_timeout(), Duration::from_secs(15));
        assert_eq!(config.webhook_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn storefront_origins_are_trimmed_and_blank_entries_dropped() {
        let config = ServerConfig {
            allowed_origins: Some("https://shop.example.com, http://localhost:5173,".to_string()),
            ..Default::default()
        };

        assert_eq!(
            config.storefront_origins(),
            vec!["https://shop.example.com", "http://localhost:5173"]
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn origin_with_path_is_rejected() {
        let config = ServerConfig {
            allowed_origins: Some("https://shop.example.com/cart".to_string()),
            ..Default::default()
        };

        assert_eq!(
            config.validate(),
            Err(ValidationError::InvalidOrigin(
                "https://shop.example.com/cart".to_string()
            ))
        );
    }

    #[test]
    fn origin_without_scheme_is_rejected() {
        let config = ServerConfig {
            allowed_origins: Some("shop.example.com".to_string()),
            ..Default::default()
        };

        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidOrigin(_))
        ));
    }

    #[test]
    fn route_timeouts_must_be_within_budget() {
        for (checkout, webhook) in [(0, 30), (15, 0), (15, MAX_ROUTE_TIMEOUT_SECS + 1)] {
            let config = ServerConfig {
                checkout_timeout_secs: checkout,
                webhook_timeout_secs: webhook,
                ..Default::default()
            };

            assert_eq!(config.validate(), Err(ValidationError::InvalidTimeout));
        }
    }
}
