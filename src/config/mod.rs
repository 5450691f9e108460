//! Service configuration.
//!
//! Everything comes from `STOREFRONT__<SECTION>__<KEY>` environment variables,
//! with a `.env` file read first in development. The Stripe and Resend
//! credentials are required; every other key has a default.

mod email;
mod error;
mod features;
mod payment;
mod server;

pub use email::EmailConfig;
pub use error::{ConfigError, ValidationError};
pub use features::FeatureFlags;
pub use payment::PaymentConfig;
pub use server::{LogFormat, ServerConfig};

use serde::Deserialize;

const ENV_PREFIX: &str = "STOREFRONT";
const ENV_SEPARATOR: &str = "__";

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    pub payment: PaymentConfig,
    pub email: EmailConfig,
    #[serde(default)]
    pub features: FeatureFlags,
}

impl AppConfig {
    /// Reads and validates the process environment.
    ///
    /// # Errors
    ///
    /// `LoadError` when a required key is missing or a value does not parse,
    /// `ValidationFailed` when a value parses but cannot work (a publishable
    /// key where a secret key belongs, an origin with a path).
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_env(env_source())
    }

    fn from_env(source: config::Environment) -> Result<Self, ConfigError> {
        let config: Self = config::Config::builder()
            .add_source(source)
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Returns the first section that fails.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.payment.validate()?;
        self.email.validate()?;
        Ok(())
    }
}

fn env_source() -> config::Environment {
    config::Environment::default()
        .prefix(ENV_PREFIX)
        .separator(ENV_SEPARATOR)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHOP_ENV: &[(&str, &str)] = &[
        ("STOREFRONT__PAYMENT__STRIPE_SECRET_KEY", "sk_test_xxx"),
        ("STOREFRONT__PAYMENT__STRIPE_WEBHOOK_SECRET", "whsec_xxx"),
        ("STOREFRONT__PAYMENT__SHIPPING_RATE_ID", "shr_xxx"),
        ("STOREFRONT__PAYMENT__STOREFRONT_URL", "https://shop.example.com"),
        ("STOREFRONT__EMAIL__RESEND_API_KEY", "re_xxx"),
        ("STOREFRONT__EMAIL__MERCHANT_EMAIL", "owner@shop.example.com"),
    ];

    /// Loads from a fixed variable set instead of the process environment.
    fn load_with(overrides: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: config::Map<String, String> = SHOP_ENV
            .iter()
            .chain(overrides)
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_env(env_source().source(Some(vars)))
    }

    #[test]
    fn loads_shop_credentials_with_defaults() {
        let config = load_with(&[]).unwrap();

        assert_eq!(config.payment.stripe_secret_key, "sk_test_xxx");
        assert_eq!(config.payment.currency, "eur");
        assert_eq!(config.email.merchant_email, "owner@shop.example.com");
        assert_eq!(config.server.bind_addr().to_string(), "0.0.0.0:8080");
        assert_eq!(config.server.log_format, LogFormat::Text);
        assert!(config.features.deduplicate_webhook_events);
    }

    #[test]
    fn missing_payment_section_is_load_error() {
        let vars: config::Map<String, String> = SHOP_ENV
            .iter()
            .filter(|(k, _)| k.starts_with("STOREFRONT__EMAIL__"))
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        let result = AppConfig::from_env(env_source().source(Some(vars)));

        assert!(matches!(result, Err(ConfigError::LoadError(_))));
    }

    #[test]
    fn publishable_key_fails_validation() {
        let result = load_with(&[("STOREFRONT__PAYMENT__STRIPE_SECRET_KEY", "pk_live_xxx")]);

        assert!(matches!(
            result,
            Err(ConfigError::ValidationFailed(ValidationError::InvalidStripeKey))
        ));
    }

    #[test]
    fn server_section_overrides() {
        let config = load_with(&[
            ("STOREFRONT__SERVER__HOST", "127.0.0.1"),
            ("STOREFRONT__SERVER__PORT", "3000"),
            ("STOREFRONT__SERVER__LOG_FORMAT", "json"),
            ("STOREFRONT__SERVER__WEBHOOK_TIMEOUT_SECS", "45"),
            ("STOREFRONT__SERVER__ALLOWED_ORIGINS", "https://shop.example.com"),
        ])
        .unwrap();

        assert_eq!(config.server.bind_addr().to_string(), "127.0.0.1:3000");
        assert_eq!(config.server.log_format, LogFormat::Json);
        assert_eq!(config.server.webhook_timeout_secs, 45);
        assert_eq!(
            config.server.storefront_origins(),
            vec!["https://shop.example.com"]
        );
    }

    #[test]
    fn origin_with_path_fails_validation() {
        let result = load_with(&[(
            "STOREFRONT__SERVER__ALLOWED_ORIGINS",
            "https://shop.example.com/",
        )]);

        assert!(matches!(
            result,
            Err(ConfigError::ValidationFailed(ValidationError::InvalidOrigin(_)))
        ));
    }

    #[test]
    fn deduplication_can_be_switched_off() {
        let config =
            load_with(&[("STOREFRONT__FEATURES__DEDUPLICATE_WEBHOOK_EVENTS", "false")]).unwrap();

        assert!(!config.features.deduplicate_webhook_events);
    }
}
