//! Email configuration

use serde::Deserialize;

use super::error::ValidationError;
use crate::domain::orders::NotificationSettings;

/// Email configuration (Resend)
#[derive(Debug, Clone, Deserialize)]
pub struct EmailConfig {
    /// Resend API key
    pub resend_api_key: String,

    /// Address that receives new-order alerts
    pub merchant_email: String,

    /// From email address
    #[serde(default = "default_from_email")]
    pub from_email: String,

    /// Shop name used as the sender name on customer receipts
    #[serde(default = "default_shop_name")]
    pub shop_name: String,

    /// Sender name on merchant alerts
    #[serde(default = "default_merchant_from_name")]
    pub merchant_from_name: String,

    /// Base URL for the Resend API
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Timeout for each outbound Resend call in seconds
    #[serde(default = "default_outbound_timeout")]
    pub outbound_timeout_secs: u64,
}

impl EmailConfig {
    /// Get formatted "From" header value for customer-facing mail
    pub fn from_header(&self) -> String {
        format!("{} <{}>", self.shop_name, self.from_email)
    }

    /// Get formatted "From" header value for merchant alerts
    pub fn merchant_from_header(&self) -> String {
        format!("{} <{}>", self.merchant_from_name, self.from_email)
    }

    /// Sender identities used to render order notifications.
    pub fn notification_settings(&self) -> NotificationSettings {
        NotificationSettings {
            shop_name: self.shop_name.clone(),
            customer_from: self.from_header(),
            merchant_from: self.merchant_from_header(),
            merchant_email: self.merchant_email.clone(),
        }
    }

    /// Validate email configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.resend_api_key.is_empty() {
            return Err(ValidationError::MissingRequired("RESEND_API_KEY"));
        }
        if !self.resend_api_key.starts_with("re_") {
            return Err(ValidationError::InvalidResendKey);
        }
        if !self.from_email.contains('@') {
            return Err(ValidationError::InvalidFromEmail);
        }
        if self.merchant_email.is_empty() {
            return Err(ValidationError::MissingRequired("MERCHANT_EMAIL"));
        }
        if !self.merchant_email.contains('@') {
            return Err(ValidationError::InvalidMerchantEmail);
        }
        if self.outbound_timeout_secs == 0 || self.outbound_timeout_secs > 120 {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            resend_api_key: String::new(),
            merchant_email: String::new(),
            from_email: default_from_email(),
            shop_name: default_shop_name(),
            merchant_from_name: default_merchant_from_name(),
            api_base_url: default_api_base_url(),
            outbound_timeout_secs: default_outbound_timeout(),
        }
    }
}

fn default_from_email() -> String {
    "onboarding@resend.dev".to_string()
}

fn default_shop_name() -> String {
    "Craft Shop".to_string()
}

fn default_merchant_from_name() -> String {
    "Order Notification".to_string()
}

fn default_api_base_url() -> String {
    "https://api.resend.com".to_string()
}

fn default_outbound_timeout() -> u64 {
    10
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> EmailConfig {
        EmailConfig {
            resend_api_key: "re_abcd1234".to_string(),
            merchant_email: "owner@shop.example.com".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_email_config_defaults() {
        let config = EmailConfig::default();
        assert_eq!(config.from_email, "onboarding@resend.dev");
        assert_eq!(config.shop_name, "Craft Shop");
        assert_eq!(config.merchant_from_name, "Order Notification");
        assert_eq!(config.api_base_url, "https://api.resend.com");
    }

    #[test]
    fn test_from_headers() {
        let config = EmailConfig {
            from_email: "orders@example.com".to_string(),
            shop_name: "Woolly Things".to_string(),
            merchant_from_name: "New Order".to_string(),
            ..valid_config()
        };
        assert_eq!(config.from_header(), "Woolly Things <orders@example.com>");
        assert_eq!(config.merchant_from_header(), "New Order <orders@example.com>");
    }

    #[test]
    fn test_notification_settings() {
        let settings = valid_config().notification_settings();
        assert_eq!(settings.shop_name, "Craft Shop");
        assert_eq!(settings.customer_from, "Craft Shop <onboarding@resend.dev>");
        assert_eq!(settings.merchant_from, "Order Notification <onboarding@resend.dev>");
        assert_eq!(settings.merchant_email, "owner@shop.example.com");
    }

    #[test]
    fn test_validation_missing_api_key() {
        let config = EmailConfig::default();
        assert_eq!(
            config.validate(),
            Err(ValidationError::MissingRequired("RESEND_API_KEY"))
        );
    }

    #[test]
    fn test_validation_invalid_api_key_prefix() {
        let config = EmailConfig {
            resend_api_key: "sk_xxx".to_string(), // Wrong prefix
            ..valid_config()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidResendKey));
    }

    #[test]
    fn test_validation_invalid_from_email() {
        let config = EmailConfig {
            from_email: "invalid-email".to_string(),
            ..valid_config()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidFromEmail));
    }

    #[test]
    fn test_validation_missing_merchant_email() {
        let config = EmailConfig {
            merchant_email: String::new(),
            ..valid_config()
        };
        assert_eq!(
            config.validate(),
            Err(ValidationError::MissingRequired("MERCHANT_EMAIL"))
        );
    }

    #[test]
    fn test_validation_valid_config() {
        assert!(valid_config().validate().is_ok());
    }
}
