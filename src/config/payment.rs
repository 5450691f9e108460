//! Payment configuration

use serde::Deserialize;

use super::error::ValidationError;
use crate::domain::checkout::{CheckoutSettings, ShippingPolicy};

/// Payment configuration (Stripe)
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentConfig {
    /// Stripe secret API key
    pub stripe_secret_key: String,

    /// Stripe webhook signing secret
    pub stripe_webhook_secret: String,

    /// Pre-provisioned shipping rate attached to physical orders
    pub shipping_rate_id: String,

    /// Storefront origin used as both success and cancel redirect
    pub storefront_url: String,

    /// Countries accepted for shipping (comma-separated ISO 3166-1 alpha-2)
    #[serde(default = "default_allowed_countries")]
    pub allowed_countries: String,

    /// Presentment currency (ISO 4217, lowercase)
    #[serde(default = "default_currency")]
    pub currency: String,

    /// Base URL for the Stripe API
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Stripe API version pinned on every request
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Timeout for each outbound Stripe call in seconds
    #[serde(default = "default_outbound_timeout")]
    pub outbound_timeout_secs: u64,

    /// Reject test-mode webhook events
    #[serde(default)]
    pub require_livemode: bool,
}

impl PaymentConfig {
    /// Check if using Stripe live mode
    pub fn is_live_mode(&self) -> bool {
        self.stripe_secret_key.starts_with("sk_live_") || self.stripe_secret_key.starts_with("rk_live_")
    }

    /// Allowed shipping countries, normalized to uppercase
    pub fn allowed_countries_list(&self) -> Vec<String> {
        self.allowed_countries
            .split(',')
            .map(|c| c.trim().to_ascii_uppercase())
            .filter(|c| !c.is_empty())
            .collect()
    }

    /// Checkout settings for session creation.
    ///
    /// The storefront URL is both the success and the cancel redirect.
    pub fn checkout_settings(&self) -> CheckoutSettings {
        CheckoutSettings {
            currency: self.currency.clone(),
            success_url: self.storefront_url.clone(),
            cancel_url: self.storefront_url.clone(),
            shipping: ShippingPolicy {
                allowed_countries: self.allowed_countries_list(),
                shipping_rate_id: self.shipping_rate_id.clone(),
            },
        }
    }

    /// Validate payment configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.stripe_secret_key.is_empty() {
            return Err(ValidationError::MissingRequired("STRIPE_SECRET_KEY"));
        }
        if self.stripe_webhook_secret.is_empty() {
            return Err(ValidationError::MissingRequired("STRIPE_WEBHOOK_SECRET"));
        }
        if self.shipping_rate_id.is_empty() {
            return Err(ValidationError::MissingRequired("SHIPPING_RATE_ID"));
        }
        if self.storefront_url.is_empty() {
            return Err(ValidationError::MissingRequired("STOREFRONT_URL"));
        }

        // Verify key prefixes for safety
        if !(self.stripe_secret_key.starts_with("sk_") || self.stripe_secret_key.starts_with("rk_")) {
            return Err(ValidationError::InvalidStripeKey);
        }
        // Live events are only ever delivered to a live account
        if self.require_livemode && !self.is_live_mode() {
            return Err(ValidationError::LiveKeyRequired);
        }
        if !self.stripe_webhook_secret.starts_with("whsec_") {
            return Err(ValidationError::InvalidStripeWebhookSecret);
        }
        if !self.shipping_rate_id.starts_with("shr_") {
            return Err(ValidationError::InvalidShippingRate);
        }
        if !(self.storefront_url.starts_with("https://") || self.storefront_url.starts_with("http://")) {
            return Err(ValidationError::InvalidStorefrontUrl);
        }

        let countries = self.allowed_countries_list();
        if countries.is_empty() {
            return Err(ValidationError::MissingRequired("ALLOWED_COUNTRIES"));
        }
        if let Some(bad) = countries
            .iter()
            .find(|c| c.len() != 2 || !c.chars().all(|ch| ch.is_ascii_alphabetic()))
        {
            return Err(ValidationError::InvalidCountryCode(bad.clone()));
        }

        if self.currency.len() != 3 || !self.currency.chars().all(|c| c.is_ascii_lowercase()) {
            return Err(ValidationError::InvalidCurrency(self.currency.clone()));
        }

        if self.outbound_timeout_secs == 0 || self.outbound_timeout_secs > 120 {
            return Err(ValidationError::InvalidTimeout);
        }

        Ok(())
    }
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            stripe_secret_key: String::new(),
            stripe_webhook_secret: String::new(),
            shipping_rate_id: String::new(),
            storefront_url: String::new(),
            allowed_countries: default_allowed_countries(),
            currency: default_currency(),
            api_base_url: default_api_base_url(),
            api_version: default_api_version(),
            outbound_timeout_secs: default_outbound_timeout(),
            require_livemode: false,
        }
    }
}

fn default_allowed_countries() -> String {
    "ES,FR,DE,PT,IT,US,GB,CA".to_string()
}

fn default_currency() -> String {
    "eur".to_string()
}

fn default_api_base_url() -> String {
    "https://api.stripe.com".to_string()
}

fn default_api_version() -> String {
    "2024-06-20".to_string()
}

fn default_outbound_timeout() -> u64 {
    10
}
