//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid timeout")]
    InvalidTimeout,

    #[error("Invalid CORS origin: {0}")]
    InvalidOrigin(String),

    #[error("Invalid Stripe API key format")]
    InvalidStripeKey,

    #[error("Live mode is required but the Stripe key is not a live key")]
    LiveKeyRequired,

    #[error("Invalid Stripe webhook secret format")]
    InvalidStripeWebhookSecret,

    #[error("Invalid Stripe shipping rate reference")]
    InvalidShippingRate,

    #[error("Invalid shipping country code: {0}")]
    InvalidCountryCode(String),

    #[error("Invalid currency code: {0}")]
    InvalidCurrency(String),

    #[error("Invalid storefront URL")]
    InvalidStorefrontUrl,

    #[error("Invalid Resend API key format")]
    InvalidResendKey,

    #[error("Invalid from email address")]
    InvalidFromEmail,

    #[error("Invalid merchant email address")]
    InvalidMerchantEmail,
}
