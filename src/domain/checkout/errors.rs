//! Checkout error types.
//!
//! # HTTP Status Mapping
//!
//! | Error | HTTP Status |
//! |-------|-------------|
//! | Configuration | 500 |
//! | InvalidCart | 400 |
//! | Provider | 502 (504 on timeout) |

use axum::http::StatusCode;
use thiserror::Error;

/// Reasons a cart payload is rejected before any provider call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    /// Request body was not a JSON array of cart items.
    #[error("Malformed cart: {0}")]
    Malformed(String),

    /// Cart contains no items.
    #[error("Cart is empty")]
    Empty,

    /// Cart exceeds the provider's line-item limit.
    #[error("Cart has {count} items, at most {max} are allowed")]
    TooManyItems { count: usize, max: usize },

    /// Item has a blank display name.
    #[error("Item {index} has no name")]
    MissingName { index: usize },

    /// Item quantity is below one.
    #[error("Item {index} has invalid quantity {quantity}")]
    InvalidQuantity { index: usize, quantity: i64 },

    /// Item price is negative.
    #[error("Item {index} has a negative price")]
    NegativePrice { index: usize },

    /// Item price cannot be expressed in minor units.
    #[error("Item {index} price is out of range")]
    AmountOutOfRange { index: usize },
}

/// Errors raised while creating a checkout session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckoutError {
    /// Required checkout settings are missing or malformed.
    #[error("Checkout is not configured: {0}")]
    Configuration(String),

    /// The cart failed validation.
    #[error(transparent)]
    InvalidCart(#[from] CartError),

    /// The payment provider rejected or failed the request.
    #[error("{message}")]
    Provider { message: String, timed_out: bool },
}

impl CheckoutError {
    pub fn configuration(message: impl Into<String>) -> Self {
        CheckoutError::Configuration(message.into())
    }

    pub fn provider(message: impl Into<String>, timed_out: bool) -> Self {
        CheckoutError::Provider {
            message: message.into(),
            timed_out,
        }
    }

    /// Checkout is user-initiated, so only provider hiccups are worth resubmitting.
    pub fn is_retryable(&self) -> bool {
        matches!(self, CheckoutError::Provider { .. })
    }

    /// Maps the error to an HTTP status code.
    pub fn status_code(&self) -> StatusCode {
        match self {
            CheckoutError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
            CheckoutError::InvalidCart(_) => StatusCode::BAD_REQUEST,
            CheckoutError::Provider { timed_out: true, .. } => StatusCode::GATEWAY_TIMEOUT,
            CheckoutError::Provider { .. } => StatusCode::BAD_GATEWAY,
        }
    }
}
