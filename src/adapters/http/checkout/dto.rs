//! HTTP DTOs for the checkout endpoint.
//!
//! The request body is a bare JSON array of cart items, so the domain
//! `CartItem` is deserialized directly.

use serde::{Deserialize, Serialize};

/// Response carrying the hosted payment page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutResponse {
    pub url: String,
}

/// Error body returned for any checkout failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}
