//! Checkout settings and the session-creation request built from a cart.

use super::cart::{Cart, LineItem};
use super::errors::CheckoutError;

/// Shipping options attached to sessions that contain physical items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShippingPolicy {
    /// ISO 3166-1 alpha-2 codes accepted for the shipping address.
    pub allowed_countries: Vec<String>,
    /// Pre-provisioned shipping rate reference.
    pub shipping_rate_id: String,
}

/// Fixed per-deployment checkout settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutSettings {
    pub currency: String,
    pub success_url: String,
    pub cancel_url: String,
    pub shipping: ShippingPolicy,
}

impl CheckoutSettings {
    /// Rejects settings that could never produce a valid session.
    pub fn validate(&self) -> Result<(), CheckoutError> {
        if self.currency.trim().is_empty() {
            return Err(CheckoutError::configuration("currency is not set"));
        }
        if self.success_url.trim().is_empty() || self.cancel_url.trim().is_empty() {
            return Err(CheckoutError::configuration("redirect URLs are not set"));
        }
        if self.shipping.shipping_rate_id.trim().is_empty() {
            return Err(CheckoutError::configuration("shipping rate is not set"));
        }
        if self.shipping.allowed_countries.is_empty() {
            return Err(CheckoutError::configuration(
                "no shipping countries are allowed",
            ));
        }
        Ok(())
    }
}

/// Everything the payment provider needs to open a hosted checkout.
///
/// Sessions are always one-time card payments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutSessionRequest {
    pub currency: String,
    pub line_items: Vec<LineItem>,
    /// Present iff the cart holds a physical item.
    pub shipping: Option<ShippingPolicy>,
    pub success_url: String,
    pub cancel_url: String,
}

impl CheckoutSessionRequest {
    pub fn new(cart: &Cart, settings: &CheckoutSettings) -> Self {
        Self {
            currency: settings.currency.clone(),
            line_items: cart.line_items().to_vec(),
            shipping: cart
                .requires_shipping()
                .then(|| settings.shipping.clone()),
            success_url: settings.success_url.clone(),
            cancel_url: settings.cancel_url.clone(),
        }
    }

    pub fn requires_shipping(&self) -> bool {
        self.shipping.is_some()
    }
}
