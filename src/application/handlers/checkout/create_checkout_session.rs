//! CreateCheckoutSessionHandler - Command handler for starting a hosted checkout.

use std::sync::Arc;

use crate::domain::checkout::{
    Cart, CartItem, CheckoutError, CheckoutSessionRequest, CheckoutSettings,
};
use crate::ports::PaymentProvider;

/// Command to open a checkout session for a storefront cart.
#[derive(Debug, Clone)]
pub struct CreateCheckoutSessionCommand {
    /// Cart items exactly as the storefront sent them.
    pub items: Vec<CartItem>,
}

/// Result of successful checkout creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateCheckoutSessionResult {
    pub session_id: String,
    /// Hosted payment page the shopper is redirected to.
    pub url: String,
    pub requires_shipping: bool,
}

/// Handler for creating checkout sessions.
///
/// Validates the cart, prices it in minor units and submits exactly one
/// session-creation request. Nothing is retried.
pub struct CreateCheckoutSessionHandler {
    payment_provider: Arc<dyn PaymentProvider>,
    settings: CheckoutSettings,
}

impl CreateCheckoutSessionHandler {
    /// # Errors
    ///
    /// `CheckoutError::Configuration` if the settings can never yield a session.
    pub fn new(
        payment_provider: Arc<dyn PaymentProvider>,
        settings: CheckoutSettings,
    ) -> Result<Self, CheckoutError> {
        settings.validate()?;
        Ok(Self {
            payment_provider,
            settings,
        })
    }

    pub async fn handle(
        &self,
        cmd: CreateCheckoutSessionCommand,
    ) -> Result<CreateCheckoutSessionResult, CheckoutError> {
        // 1. Validate and price the cart
        let cart = Cart::new(cmd.items)?;

        // 2. Attach shipping only for physical goods
        let request = CheckoutSessionRequest::new(&cart, &self.settings);
        let requires_shipping = request.requires_shipping();

        tracing::debug!(
            item_count = cart.len(),
            requires_shipping,
            "Creating checkout session"
        );

        // 3. One provider call
        let session = self
            .payment_provider
            .create_checkout_session(request)
            .await?;

        tracing::info!(
            session_id = %session.id,
            item_count = cart.len(),
            requires_shipping,
            "Checkout session created"
        );

        Ok(CreateCheckoutSessionResult {
            session_id: session.id,
            url: session.url,
            requires_shipping,
        })
    }
}
