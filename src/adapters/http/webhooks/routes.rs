//! Axum router configuration for payment webhooks.

use axum::{routing::post, Router};

use super::handlers::{handle_stripe_webhook, preflight, WebhookAppState};

/// Create the webhook router.
///
/// No user authentication: deliveries are authenticated by signature.
///
/// # Routes
/// - `POST /webhooks/stripe` - Receive a payment event
/// - `OPTIONS /webhooks/stripe` - Preflight acknowledgement
pub fn webhook_router() -> Router<WebhookAppState> {
    Router::new().route(
        "/webhooks/stripe",
        post(handle_stripe_webhook).options(preflight),
    )
}
