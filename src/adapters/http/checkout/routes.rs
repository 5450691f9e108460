//! Axum router configuration for the checkout endpoint.

use axum::{routing::post, Router};

use super::handlers::{create_checkout, preflight, CheckoutAppState};

/// Create the checkout router.
///
/// # Routes
/// - `POST /checkout` - Create a checkout session
/// - `OPTIONS /checkout` - Preflight acknowledgement
///
/// Any other method answers 405.
pub fn checkout_router() -> Router<CheckoutAppState> {
    Router::new().route("/checkout", post(create_checkout).options(preflight))
}
