//! HTTP handlers for the checkout endpoint.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Json, State};
use axum::response::{IntoResponse, Response};

use crate::application::handlers::checkout::{
    CreateCheckoutSessionCommand, CreateCheckoutSessionHandler,
};
use crate::domain::checkout::{CartError, CartItem, CheckoutError};

use super::dto::{CheckoutResponse, ErrorResponse};

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared state for checkout routes.
///
/// The handler is built once at startup from validated settings.
#[derive(Clone)]
pub struct CheckoutAppState {
    pub handler: Arc<CreateCheckoutSessionHandler>,
}

impl CheckoutAppState {
    pub fn new(handler: CreateCheckoutSessionHandler) -> Self {
        Self {
            handler: Arc::new(handler),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// POST /checkout - Open a hosted checkout session for the posted cart.
pub async fn create_checkout(
    State(state): State<CheckoutAppState>,
    payload: Result<Json<Vec<CartItem>>, JsonRejection>,
) -> Result<Json<CheckoutResponse>, CheckoutApiError> {
    let Json(items) = payload.map_err(|rejection| {
        CheckoutError::from(CartError::Malformed(rejection.body_text()))
    })?;

    let result = state
        .handler
        .handle(CreateCheckoutSessionCommand { items })
        .await?;

    Ok(Json(CheckoutResponse { url: result.url }))
}

/// OPTIONS /checkout - Plain preflight acknowledgement.
pub async fn preflight() -> &'static str {
    "ok"
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// API error type that converts checkout errors to HTTP responses.
#[derive(Debug)]
pub struct CheckoutApiError(CheckoutError);

impl From<CheckoutError> for CheckoutApiError {
    fn from(err: CheckoutError) -> Self {
        Self(err)
    }
}

impl IntoResponse for CheckoutApiError {
    fn into_response(self) -> Response {
        let status = self.0.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self.0, status = status.as_u16(), "Checkout failed");
        } else {
            tracing::warn!(error = %self.0, status = status.as_u16(), "Checkout rejected");
        }

        // Configuration details stay in the logs
        let message = match &self.0 {
            CheckoutError::Configuration(_) => "Checkout is temporarily unavailable".to_string(),
            other => other.to_string(),
        };

        (status, Json(ErrorResponse::new(message))).into_response()
    }
}
