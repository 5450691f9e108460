//! HTTP handlers for the payment webhook endpoint.
//!
//! The body is taken as raw bytes: the signature covers the exact payload,
//! so it must not pass through a JSON extractor first.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Json, State};
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use crate::application::handlers::orders::{
    HandlePaymentEventCommand, HandlePaymentEventHandler, Outcome,
};
use crate::domain::orders::WebhookError;

/// Header carrying the webhook signature.
pub const SIGNATURE_HEADER: &str = "stripe-signature";

/// Shared state for webhook routes.
#[derive(Clone)]
pub struct WebhookAppState {
    pub handler: Arc<HandlePaymentEventHandler>,
}

impl WebhookAppState {
    pub fn new(handler: HandlePaymentEventHandler) -> Self {
        Self {
            handler: Arc::new(handler),
        }
    }
}

/// Acknowledgement body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookAck {
    pub received: bool,
}

/// POST /webhooks/stripe - Receive a payment event.
pub async fn handle_stripe_webhook(
    State(state): State<WebhookAppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<WebhookAck>, WebhookApiError> {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let cmd = HandlePaymentEventCommand {
        payload: body.to_vec(),
        signature,
    };

    match state.handler.handle(cmd).await? {
        Outcome::Processed { event_id, .. } => {
            tracing::debug!(event_id = %event_id, "Webhook processed");
        }
        Outcome::Ignored { event_type } => {
            tracing::debug!(event_type = %event_type, "Webhook ignored");
        }
        Outcome::Duplicate { event_id } => {
            tracing::debug!(event_id = %event_id, "Webhook duplicate");
        }
    }

    Ok(Json(WebhookAck { received: true }))
}

/// OPTIONS /webhooks/stripe - Plain preflight acknowledgement.
pub async fn preflight() -> &'static str {
    "ok"
}

/// Converts receiver errors to plain-text responses.
#[derive(Debug)]
pub struct WebhookApiError(WebhookError);

impl From<WebhookError> for WebhookApiError {
    fn from(err: WebhookError) -> Self {
        Self(err)
    }
}

impl IntoResponse for WebhookApiError {
    fn into_response(self) -> Response {
        let status = self.0.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self.0, status = status.as_u16(), "Webhook processing failed");
        } else {
            tracing::warn!(error = %self.0, status = status.as_u16(), "Webhook rejected");
        }

        (status, format!("Webhook Error: {}", self.0)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn ack_serializes_received_true() {
        let json = serde_json::to_string(&WebhookAck { received: true }).unwrap();
        assert_eq!(json, r#"{"received":true}"#);
    }

    #[test]
    fn missing_signature_is_bad_request() {
        let response = WebhookApiError(WebhookError::MissingSignature).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn upstream_failure_is_bad_gateway() {
        let response =
            WebhookApiError(WebhookError::upstream("email", "rate limited")).into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }
}
