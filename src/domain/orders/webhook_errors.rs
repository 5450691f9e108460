//! Webhook error types for payment event handling.
//!
//! Status codes steer the provider's redelivery: 4xx stops redelivery of
//! unauthentic or unprocessable events, 5xx asks for another attempt.

use axum::http::StatusCode;
use thiserror::Error;

/// Errors that occur while receiving a payment event.
#[derive(Debug, Error)]
pub enum WebhookError {
    /// The signature header was not sent.
    #[error("Missing Stripe signature")]
    MissingSignature,

    /// No signature in the header matches the payload.
    #[error("Invalid signature")]
    InvalidSignature,

    /// Signed timestamp is older than the tolerance window.
    #[error("Timestamp out of range")]
    TimestampOutOfRange,

    /// Signed timestamp is in the future beyond clock skew tolerance.
    #[error("Invalid timestamp")]
    InvalidTimestamp,

    /// Failed to parse the signature header or the verified payload.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// A test-mode event reached a deployment that only accepts live events.
    #[error("Live mode event required")]
    LiveModeRequired,

    /// A required field is absent from the event payload.
    #[error("Missing field: {0}")]
    MissingField(&'static str),

    /// A downstream call (line-item lookup, email dispatch) failed.
    #[error("{service} request failed: {message}")]
    Upstream {
        service: &'static str,
        message: String,
    },

    /// The processed-event store failed.
    #[error("Storage error: {0}")]
    Storage(String),
}

impl WebhookError {
    pub fn upstream(service: &'static str, message: impl Into<String>) -> Self {
        WebhookError::Upstream {
            service,
            message: message.into(),
        }
    }

    /// Returns true if the provider should redeliver this event.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            WebhookError::Upstream { .. } | WebhookError::Storage(_)
        )
    }

    /// Maps the error to an HTTP status code.
    pub fn status_code(&self) -> StatusCode {
        match self {
            WebhookError::MissingSignature
            | WebhookError::InvalidTimestamp
            | WebhookError::ParseError(_) => StatusCode::BAD_REQUEST,

            WebhookError::InvalidSignature
            | WebhookError::TimestampOutOfRange
            | WebhookError::LiveModeRequired => StatusCode::UNAUTHORIZED,

            WebhookError::MissingField(_) => StatusCode::UNPROCESSABLE_ENTITY,

            WebhookError::Upstream { .. } => StatusCode::BAD_GATEWAY,

            WebhookError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ══════════════════════════════════════════════════════════════
    // Error Display Tests
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn missing_signature_displays_correctly() {
        assert_eq!(
            WebhookError::MissingSignature.to_string(),
            "Missing Stripe signature"
        );
    }

    #[test]
    fn parse_error_displays_message() {
        let err = WebhookError::ParseError("invalid JSON".to_string());
        assert_eq!(err.to_string(), "Parse error: invalid JSON");
    }

    #[test]
    fn missing_field_displays_field_name() {
        let err = WebhookError::MissingField("customer_email");
        assert_eq!(err.to_string(), "Missing field: customer_email");
    }

    #[test]
    fn upstream_displays_service_and_message() {
        let err = WebhookError::upstream("email", "rate limited");
        assert_eq!(err.to_string(), "email request failed: rate limited");
    }

    // ══════════════════════════════════════════════════════════════
    // Retryability Tests
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn upstream_and_storage_are_retryable() {
        assert!(WebhookError::upstream("stripe", "timeout").is_retryable());
        assert!(WebhookError::Storage("lock poisoned".to_string()).is_retryable());
    }

    #[test]
    fn client_errors_are_not_retryable() {
        assert!(!WebhookError::MissingSignature.is_retryable());
        assert!(!WebhookError::InvalidSignature.is_retryable());
        assert!(!WebhookError::TimestampOutOfRange.is_retryable());
        assert!(!WebhookError::ParseError("bad".to_string()).is_retryable());
        assert!(!WebhookError::MissingField("customer_email").is_retryable());
        assert!(!WebhookError::LiveModeRequired.is_retryable());
    }

    // ══════════════════════════════════════════════════════════════
    // Status Code Tests
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn malformed_requests_return_bad_request() {
        assert_eq!(
            WebhookError::MissingSignature.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            WebhookError::InvalidTimestamp.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            WebhookError::ParseError("x".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn authenticity_failures_return_unauthorized() {
        assert_eq!(
            WebhookError::InvalidSignature.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            WebhookError::TimestampOutOfRange.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            WebhookError::LiveModeRequired.status_code(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn missing_field_returns_unprocessable_entity() {
        assert_eq!(
            WebhookError::MissingField("customer_email").status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn upstream_returns_bad_gateway() {
        assert_eq!(
            WebhookError::upstream("email", "down").status_code(),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn storage_returns_internal_error() {
        assert_eq!(
            WebhookError::Storage("x".to_string()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
