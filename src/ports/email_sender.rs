//! Email sender port for transactional mail (e.g., Resend).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::orders::NotificationEmail;

/// Port for transactional email delivery.
#[async_trait]
pub trait EmailSender: Send + Sync {
    /// Hand one email to the email platform.
    ///
    /// Delivery state is owned by the platform; nothing is tracked locally.
    async fn send(&self, email: &NotificationEmail) -> Result<SentEmail, EmailError>;
}

/// Acknowledgement from the email platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentEmail {
    /// Platform's message ID.
    pub id: String,
}

/// Errors from email delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailError {
    pub code: EmailErrorCode,
    pub message: String,
    pub retryable: bool,
}

impl EmailError {
    pub fn new(code: EmailErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            retryable: code.is_retryable(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(EmailErrorCode::NetworkError, message)
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self::new(EmailErrorCode::Rejected, message)
    }

    pub fn provider(message: impl Into<String>) -> Self {
        Self::new(EmailErrorCode::ProviderError, message)
    }
}

impl std::fmt::Display for EmailError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for EmailError {}

/// Email error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmailErrorCode {
    /// Network connectivity issue or timeout.
    NetworkError,
    /// API key missing or invalid.
    AuthenticationError,
    /// Platform refused the message (validation, unverified sender).
    Rejected,
    /// Rate limit exceeded.
    RateLimitExceeded,
    /// Platform-side failure.
    ProviderError,
}

impl EmailErrorCode {
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            EmailErrorCode::NetworkError
                | EmailErrorCode::RateLimitExceeded
                | EmailErrorCode::ProviderError
        )
    }
}

impl std::fmt::Display for EmailErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            EmailErrorCode::NetworkError => "network_error",
            EmailErrorCode::AuthenticationError => "authentication_error",
            EmailErrorCode::Rejected => "rejected",
            EmailErrorCode::RateLimitExceeded => "rate_limit_exceeded",
            EmailErrorCode::ProviderError => "provider_error",
        };
        write!(f, "{}", s)
    }
}
