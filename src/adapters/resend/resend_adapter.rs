//! Resend email adapter.
//!
//! Implements the `EmailSender` port against `POST /emails`. Each message
//! carries an `Idempotency-Key` header so that a webhook redelivery which
//! re-sends the same notification is collapsed by the platform.

use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::config::EmailConfig;
use crate::domain::orders::NotificationEmail;
use crate::ports::{EmailError, EmailErrorCode, EmailSender, SentEmail};

/// Resend API configuration.
#[derive(Clone)]
pub struct ResendConfig {
    api_key: SecretString,
    api_base_url: String,
    timeout: Duration,
}

impl ResendConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: SecretString::new(api_key.into()),
            api_base_url: "https://api.resend.com".to_string(),
            timeout: Duration::from_secs(10),
        }
    }

    /// Set a custom API base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl From<&EmailConfig> for ResendConfig {
    fn from(config: &EmailConfig) -> Self {
        ResendConfig::new(config.resend_api_key.clone())
            .with_base_url(config.api_base_url.clone())
            .with_timeout(Duration::from_secs(config.outbound_timeout_secs))
    }
}

#[derive(Debug, Serialize)]
struct SendEmailBody<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    html: &'a str,
}

#[derive(Debug, Deserialize)]
struct SendEmailResponse {
    id: String,
}

#[derive(Debug, Deserialize)]
struct ResendErrorResponse {
    #[serde(default)]
    message: Option<String>,
}

/// Resend email sender.
pub struct ResendEmailSender {
    config: ResendConfig,
    http_client: reqwest::Client,
}

impl ResendEmailSender {
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: ResendConfig) -> Result<Self, EmailError> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| EmailError::network(e.to_string()))?;

        Ok(Self {
            config,
            http_client,
        })
    }
}

#[async_trait]
impl EmailSender for ResendEmailSender {
    async fn send(&self, email: &NotificationEmail) -> Result<SentEmail, EmailError> {
        let url = format!("{}/emails", self.config.api_base_url);
        let body = SendEmailBody {
            from: &email.from,
            to: [&email.to],
            subject: &email.subject,
            html: &email.html,
        };

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(self.config.api_key.expose_secret())
            .header("Idempotency-Key", &email.idempotency_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| EmailError::network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ResendErrorResponse>(&text)
                .ok()
                .and_then(|r| r.message)
                .unwrap_or_else(|| format!("Resend API error ({}): {}", status.as_u16(), text));

            let code = match status.as_u16() {
                401 | 403 => EmailErrorCode::AuthenticationError,
                429 => EmailErrorCode::RateLimitExceeded,
                400..=499 => EmailErrorCode::Rejected,
                _ => EmailErrorCode::ProviderError,
            };
            return Err(EmailError::new(code, message));
        }

        let sent: SendEmailResponse = response
            .json()
            .await
            .map_err(|e| EmailError::provider(format!("Failed to parse Resend response: {}", e)))?;

        Ok(SentEmail { id: sent.id })
    }
}
