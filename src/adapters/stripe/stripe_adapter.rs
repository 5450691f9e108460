//! Stripe payment provider adapter.
//!
//! Implements the `PaymentProvider` port against the Stripe REST API.
//! Requests are form-encoded and authenticated with the secret key as the
//! HTTP basic-auth username; every request pins the API version.
//!
//! # Configuration
//!
//! ```ignore
//! let config = StripeConfig::new(secret_key).with_api_version("2024-06-20");
//! let adapter = StripePaymentAdapter::new(config)?;
//! ```

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};

use crate::config::PaymentConfig;
use crate::domain::checkout::CheckoutSessionRequest;
use crate::domain::orders::PurchasedItem;
use crate::ports::{CheckoutSession, PaymentError, PaymentErrorCode, PaymentProvider};

use super::api_types::{StripeCheckoutSession, StripeErrorResponse, StripeLineItem, StripeList};

/// Page size for line-item listing (Stripe maximum).
const LINE_ITEMS_PAGE_SIZE: u32 = 100;

/// Stripe API configuration.
#[derive(Clone)]
pub struct StripeConfig {
    /// Stripe secret API key (sk_live_... or sk_test_...).
    api_key: SecretString,

    /// Base URL for Stripe API (default: https://api.stripe.com).
    api_base_url: String,

    /// Value of the `Stripe-Version` header.
    api_version: String,

    /// Bound on each outbound call.
    timeout: Duration,
}

impl StripeConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: SecretString::new(api_key.into()),
            api_base_url: "https://api.stripe.com".to_string(),
            api_version: "2024-06-20".to_string(),
            timeout: Duration::from_secs(10),
        }
    }

    /// Set a custom API base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl From<&PaymentConfig> for StripeConfig {
    fn from(config: &PaymentConfig) -> Self {
        StripeConfig::new(config.stripe_secret_key.clone())
            .with_base_url(config.api_base_url.clone())
            .with_api_version(config.api_version.clone())
            .with_timeout(Duration::from_secs(config.outbound_timeout_secs))
    }
}

/// Stripe payment provider adapter.
pub struct StripePaymentAdapter {
    config: StripeConfig,
    http_client: reqwest::Client,
}

impl StripePaymentAdapter {
    /// Create a new Stripe adapter with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: StripeConfig) -> Result<Self, PaymentError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            "Stripe-Version",
            HeaderValue::from_str(&config.api_version)
                .map_err(|e| PaymentError::invalid_request(format!("Invalid API version: {e}")))?,
        );

        let http_client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(|e| PaymentError::network(e.to_string()))?;

        Ok(Self {
            config,
            http_client,
        })
    }

    async fn fetch_line_items_page(
        &self,
        session_id: &str,
        starting_after: Option<&str>,
    ) -> Result<StripeList<StripeLineItem>, PaymentError> {
        let url = format!(
            "{}/v1/checkout/sessions/{}/line_items",
            self.config.api_base_url, session_id
        );

        let mut query = vec![("limit", LINE_ITEMS_PAGE_SIZE.to_string())];
        if let Some(cursor) = starting_after {
            query.push(("starting_after", cursor.to_string()));
        }

        let response = self
            .http_client
            .get(&url)
            .basic_auth(self.config.api_key.expose_secret(), Option::<&str>::None)
            .query(&query)
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        response.json().await.map_err(|e| {
            PaymentError::provider(format!("Failed to parse Stripe response: {}", e))
        })
    }
}

/// Flattens a session request into Stripe's bracketed form encoding.
pub fn checkout_form_params(request: &CheckoutSessionRequest) -> Vec<(String, String)> {
    let mut params = vec![
        ("mode".to_string(), "payment".to_string()),
        ("payment_method_types[0]".to_string(), "card".to_string()),
        ("success_url".to_string(), request.success_url.clone()),
        ("cancel_url".to_string(), request.cancel_url.clone()),
    ];

    for (i, item) in request.line_items.iter().enumerate() {
        let prefix = format!("line_items[{i}]");
        params.push((
            format!("{prefix}[price_data][currency]"),
            request.currency.clone(),
        ));
        params.push((
            format!("{prefix}[price_data][product_data][name]"),
            item.name.clone(),
        ));
        for (j, image) in item.images.iter().enumerate() {
            params.push((
                format!("{prefix}[price_data][product_data][images][{j}]"),
                image.clone(),
            ));
        }
        params.push((
            format!("{prefix}[price_data][unit_amount]"),
            item.unit_amount.to_string(),
        ));
        params.push((format!("{prefix}[quantity]"), item.quantity.to_string()));
    }

    if let Some(shipping) = &request.shipping {
        for (k, country) in shipping.allowed_countries.iter().enumerate() {
            params.push((
                format!("shipping_address_collection[allowed_countries][{k}]"),
                country.clone(),
            ));
        }
        params.push((
            "shipping_options[0][shipping_rate]".to_string(),
            shipping.shipping_rate_id.clone(),
        ));
    }

    params
}

/// Stripe object ids are ASCII letters, digits and underscores.
fn is_stripe_id(id: &str) -> bool {
    !id.is_empty() && id.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_')
}

fn transport_error(e: reqwest::Error) -> PaymentError {
    if e.is_timeout() {
        PaymentError::timeout(format!("Stripe request timed out: {}", e))
    } else {
        PaymentError::network(e.to_string())
    }
}

/// Converts a non-2xx response into a `PaymentError` carrying Stripe's message.
async fn api_error(response: reqwest::Response) -> PaymentError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();

    let parsed = serde_json::from_str::<StripeErrorResponse>(&body).ok();
    let message = parsed
        .as_ref()
        .and_then(|r| r.error.message.clone())
        .unwrap_or_else(|| format!("Stripe API error ({}): {}", status.as_u16(), body));

    let code = match status.as_u16() {
        401 | 403 => PaymentErrorCode::AuthenticationError,
        404 => PaymentErrorCode::NotFound,
        429 => PaymentErrorCode::RateLimitExceeded,
        400..=499 => PaymentErrorCode::InvalidRequest,
        _ => PaymentErrorCode::ProviderError,
    };

    let err = PaymentError::new(code, message);
    let err = match parsed.and_then(|r| r.error.code) {
        Some(provider_code) => err.with_provider_code(provider_code),
        None => err,
    };

    tracing::warn!(
        status = status.as_u16(),
        code = %err.code,
        provider_code = err.provider_code.as_deref().unwrap_or("-"),
        message = %err.message,
        "Stripe API request rejected"
    );
    err
}

#[async_trait]
impl PaymentProvider for StripePaymentAdapter {
    async fn create_checkout_session(
        &self,
        request: CheckoutSessionRequest,
    ) -> Result<CheckoutSession, PaymentError> {
        let url = format!("{}/v1/checkout/sessions", self.config.api_base_url);
        let params = checkout_form_params(&request);

        let response = self
            .http_client
            .post(&url)
            .basic_auth(self.config.api_key.expose_secret(), Option::<&str>::None)
            .form(&params)
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        let session: StripeCheckoutSession = response.json().await.map_err(|e| {
            PaymentError::provider(format!("Failed to parse Stripe response: {}", e))
        })?;

        let url = session
            .url
            .ok_or_else(|| PaymentError::provider("Checkout session has no hosted URL"))?;

        tracing::info!(session_id = %session.id, "Stripe checkout session created");

        Ok(CheckoutSession {
            id: session.id,
            url,
        })
    }

    async fn list_line_items(&self, session_id: &str) -> Result<Vec<PurchasedItem>, PaymentError> {
        // The id becomes a path segment
        if !is_stripe_id(session_id) {
            return Err(PaymentError::invalid_request(format!(
                "Malformed checkout session id: {:?}",
                session_id
            )));
        }

        let mut items = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let page = self
                .fetch_line_items_page(session_id, cursor.as_deref())
                .await?;

            cursor = page.data.last().map(|item| item.id.clone());
            items.extend(page.data.into_iter().map(|item| PurchasedItem {
                description: item.description.unwrap_or_else(|| item.id.clone()),
                quantity: item.quantity.unwrap_or(1),
            }));

            if !page.has_more || cursor.is_none() {
                break;
            }
        }

        Ok(items)
    }
}
