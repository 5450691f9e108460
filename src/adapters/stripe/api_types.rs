//! Stripe API response objects.
//!
//! Only the fields this service reads are modelled; everything else in the
//! response is ignored.

use serde::Deserialize;

/// Response of `POST /v1/checkout/sessions`.
#[derive(Debug, Clone, Deserialize)]
pub struct StripeCheckoutSession {
    /// Session ID (cs_xxx).
    pub id: String,

    /// Hosted payment page. Null once the session is no longer open.
    #[serde(default)]
    pub url: Option<String>,
}

/// Paginated Stripe list envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct StripeList<T> {
    pub data: Vec<T>,
    #[serde(default)]
    pub has_more: bool,
}

/// Entry of `GET /v1/checkout/sessions/{id}/line_items`.
#[derive(Debug, Clone, Deserialize)]
pub struct StripeLineItem {
    /// Line item ID (li_xxx), used as the pagination cursor.
    pub id: String,

    /// Defaults to the product name.
    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub quantity: Option<u64>,
}

/// Error envelope returned with non-2xx responses.
#[derive(Debug, Clone, Deserialize)]
pub struct StripeErrorResponse {
    pub error: StripeErrorBody,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StripeErrorBody {
    #[serde(default)]
    pub message: Option<String>,

    #[serde(default)]
    pub code: Option<String>,

    #[serde(rename = "type", default)]
    pub error_type: Option<String>,
}
