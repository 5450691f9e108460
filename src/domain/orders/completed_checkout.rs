//! The completed checkout session carried by a `checkout.session.completed` event.

use serde::{Deserialize, Serialize};

use super::payment_event::PaymentEvent;
use super::webhook_errors::WebhookError;

/// Postal address as collected by the hosted checkout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Address {
    pub line1: Option<String>,
    pub line2: Option<String>,
    pub postal_code: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
}

/// Recipient name and address for a physical order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ShippingDetails {
    pub name: Option<String>,
    pub address: Option<Address>,
}

#[derive(Debug, Default, Deserialize)]
struct CustomerDetails {
    email: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct CollectedInformation {
    shipping_details: Option<ShippingDetails>,
}

#[derive(Debug, Deserialize)]
struct SessionObject {
    id: String,
    #[serde(default)]
    customer_details: Option<CustomerDetails>,
    #[serde(default)]
    customer_email: Option<String>,
    #[serde(default)]
    shipping_details: Option<ShippingDetails>,
    #[serde(default)]
    collected_information: Option<CollectedInformation>,
}

/// Customer and shipping facts extracted from a completed session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedCheckout {
    pub session_id: String,
    pub customer_email: Option<String>,
    pub shipping: Option<ShippingDetails>,
}

impl CompletedCheckout {
    /// Reads the session object out of a verified event.
    ///
    /// Shipping is taken from `shipping_details` (API 2024-06-20) or
    /// `collected_information.shipping_details` (later versions).
    pub fn from_event(event: &PaymentEvent) -> Result<Self, WebhookError> {
        let session: SessionObject = event
            .deserialize_object()
            .map_err(|e| WebhookError::ParseError(format!("checkout session: {}", e)))?;

        let customer_email = session
            .customer_details
            .and_then(|details| details.email)
            .or(session.customer_email)
            .map(|e| e.trim().to_string())
            .filter(|e| !e.is_empty());

        let shipping = session.shipping_details.or_else(|| {
            session
                .collected_information
                .and_then(|info| info.shipping_details)
        });

        Ok(Self {
            session_id: session.id,
            customer_email,
            shipping,
        })
    }

    /// The address receipts go to. A paid session without one cannot be fulfilled.
    pub fn require_customer_email(&self) -> Result<&str, WebhookError> {
        self.customer_email
            .as_deref()
            .ok_or(WebhookError::MissingField("customer_email"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::orders::PaymentEventBuilder;
    use serde_json::json;

    fn completed(object: serde_json::Value) -> PaymentEvent {
        PaymentEventBuilder::new().object(object).build()
    }

    #[test]
    fn extracts_email_and_shipping() {
        let event = completed(json!({
            "id": "cs_test_1",
            "object": "checkout.session",
            "customer_details": { "email": "buyer@example.com", "name": "Ana García" },
            "shipping_details": {
                "name": "Ana García",
                "address": {
                    "line1": "Calle Mayor 1",
                    "line2": null,
                    "postal_code": "28013",
                    "city": "Madrid",
                    "state": "M",
                    "country": "ES"
                }
            }
        }));

        let checkout = CompletedCheckout::from_event(&event).unwrap();

        assert_eq!(checkout.session_id, "cs_test_1");
        assert_eq!(checkout.require_customer_email().unwrap(), "buyer@example.com");
        let address = checkout.shipping.unwrap().address.unwrap();
        assert_eq!(address.city.as_deref(), Some("Madrid"));
        assert!(address.line2.is_none());
    }

    #[test]
    fn reads_shipping_from_collected_information() {
        let event = completed(json!({
            "id": "cs_test_2",
            "customer_details": { "email": "buyer@example.com" },
            "collected_information": {
                "shipping_details": { "name": "Lee", "address": { "country": "GB" } }
            }
        }));

        let checkout = CompletedCheckout::from_event(&event).unwrap();

        let shipping = checkout.shipping.unwrap();
        assert_eq!(shipping.name.as_deref(), Some("Lee"));
        assert_eq!(shipping.address.unwrap().country.as_deref(), Some("GB"));
    }

    #[test]
    fn falls_back_to_customer_email_field() {
        let event = completed(json!({
            "id": "cs_test_3",
            "customer_details": null,
            "customer_email": "prefilled@example.com"
        }));

        let checkout = CompletedCheckout::from_event(&event).unwrap();

        assert_eq!(
            checkout.require_customer_email().unwrap(),
            "prefilled@example.com"
        );
        assert!(checkout.shipping.is_none());
    }

    #[test]
    fn missing_email_is_missing_field() {
        let event = completed(json!({
            "id": "cs_test_4",
            "customer_details": { "email": null }
        }));

        let checkout = CompletedCheckout::from_event(&event).unwrap();

        let err = checkout.require_customer_email().unwrap_err();
        assert!(matches!(err, WebhookError::MissingField("customer_email")));
        assert!(err.to_string().contains("customer_email"));
    }

    #[test]
    fn blank_email_counts_as_missing() {
        let event = completed(json!({
            "id": "cs_test_5",
            "customer_details": { "email": "  " }
        }));

        let checkout = CompletedCheckout::from_event(&event).unwrap();

        assert!(checkout.require_customer_email().is_err());
    }

    #[test]
    fn object_without_id_is_parse_error() {
        let event = completed(json!({ "customer_details": { "email": "a@b.c" } }));

        let result = CompletedCheckout::from_event(&event);

        assert!(matches!(result, Err(WebhookError::ParseError(_))));
    }
}
