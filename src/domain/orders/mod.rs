//! Orders domain module.
//!
//! Authenticates payment events and renders the notifications sent when a
//! checkout completes.
//!
//! # Module Structure
//!
//! - `payment_event` - Webhook event envelope and kinds
//! - `webhook_verifier` - Signature header parsing and HMAC verification
//! - `webhook_errors` - Receiver error taxonomy with status mapping
//! - `completed_checkout` - Customer and shipping facts of a completed session
//! - `notification` - Customer receipt and merchant alert rendering

mod completed_checkout;
mod notification;
mod payment_event;
mod webhook_errors;
mod webhook_verifier;

pub use completed_checkout::{Address, CompletedCheckout, ShippingDetails};
pub use notification::{shipping_html, NotificationEmail, NotificationSettings, PurchasedItem};
pub use payment_event::{PaymentEvent, PaymentEventData, PaymentEventKind};
pub use webhook_errors::WebhookError;
pub use webhook_verifier::{generate_test_header, SignatureHeader, StripeWebhookVerifier};

#[cfg(test)]
pub use payment_event::PaymentEventBuilder;
