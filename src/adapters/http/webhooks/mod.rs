//! HTTP adapter for payment provider webhooks.
//!
//! - `POST /webhooks/stripe` - `{"received": true}` or `Webhook Error: <message>`
//! - `OPTIONS /webhooks/stripe` - Preflight acknowledgement

pub mod handlers;
pub mod routes;

pub use handlers::{WebhookAck, WebhookAppState, SIGNATURE_HEADER};
pub use routes::webhook_router;
