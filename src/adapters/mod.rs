//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `stripe` - Payment provider (hosted checkout, line items)
//! - `resend` - Transactional email
//! - `events` - Processed-event tracking
//! - `http` - Axum routers and middleware

pub mod events;
pub mod http;
pub mod resend;
pub mod stripe;

pub use events::InMemoryProcessedEventStore;
pub use resend::{MockEmailSender, ResendConfig, ResendEmailSender};
pub use stripe::{MockPaymentProvider, StripeConfig, StripePaymentAdapter};
