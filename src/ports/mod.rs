//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `PaymentProvider` - Hosted checkout sessions and line-item lookup
//! - `EmailSender` - Transactional email delivery
//! - `ProcessedEventStore` - Idempotency tracking for webhook events

mod email_sender;
mod payment_provider;
mod processed_event_store;

pub use email_sender::{EmailError, EmailErrorCode, EmailSender, SentEmail};
pub use payment_provider::{CheckoutSession, PaymentError, PaymentErrorCode, PaymentProvider};
pub use processed_event_store::{ProcessedEventStore, StoreError};
