//! Application handlers.
//!
//! Command handlers that orchestrate domain operations.

pub mod checkout;
pub mod orders;

pub use checkout::{
    CreateCheckoutSessionCommand, CreateCheckoutSessionHandler, CreateCheckoutSessionResult,
};
pub use orders::{HandlePaymentEventCommand, HandlePaymentEventHandler, Outcome, ORDER_NOTIFIER};
