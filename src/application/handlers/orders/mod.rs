//! Order handlers.
//!
//! Reacts to payment provider events for completed checkouts.

mod handle_payment_event;

pub use handle_payment_event::{
    HandlePaymentEventCommand, HandlePaymentEventHandler, Outcome, ORDER_NOTIFIER,
};
