//! Domain layer containing business rules and domain types.
//!
//! # Module Organization
//!
//! - `checkout` - Cart validation, pricing and session-request construction
//! - `orders` - Payment event authentication and order notifications

pub mod checkout;
pub mod orders;
