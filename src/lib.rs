//! Storefront Payments - Checkout and order notification service
//!
//! This crate turns storefront carts into hosted Stripe checkout sessions and
//! reacts to completed payments by emailing the customer and the merchant.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
