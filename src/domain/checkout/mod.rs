//! Checkout domain module.
//!
//! Turns an untrusted storefront cart into a priced checkout-session request.

mod cart;
mod errors;
mod session_request;

pub use cart::{Cart, CartItem, LineItem, ProductKind, MAX_CART_ITEMS, MAX_IMAGES_PER_ITEM};
pub use errors::{CartError, CheckoutError};
pub use session_request::{CheckoutSessionRequest, CheckoutSettings, ShippingPolicy};
