//! HTTP adapter for the checkout endpoint.
//!
//! - `POST /checkout` - JSON array of cart items in, `{"url": ...}` out
//! - `OPTIONS /checkout` - Preflight acknowledgement

pub mod dto;
pub mod handlers;
pub mod routes;

pub use dto::{CheckoutResponse, ErrorResponse};
pub use handlers::CheckoutAppState;
pub use routes::checkout_router;
