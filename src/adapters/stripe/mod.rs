//! Stripe payment provider adapter.
//!
//! Implements the `PaymentProvider` port for Stripe integration:
//! - Hosted checkout session creation
//! - Line-item listing for completed sessions
//!
//! Webhook signature verification lives in the orders domain since it needs
//! nothing but the signing secret.
//!
//! # Configuration
//!
//! Required environment variables:
//! - `STOREFRONT__PAYMENT__STRIPE_SECRET_KEY`: Stripe secret API key
//! - `STOREFRONT__PAYMENT__STRIPE_WEBHOOK_SECRET`: Webhook signing secret (whsec_...)

mod api_types;
mod mock_payment_provider;
mod stripe_adapter;

pub use api_types::{
    StripeCheckoutSession, StripeErrorBody, StripeErrorResponse, StripeLineItem, StripeList,
};
pub use mock_payment_provider::{MethodCall, MockPaymentProvider};
pub use stripe_adapter::{checkout_form_params, StripeConfig, StripePaymentAdapter};
