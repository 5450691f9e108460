//! Resend email adapter.
//!
//! Implements the `EmailSender` port. Requires
//! `STOREFRONT__EMAIL__RESEND_API_KEY`.

mod mock_email_sender;
mod resend_adapter;

pub use mock_email_sender::MockEmailSender;
pub use resend_adapter::{ResendConfig, ResendEmailSender};
