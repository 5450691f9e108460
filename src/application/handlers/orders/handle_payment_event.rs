//! HandlePaymentEventHandler - Command handler for payment provider webhooks.
//!
//! Processing order for one delivery:
//!
//! 1. Signature header present, signature valid (before the body is parsed)
//! 2. Event parsed; test-mode events refused when live mode is required
//! 3. Anything but `checkout.session.completed` is acknowledged and dropped
//! 4. Customer email present
//! 5. Event claimed (when deduplication is enabled); an event that is
//!    already claimed or processed is acknowledged as a duplicate
//! 6. Line items fetched from the provider
//! 7. Customer receipt, then merchant alert
//! 8. Event marked processed, or the claim released on failure

use std::sync::Arc;

use crate::domain::orders::{
    CompletedCheckout, NotificationSettings, PaymentEventKind, StripeWebhookVerifier,
    WebhookError,
};
use crate::ports::{EmailSender, PaymentProvider, ProcessedEventStore};

/// Name under which this handler records processed events.
pub const ORDER_NOTIFIER: &str = "OrderNotifier";

/// Command to handle one webhook delivery.
#[derive(Debug, Clone)]
pub struct HandlePaymentEventCommand {
    /// Raw request body, byte for byte as signed.
    pub payload: Vec<u8>,
    /// `Stripe-Signature` header, if sent.
    pub signature: Option<String>,
}

/// How an authentic delivery was dealt with. Every variant is acknowledged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Both notifications were dispatched.
    Processed {
        event_id: String,
        session_id: String,
    },
    /// Event kind this service does not act on.
    Ignored { event_type: String },
    /// Event was already processed; nothing was sent.
    Duplicate { event_id: String },
}

/// Handler for payment provider webhooks.
///
/// Notifies the customer and the merchant when a checkout completes.
pub struct HandlePaymentEventHandler {
    verifier: StripeWebhookVerifier,
    payment_provider: Arc<dyn PaymentProvider>,
    email_sender: Arc<dyn EmailSender>,
    notifications: NotificationSettings,
    processed_events: Option<Arc<dyn ProcessedEventStore>>,
    require_livemode: bool,
}

impl HandlePaymentEventHandler {
    pub fn new(
        verifier: StripeWebhookVerifier,
        payment_provider: Arc<dyn PaymentProvider>,
        email_sender: Arc<dyn EmailSender>,
        notifications: NotificationSettings,
    ) -> Self {
        Self {
            verifier,
            payment_provider,
            email_sender,
            notifications,
            processed_events: None,
            require_livemode: false,
        }
    }

    /// Skip events already recorded in `store`.
    pub fn with_deduplication(mut self, store: Arc<dyn ProcessedEventStore>) -> Self {
        self.processed_events = Some(store);
        self
    }

    /// Refuse test-mode events.
    pub fn with_require_livemode(mut self, require: bool) -> Self {
        self.require_livemode = require;
        self
    }

    pub async fn handle(&self, cmd: HandlePaymentEventCommand) -> Result<Outcome, WebhookError> {
        // 1. Authenticate
        let signature = cmd
            .signature
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .ok_or(WebhookError::MissingSignature)?;

        let event = self.verifier.verify_and_parse(&cmd.payload, signature)?;

        // 2. Mode
        if self.require_livemode && !event.is_live() {
            tracing::warn!(event_id = %event.id, "Rejected test-mode event");
            return Err(WebhookError::LiveModeRequired);
        }

        // 3. Kind
        if let PaymentEventKind::Other(event_type) = event.kind() {
            tracing::debug!(event_id = %event.id, event_type = %event_type, "Ignoring event");
            return Ok(Outcome::Ignored { event_type });
        }

        // 4. Customer
        let checkout = CompletedCheckout::from_event(&event)?;
        let customer_email = checkout.require_customer_email()?;

        // 5. Claim
        let store = self.processed_events.as_ref();
        if let Some(store) = store {
            let claimed = store
                .try_claim(&event.id, ORDER_NOTIFIER)
                .await
                .map_err(|e| WebhookError::Storage(e.to_string()))?;
            if !claimed {
                tracing::info!(event_id = %event.id, "Skipping already claimed event");
                return Ok(Outcome::Duplicate { event_id: event.id });
            }
        }

        // 6-7. Side effects
        let notified = self.notify(&event.id, &checkout, customer_email).await;

        // 8. Record, or free the claim for the provider's retry
        let item_count = match notified {
            Ok(item_count) => {
                if let Some(store) = store {
                    store
                        .mark_processed(&event.id, ORDER_NOTIFIER)
                        .await
                        .map_err(|e| WebhookError::Storage(e.to_string()))?;
                }
                item_count
            }
            Err(err) => {
                if let Some(store) = store {
                    if let Err(e) = store.release(&event.id, ORDER_NOTIFIER).await {
                        tracing::error!(event_id = %event.id, error = %e, "Failed to release event claim");
                    }
                }
                return Err(err);
            }
        };

        tracing::info!(
            event_id = %event.id,
            session_id = %checkout.session_id,
            item_count,
            shipping = checkout.shipping.is_some(),
            "Order notifications sent"
        );

        Ok(Outcome::Processed {
            event_id: event.id,
            session_id: checkout.session_id,
        })
    }

    /// Fetches the line items and sends both emails. Returns the item count.
    async fn notify(
        &self,
        event_id: &str,
        checkout: &CompletedCheckout,
        customer_email: &str,
    ) -> Result<usize, WebhookError> {
        let items = self
            .payment_provider
            .list_line_items(&checkout.session_id)
            .await
            .map_err(|e| WebhookError::upstream("payment provider", e.to_string()))?;

        // Customer first
        let receipt = self.notifications.customer_receipt(event_id, customer_email);
        let alert = self.notifications.merchant_alert(
            event_id,
            customer_email,
            checkout.shipping.as_ref(),
            &items,
        );

        for email in [&receipt, &alert] {
            let sent = self
                .email_sender
                .send(email)
                .await
                .map_err(|e| WebhookError::upstream("email", e.to_string()))?;
            tracing::debug!(event_id = %event_id, email_id = %sent.id, "Notification sent");
        }

        Ok(items.len())
    }
}
