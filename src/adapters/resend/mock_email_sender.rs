//! Mock email sender for testing.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::domain::orders::NotificationEmail;
use crate::ports::{EmailError, EmailSender, SentEmail};

/// Records every message instead of sending it.
///
/// Clones share state, so a test can keep one handle and give another to
/// the code under test.
#[derive(Default, Clone)]
pub struct MockEmailSender {
    inner: Arc<Mutex<MockState>>,
}

#[derive(Default)]
struct MockState {
    sent: Vec<NotificationEmail>,
    /// Errors by recipient address.
    recipient_errors: HashMap<String, EmailError>,
    next_error: Option<EmailError>,
}

impl MockEmailSender {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every send to `recipient`.
    pub fn fail_for(&self, recipient: &str, error: EmailError) {
        self.inner
            .lock()
            .unwrap()
            .recipient_errors
            .insert(recipient.to_string(), error);
    }

    /// Fail the next send only.
    pub fn set_error(&self, error: EmailError) {
        self.inner.lock().unwrap().next_error = Some(error);
    }

    pub fn clear_errors(&self) {
        let mut state = self.inner.lock().unwrap();
        state.next_error = None;
        state.recipient_errors.clear();
    }

    /// Messages accepted so far, in send order.
    pub fn sent(&self) -> Vec<NotificationEmail> {
        self.inner.lock().unwrap().sent.clone()
    }

    pub fn sent_count(&self) -> usize {
        self.inner.lock().unwrap().sent.len()
    }

    /// Messages accepted for one recipient.
    pub fn sent_to(&self, recipient: &str) -> Vec<NotificationEmail> {
        self.inner
            .lock()
            .unwrap()
            .sent
            .iter()
            .filter(|e| e.to == recipient)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl EmailSender for MockEmailSender {
    async fn send(&self, email: &NotificationEmail) -> Result<SentEmail, EmailError> {
        let mut state = self.inner.lock().unwrap();

        if let Some(error) = state.recipient_errors.get(&email.to) {
            return Err(error.clone());
        }
        if let Some(error) = state.next_error.take() {
            return Err(error);
        }

        state.sent.push(email.clone());
        Ok(SentEmail {
            id: format!("em_mock_{}", state.sent.len()),
        })
    }
}
