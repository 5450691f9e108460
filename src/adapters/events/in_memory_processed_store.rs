//! In-memory `ProcessedEventStore`.
//!
//! Records live for the lifetime of the process. A single-instance
//! deployment gets redelivery protection across the provider's retry
//! window; a restart forgets everything, which only means a redelivered
//! event is processed once more.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::ports::{ProcessedEventStore, StoreError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EventState {
    /// A delivery is being handled right now.
    Claimed,
    Processed,
}

#[derive(Debug, Clone, Copy)]
struct EventRecord {
    state: EventState,
    recorded_at: DateTime<Utc>,
}

/// Claims and processed records keyed by (event ID, handler name).
#[derive(Default)]
pub struct InMemoryProcessedEventStore {
    records: RwLock<HashMap<(String, String), EventRecord>>,
}

impl InMemoryProcessedEventStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(event_id: &str, handler_name: &str) -> (String, String) {
        (event_id.to_string(), handler_name.to_string())
    }
}

#[async_trait]
impl ProcessedEventStore for InMemoryProcessedEventStore {
    async fn try_claim(&self, event_id: &str, handler_name: &str) -> Result<bool, StoreError> {
        let mut records = self.records.write().await;
        match records.entry(Self::key(event_id, handler_name)) {
            Entry::Occupied(_) => Ok(false),
            Entry::Vacant(slot) => {
                slot.insert(EventRecord {
                    state: EventState::Claimed,
                    recorded_at: Utc::now(),
                });
                Ok(true)
            }
        }
    }

    async fn mark_processed(&self, event_id: &str, handler_name: &str) -> Result<(), StoreError> {
        self.records.write().await.insert(
            Self::key(event_id, handler_name),
            EventRecord {
                state: EventState::Processed,
                recorded_at: Utc::now(),
            },
        );
        Ok(())
    }

    async fn release(&self, event_id: &str, handler_name: &str) -> Result<(), StoreError> {
        let mut records = self.records.write().await;
        let key = Self::key(event_id, handler_name);
        // A processed record is never released
        if records.get(&key).map(|r| r.state) == Some(EventState::Claimed) {
            records.remove(&key);
        }
        Ok(())
    }

    async fn delete_before(&self, cutoff: DateTime<Utc>) -> Result<u64, StoreError> {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|_, record| record.recorded_at >= cutoff);
        Ok((before - records.len()) as u64)
    }
}
