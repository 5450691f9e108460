//! ProcessedEventStore port - tracks which webhook events were already handled.
//!
//! The payment provider delivers events at least once. Recording the event
//! IDs a handler has completed lets a redelivery be acknowledged without
//! repeating its side effects.
//!
//! Claiming is a single insert-if-absent step, so two concurrent deliveries
//! of one event cannot both proceed.
//!
//! # Example
//!
//! ```ignore
//! if !store.try_claim(&event.id, "OrderNotifier").await? {
//!     return Ok(Outcome::Duplicate);
//! }
//!
//! match process(&event).await {
//!     Ok(()) => store.mark_processed(&event.id, "OrderNotifier").await?,
//!     Err(e) => {
//!         store.release(&event.id, "OrderNotifier").await?;
//!         return Err(e);
//!     }
//! }
//! ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Failure of the underlying store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("processed event store: {0}")]
pub struct StoreError(pub String);

/// Port for tracking which events have been processed by which handlers.
///
/// Each handler keeps its own record, so two handlers can process the same
/// event independently.
#[async_trait]
pub trait ProcessedEventStore: Send + Sync {
    /// Atomically claims the event for this handler.
    ///
    /// Returns `false` when the event is already claimed or processed.
    async fn try_claim(&self, event_id: &str, handler_name: &str) -> Result<bool, StoreError>;

    /// Turns a claim into a processed record.
    ///
    /// Call this AFTER successful handling.
    async fn mark_processed(&self, event_id: &str, handler_name: &str) -> Result<(), StoreError>;

    /// Drops an unfinished claim so a redelivery can try again.
    async fn release(&self, event_id: &str, handler_name: &str) -> Result<(), StoreError>;

    /// Removes entries recorded before `cutoff`, returning how many were deleted.
    async fn delete_before(&self, cutoff: DateTime<Utc>) -> Result<u64, StoreError>;
}
