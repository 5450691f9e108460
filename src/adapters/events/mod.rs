//! Event adapters.
//!
//! - `InMemoryProcessedEventStore` - Webhook redelivery tracking

mod in_memory_processed_store;

pub use in_memory_processed_store::InMemoryProcessedEventStore;
