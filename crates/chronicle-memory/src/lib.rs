//! In-memory event store.
//!
//! Reference implementation of the `chronicle-core` store contract, backed
//! by per-aggregate streams, a global commit log, and a snapshot map.

pub mod in_memory_event_store;

pub use in_memory_event_store::InMemoryEventStore;
