//! Shared test mocks and fixtures for the Chronicle event-sourcing core.

mod clock;
mod fixtures;
mod stores;

pub use clock::FixedClock;
pub use fixtures::make_stored_event;
pub use stores::{EmptyEventStore, FailingEventStore, RecordingEventStore};
