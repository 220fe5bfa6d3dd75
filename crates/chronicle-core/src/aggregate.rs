//! Aggregate root abstraction.
//!
//! Concrete aggregates embed an [`AggregateRoot`] for the bookkeeping (id,
//! version, uncommitted buffer) and implement [`Aggregate`] for the domain
//! logic. Raising, replay, and snapshot restore are provided once on the
//! trait so every aggregate shares the same versioning protocol.

use crate::error::StoreError;
use crate::event::{DomainEvent, EventEnvelope};
use crate::snapshot::Snapshot;

/// Bookkeeping shared by every aggregate: identity, version, and the buffer
/// of events raised but not yet persisted.
#[derive(Debug, Clone)]
pub struct AggregateRoot<E: DomainEvent> {
    id: String,
    version: u64,
    uncommitted: Vec<EventEnvelope<E>>,
}

impl<E: DomainEvent> AggregateRoot<E> {
    /// Creates the root for a fresh aggregate at version 0.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            version: 0,
            uncommitted: Vec::new(),
        }
    }

    /// Returns the aggregate identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the current version (last applied event's version, 0 if none).
    #[must_use]
    pub fn version(&self) -> u64 {
        self.version
    }

    fn set_version(&mut self, version: u64) {
        self.version = version;
    }

    fn push_uncommitted(&mut self, event: EventEnvelope<E>) {
        self.uncommitted.push(event);
    }

    /// Returns the events raised since the last successful save.
    #[must_use]
    pub fn uncommitted_events(&self) -> &[EventEnvelope<E>] {
        &self.uncommitted
    }

    fn clear_uncommitted(&mut self) {
        self.uncommitted.clear();
    }
}

/// Trait for aggregate roots that reconstitute from event history.
pub trait Aggregate: Send + Sync {
    /// The event type this aggregate produces and consumes.
    type Event: DomainEvent;

    /// Creates an empty instance at version 0, ready for hydration.
    fn new(id: &str) -> Self
    where
        Self: Sized;

    /// Returns the aggregate type name (discriminator for streams and
    /// snapshots).
    fn aggregate_type() -> &'static str
    where
        Self: Sized;

    /// Returns the embedded bookkeeping root.
    fn root(&self) -> &AggregateRoot<Self::Event>;

    /// Returns the embedded bookkeeping root mutably.
    fn root_mut(&mut self) -> &mut AggregateRoot<Self::Event>;

    /// Applies an event to mutate in-memory state.
    ///
    /// Must be deterministic and side-effect free, and must not fail for
    /// well-formed events of this aggregate's own type. Version bookkeeping
    /// is handled by the caller (`raise_event` / `load_from_history`), never
    /// here.
    fn apply(&mut self, event: &Self::Event);

    /// Serializes the aggregate's public state for snapshotting, as a
    /// string-keyed JSON map. Typical implementations serialize their state
    /// struct with serde.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Serialization` if the state cannot be serialized.
    fn snapshot_state(&self) -> Result<serde_json::Value, StoreError>;

    /// Restores the aggregate's public state from a snapshot's state map.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Serialization` if the state map does not match
    /// the aggregate's state shape.
    fn restore_from_snapshot_state(&mut self, state: &serde_json::Value) -> Result<(), StoreError>;

    /// Returns the aggregate identifier.
    fn id(&self) -> &str {
        self.root().id()
    }

    /// Returns the current version.
    fn version(&self) -> u64 {
        self.root().version()
    }

    /// Raises a new event: assigns the next version and this aggregate's id
    /// to the envelope (preserving everything else the caller supplied),
    /// applies it, and buffers it as uncommitted. This is the only way new
    /// history is created.
    fn raise_event(&mut self, event: EventEnvelope<Self::Event>) {
        let next_version = self.version() + 1;
        let mut event = event;
        event.aggregate_id = self.id().to_owned();
        event.version = next_version;
        self.apply(&event.payload);
        let root = self.root_mut();
        root.set_version(next_version);
        root.push_uncommitted(event);
    }

    /// Replays historical events in order, advancing the version to each
    /// event's version. Replay never adds to the uncommitted buffer.
    fn load_from_history(&mut self, events: &[EventEnvelope<Self::Event>]) {
        for event in events {
            self.apply(&event.payload);
            self.root_mut().set_version(event.version);
        }
    }

    /// Restores state and version from a snapshot, prior to replaying the
    /// tail of history.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Serialization` if the snapshot state cannot be
    /// restored.
    fn load_from_snapshot(&mut self, snapshot: &Snapshot) -> Result<(), StoreError> {
        self.restore_from_snapshot_state(&snapshot.state)?;
        self.root_mut().set_version(snapshot.version);
        Ok(())
    }

    /// Returns the events raised since the last successful save.
    fn uncommitted_events(&self) -> &[EventEnvelope<Self::Event>] {
        self.root().uncommitted_events()
    }

    /// Drops the uncommitted buffer. Invoked by the store after a
    /// successful save; the version is left unchanged.
    fn clear_uncommitted_events(&mut self) {
        self.root_mut().clear_uncommitted();
    }
}
