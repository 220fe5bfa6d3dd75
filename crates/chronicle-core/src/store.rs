//! Event store contract.
//!
//! Backends implement the primitive operations (append with optimistic
//! check, range reads, snapshot storage); the aggregate-level `save`, the
//! replay-from-snapshot-then-tail `load`, and `save_snapshot` are provided
//! here so every backend shares the one algorithm.

use async_trait::async_trait;
use tracing::debug;

use crate::aggregate::Aggregate;
use crate::error::StoreError;
use crate::event::StoredEvent;
use crate::snapshot::Snapshot;

/// Persistence contract for event streams and snapshots.
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Appends events to an aggregate's stream and the global commit log.
    ///
    /// If `expected_version` is given and differs from the stream's current
    /// version before appending, nothing is appended. Returns the stream's
    /// new version. The check and the append must be atomic with respect to
    /// other writers of the same aggregate.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Concurrency` on an expected-version mismatch,
    /// carrying both versions for caller diagnostics.
    async fn append_events(
        &self,
        aggregate_id: &str,
        aggregate_type: &str,
        expected_version: Option<u64>,
        events: Vec<StoredEvent>,
    ) -> Result<u64, StoreError>;

    /// Returns the stream's current version, or `None` if no stream exists
    /// for `aggregate_id`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Storage` on backend failure.
    async fn stream_version(&self, aggregate_id: &str) -> Result<Option<u64>, StoreError>;

    /// Inclusive range query over one aggregate's stream, ordered by
    /// version. Unknown aggregates yield an empty sequence.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Storage` on backend failure.
    async fn events_for_aggregate(
        &self,
        aggregate_id: &str,
        from_version: u64,
        to_version: Option<u64>,
    ) -> Result<Vec<StoredEvent>, StoreError>;

    /// Returns a slice of the global, cross-aggregate commit order, for
    /// projection building. Positions are store-local indexes with no
    /// cross-process meaning.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Storage` on backend failure.
    async fn all_events(
        &self,
        from_position: u64,
        limit: usize,
    ) -> Result<Vec<StoredEvent>, StoreError>;

    /// Returns the latest snapshot for an aggregate, if any.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Storage` on backend failure.
    async fn latest_snapshot(&self, aggregate_id: &str) -> Result<Option<Snapshot>, StoreError>;

    /// Stores a snapshot, replacing any prior snapshot for the same
    /// aggregate. Only the latest snapshot is retained.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Storage` on backend failure.
    async fn record_snapshot(&self, snapshot: Snapshot) -> Result<(), StoreError>;

    /// Persists an aggregate's uncommitted events.
    ///
    /// A no-op when there is nothing uncommitted. On success the uncommitted
    /// buffer is cleared; on a concurrency conflict it is left intact so the
    /// caller can reload and retry.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Concurrency` if `expected_version` does not
    /// match the stream, or `StoreError::Serialization` if an event payload
    /// cannot be encoded.
    async fn save<A: Aggregate>(
        &self,
        aggregate: &mut A,
        expected_version: Option<u64>,
    ) -> Result<(), StoreError> {
        if aggregate.uncommitted_events().is_empty() {
            return Ok(());
        }
        let events: Vec<StoredEvent> = aggregate
            .uncommitted_events()
            .iter()
            .map(|event| StoredEvent::encode(event, A::aggregate_type()))
            .collect::<Result<_, _>>()?;
        let appended = events.len();
        let new_version = self
            .append_events(aggregate.id(), A::aggregate_type(), expected_version, events)
            .await?;
        aggregate.clear_uncommitted_events();
        debug!(
            aggregate_id = aggregate.id(),
            aggregate_type = A::aggregate_type(),
            appended,
            new_version,
            "saved aggregate"
        );
        Ok(())
    }

    /// Loads an aggregate by replaying from the best available snapshot.
    ///
    /// Returns `None` if no stream exists. Otherwise instantiates an empty
    /// aggregate, restores the latest snapshot if one exists, and replays
    /// only events with versions past it (the full stream if none).
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Serialization` if a snapshot or event payload
    /// cannot be decoded.
    async fn load<A: Aggregate>(&self, aggregate_id: &str) -> Result<Option<A>, StoreError> {
        if self.stream_version(aggregate_id).await?.is_none() {
            return Ok(None);
        }
        let mut aggregate = A::new(aggregate_id);
        let from_version = match self.latest_snapshot(aggregate_id).await? {
            Some(snapshot) => {
                aggregate.load_from_snapshot(&snapshot)?;
                snapshot.version + 1
            }
            None => 1,
        };
        let stored = self
            .events_for_aggregate(aggregate_id, from_version, None)
            .await?;
        let history = stored
            .iter()
            .map(|event| event.decode::<A::Event>())
            .collect::<Result<Vec<_>, _>>()?;
        aggregate.load_from_history(&history);
        debug!(
            aggregate_id,
            aggregate_type = A::aggregate_type(),
            replayed = history.len(),
            version = aggregate.version(),
            "loaded aggregate"
        );
        Ok(Some(aggregate))
    }

    /// Captures and stores a snapshot of the aggregate's current state.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Serialization` if the state cannot be captured.
    async fn save_snapshot<A: Aggregate>(&self, aggregate: &A) -> Result<(), StoreError> {
        let snapshot = Snapshot::from_aggregate(aggregate)?;
        debug!(
            aggregate_id = aggregate.id(),
            version = snapshot.version,
            "recording snapshot"
        );
        self.record_snapshot(snapshot).await
    }
}
