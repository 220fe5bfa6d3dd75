//! Event-sourced repository façade.

use std::marker::PhantomData;
use std::sync::Arc;

use crate::aggregate::Aggregate;
use crate::error::StoreError;
use crate::store::EventStore;

/// Conventional get/save/exists API over an [`EventStore`], with an optional
/// snapshot-cadence policy.
///
/// Snapshot frequency is repository policy, not a store invariant: a missing
/// or stale snapshot never affects correctness, only load performance.
pub struct EventSourcedRepository<A, S>
where
    A: Aggregate,
    S: EventStore,
{
    store: Arc<S>,
    snapshot_frequency: Option<u64>,
    _aggregate: PhantomData<A>,
}

impl<A, S> EventSourcedRepository<A, S>
where
    A: Aggregate,
    S: EventStore,
{
    /// Creates a repository that never snapshots.
    #[must_use]
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            snapshot_frequency: None,
            _aggregate: PhantomData,
        }
    }

    /// Creates a repository that snapshots every `frequency` versions.
    /// A frequency of 0 disables snapshotting.
    #[must_use]
    pub fn with_snapshots(store: Arc<S>, frequency: u64) -> Self {
        Self {
            store,
            snapshot_frequency: (frequency > 0).then_some(frequency),
            _aggregate: PhantomData,
        }
    }

    /// Loads an aggregate by id, or `None` if it has no history.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if loading or replay fails.
    pub async fn get_by_id(&self, id: &str) -> Result<Option<A>, StoreError> {
        self.store.load(id).await
    }

    /// Persists the aggregate's uncommitted events, then snapshots if the
    /// resulting version lands on the configured cadence.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Concurrency` if `expected_version` does not
    /// match the stream; the aggregate's uncommitted events are left intact
    /// for a retry.
    pub async fn save(
        &self,
        aggregate: &mut A,
        expected_version: Option<u64>,
    ) -> Result<(), StoreError> {
        self.store.save(aggregate, expected_version).await?;
        if let Some(frequency) = self.snapshot_frequency
            && aggregate.version() > 0
            && aggregate.version().is_multiple_of(frequency)
        {
            self.store.save_snapshot(aggregate).await?;
        }
        Ok(())
    }

    /// Returns whether an aggregate with this id has any history.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if loading fails.
    pub async fn exists(&self, id: &str) -> Result<bool, StoreError> {
        Ok(self.get_by_id(id).await?.is_some())
    }
}

impl<A, S> Clone for EventSourcedRepository<A, S>
where
    A: Aggregate,
    S: EventStore,
{
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            snapshot_frequency: self.snapshot_frequency,
            _aggregate: PhantomData,
        }
    }
}
