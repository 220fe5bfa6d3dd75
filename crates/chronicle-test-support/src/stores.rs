//! Mock `EventStore` implementations for tests.

use std::sync::Mutex;

use async_trait::async_trait;
use chronicle_core::error::StoreError;
use chronicle_core::event::StoredEvent;
use chronicle_core::snapshot::Snapshot;
use chronicle_core::store::EventStore;

/// An event store that records every `append_events` and `record_snapshot`
/// call. `stream_version` reports a version once events have been recorded,
/// and `events_for_aggregate` replays what was appended, so aggregates can
/// be saved and reloaded through it.
#[derive(Debug, Default)]
pub struct RecordingEventStore {
    appended: Mutex<Vec<(String, Option<u64>, Vec<StoredEvent>)>>,
    snapshots: Mutex<Vec<Snapshot>>,
}

impl RecordingEventStore {
    /// Creates an empty recording store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of all recorded append calls as
    /// `(aggregate_id, expected_version, events)` tuples.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn appended_events(&self) -> Vec<(String, Option<u64>, Vec<StoredEvent>)> {
        self.appended.lock().unwrap().clone()
    }

    /// Returns a copy of all recorded snapshots.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn recorded_snapshots(&self) -> Vec<Snapshot> {
        self.snapshots.lock().unwrap().clone()
    }

    fn events_for(&self, aggregate_id: &str) -> Vec<StoredEvent> {
        self.appended
            .lock()
            .unwrap()
            .iter()
            .filter(|(id, _, _)| id == aggregate_id)
            .flat_map(|(_, _, events)| events.clone())
            .collect()
    }
}

#[async_trait]
impl EventStore for RecordingEventStore {
    async fn append_events(
        &self,
        aggregate_id: &str,
        _aggregate_type: &str,
        expected_version: Option<u64>,
        events: Vec<StoredEvent>,
    ) -> Result<u64, StoreError> {
        let mut appended = self.appended.lock().unwrap();
        appended.push((aggregate_id.to_string(), expected_version, events));
        drop(appended);
        Ok(self
            .events_for(aggregate_id)
            .last()
            .map_or(0, |event| event.version))
    }

    async fn stream_version(&self, aggregate_id: &str) -> Result<Option<u64>, StoreError> {
        Ok(self
            .events_for(aggregate_id)
            .last()
            .map(|event| event.version))
    }

    async fn events_for_aggregate(
        &self,
        aggregate_id: &str,
        from_version: u64,
        to_version: Option<u64>,
    ) -> Result<Vec<StoredEvent>, StoreError> {
        Ok(self
            .events_for(aggregate_id)
            .into_iter()
            .filter(|e| e.version >= from_version && to_version.is_none_or(|to| e.version <= to))
            .collect())
    }

    async fn all_events(
        &self,
        from_position: u64,
        limit: usize,
    ) -> Result<Vec<StoredEvent>, StoreError> {
        let from = usize::try_from(from_position).unwrap_or(usize::MAX);
        Ok(self
            .appended
            .lock()
            .unwrap()
            .iter()
            .flat_map(|(_, _, events)| events.clone())
            .skip(from)
            .take(limit)
            .collect())
    }

    async fn latest_snapshot(&self, aggregate_id: &str) -> Result<Option<Snapshot>, StoreError> {
        Ok(self
            .snapshots
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|s| s.aggregate_id == aggregate_id)
            .cloned())
    }

    async fn record_snapshot(&self, snapshot: Snapshot) -> Result<(), StoreError> {
        self.snapshots.lock().unwrap().push(snapshot);
        Ok(())
    }
}

/// An event store with no history that silently accepts appends. Useful for
/// "aggregate not found" scenarios and creation commands.
#[derive(Debug, Default)]
pub struct EmptyEventStore;

#[async_trait]
impl EventStore for EmptyEventStore {
    async fn append_events(
        &self,
        _aggregate_id: &str,
        _aggregate_type: &str,
        _expected_version: Option<u64>,
        events: Vec<StoredEvent>,
    ) -> Result<u64, StoreError> {
        Ok(events.last().map_or(0, |event| event.version))
    }

    async fn stream_version(&self, _aggregate_id: &str) -> Result<Option<u64>, StoreError> {
        Ok(None)
    }

    async fn events_for_aggregate(
        &self,
        _aggregate_id: &str,
        _from_version: u64,
        _to_version: Option<u64>,
    ) -> Result<Vec<StoredEvent>, StoreError> {
        Ok(vec![])
    }

    async fn all_events(
        &self,
        _from_position: u64,
        _limit: usize,
    ) -> Result<Vec<StoredEvent>, StoreError> {
        Ok(vec![])
    }

    async fn latest_snapshot(&self, _aggregate_id: &str) -> Result<Option<Snapshot>, StoreError> {
        Ok(None)
    }

    async fn record_snapshot(&self, _snapshot: Snapshot) -> Result<(), StoreError> {
        Ok(())
    }
}

/// An event store that always returns a storage error. Useful for testing
/// error-handling paths.
#[derive(Debug, Default)]
pub struct FailingEventStore;

fn refused() -> StoreError {
    StoreError::Storage("connection refused".into())
}

#[async_trait]
impl EventStore for FailingEventStore {
    async fn append_events(
        &self,
        _aggregate_id: &str,
        _aggregate_type: &str,
        _expected_version: Option<u64>,
        _events: Vec<StoredEvent>,
    ) -> Result<u64, StoreError> {
        Err(refused())
    }

    async fn stream_version(&self, _aggregate_id: &str) -> Result<Option<u64>, StoreError> {
        Err(refused())
    }

    async fn events_for_aggregate(
        &self,
        _aggregate_id: &str,
        _from_version: u64,
        _to_version: Option<u64>,
    ) -> Result<Vec<StoredEvent>, StoreError> {
        Err(refused())
    }

    async fn all_events(
        &self,
        _from_position: u64,
        _limit: usize,
    ) -> Result<Vec<StoredEvent>, StoreError> {
        Err(refused())
    }

    async fn latest_snapshot(&self, _aggregate_id: &str) -> Result<Option<Snapshot>, StoreError> {
        Err(refused())
    }

    async fn record_snapshot(&self, _snapshot: Snapshot) -> Result<(), StoreError> {
        Err(refused())
    }
}
