//! In-memory implementation of the `EventStore` contract.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use chronicle_core::error::StoreError;
use chronicle_core::event::StoredEvent;
use chronicle_core::snapshot::Snapshot;
use chronicle_core::store::EventStore;
use chronicle_core::stream::EventStream;

#[derive(Debug, Default)]
struct StoreInner {
    streams: HashMap<String, EventStream>,
    // Global commit log; append order = commit order across all aggregates.
    log: Vec<StoredEvent>,
    snapshots: HashMap<String, Snapshot>,
}

/// In-memory event store for tests, development, and as the reference for
/// durable backends.
///
/// A single mutex guards all state, so the expected-version check and the
/// append happen atomically with respect to concurrent writers. Clones share
/// the same underlying store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryEventStore {
    inner: Arc<Mutex<StoreInner>>,
}

impl InMemoryEventStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops all streams, events, and snapshots. Test/reset hook.
    pub async fn clear(&self) {
        let mut inner = self.inner.lock().await;
        inner.streams.clear();
        inner.log.clear();
        inner.snapshots.clear();
    }

    /// Total number of committed events across all aggregates.
    pub async fn committed_event_count(&self) -> usize {
        self.inner.lock().await.log.len()
    }
}

#[async_trait]
impl EventStore for InMemoryEventStore {
    async fn append_events(
        &self,
        aggregate_id: &str,
        aggregate_type: &str,
        expected_version: Option<u64>,
        events: Vec<StoredEvent>,
    ) -> Result<u64, StoreError> {
        let mut inner = self.inner.lock().await;
        let StoreInner { streams, log, .. } = &mut *inner;
        let current_version = streams.get(aggregate_id).map_or(0, |stream| stream.version);

        if let Some(expected) = expected_version
            && current_version != expected
        {
            warn!(
                aggregate_id,
                expected,
                actual = current_version,
                "rejecting append on version conflict"
            );
            return Err(StoreError::Concurrency {
                aggregate_id: aggregate_id.to_string(),
                expected,
                actual: current_version,
            });
        }

        // Validate the whole batch before touching any state: either every
        // event lands or none does, and a rejected append must not leave a
        // freshly created empty stream behind.
        let mut next = current_version;
        for event in &events {
            next += 1;
            if event.version != next {
                return Err(StoreError::CorruptStream {
                    aggregate_id: aggregate_id.to_string(),
                    detail: format!(
                        "event version {} does not follow stream version {}",
                        event.version,
                        next - 1
                    ),
                });
            }
        }
        if events.is_empty() {
            return Ok(current_version);
        }

        let stream = streams
            .entry(aggregate_id.to_string())
            .or_insert_with(|| EventStream::new(aggregate_id, aggregate_type, Utc::now()));
        let appended = events.len();
        for event in events {
            stream.append(event.clone())?;
            log.push(event);
        }
        let new_version = stream.version;
        debug!(aggregate_id, appended, new_version, "appended events");
        Ok(new_version)
    }

    async fn stream_version(&self, aggregate_id: &str) -> Result<Option<u64>, StoreError> {
        let inner = self.inner.lock().await;
        Ok(inner.streams.get(aggregate_id).map(|stream| stream.version))
    }

    async fn events_for_aggregate(
        &self,
        aggregate_id: &str,
        from_version: u64,
        to_version: Option<u64>,
    ) -> Result<Vec<StoredEvent>, StoreError> {
        let inner = self.inner.lock().await;
        Ok(inner
            .streams
            .get(aggregate_id)
            .map(|stream| stream.events_in_range(from_version, to_version))
            .unwrap_or_default())
    }

    async fn all_events(
        &self,
        from_position: u64,
        limit: usize,
    ) -> Result<Vec<StoredEvent>, StoreError> {
        let inner = self.inner.lock().await;
        let from = usize::try_from(from_position).unwrap_or(usize::MAX);
        Ok(inner.log.iter().skip(from).take(limit).cloned().collect())
    }

    async fn latest_snapshot(&self, aggregate_id: &str) -> Result<Option<Snapshot>, StoreError> {
        let inner = self.inner.lock().await;
        Ok(inner.snapshots.get(aggregate_id).cloned())
    }

    async fn record_snapshot(&self, snapshot: Snapshot) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().await;
        debug!(
            aggregate_id = %snapshot.aggregate_id,
            version = snapshot.version,
            "stored snapshot"
        );
        inner
            .snapshots
            .insert(snapshot.aggregate_id.clone(), snapshot);
        Ok(())
    }
}
