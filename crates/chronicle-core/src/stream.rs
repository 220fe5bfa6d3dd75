//! Per-aggregate event streams.

use chrono::{DateTime, Utc};

use crate::error::StoreError;
use crate::event::StoredEvent;

/// The ordered event history of one aggregate.
///
/// Invariants, enforced by [`EventStream::append`]:
/// `version == events.len()` and `events[i].version == i + 1` at all times.
/// Streams are append-only; no event is ever removed or mutated.
#[derive(Debug, Clone)]
pub struct EventStream {
    /// The aggregate this stream belongs to.
    pub aggregate_id: String,
    /// Aggregate type discriminator.
    pub aggregate_type: String,
    events: Vec<StoredEvent>,
    /// Current version (event count).
    pub version: u64,
    /// When the stream was created.
    pub created_at: DateTime<Utc>,
    /// When the stream last accepted an event.
    pub updated_at: DateTime<Utc>,
}

impl EventStream {
    /// Creates an empty stream.
    #[must_use]
    pub fn new(
        aggregate_id: impl Into<String>,
        aggregate_type: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            aggregate_id: aggregate_id.into(),
            aggregate_type: aggregate_type.into(),
            events: Vec::new(),
            version: 0,
            created_at,
            updated_at: created_at,
        }
    }

    /// Appends one event to the stream.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::CorruptStream` if the event's version is not the
    /// next contiguous version, which would break the 1-based ordering
    /// invariant. Writers that follow the raise/save protocol never hit this.
    pub fn append(&mut self, event: StoredEvent) -> Result<(), StoreError> {
        let next = self.version + 1;
        if event.version != next {
            return Err(StoreError::CorruptStream {
                aggregate_id: self.aggregate_id.clone(),
                detail: format!(
                    "event version {} does not follow stream version {}",
                    event.version, self.version
                ),
            });
        }
        self.updated_at = event.recorded_at;
        self.events.push(event);
        self.version = next;
        Ok(())
    }

    /// Returns the events in version order.
    #[must_use]
    pub fn events(&self) -> &[StoredEvent] {
        &self.events
    }

    /// Returns events with versions in `[from_version, to_version]`
    /// inclusive. `from_version` of 0 reads from the start of the stream.
    #[must_use]
    pub fn events_in_range(&self, from_version: u64, to_version: Option<u64>) -> Vec<StoredEvent> {
        self.events
            .iter()
            .filter(|e| {
                e.version >= from_version && to_version.is_none_or(|to| e.version <= to)
            })
            .cloned()
            .collect()
    }
}
