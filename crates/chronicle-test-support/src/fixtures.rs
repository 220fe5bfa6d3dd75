//! Builders for stored events with sensible defaults.

use chrono::Utc;
use chronicle_core::event::StoredEvent;
use uuid::Uuid;

/// Builds a `StoredEvent` for a test aggregate at the given version.
#[must_use]
pub fn make_stored_event(aggregate_id: &str, version: u64) -> StoredEvent {
    StoredEvent {
        event_id: Uuid::new_v4(),
        aggregate_id: aggregate_id.to_string(),
        aggregate_type: "TestAggregate".to_string(),
        event_type: "test.happened".to_string(),
        version,
        payload: serde_json::json!({"key": "value"}),
        metadata: std::collections::HashMap::new(),
        recorded_at: Utc::now(),
    }
}
