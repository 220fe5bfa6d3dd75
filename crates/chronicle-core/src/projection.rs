//! Read-model projections.

use std::collections::HashMap;

use crate::event::StoredEvent;

/// A read-model builder that folds committed events into derived state.
///
/// State must be a pure fold over the events seen: rebuilding from the same
/// sequence always yields the same state.
pub trait Projection: Send + Sync {
    /// Folds one event into the projection's state. Expected to be called in
    /// commit order.
    fn apply(&mut self, event: &StoredEvent);

    /// Clears all derived state.
    fn reset(&mut self);

    /// Number of events folded so far; usable as a resume cursor for
    /// incremental reads of the global commit log.
    fn position(&self) -> u64;

    /// Moves the cursor.
    fn set_position(&mut self, position: u64);

    /// Folds a batch of events, advancing the cursor after each.
    fn project(&mut self, events: &[StoredEvent]) {
        for event in events {
            self.apply(event);
            self.set_position(self.position() + 1);
        }
    }

    /// Full rebuild: clears state and cursor, then folds the given sequence
    /// in order. Idempotent: rebuilding twice from the same sequence yields
    /// identical state.
    fn rebuild(&mut self, events: &[StoredEvent]) {
        self.reset();
        self.set_position(0);
        self.project(events);
    }
}

/// Reference projection over a string-keyed JSON map, built by a supplied
/// reducer function.
pub struct MapProjection {
    state: HashMap<String, serde_json::Value>,
    position: u64,
    reducer: Box<dyn Fn(&mut HashMap<String, serde_json::Value>, &StoredEvent) + Send + Sync>,
}

impl std::fmt::Debug for MapProjection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapProjection")
            .field("state", &self.state)
            .field("position", &self.position)
            .finish_non_exhaustive()
    }
}

impl MapProjection {
    /// Creates an empty projection driven by `reducer`.
    #[must_use]
    pub fn new(
        reducer: impl Fn(&mut HashMap<String, serde_json::Value>, &StoredEvent)
        + Send
        + Sync
        + 'static,
    ) -> Self {
        Self {
            state: HashMap::new(),
            position: 0,
            reducer: Box::new(reducer),
        }
    }

    /// Returns a copy of the derived state. Mutating the copy has no effect
    /// on the projection.
    #[must_use]
    pub fn state(&self) -> HashMap<String, serde_json::Value> {
        self.state.clone()
    }
}

impl Projection for MapProjection {
    fn apply(&mut self, event: &StoredEvent) {
        (self.reducer)(&mut self.state, event);
    }

    fn reset(&mut self) {
        self.state.clear();
    }

    fn position(&self) -> u64 {
        self.position
    }

    fn set_position(&mut self, position: u64) {
        self.position = position;
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use uuid::Uuid;

    use super::{MapProjection, Projection};
    use crate::event::StoredEvent;

    fn make_stored_event(aggregate_id: &str, version: u64) -> StoredEvent {
        StoredEvent {
            event_id: Uuid::new_v4(),
            aggregate_id: aggregate_id.to_string(),
            aggregate_type: "Test".to_string(),
            event_type: "test.happened".to_string(),
            version,
            payload: serde_json::json!({"n": version}),
            metadata: std::collections::HashMap::new(),
            recorded_at: Utc::now(),
        }
    }

    fn counting_projection() -> MapProjection {
        MapProjection::new(|state, event| {
            let count = state
                .entry(event.aggregate_id.clone())
                .or_insert_with(|| serde_json::json!(0));
            *count = serde_json::json!(count.as_u64().unwrap_or(0) + 1);
        })
    }

    #[test]
    fn test_rebuild_is_idempotent() {
        let events = vec![
            make_stored_event("a", 1),
            make_stored_event("b", 1),
            make_stored_event("a", 2),
        ];
        let mut projection = counting_projection();

        projection.rebuild(&events);
        let first = projection.state();
        projection.rebuild(&events);

        assert_eq!(projection.state(), first);
        assert_eq!(projection.position(), 3);
        assert_eq!(projection.state()["a"], serde_json::json!(2));
        assert_eq!(projection.state()["b"], serde_json::json!(1));
    }

    #[test]
    fn test_project_advances_cursor_incrementally() {
        let mut projection = counting_projection();

        projection.project(&[make_stored_event("a", 1)]);
        assert_eq!(projection.position(), 1);

        projection.project(&[make_stored_event("a", 2), make_stored_event("a", 3)]);
        assert_eq!(projection.position(), 3);
        assert_eq!(projection.state()["a"], serde_json::json!(3));
    }

    #[test]
    fn test_state_copy_does_not_leak_mutations() {
        let mut projection = counting_projection();
        projection.project(&[make_stored_event("a", 1)]);

        let mut copy = projection.state();
        copy.insert("a".to_string(), serde_json::json!(999));

        assert_eq!(projection.state()["a"], serde_json::json!(1));
    }
}
