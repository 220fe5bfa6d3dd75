//! Point-in-time aggregate snapshots.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::aggregate::Aggregate;
use crate::error::StoreError;

/// A serialized copy of an aggregate's state at a given version.
///
/// Snapshots only accelerate loading: `snapshot.version <= stream.version`
/// always holds, and a missing or stale snapshot never affects correctness.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    /// The aggregate this snapshot belongs to.
    pub aggregate_id: String,
    /// Aggregate type discriminator.
    pub aggregate_type: String,
    /// The aggregate version the snapshot represents.
    pub version: u64,
    /// The aggregate's public state as a string-keyed JSON map.
    pub state: serde_json::Value,
    /// When the snapshot was taken.
    pub created_at: DateTime<Utc>,
}

impl Snapshot {
    /// Captures an aggregate's current state and version.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Serialization` if the aggregate's state cannot
    /// be serialized.
    pub fn from_aggregate<A: Aggregate>(aggregate: &A) -> Result<Self, StoreError> {
        Ok(Self {
            aggregate_id: aggregate.id().to_owned(),
            aggregate_type: A::aggregate_type().to_owned(),
            version: aggregate.version(),
            state: aggregate.snapshot_state()?,
            created_at: Utc::now(),
        })
    }
}
