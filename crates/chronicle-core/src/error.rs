//! Store error types.

use thiserror::Error;

/// Top-level error type for event-store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Optimistic concurrency conflict: the stream moved past the version
    /// the writer last observed. Recoverable by reloading and retrying.
    #[error("concurrency conflict on aggregate {aggregate_id}: expected version {expected}, found {actual}")]
    Concurrency {
        /// The aggregate whose stream had the conflict.
        aggregate_id: String,
        /// The version the writer expected the stream to be at.
        expected: u64,
        /// The version the stream was actually at.
        actual: u64,
    },

    /// An event or snapshot payload failed to (de)serialize.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The stream would violate its contiguous-version invariant.
    #[error("corrupt event stream for aggregate {aggregate_id}: {detail}")]
    CorruptStream {
        /// The aggregate whose stream is affected.
        aggregate_id: String,
        /// What went wrong.
        detail: String,
    },

    /// A backend-specific storage failure.
    #[error("storage error: {0}")]
    Storage(String),
}
