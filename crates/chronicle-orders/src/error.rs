//! Error types for the Orders context.

use thiserror::Error;

use chronicle_core::error::StoreError;

/// Top-level error type for order commands and queries.
#[derive(Debug, Error)]
pub enum OrderError {
    /// No order exists for the given identifier.
    #[error("order not found: {0}")]
    NotFound(String),

    /// An order with this identifier already has history.
    #[error("order already exists: {0}")]
    AlreadyExists(String),

    /// A validation error in domain logic.
    #[error("validation error: {0}")]
    Validation(String),

    /// An event-store failure, including concurrency conflicts.
    #[error(transparent)]
    Store(#[from] StoreError),
}
