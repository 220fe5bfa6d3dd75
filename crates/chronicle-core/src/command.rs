//! Command abstractions.

use uuid::Uuid;

/// A request to change one aggregate.
///
/// Commands carry the tracing metadata that handlers attach to the events
/// they raise: handler spans record `command_type`, and the correlation ID
/// is propagated into the metadata of every resulting event.
pub trait Command: Send + Sync + std::fmt::Debug {
    /// Dotted command name, recorded in handler spans.
    fn command_type(&self) -> &'static str;

    /// Correlation ID propagated into the events this command produces.
    fn correlation_id(&self) -> Uuid;
}
