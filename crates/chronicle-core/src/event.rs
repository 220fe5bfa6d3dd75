//! Domain event abstractions and their stored representation.
//!
//! Aggregates raise and apply *typed* events; the store persists an untyped
//! [`StoredEvent`] whose payload is a JSON value tagged with an `event_type`
//! discriminator for deserialization routing. [`EventEnvelope`] is the typed
//! in-memory form: it carries the positional fields (`aggregate_id`,
//! `version`) that the aggregate assigns at raise time.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::StoreError;

/// Trait that all domain events implement.
///
/// The serde bounds define the persisted payload shape; `event_type` names
/// the variant for routing and diagnostics.
pub trait DomainEvent:
    Clone + std::fmt::Debug + Send + Sync + Serialize + DeserializeOwned
{
    /// Returns the event type name (used for serialization routing).
    fn event_type(&self) -> &'static str;
}

/// A typed domain event together with its position in an aggregate's history.
///
/// `aggregate_id` and `version` are placeholders until the aggregate raises
/// the event; `raise_event` overwrites both and preserves everything else.
#[derive(Debug, Clone)]
pub struct EventEnvelope<E> {
    /// Unique event identifier.
    pub event_id: Uuid,
    /// Aggregate this event belongs to (assigned at raise time).
    pub aggregate_id: String,
    /// 1-based position within the aggregate stream (assigned at raise time).
    pub version: u64,
    /// String-keyed metadata (correlation IDs, actor, etc.).
    pub metadata: HashMap<String, String>,
    /// Timestamp of event creation.
    pub recorded_at: DateTime<Utc>,
    /// The typed event payload.
    pub payload: E,
}

impl<E: DomainEvent> EventEnvelope<E> {
    /// Wraps a payload in a fresh envelope. Position fields are left for the
    /// raising aggregate to fill in.
    #[must_use]
    pub fn new(payload: E, recorded_at: DateTime<Utc>) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            aggregate_id: String::new(),
            version: 0,
            metadata: HashMap::new(),
            recorded_at,
            payload,
        }
    }

    /// Attaches a metadata entry.
    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

/// Stored representation of a domain event.
///
/// Immutable once constructed; the store never rewrites a committed event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredEvent {
    /// Unique event identifier.
    pub event_id: Uuid,
    /// Aggregate this event belongs to.
    pub aggregate_id: String,
    /// Aggregate type discriminator.
    pub aggregate_type: String,
    /// Event type name for deserialization routing.
    pub event_type: String,
    /// 1-based position within the aggregate stream.
    pub version: u64,
    /// Serialized event payload.
    pub payload: serde_json::Value,
    /// String-keyed metadata.
    pub metadata: HashMap<String, String>,
    /// Timestamp of event creation.
    pub recorded_at: DateTime<Utc>,
}

impl StoredEvent {
    /// Serializes a typed envelope into its stored form.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Serialization` if the payload cannot be
    /// serialized to JSON.
    pub fn encode<E: DomainEvent>(
        event: &EventEnvelope<E>,
        aggregate_type: &str,
    ) -> Result<Self, StoreError> {
        Ok(Self {
            event_id: event.event_id,
            aggregate_id: event.aggregate_id.clone(),
            aggregate_type: aggregate_type.to_owned(),
            event_type: event.payload.event_type().to_owned(),
            version: event.version,
            payload: serde_json::to_value(&event.payload)?,
            metadata: event.metadata.clone(),
            recorded_at: event.recorded_at,
        })
    }

    /// Deserializes the payload back into a typed envelope for replay.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Serialization` if the payload does not match the
    /// expected event type.
    pub fn decode<E: DomainEvent>(&self) -> Result<EventEnvelope<E>, StoreError> {
        Ok(EventEnvelope {
            event_id: self.event_id,
            aggregate_id: self.aggregate_id.clone(),
            version: self.version,
            metadata: self.metadata.clone(),
            recorded_at: self.recorded_at,
            payload: serde_json::from_value(self.payload.clone())?,
        })
    }
}
