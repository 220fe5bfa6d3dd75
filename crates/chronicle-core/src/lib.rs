//! Event-sourcing contracts and algorithms.
//!
//! This crate defines the fundamental traits and types of the event-sourcing
//! core: domain events and their stored form, per-aggregate event streams,
//! snapshots, the aggregate root, the event-store contract with its shared
//! replay algorithm, projections, and the repository façade. It contains no
//! storage backend; see `chronicle-memory` for the reference implementation.

pub mod aggregate;
pub mod clock;
pub mod command;
pub mod error;
pub mod event;
pub mod projection;
pub mod repository;
pub mod snapshot;
pub mod store;
pub mod stream;
