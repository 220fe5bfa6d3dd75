//! Orders bounded context.
//!
//! An order lifecycle (place, ship, cancel) built on the event-sourcing
//! core: a command side that raises events through the repository, and a
//! query side with a read-model projection over the global commit log.

pub mod application;
pub mod domain;
pub mod error;
