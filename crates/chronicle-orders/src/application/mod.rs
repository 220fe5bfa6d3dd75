//! Application layer for the Orders context.

pub mod command_handlers;
pub mod projections;
pub mod query_handlers;
