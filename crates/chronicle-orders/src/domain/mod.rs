//! Domain model for the Orders context.

pub mod aggregates;
pub mod commands;
pub mod events;
