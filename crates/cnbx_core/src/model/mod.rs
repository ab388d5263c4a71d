//! Domain model for financial-event commands.
//!
//! # Responsibility
//! - Define the command shapes flowing from caller input to the log.
//!
//! # Invariants
//! - Only `NormalizedCommand` values are persisted.
//! - Command bodies stay opaque text; no amount/category parsing.

pub mod command;
