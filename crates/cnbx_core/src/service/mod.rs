//! Core use-case services.
//!
//! # Responsibility
//! - Compose command normalization with log storage.
//! - Keep the CLI decoupled from storage details.

pub mod send_service;
