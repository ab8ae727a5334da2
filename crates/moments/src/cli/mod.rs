//! Subcommand implementations.

pub mod analyze;
pub mod config;
pub mod photos;
pub mod sync;
