//! Shared building blocks: errors, primitive types and configuration.

/// Pipeline configuration (file, environment, defaults).
pub mod config;
/// Canvas, color and viewport primitives.
pub mod core;
/// Crate-wide error type.
pub mod error;
