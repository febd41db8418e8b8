//! Submitting a captured composition to the document generation service.

/// Delivering the generated document.
pub mod download;
/// Submission state machine and single-flight guard.
pub mod pipeline;
/// HTTP transport for the generation request.
pub mod transport;
