//! Responsive layout of the photo + message composition.

/// Pure layout computation and the preview plan.
pub mod engine;
/// Image-load and resize signals folded into the current layout.
pub mod tracker;
