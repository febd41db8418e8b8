//! Turning mounted preview compositions into PNG rasters.

/// Preview board: mounted regions and the capture selection policy.
pub mod board;
/// Default CPU renderer.
pub mod cpu;
/// The injectable [`renderer::Renderer`] capability.
pub mod renderer;
/// Async capture service.
pub mod service;
