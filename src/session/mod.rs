//! The interactive flow tying layout, capture, upload and state together.

/// Transient user notifications.
pub mod notify;
/// The per-user session.
pub mod plaque_session;
