//! User inputs: the selected photo and the overlay message.

/// Photo selection and loading.
pub mod image;
/// Bounded overlay message.
pub mod message;
