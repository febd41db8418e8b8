//! Global UI state: reducer, actions and the subscribable store.

/// Store, actions and reducer.
pub mod store;
