//! VRPX Store - Durable engine state on the local filesystem
//!
//! Provides:
//! - Atomic temp→rename writes for every state file
//! - The state directory layout (metadata, current/previous snapshot, diffs)
//! - Load-time verification of the persisted snapshot against its metadata

pub mod errors;
pub mod fs;
pub mod layout;
pub mod metadata;
pub mod state_store;

// Re-export key types
pub use errors::Result;
pub use layout::StateLayout;
pub use metadata::StateMetadata;
pub use state_store::{PersistedState, StateStore};
