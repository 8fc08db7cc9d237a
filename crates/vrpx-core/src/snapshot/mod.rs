//! Canonical snapshots and their content hash.
//!
//! ## Responsibilities
//!
//! - Compute the deterministic content hash of a canonical VRP sequence
//! - Define the immutable `Snapshot` value held by the engine
//!
//! ## Non-Responsibilities
//!
//! - Persistence (handled by `vrpx-store`)
//! - Serial advancement and locking (handled by `vrpx-engine`)

pub mod digest;
pub mod model;

pub use digest::{compute_content_hash, encode_for_hash};
pub use model::Snapshot;
