//! Snapshot diff engine.
//!
//! Compares two canonical VRP sequences and produces the added/removed
//! record sets recorded for every accepted serial transition.
//!
//! ## Entry point
//!
//! ```
//! use vrpx_core::diff::compute_diff;
//!
//! let delta = compute_diff(&[], &[]);
//! assert!(delta.is_empty());
//! ```
//!
//! ## Guarantees
//!
//! - **Determinism**: `added` and `removed` are in canonical order.
//! - **Match key**: records are matched on (ASN, prefix, maxLength); the
//!   trust anchor is not part of the match. Two records differing only in
//!   trust anchor collapse onto one entry (the later one) on each side.
//! - Records present on both sides with different non-key fields are not
//!   reported.

pub mod engine;
pub mod human_summary;
pub mod model;

pub use engine::compute_diff;
pub use human_summary::render_human_summary;
pub use model::{DiffRecord, VrpDelta};
