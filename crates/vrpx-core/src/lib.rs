//! VRPX Core - Canonical VRP model and snapshot kernel
//!
//! This crate provides the pure, I/O-free half of VRPX:
//! - VRP record model (ASN, strict CIDR prefix, maxLength, trust anchor)
//! - Upstream payload parsing and the all-or-nothing canonicalizer
//! - Content hashing of canonical snapshots
//! - Added/removed diff between consecutive snapshots
//! - Structured error facility and logging facility shared by every crate

pub mod canonical;
pub mod diff;
pub mod errors;
pub mod logging_facility;
pub mod model;
pub mod snapshot;

// Re-export commonly used types
pub use canonical::{canonicalize, parse_payload, ValidationError};
pub use diff::{compute_diff, DiffRecord};
pub use errors::{ExError, ExErrorKind, Result, VrpxError};
pub use model::{Asn, Prefix, UpstreamMetadata, VrpRecord};
pub use snapshot::{compute_content_hash, encode_for_hash, Snapshot};
