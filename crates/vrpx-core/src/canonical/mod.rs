//! Canonicalizer.
//!
//! Turns an upstream validator document into the canonical VRP sequence:
//! validated, normalized, deduplicated and deterministically ordered.
//!
//! ## Guarantees
//!
//! - **All-or-nothing**: one bad record fails the whole batch.
//! - **Determinism**: every permutation of the same record set yields the
//!   same sequence.
//! - **Purity**: nothing in here logs or touches the filesystem; failures
//!   are returned to the caller.

pub mod canonicalize;
pub mod payload;
pub mod validation;

pub use canonicalize::{canonicalize, canonicalize_records};
pub use payload::{parse_payload, RawMetadata, RawRoa, UpstreamBatch};
pub use validation::{validate_batch, validate_record, RecordViolation, ValidationError};
