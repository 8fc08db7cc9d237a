//! Deduplication and canonical ordering.

use crate::canonical::payload::RawRoa;
use crate::canonical::validation::{validate_batch, ValidationError};
use crate::model::VrpRecord;
use std::collections::HashSet;

/// Validate, deduplicate and order an upstream record batch.
///
/// ## Arguments
///
/// - `raws`: Records in upstream order
///
/// ## Returns
///
/// Unique records sorted by (prefix text, ASN text, maxLength, trust anchor).
///
/// ## Errors
///
/// Returns [`ValidationError`] if any record is invalid; nothing is
/// returned for the valid remainder.
///
/// ## Example
///
/// ```
/// use vrpx_core::canonical::{canonicalize, RawRoa};
///
/// let raws = vec![
///     RawRoa::new("AS2", "10.1.0.0/24", 24, "ta1"),
///     RawRoa::new("AS1", "10.0.0.0/24", 24, "ta1"),
///     RawRoa::new("AS1", "10.0.0.0/24", 24, "ta1"),
/// ];
/// let records = canonicalize(&raws).unwrap();
/// assert_eq!(records.len(), 2);
/// assert_eq!(records[0].prefix().to_string(), "10.0.0.0/24");
/// ```
pub fn canonicalize(raws: &[RawRoa]) -> Result<Vec<VrpRecord>, ValidationError> {
    let records = validate_batch(raws)?;
    Ok(canonicalize_records(records))
}

/// Deduplicate (first seen wins) and sort already-validated records.
pub fn canonicalize_records(records: Vec<VrpRecord>) -> Vec<VrpRecord> {
    let mut seen = HashSet::with_capacity(records.len());
    let mut unique: Vec<VrpRecord> = records
        .iter()
        .filter(|&record| seen.insert(record.dedup_key()))
        .cloned()
        .collect();

    unique.sort_by_cached_key(|record| record.canonical_sort_key());
    unique
}
