//! Per-field and per-batch validation.
//!
//! Each field has its own validator returning a [`FieldError`]. A record is
//! valid when all three validators pass; a batch is valid when every record
//! is. Validation keeps going after the first failure so the caller sees
//! every violation in one report.

use crate::canonical::payload::RawRoa;
use crate::model::{Asn, FieldError, MaxLength, Prefix, VrpRecord};
use thiserror::Error;

/// One field of one record failed validation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("record {index}: {error}")]
pub struct RecordViolation {
    /// Position of the record in the upstream `roas` array
    pub index: usize,
    pub error: FieldError,
}

/// A batch was rejected because at least one record is invalid.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{} of {total} records failed validation; first: {}", .violations.len(), first_violation(.violations))]
pub struct ValidationError {
    pub violations: Vec<RecordViolation>,
    /// Number of records in the rejected batch
    pub total: usize,
}

fn first_violation(violations: &[RecordViolation]) -> String {
    violations
        .first()
        .map(|v| v.to_string())
        .unwrap_or_else(|| "<none>".to_string())
}

fn validate_asn(raw: &str) -> Result<Asn, FieldError> {
    raw.parse()
}

fn validate_prefix(raw: &str) -> Result<Prefix, FieldError> {
    raw.parse()
}

fn validate_max_length(raw: i64) -> Result<MaxLength, FieldError> {
    MaxLength::try_from(raw)
}

/// Validate one raw record, collecting every field violation.
///
/// # Errors
///
/// Returns all violations found in the record (one per failing field).
pub fn validate_record(index: usize, raw: &RawRoa) -> Result<VrpRecord, Vec<RecordViolation>> {
    let asn = validate_asn(&raw.asn);
    let prefix = validate_prefix(&raw.prefix);
    let max_length = validate_max_length(raw.max_length);

    match (asn, prefix, max_length) {
        (Ok(asn), Ok(prefix), Ok(max_length)) => {
            Ok(VrpRecord::new(asn, prefix, max_length, raw.ta.as_str()))
        }
        (asn, prefix, max_length) => Err([asn.err(), prefix.err(), max_length.err()]
            .into_iter()
            .flatten()
            .map(|error| RecordViolation { index, error })
            .collect()),
    }
}

/// Validate a whole batch.
///
/// # Errors
///
/// Returns a [`ValidationError`] listing every violation if any record fails.
pub fn validate_batch(raws: &[RawRoa]) -> Result<Vec<VrpRecord>, ValidationError> {
    let mut records = Vec::with_capacity(raws.len());
    let mut violations = Vec::new();

    for (index, raw) in raws.iter().enumerate() {
        match validate_record(index, raw) {
            Ok(record) => records.push(record),
            Err(mut errs) => violations.append(&mut errs),
        }
    }

    if violations.is_empty() {
        Ok(records)
    } else {
        Err(ValidationError {
            violations,
            total: raws.len(),
        })
    }
}
