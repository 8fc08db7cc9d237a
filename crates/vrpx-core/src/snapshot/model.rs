//! The immutable snapshot value.

use crate::errors::Result;
use crate::model::VrpRecord;
use crate::snapshot::digest::compute_content_hash;
use chrono::{DateTime, Utc};

/// A canonical VRP set at a given serial.
///
/// Never mutated after construction; the engine replaces it wholesale.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    serial: u64,
    content_hash: String,
    captured_at: Option<DateTime<Utc>>,
    records: Vec<VrpRecord>,
}

impl Snapshot {
    /// The Fresh snapshot: serial 0, no records and an empty hash.
    ///
    /// The empty hash differs from the hash of an empty sequence, so the
    /// first processed batch is always accepted, even when it is empty.
    pub fn empty() -> Self {
        Self {
            serial: 0,
            content_hash: String::new(),
            captured_at: None,
            records: Vec::new(),
        }
    }

    /// Build a snapshot from a canonical sequence, computing its hash.
    ///
    /// # Errors
    ///
    /// Returns `VrpxError::Serialization` if hashing fails.
    pub fn from_canonical(
        serial: u64,
        records: Vec<VrpRecord>,
        captured_at: DateTime<Utc>,
    ) -> Result<Self> {
        let content_hash = compute_content_hash(&records)?;
        Ok(Self {
            serial,
            content_hash,
            captured_at: Some(captured_at),
            records,
        })
    }

    /// Rebuild a snapshot from persisted parts whose hash was already verified.
    pub fn restore(
        serial: u64,
        content_hash: String,
        captured_at: Option<DateTime<Utc>>,
        records: Vec<VrpRecord>,
    ) -> Self {
        Self {
            serial,
            content_hash,
            captured_at,
            records,
        }
    }

    pub fn serial(&self) -> u64 {
        self.serial
    }

    pub fn content_hash(&self) -> &str {
        &self.content_hash
    }

    pub fn captured_at(&self) -> Option<DateTime<Utc>> {
        self.captured_at
    }

    pub fn records(&self) -> &[VrpRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
