//! Diff output types.

use crate::model::{UpstreamMetadata, VrpRecord};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Added/removed record sets between two snapshots.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VrpDelta {
    /// Records whose match key exists only in the new snapshot
    pub added: Vec<VrpRecord>,
    /// Records whose match key exists only in the old snapshot
    pub removed: Vec<VrpRecord>,
}

impl VrpDelta {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// The persisted record of one accepted transition (serial-1 → serial).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffRecord {
    /// Serial this diff leads to
    pub serial: u64,
    /// When the transition was accepted
    #[serde(with = "crate::model::timestamp")]
    pub timestamp: DateTime<Utc>,
    /// Provenance of the batch that produced the new snapshot
    pub metadata: UpstreamMetadata,
    pub added_count: usize,
    pub removed_count: usize,
    pub added: Vec<VrpRecord>,
    pub removed: Vec<VrpRecord>,
}

impl DiffRecord {
    pub fn new(
        serial: u64,
        timestamp: DateTime<Utc>,
        metadata: UpstreamMetadata,
        delta: VrpDelta,
    ) -> Self {
        Self {
            serial,
            timestamp,
            metadata,
            added_count: delta.added.len(),
            removed_count: delta.removed.len(),
            added: delta.added,
            removed: delta.removed,
        }
    }

    /// Whether the stored counts agree with the stored record lists.
    pub fn counts_consistent(&self) -> bool {
        self.added_count == self.added.len() && self.removed_count == self.removed.len()
    }
}
