//! Upstream metadata attached to every accepted diff.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Provenance of one upstream batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpstreamMetadata {
    /// Generation time reported by the validator (unix seconds)
    pub generated: i64,
    /// When this process fetched the batch
    #[serde(with = "crate::model::timestamp")]
    pub fetched_at: DateTime<Utc>,
}

impl UpstreamMetadata {
    pub fn new(generated: i64, fetched_at: DateTime<Utc>) -> Self {
        Self {
            generated,
            fetched_at,
        }
    }
}
