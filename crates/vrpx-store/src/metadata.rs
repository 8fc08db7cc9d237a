//! Persisted engine metadata

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Contents of `state_metadata.json`.
///
/// Written last on every accepted transition; it is the commit point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateMetadata {
    pub serial: u64,
    pub current_hash: String,
    #[serde(default, with = "vrpx_core::model::timestamp::option")]
    pub last_update: Option<DateTime<Utc>>,
    pub vrp_count: usize,
}
