//! File names inside a state directory

use std::path::{Path, PathBuf};

pub const METADATA_FILE: &str = "state_metadata.json";
pub const CURRENT_SNAPSHOT_FILE: &str = "current_snapshot.json";
pub const PREVIOUS_SNAPSHOT_FILE: &str = "previous_snapshot.json";
pub const DIFFS_DIR: &str = "diffs";

/// Paths of every state file under one root directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateLayout {
    root: PathBuf,
}

impl StateLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn metadata(&self) -> PathBuf {
        self.root.join(METADATA_FILE)
    }

    pub fn current_snapshot(&self) -> PathBuf {
        self.root.join(CURRENT_SNAPSHOT_FILE)
    }

    pub fn previous_snapshot(&self) -> PathBuf {
        self.root.join(PREVIOUS_SNAPSHOT_FILE)
    }

    pub fn diffs_dir(&self) -> PathBuf {
        self.root.join(DIFFS_DIR)
    }

    /// `diffs/diff_<serial zero-padded to 10>.json`
    pub fn diff(&self, serial: u64) -> PathBuf {
        self.diffs_dir().join(format!("diff_{:010}.json", serial))
    }
}
