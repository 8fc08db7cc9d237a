//! The state directory as a whole: load on startup, commit on every accepted
//! transition, diff lookup by serial.

use crate::errors::{corrupt_state, serialization_error, Result};
use crate::fs::{atomic_write, read_optional};
use crate::layout::StateLayout;
use crate::metadata::StateMetadata;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};
use vrpx_core::errors::ExError;
use vrpx_core::{compute_content_hash, DiffRecord, Snapshot, VrpRecord};

/// Everything read back from a state directory by [`StateStore::load`].
#[derive(Debug, Clone, PartialEq)]
pub struct PersistedState {
    pub metadata: StateMetadata,
    pub current: Snapshot,
    pub previous: Snapshot,
}

/// File-backed store for engine state
#[derive(Debug, Clone)]
pub struct StateStore {
    layout: StateLayout,
}

impl StateStore {
    /// Create a store rooted at `root`. Nothing is touched until the first
    /// load or write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            layout: StateLayout::new(root),
        }
    }

    pub fn layout(&self) -> &StateLayout {
        &self.layout
    }

    pub fn root(&self) -> &Path {
        self.layout.root()
    }

    /// Read persisted state.
    ///
    /// Returns `Ok(None)` when there is no metadata file (a fresh state
    /// directory). A missing previous snapshot is read as empty.
    ///
    /// # Errors
    ///
    /// - `ExErrorKind::CorruptState` if a file exists but does not decode, or
    ///   the current snapshot disagrees with the metadata hash or count
    /// - `ExErrorKind::Io` if a file exists but cannot be read
    pub fn load(&self) -> Result<Option<PersistedState>> {
        let metadata_path = self.layout.metadata();
        let Some(bytes) = read_optional(&metadata_path)? else {
            tracing::debug!(root = %self.root().display(), "No state metadata, starting fresh");
            return Ok(None);
        };
        let metadata: StateMetadata = decode("load_metadata", &metadata_path, &bytes)?;

        let current_path = self.layout.current_snapshot();
        let current_records = self.read_records(&current_path)?;
        let current_hash = content_hash(&current_path, &current_records)?;
        if current_hash != metadata.current_hash {
            return Err(corrupt_state(
                "load_current_snapshot",
                &current_path,
                format!(
                    "content hash {} does not match metadata hash {}",
                    current_hash, metadata.current_hash
                ),
            )
            .with_serial(metadata.serial));
        }
        if current_records.len() != metadata.vrp_count {
            return Err(corrupt_state(
                "load_current_snapshot",
                &current_path,
                format!(
                    "{} records on disk but metadata vrp_count is {}",
                    current_records.len(),
                    metadata.vrp_count
                ),
            )
            .with_serial(metadata.serial));
        }
        let current = Snapshot::restore(
            metadata.serial,
            current_hash,
            metadata.last_update,
            current_records,
        );

        let previous_path = self.layout.previous_snapshot();
        let previous_records = self.read_records(&previous_path)?;
        let previous = match metadata.serial.checked_sub(1) {
            Some(serial) if serial > 0 => {
                let hash = content_hash(&previous_path, &previous_records)?;
                Snapshot::restore(serial, hash, None, previous_records)
            }
            _ => Snapshot::empty(),
        };

        tracing::debug!(
            serial = metadata.serial,
            vrp_count = metadata.vrp_count,
            hash = %metadata.current_hash,
            "Loaded persisted state"
        );

        Ok(Some(PersistedState {
            metadata,
            current,
            previous,
        }))
    }

    /// Persist one accepted transition: diff, current, previous, then
    /// metadata. The metadata write commits the transition.
    ///
    /// # Errors
    ///
    /// Returns the first write failure; later files are left untouched.
    pub fn commit_transition(
        &self,
        diff: &DiffRecord,
        previous: &Snapshot,
        current: &Snapshot,
        metadata: &StateMetadata,
    ) -> Result<()> {
        self.save_diff(diff)?;
        self.save_state(previous, current, metadata)
    }

    /// Write the diff record for `diff.serial`.
    ///
    /// # Errors
    ///
    /// `ExErrorKind::Io` or `ExErrorKind::Serialization` on failure.
    pub fn save_diff(&self, diff: &DiffRecord) -> Result<()> {
        let path = self.layout.diff(diff.serial);
        write_json(&path, diff)?;
        tracing::debug!(
            serial = diff.serial,
            added = diff.added_count,
            removed = diff.removed_count,
            path = %path.display(),
            "Persisted diff record"
        );
        Ok(())
    }

    /// Write the current snapshot, then the previous one, then the metadata.
    ///
    /// Until the metadata lands, the current file on disk disagrees with the
    /// metadata hash, so an interrupted write is caught by [`StateStore::load`].
    /// The previous file is only replaced once the new current file is in place.
    ///
    /// # Errors
    ///
    /// `ExErrorKind::Io` or `ExErrorKind::Serialization` on failure.
    pub fn save_state(
        &self,
        previous: &Snapshot,
        current: &Snapshot,
        metadata: &StateMetadata,
    ) -> Result<()> {
        write_json(&self.layout.current_snapshot(), current.records())?;
        write_json(&self.layout.previous_snapshot(), previous.records())?;
        write_json(&self.layout.metadata(), metadata)?;
        tracing::debug!(
            serial = metadata.serial,
            vrp_count = metadata.vrp_count,
            "Persisted state metadata"
        );
        Ok(())
    }

    /// Read the diff record leading to `serial`, if one was written.
    ///
    /// # Errors
    ///
    /// `ExErrorKind::CorruptState` if the file does not decode, names another
    /// serial, or carries counts that disagree with its record lists.
    pub fn read_diff(&self, serial: u64) -> Result<Option<DiffRecord>> {
        let path = self.layout.diff(serial);
        let Some(bytes) = read_optional(&path)? else {
            return Ok(None);
        };
        let diff: DiffRecord = decode("read_diff", &path, &bytes)?;
        if diff.serial != serial {
            return Err(corrupt_state(
                "read_diff",
                &path,
                format!("file holds the diff for serial {}", diff.serial),
            )
            .with_serial(serial));
        }
        if !diff.counts_consistent() {
            return Err(corrupt_state(
                "read_diff",
                &path,
                "added/removed counts disagree with record lists",
            )
            .with_serial(serial));
        }
        Ok(Some(diff))
    }

    fn read_records(&self, path: &Path) -> Result<Vec<VrpRecord>> {
        match read_optional(path)? {
            Some(bytes) => decode("load_snapshot", path, &bytes),
            None => Ok(Vec::new()),
        }
    }
}

fn content_hash(path: &Path, records: &[VrpRecord]) -> Result<String> {
    compute_content_hash(records).map_err(|e| {
        ExError::from(e)
            .with_op("hash_snapshot")
            .with_path(path.display().to_string())
    })
}

fn decode<T: DeserializeOwned>(op: &str, path: &Path, bytes: &[u8]) -> Result<T> {
    serde_json::from_slice(bytes).map_err(|e| corrupt_state(op, path, format!("unreadable: {}", e)))
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let bytes = serde_json::to_vec_pretty(value)
        .map_err(|e| serialization_error("encode_state_file", e).with_path(path.display().to_string()))?;
    atomic_write(path, &bytes)
}
