//! Snapshot/diff/serial engine.
//!
//! ## Lifecycle
//!
//! - **Fresh**: serial 0, empty snapshots, empty hash. The first processed
//!   batch is always accepted.
//! - **Loaded**: restored from the state directory.
//! - **Updated**: at least one batch accepted since start.
//!
//! An accepted transition is persisted (diff, current, previous, metadata)
//! before the in-memory state is swapped, under one write lock. If
//! persistence fails the engine is marked faulted and refuses further
//! transitions until the process restarts and reloads.

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use std::sync::{Arc, RwLock, RwLockReadGuard};
use std::time::Instant;
use vrpx_core::canonical::canonicalize_records;
use vrpx_core::errors::{ExError, ExErrorKind};
use vrpx_core::{
    compute_content_hash, compute_diff, log_op_end, log_op_error, log_op_start, DiffRecord,
    Snapshot, UpstreamMetadata, VrpRecord,
};
use vrpx_store::{Result, StateMetadata, StateStore};

/// Read view of the engine state.
///
/// Holds the snapshot by `Arc`; taking one never copies records.
#[derive(Debug, Clone, Serialize)]
pub struct CurrentState {
    pub serial: u64,
    pub vrp_count: usize,
    pub hash: String,
    #[serde(with = "vrpx_core::model::timestamp::option")]
    pub last_update: Option<DateTime<Utc>>,
    #[serde(rename = "vrps", serialize_with = "serialize_records")]
    snapshot: Arc<Snapshot>,
}

impl CurrentState {
    fn of(snapshot: Arc<Snapshot>) -> Self {
        Self {
            serial: snapshot.serial(),
            vrp_count: snapshot.len(),
            hash: snapshot.content_hash().to_string(),
            last_update: snapshot.captured_at(),
            snapshot,
        }
    }

    /// Records of the current snapshot in canonical order
    pub fn vrps(&self) -> &[VrpRecord] {
        self.snapshot.records()
    }

    pub fn snapshot(&self) -> &Arc<Snapshot> {
        &self.snapshot
    }
}

fn serialize_records<S: Serializer>(
    snapshot: &Arc<Snapshot>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    snapshot.records().serialize(serializer)
}

#[derive(Debug)]
struct EngineState {
    current: Arc<Snapshot>,
    previous: Arc<Snapshot>,
    faulted: bool,
}

/// The single owner of serial state for one state directory
#[derive(Debug)]
pub struct Engine {
    store: StateStore,
    state: RwLock<EngineState>,
}

impl Engine {
    /// A Fresh engine that ignores anything already in the state directory.
    pub fn fresh(store: StateStore) -> Self {
        Self::with_snapshots(store, Snapshot::empty(), Snapshot::empty())
    }

    /// Restore the engine from its state directory; Fresh if there is none.
    ///
    /// # Errors
    ///
    /// `ExErrorKind::CorruptState` or `ExErrorKind::Io` when persisted state
    /// exists but cannot be trusted. Both are fatal.
    pub fn load(store: StateStore) -> Result<Self> {
        log_op_start!("load_state", root = %store.root().display());
        let start = Instant::now();

        let result = store.load();

        let elapsed = start.elapsed().as_millis() as u64;
        match result {
            Ok(Some(persisted)) => {
                log_op_end!(
                    "load_state",
                    duration_ms = elapsed,
                    serial = persisted.metadata.serial,
                    vrp_count = persisted.metadata.vrp_count
                );
                Ok(Self::with_snapshots(
                    store,
                    persisted.current,
                    persisted.previous,
                ))
            }
            Ok(None) => {
                log_op_end!("load_state", duration_ms = elapsed, serial = 0u64);
                Ok(Self::fresh(store))
            }
            Err(e) => {
                let e_clone = e.clone();
                log_op_error!("load_state", e_clone, duration_ms = elapsed);
                Err(e)
            }
        }
    }

    fn with_snapshots(store: StateStore, current: Snapshot, previous: Snapshot) -> Self {
        Self {
            store,
            state: RwLock::new(EngineState {
                current: Arc::new(current),
                previous: Arc::new(previous),
                faulted: false,
            }),
        }
    }

    pub fn store(&self) -> &StateStore {
        &self.store
    }

    /// Offer a validated record sequence as the next snapshot.
    ///
    /// Returns `Ok(true)` if it was accepted as a new serial, `Ok(false)` if
    /// its content hash equals the current one (nothing changes).
    ///
    /// # Errors
    ///
    /// - `ExErrorKind::Persistence` if persisting the transition failed (the
    ///   store error is attached as the source and the engine is faulted
    ///   afterwards), or if the engine is already faulted
    /// - `ExErrorKind::Concurrency` if the state lock is poisoned
    pub fn process(&self, candidate: Vec<VrpRecord>, metadata: UpstreamMetadata) -> Result<bool> {
        log_op_start!("process_snapshot", vrp_count = candidate.len());
        let start = Instant::now();

        let result = self.apply(candidate, metadata);

        let elapsed = start.elapsed().as_millis() as u64;
        match &result {
            Ok(accepted) => log_op_end!(
                "process_snapshot",
                duration_ms = elapsed,
                accepted = *accepted
            ),
            Err(e) => {
                let e_clone = e.clone();
                log_op_error!("process_snapshot", e_clone, duration_ms = elapsed);
            }
        }
        result
    }

    fn apply(&self, candidate: Vec<VrpRecord>, metadata: UpstreamMetadata) -> Result<bool> {
        let mut state = self
            .state
            .write()
            .map_err(|_| poisoned("process_snapshot"))?;

        if state.faulted {
            return Err(ExError::new(ExErrorKind::Persistence)
                .with_op("process_snapshot")
                .with_serial(state.current.serial())
                .with_message(
                    "engine is faulted by an earlier persistence failure; restart to reload state",
                ));
        }

        let records = canonicalize_records(candidate);
        let new_hash = compute_content_hash(&records)
            .map_err(|e| ExError::from(e).with_op("hash_snapshot"))?;

        if new_hash == state.current.content_hash() {
            tracing::info!(
                serial = state.current.serial(),
                hash = %new_hash,
                "Snapshot unchanged"
            );
            return Ok(false);
        }

        let serial = state.current.serial().checked_add(1).ok_or_else(|| {
            ExError::new(ExErrorKind::Internal)
                .with_op("process_snapshot")
                .with_message("serial space exhausted")
        })?;
        let now = Utc::now();
        let delta = compute_diff(state.current.records(), &records);
        let diff = DiffRecord::new(serial, now, metadata, delta);
        let next = Snapshot::restore(serial, new_hash, Some(now), records);
        let persisted = StateMetadata {
            serial,
            current_hash: next.content_hash().to_string(),
            last_update: Some(now),
            vrp_count: next.len(),
        };

        if let Err(e) = self
            .store
            .commit_transition(&diff, &state.current, &next, &persisted)
        {
            state.faulted = true;
            return Err(ExError::new(ExErrorKind::Persistence)
                .with_op("commit_transition")
                .with_serial(serial)
                .with_message("accepted snapshot could not be persisted; engine faulted")
                .with_source(e));
        }

        tracing::info!(
            serial,
            hash = %persisted.current_hash,
            vrp_count = persisted.vrp_count,
            added = diff.added_count,
            removed = diff.removed_count,
            "Accepted new snapshot"
        );

        let next = Arc::new(next);
        state.previous = std::mem::replace(&mut state.current, next);
        Ok(true)
    }

    /// The current serial, hash, timestamps and records.
    ///
    /// # Errors
    ///
    /// `ExErrorKind::Concurrency` if the state lock is poisoned.
    pub fn current_state(&self) -> Result<CurrentState> {
        let state = self.read("current_state")?;
        Ok(CurrentState::of(Arc::clone(&state.current)))
    }

    /// The snapshot that was current before the last accepted transition.
    ///
    /// # Errors
    ///
    /// `ExErrorKind::Concurrency` if the state lock is poisoned.
    pub fn previous_snapshot(&self) -> Result<Arc<Snapshot>> {
        Ok(Arc::clone(&self.read("previous_snapshot")?.previous))
    }

    /// The diff record for the single step `from → to`.
    ///
    /// `None` unless `to == from + 1`, `to` is not beyond the current serial,
    /// and the record exists on disk.
    ///
    /// # Errors
    ///
    /// `ExErrorKind::CorruptState` / `ExErrorKind::Io` if the diff file exists
    /// but cannot be read.
    pub fn diff_between(&self, from: u64, to: u64) -> Result<Option<DiffRecord>> {
        if to < from || to - from != 1 {
            return Ok(None);
        }
        let current_serial = self.read("diff_between")?.current.serial();
        if to > current_serial {
            return Ok(None);
        }
        self.store.read_diff(to)
    }

    /// Whether an earlier persistence failure has stopped this engine.
    pub fn is_faulted(&self) -> bool {
        self.state.read().map(|s| s.faulted).unwrap_or(true)
    }

    fn read(&self, op: &str) -> Result<RwLockReadGuard<'_, EngineState>> {
        self.state.read().map_err(|_| poisoned(op))
    }
}

fn poisoned(op: &str) -> ExError {
    ExError::new(ExErrorKind::Concurrency)
        .with_op(op)
        .with_message("engine state lock poisoned")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use vrpx_core::canonical::RawRoa;
    use vrpx_core::canonicalize;

    fn setup() -> (TempDir, Engine) {
        let temp_dir = TempDir::new().unwrap();
        let engine = Engine::fresh(StateStore::new(temp_dir.path()));
        (temp_dir, engine)
    }

    fn metadata() -> UpstreamMetadata {
        UpstreamMetadata::new(1_700_000_000, Utc::now())
    }

    #[test]
    fn test_fresh_engine_accepts_empty_batch() {
        let (_temp, engine) = setup();

        assert!(engine.process(Vec::new(), metadata()).unwrap());

        let state = engine.current_state().unwrap();
        assert_eq!(state.serial, 1);
        assert_eq!(state.vrp_count, 0);
        assert!(!state.hash.is_empty());
    }

    #[test]
    fn test_non_canonical_input_is_canonicalized() {
        let (_temp, engine) = setup();
        let sorted = canonicalize(&[
            RawRoa::new("AS2", "10.0.0.0/8", 8, "ripe"),
            RawRoa::new("AS1", "10.0.0.0/8", 8, "ripe"),
        ])
        .unwrap();
        let mut reversed = sorted.clone();
        reversed.reverse();

        engine.process(reversed, metadata()).unwrap();

        assert_eq!(engine.current_state().unwrap().vrps(), sorted.as_slice());
    }

    #[test]
    fn test_current_state_serializes_records_as_vrps() {
        let (_temp, engine) = setup();
        let records = canonicalize(&[RawRoa::new("AS1", "10.0.0.0/8", 8, "ripe")]).unwrap();
        engine.process(records, metadata()).unwrap();

        let value = serde_json::to_value(engine.current_state().unwrap()).unwrap();

        assert_eq!(value["serial"], 1);
        assert_eq!(value["vrp_count"], 1);
        assert_eq!(value["vrps"][0]["asn"], "AS1");
        assert!(value["last_update"].is_string());
    }
}
