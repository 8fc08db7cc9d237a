#![allow(clippy::unwrap_used, clippy::expect_used)]

// Test suite for the serial state machine: acceptance, idempotency, diff lookup, faults

use chrono::Utc;
use std::fs;
use tempfile::TempDir;
use vrpx_core::canonical::RawRoa;
use vrpx_core::errors::ExErrorKind;
use vrpx_core::{canonicalize, UpstreamMetadata, VrpRecord};
use vrpx_engine::Engine;
use vrpx_store::StateStore;

fn setup_test_env() -> (TempDir, StateStore) {
    let temp_dir = TempDir::new().unwrap();
    let store = StateStore::new(temp_dir.path().join("state"));
    (temp_dir, store)
}

fn batch(rows: &[(&str, &str, i64, &str)]) -> Vec<VrpRecord> {
    let raws: Vec<RawRoa> = rows
        .iter()
        .map(|&(asn, prefix, max_length, ta)| RawRoa::new(asn, prefix, max_length, ta))
        .collect();
    canonicalize(&raws).unwrap()
}

fn metadata() -> UpstreamMetadata {
    UpstreamMetadata::new(1_700_000_000, Utc::now())
}

const R1: (&str, &str, i64, &str) = ("AS1", "10.0.0.0/24", 24, "ta1");
const R2: (&str, &str, i64, &str) = ("AS2", "10.1.0.0/24", 24, "ta1");
const R3: (&str, &str, i64, &str) = ("AS3", "10.2.0.0/16", 24, "ta2");

#[test]
fn test_three_batch_scenario() {
    let (_temp, store) = setup_test_env();
    let engine = Engine::fresh(store);

    assert!(engine.process(batch(&[R1]), metadata()).unwrap());
    assert_eq!(engine.current_state().unwrap().serial, 1);

    // Same content, reordered
    let mut reordered = batch(&[R1, R1]);
    reordered.reverse();
    assert!(!engine.process(reordered, metadata()).unwrap());
    assert_eq!(engine.current_state().unwrap().serial, 1);

    assert!(engine.process(batch(&[R1, R2]), metadata()).unwrap());
    let state = engine.current_state().unwrap();
    assert_eq!(state.serial, 2);
    assert_eq!(state.vrp_count, 2);

    let diff = engine.diff_between(1, 2).unwrap().unwrap();
    assert_eq!(diff.added, batch(&[R2]));
    assert!(diff.removed.is_empty());
    assert_eq!(diff.metadata.generated, 1_700_000_000);
}

#[test]
fn test_unchanged_batch_writes_nothing() {
    let (_temp, store) = setup_test_env();
    let engine = Engine::fresh(store.clone());
    engine.process(batch(&[R1]), metadata()).unwrap();
    let before = fs::read(store.layout().metadata()).unwrap();

    assert!(!engine.process(batch(&[R1]), metadata()).unwrap());

    assert_eq!(fs::read(store.layout().metadata()).unwrap(), before);
    assert!(!store.layout().diff(2).exists());
}

#[test]
fn test_serial_advances_by_one_and_every_step_has_a_diff() {
    let (_temp, store) = setup_test_env();
    let engine = Engine::fresh(store);
    let batches = [
        batch(&[R1]),
        batch(&[R1, R2]),
        batch(&[R2]),
        batch(&[R2, R3]),
        batch(&[]),
    ];

    for (i, records) in batches.into_iter().enumerate() {
        assert!(engine.process(records, metadata()).unwrap());
        let serial = engine.current_state().unwrap().serial;
        assert_eq!(serial, i as u64 + 1);
        let diff = engine.diff_between(serial - 1, serial).unwrap().unwrap();
        assert_eq!(diff.serial, serial);
    }

    let last = engine.diff_between(4, 5).unwrap().unwrap();
    assert_eq!(last.removed_count, 2);
    assert_eq!(last.added_count, 0);
}

#[test]
fn test_diff_between_only_serves_single_existing_steps() {
    let (_temp, store) = setup_test_env();
    let engine = Engine::fresh(store);
    engine.process(batch(&[R1]), metadata()).unwrap();
    engine.process(batch(&[R2]), metadata()).unwrap();

    assert!(engine.diff_between(0, 1).unwrap().is_some());
    assert!(engine.diff_between(0, 2).unwrap().is_none());
    assert!(engine.diff_between(2, 1).unwrap().is_none());
    assert!(engine.diff_between(1, 1).unwrap().is_none());
    assert!(engine.diff_between(2, 3).unwrap().is_none());
}

#[test]
fn test_trust_anchor_only_change_is_new_serial_with_empty_diff() {
    let (_temp, store) = setup_test_env();
    let engine = Engine::fresh(store);
    engine
        .process(batch(&[("AS1", "10.0.0.0/24", 24, "ta1")]), metadata())
        .unwrap();

    let accepted = engine
        .process(batch(&[("AS1", "10.0.0.0/24", 24, "ta2")]), metadata())
        .unwrap();

    assert!(accepted);
    let diff = engine.diff_between(1, 2).unwrap().unwrap();
    assert_eq!(diff.added_count, 0);
    assert_eq!(diff.removed_count, 0);
}

#[test]
fn test_reload_restores_serial_hash_and_snapshots() {
    let (_temp, store) = setup_test_env();
    let engine = Engine::fresh(store.clone());
    engine.process(batch(&[R1]), metadata()).unwrap();
    engine.process(batch(&[R1, R2]), metadata()).unwrap();
    let before = engine.current_state().unwrap();
    drop(engine);

    let reloaded = Engine::load(store).unwrap();

    let after = reloaded.current_state().unwrap();
    assert_eq!(after.serial, before.serial);
    assert_eq!(after.hash, before.hash);
    assert_eq!(after.vrps(), before.vrps());
    assert_eq!(reloaded.previous_snapshot().unwrap().records(), batch(&[R1]).as_slice());
    assert!(!reloaded.process(batch(&[R2, R1]), metadata()).unwrap());
    assert!(reloaded.process(batch(&[R3]), metadata()).unwrap());
    assert_eq!(reloaded.current_state().unwrap().serial, 3);
}

#[test]
fn test_load_of_empty_directory_is_fresh() {
    let (_temp, store) = setup_test_env();

    let engine = Engine::load(store).unwrap();

    let state = engine.current_state().unwrap();
    assert_eq!(state.serial, 0);
    assert_eq!(state.hash, "");
    assert!(state.last_update.is_none());
}

#[test]
fn test_load_fails_on_half_applied_transition() {
    let (_temp, store) = setup_test_env();
    let engine = Engine::fresh(store.clone());
    engine.process(batch(&[R1]), metadata()).unwrap();
    drop(engine);
    // Snapshot rewritten but metadata still describes the old one
    fs::write(
        store.layout().current_snapshot(),
        serde_json::to_vec(&batch(&[R1, R2])).unwrap(),
    )
    .unwrap();

    let err = Engine::load(store).unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::CorruptState);
}

#[test]
fn test_persistence_failure_faults_engine() {
    let (_temp, store) = setup_test_env();
    fs::create_dir_all(store.root()).unwrap();
    // A file where the diffs directory should be makes every diff write fail
    fs::write(store.layout().diffs_dir(), b"").unwrap();
    let engine = Engine::fresh(store);

    let err = engine.process(batch(&[R1]), metadata()).unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::Persistence);
    assert!(err.is_fatal());
    assert_eq!(err.source_error().map(|e| e.kind()), Some(ExErrorKind::Io));
    assert_eq!(err.serial(), Some(1));
    assert!(engine.is_faulted());
    assert_eq!(engine.current_state().unwrap().serial, 0);

    let err = engine.process(batch(&[R2]), metadata()).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::Persistence);
}

const R4: (&str, &str, i64, &str) = ("AS3", "10.3.0.0/24", 24, "ta1");

#[test]
fn test_failed_current_write_leaves_previous_intact_on_reload() {
    let (_temp, store) = setup_test_env();
    let engine = Engine::fresh(store.clone());
    engine.process(batch(&[R1]), metadata()).unwrap();
    engine.process(batch(&[R4]), metadata()).unwrap();
    // A directory at the temp path makes the current snapshot write fail
    fs::create_dir(store.layout().current_snapshot().with_extension("tmp")).unwrap();

    assert!(engine.process(batch(&[R1, R4]), metadata()).is_err());
    drop(engine);

    let reloaded = Engine::load(store).unwrap();
    assert_eq!(reloaded.current_state().unwrap().vrps(), batch(&[R4]).as_slice());
    assert_eq!(reloaded.current_state().unwrap().serial, 2);
    assert_eq!(reloaded.previous_snapshot().unwrap().records(), batch(&[R1]).as_slice());
}

#[test]
fn test_failed_previous_write_is_caught_on_reload() {
    let (_temp, store) = setup_test_env();
    let engine = Engine::fresh(store.clone());
    engine.process(batch(&[R1]), metadata()).unwrap();
    engine.process(batch(&[R4]), metadata()).unwrap();
    fs::create_dir(store.layout().previous_snapshot().with_extension("tmp")).unwrap();

    assert!(engine.process(batch(&[R1, R4]), metadata()).is_err());
    drop(engine);

    let err = Engine::load(store).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::CorruptState);
}
