//! CLI integration tests
//!
//! These tests run the built `vrpx` binary against a scratch state directory.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

const BATCH_ONE: &str = r#"{
    "metadata": {"generated": 1700000000},
    "roas": [
        {"asn": "AS1", "prefix": "10.0.0.0/24", "maxLength": 24, "ta": "ta1"}
    ]
}"#;

const BATCH_TWO: &str = r#"{
    "metadata": {"generated": 1700000600},
    "roas": [
        {"asn": "AS1", "prefix": "10.0.0.0/24", "maxLength": 24, "ta": "ta1"},
        {"asn": "AS2", "prefix": "10.1.0.0/24", "maxLength": 24, "ta": "ta1"}
    ]
}"#;

const HOST_BITS: &str = r#"{
    "metadata": {"generated": 1700001200},
    "roas": [
        {"asn": "AS2", "prefix": "10.0.0.1/24", "maxLength": 24, "ta": "ta1"}
    ]
}"#;

fn setup_test_env() -> (TempDir, PathBuf, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let state_dir = temp_dir.path().join("state");
    let input = temp_dir.path().join("vrps.json");
    (temp_dir, state_dir, input)
}

fn vrpx(state_dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_vrpx"))
        .env_remove("VRPX_INPUT")
        .env_remove("VRPX_POLL_INTERVAL_SECONDS")
        .env("RUST_LOG", "off")
        .arg("--state-dir")
        .arg(state_dir)
        .args(args)
        .output()
        .expect("Failed to execute CLI")
}

fn ingest(state_dir: &Path, input: &Path, doc: &str) -> Output {
    fs::write(input, doc).unwrap();
    vrpx(state_dir, &["ingest", "--input", input.to_str().unwrap()])
}

fn stdout_json(output: &Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).expect("stdout is JSON")
}

#[test]
fn test_cli_ingest_then_state() {
    let (_temp, state_dir, input) = setup_test_env();

    let output = ingest(&state_dir, &input, BATCH_ONE);
    assert!(output.status.success(), "ingest failed: {:?}", output);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Snapshot accepted"));
    assert!(stdout.contains("serial: 1"));

    let state = stdout_json(&vrpx(&state_dir, &["state"]));
    assert_eq!(state["serial"], 1);
    assert_eq!(state["vrp_count"], 1);
    assert!(state.get("vrps").is_none());

    let full = stdout_json(&vrpx(&state_dir, &["state", "--vrps"]));
    assert_eq!(full["vrps"][0]["prefix"], "10.0.0.0/24");
}

#[test]
fn test_cli_repeat_ingest_is_unchanged() {
    let (_temp, state_dir, input) = setup_test_env();
    ingest(&state_dir, &input, BATCH_ONE);

    let output = ingest(&state_dir, &input, BATCH_ONE);

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("Snapshot unchanged"));
}

#[test]
fn test_cli_invalid_batch_exits_non_zero_and_keeps_state() {
    let (_temp, state_dir, input) = setup_test_env();
    ingest(&state_dir, &input, BATCH_ONE);

    let output = ingest(&state_dir, &input, HOST_BITS);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("ERR_VALIDATION"));
    let state = stdout_json(&vrpx(&state_dir, &["state"]));
    assert_eq!(state["serial"], 1);
}

#[test]
fn test_cli_diff_json_and_summary() {
    let (_temp, state_dir, input) = setup_test_env();
    ingest(&state_dir, &input, BATCH_ONE);
    ingest(&state_dir, &input, BATCH_TWO);

    let diff = stdout_json(&vrpx(&state_dir, &["diff", "--from", "1", "--to", "2"]));
    assert_eq!(diff["serial"], 2);
    assert_eq!(diff["added"][0]["asn"], "AS2");
    assert_eq!(diff["removed_count"], 0);

    let output = vrpx(&state_dir, &["diff", "--from", "1", "--to", "2", "--summary"]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("10.1.0.0/24"));
}

#[test]
fn test_cli_missing_diff_exits_non_zero() {
    let (_temp, state_dir, input) = setup_test_env();
    ingest(&state_dir, &input, BATCH_ONE);

    let output = vrpx(&state_dir, &["diff", "--from", "0", "--to", "2"]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("not found"));
}

#[test]
fn test_cli_lookup_route() {
    let (_temp, state_dir, input) = setup_test_env();
    ingest(&state_dir, &input, BATCH_TWO);

    let hit = stdout_json(&vrpx(
        &state_dir,
        &["lookup", "--asn", "2", "--prefix", "10.1.0.0/24"],
    ));
    assert_eq!(hit["valid"], true);
    assert_eq!(hit["asn"], "AS2");

    let miss = stdout_json(&vrpx(
        &state_dir,
        &["lookup", "--asn", "AS1", "--prefix", "10.1.0.0/24"],
    ));
    assert_eq!(miss["valid"], false);

    let listing = stdout_json(&vrpx(&state_dir, &["lookup", "--asn", "AS1"]));
    assert_eq!(listing["filtered_vrps"], 1);
    assert_eq!(listing["total_vrps"], 2);
}

#[test]
fn test_cli_watch_runs_cycle_budget() {
    let (_temp, state_dir, input) = setup_test_env();
    fs::write(&input, BATCH_TWO).unwrap();

    let output = vrpx(
        &state_dir,
        &[
            "watch",
            "--input",
            input.to_str().unwrap(),
            "--interval-secs",
            "0",
            "--cycles",
            "2",
        ],
    );

    assert!(output.status.success(), "watch failed: {:?}", output);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Stopped after 2 cycles"));
    assert!(stdout.contains("serial: 1"));
}

#[test]
fn test_cli_state_of_empty_directory_is_serial_zero() {
    let (_temp, state_dir, _input) = setup_test_env();

    let state = stdout_json(&vrpx(&state_dir, &["state"]));

    assert_eq!(state["serial"], 0);
    assert_eq!(state["hash"], "");
}
