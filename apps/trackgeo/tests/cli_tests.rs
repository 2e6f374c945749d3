//! Integration tests for the trackgeo command line.
//!
//! Commands run in-process through `cli::execute`, plus a few runs of the
//! real binary for exit status and stdout.

// Allow unwrap and panic in tests - these are standard for test code
#![allow(clippy::unwrap_used, clippy::panic)]

use clap::Parser;
use serde_json::{Value, json};
use std::path::PathBuf;
use std::process::Command;
use std::sync::{Mutex, MutexGuard};
use trackgeo::cli::{self, Cli, Report};
use trackgeo::config::CONFIG_ENV_VAR;
use trackgeo_core::TrackError;

/// Serializes tests since one of them sets `TRACKGEO_CONFIG`.
static ENV_MUTEX: Mutex<()> = Mutex::new(());

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

fn lock() -> MutexGuard<'static, ()> {
    ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner())
}

fn fixture() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../crates/trackgeo-core/tests/data/diamond.ppxml")
}

fn run(args: &[&str]) -> Result<Report, TrackError> {
    let input = fixture();
    let mut argv = vec!["trackgeo", "-i", input.to_str().unwrap()];
    argv.extend_from_slice(args);
    let cli = Cli::try_parse_from(argv).unwrap();

    let _guard = lock();
    cli::execute(&cli)
}

// =============================================================================
// QUERY COMMANDS
// =============================================================================

#[test]
fn test_status_counts() {
    let report = run(&["status"]).unwrap();
    assert_eq!(report.json["records"], 15);
    assert_eq!(report.json["edges"], 6);
    assert_eq!(report.json["point_objects"], 9);
    assert!(report.text.contains("Edges:         6"));
}

#[test]
fn test_distance_and_orientation() {
    let report = run(&["distance", "--from", "S1", "--to", "S5"]).unwrap();
    assert_eq!(report.json, json!({ "kind": "distance", "value": 560_000 }));
    assert_eq!(report.text, "S1 -> S5: 560000 mm");

    let report = run(&["orientation", "--from", "S1", "--to", "S5"]).unwrap();
    assert_eq!(report.json, json!({ "kind": "orientation", "value": "opposite" }));

    let report = run(&["distance", "--from", "S1", "--to", "S8"]).unwrap();
    assert_eq!(report.json["value"], Value::Null);
    assert!(report.text.ends_with("not connected"));
}

#[test]
fn test_neighbors() {
    let report = run(&["neighbors", "--edge", "E2", "--descending"]).unwrap();
    assert_eq!(report.text, "E3 (ascending)\nE4 (ascending)");

    let report = run(&["neighbors", "--edge", "E6"]).unwrap();
    assert_eq!(report.json["value"], json!([]));
}

#[test]
fn test_project_from_edge_point() {
    let report = run(&["project", "--at", "E1:50000:in", "-d", "300000"]).unwrap();
    let reference = &report.json["value"][0]["refs"][0];
    assert_eq!(reference["edge"], "E2");
    assert_eq!(reference["offset"], 60_000);
    assert_eq!(reference["direction"], "reverse");

    let report = run(&["project", "--from", "S3", "-d", "-150000"]).unwrap();
    assert_eq!(report.text, "E2 @ 50000 mm (gegen)");
}

#[test]
fn test_project_path() {
    let report = run(&[
        "project-path",
        "--from",
        "S1",
        "--path",
        "E1,E2,E4",
        "-d",
        "400000",
    ])
    .unwrap();
    assert_eq!(report.text, "E4 @ 40000 mm (in)");

    let report = run(&[
        "project-path",
        "--from",
        "S1",
        "--path",
        "E1,E2",
        "-d",
        "400000",
    ])
    .unwrap();
    assert_eq!(report.json["value"], Value::Null);
}

#[test]
fn test_search_with_predicate_and_pick() {
    let report = run(&[
        "search",
        "--from",
        "S2",
        "--type",
        "Signal",
        "--where",
        "Signal_Real/Signalsystem/Wert=HV",
    ])
    .unwrap();
    assert_eq!(report.text, "S4 at 160000 mm via E2 > E4");

    let report = run(&[
        "search",
        "--from",
        "S2",
        "--type",
        "Signal",
        "--orientation",
        "opposite",
        "--nearest",
    ])
    .unwrap();
    let matches = report.json["value"].as_array().unwrap();
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0]["distance"], 260_000);
    assert_eq!(matches[0]["edges"], json!(["E2", "E4", "E5"]));

    let report = run(&["search", "--from", "S1", "--backward"]).unwrap();
    assert_eq!(report.text, "No match");
}

#[test]
fn test_errors_are_typed() {
    assert!(matches!(
        run(&["distance", "--from", "NOPE", "--to", "S1"]),
        Err(TrackError::RecordNotFound(_))
    ));
    assert!(matches!(
        run(&["search", "--from", "S1", "--where", "Hoehe"]),
        Err(TrackError::InvalidPredicate(_))
    ));
    assert!(matches!(
        run(&["search", "--from", "S1", "--orientation", "sideways"]),
        Err(TrackError::InvalidToken { .. })
    ));
    assert!(matches!(
        run(&["project-path", "--from", "S1", "--path", "E1", "-d", "-5"]),
        Err(TrackError::NegativeDistance(-5))
    ));
}

#[test]
fn test_edge_point_must_lie_on_the_edge() {
    assert!(matches!(
        run(&["project", "--at", "E1:999999999", "-d", "0"]),
        Err(TrackError::OffsetOutOfRange {
            edge,
            offset: 999_999_999,
            length: 310_000,
        }) if edge == "E1"
    ));
    assert!(matches!(
        run(&["project", "--at", "E1:-1", "-d", "0"]),
        Err(TrackError::OffsetOutOfRange { .. })
    ));
    assert!(matches!(
        run(&["project", "--at", "E99:0", "-d", "0"]),
        Err(TrackError::RecordNotFound(_))
    ));

    let report = run(&["project", "--at", "E1:310000", "-d", "0"]).unwrap();
    assert_eq!(report.text, "E1 @ 310000 mm (in)");
}

#[test]
fn test_start_is_required_once() {
    assert!(Cli::try_parse_from(["trackgeo", "project", "-d", "5"]).is_err());
    assert!(
        Cli::try_parse_from(["trackgeo", "project", "--from", "S1", "--at", "E1:0", "-d", "5"])
            .is_err()
    );
}

#[test]
fn test_missing_input() {
    let cli = Cli::try_parse_from(["trackgeo", "status"]).unwrap();
    let _guard = lock();
    assert!(matches!(cli::execute(&cli), Err(TrackError::IoError(_))));
}

// =============================================================================
// CONFIG & LIMITS
// =============================================================================

#[test]
fn test_config_file_limits() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("trackgeo.toml");
    std::fs::write(&config, "[limits]\nmax_results = 1\n").unwrap();

    let result = run(&[
        "--config",
        config.to_str().unwrap(),
        "project",
        "--from",
        "S2",
        "-d",
        "100000",
    ]);
    assert!(matches!(result, Err(TrackError::ResultLimitExceeded(1))));

    let report = run(&[
        "--config",
        config.to_str().unwrap(),
        "--max-results",
        "5",
        "project",
        "--from",
        "S2",
        "-d",
        "100000",
    ])
    .unwrap();
    assert_eq!(report.json["value"].as_array().unwrap().len(), 2);
}

#[test]
fn test_config_from_environment() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("env.toml");
    std::fs::write(&config, "[limits]\nmax_hops = 42\n").unwrap();

    let input = fixture();
    let cli = Cli::try_parse_from(["trackgeo", "-i", input.to_str().unwrap(), "status"]).unwrap();

    let _guard = lock();
    // SAFETY: Tests touching the environment run under ENV_MUTEX.
    unsafe { std::env::set_var(CONFIG_ENV_VAR, &config) };
    let result = cli::execute(&cli);
    // SAFETY: Still under ENV_MUTEX.
    unsafe { std::env::remove_var(CONFIG_ENV_VAR) };

    assert_eq!(result.unwrap().json["max_hops"], 42);
}

#[test]
fn test_invalid_config_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("bad.toml");
    std::fs::write(&config, "[limits]\nmax_hops = \"many\"\n").unwrap();

    assert!(matches!(
        run(&["--config", config.to_str().unwrap(), "status"]),
        Err(TrackError::DeserializationError(_))
    ));
}

// =============================================================================
// SNAPSHOT
// =============================================================================

#[test]
fn test_snapshot_reloads() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("diamond.tgeo");

    let report = run(&["snapshot", "-o", output.to_str().unwrap()]).unwrap();
    assert_eq!(report.json["records"], 15);
    assert!(std::fs::read(&output).unwrap().starts_with(b"TGEO"));

    let cli = Cli::try_parse_from([
        "trackgeo",
        "-i",
        output.to_str().unwrap(),
        "distance",
        "--from",
        "S1",
        "--to",
        "S5",
    ])
    .unwrap();
    let _guard = lock();
    let report = cli::execute(&cli).unwrap();
    assert_eq!(report.json["value"], 560_000);
}

// =============================================================================
// BINARY
// =============================================================================

#[test]
fn test_binary_prints_json_to_stdout() {
    let _guard = lock();
    let output = Command::new(env!("CARGO_BIN_EXE_trackgeo"))
        .args(["-q", "--json-mode", "-i"])
        .arg(fixture())
        .args(["orientation", "--from", "S1", "--to", "S2"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let value: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value, json!({ "kind": "orientation", "value": "equal" }));
}

#[test]
fn test_binary_exits_with_one_on_error() {
    let _guard = lock();
    let output = Command::new(env!("CARGO_BIN_EXE_trackgeo"))
        .arg("-i")
        .arg(fixture())
        .args(["distance", "--from", "NOPE", "--to", "S1"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
}
