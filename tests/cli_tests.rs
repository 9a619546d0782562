//! Integration tests for the origami CLI: ingest, restore, config and errors

mod support;

use predicates::prelude::*;
use std::fs;
use support::{ingest_fixture, origami, stdout_json, write_transcript};
use tempfile::tempdir;

// ============================================================================
// Help and version
// ============================================================================

#[test]
fn test_help_flag() {
    origami()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("restore"))
        .stdout(predicate::str::contains("summarize"));
}

#[test]
fn test_no_command_prints_version() {
    origami()
        .assert()
        .success()
        .stdout(predicate::str::contains("origami"))
        .stdout(predicate::str::contains("--help"));
}

#[test]
fn test_unknown_format_is_usage_error() {
    origami()
        .args(["--format", "xml", "list"])
        .assert()
        .code(2);
}

// ============================================================================
// Ingest
// ============================================================================

#[test]
fn test_ingest_prints_compaction_instructions() {
    let dir = tempdir().unwrap();
    let transcript = write_transcript(dir.path());

    origami()
        .current_dir(dir.path())
        .arg("ingest")
        .arg(&transcript)
        .assert()
        .success()
        .stdout(predicate::str::contains("CONTEXT FOLDING ACTIVE - 4 sections tracked"))
        .stdout(predicate::str::contains(
            "New folds this compaction: F001, F002, F003, F004",
        ))
        .stdout(predicate::str::contains("origami summarize"));

    assert!(dir.path().join(".origami/state.json").exists());
    assert!(dir.path().join(".origami/folds/fold-004.md").exists());
}

#[test]
fn test_ingest_twice_adds_nothing() {
    let dir = tempdir().unwrap();
    ingest_fixture(dir.path());
    let transcript = dir.path().join("transcript.jsonl");

    let output = origami()
        .current_dir(dir.path())
        .args(["--format", "json", "ingest"])
        .arg(&transcript)
        .output()
        .unwrap();
    assert!(output.status.success());

    let json = stdout_json(&output);
    assert_eq!(json["fold_count"], 4);
    assert_eq!(json["new_folds"].as_array().unwrap().len(), 0);
}

#[test]
fn test_ingest_reads_hook_input_from_stdin() {
    let dir = tempdir().unwrap();
    let transcript = write_transcript(dir.path());
    let hook = serde_json::json!({
        "transcript_path": transcript,
        "session_id": "session-42",
    });

    origami()
        .current_dir(dir.path())
        .args(["--format", "json", "ingest"])
        .write_stdin(hook.to_string())
        .assert()
        .success()
        .stdout(predicate::str::contains("\"fold_count\": 4"));

    let state = fs::read_to_string(dir.path().join(".origami/state.json")).unwrap();
    assert!(state.contains("session-42"));
}

#[test]
fn test_ingest_without_input_is_usage_error() {
    let dir = tempdir().unwrap();
    origami()
        .current_dir(dir.path())
        .arg("ingest")
        .write_stdin("")
        .assert()
        .code(2);
}

#[test]
fn test_ingest_missing_transcript_fails() {
    let dir = tempdir().unwrap();
    origami()
        .current_dir(dir.path())
        .args(["ingest", "missing.jsonl"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("read transcript"));
}

#[test]
fn test_ingest_records_format() {
    let dir = tempdir().unwrap();
    let transcript = write_transcript(dir.path());

    origami()
        .current_dir(dir.path())
        .args(["--format", "records", "ingest"])
        .arg(&transcript)
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "H origami=1 records=1 mode=ingest folds=4 new=4",
        ))
        .stdout(predicate::str::contains("F F003 folded turns=11-14"));
}

// ============================================================================
// Restore
// ============================================================================

#[test]
fn test_restore_empty_store_prints_nothing() {
    let dir = tempdir().unwrap();
    origami()
        .current_dir(dir.path())
        .arg("restore")
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let output = origami()
        .current_dir(dir.path())
        .args(["--format", "json", "restore"])
        .output()
        .unwrap();
    assert!(output.status.success());
    assert_eq!(stdout_json(&output)["folds"], serde_json::json!([]));
    assert!(!dir.path().join(".origami").exists());
}

#[test]
fn test_restore_renders_projection() {
    let dir = tempdir().unwrap();
    ingest_fixture(dir.path());

    origami()
        .current_dir(dir.path())
        .arg("restore")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("[CONTEXT FOLDING - 4 sections, "))
        .stdout(predicate::str::contains("[F001 | FOLDED | "))
        .stdout(predicate::str::contains("rel:0.30]"))
        .stdout(predicate::str::contains("origami guide"))
        .stdout(predicate::str::contains("--- FULL DETAIL ---").not());
}

#[test]
fn test_restore_enforces_max_unfolded() {
    let dir = tempdir().unwrap();
    ingest_fixture(dir.path());
    for id in ["F001", "F002", "F003"] {
        origami()
            .current_dir(dir.path())
            .args(["unfold", id])
            .assert()
            .success();
    }

    let output = origami()
        .current_dir(dir.path())
        .args(["--format", "json", "restore", "--max-unfolded", "1"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let json = stdout_json(&output);
    assert_eq!(json["expanded"], serde_json::json!(["F001"]));
    assert_eq!(json["demoted"], serde_json::json!(["F002", "F003"]));
    assert!(json["folds"][0]["detail"].is_string());
    assert!(json["folds"][1].get("detail").is_none());

    // Demotions are persisted
    let listed = origami()
        .current_dir(dir.path())
        .args(["--format", "json", "list"])
        .output()
        .unwrap();
    assert_eq!(stdout_json(&listed)["unfolded"], 1);
}

#[test]
fn test_restore_rejects_bad_budget_fraction() {
    let dir = tempdir().unwrap();
    origami()
        .current_dir(dir.path())
        .args(["--format", "json", "restore", "--budget-fraction", "1.5"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("\"invalid_value\""));
}

#[test]
fn test_restore_tiny_budget_demotes_everything() {
    let dir = tempdir().unwrap();
    ingest_fixture(dir.path());
    origami()
        .current_dir(dir.path())
        .args(["unfold", "F002"])
        .assert()
        .success();

    origami()
        .current_dir(dir.path())
        .args(["restore", "--context-window", "10", "--budget-fraction", "0.1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--- FULL DETAIL ---").not());
}

// ============================================================================
// Store selection, config and logging
// ============================================================================

#[test]
fn test_explicit_store_path() {
    let dir = tempdir().unwrap();
    let transcript = write_transcript(dir.path());

    origami()
        .current_dir(dir.path())
        .args(["--store", "custom-store", "ingest"])
        .arg(&transcript)
        .assert()
        .success();

    assert!(dir.path().join("custom-store/state.json").exists());
    assert!(!dir.path().join(".origami").exists());
}

#[test]
fn test_config_reflects_file_and_env() {
    let dir = tempdir().unwrap();
    fs::create_dir_all(dir.path().join(".origami")).unwrap();
    fs::write(
        dir.path().join(".origami/config.toml"),
        "[budget]\nmax_unfolded = 5\n",
    )
    .unwrap();

    let output = origami()
        .current_dir(dir.path())
        .env("ORIGAMI_BUDGET_FRACTION", "0.1")
        .args(["--format", "json", "config"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let json = stdout_json(&output);
    assert_eq!(json["budget"]["max_unfolded"], 5);
    assert_eq!(json["budget"]["budget_fraction"], 0.1);
    assert_eq!(json["relevance"]["oracle"], "neutral");

    origami()
        .current_dir(dir.path())
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("[budget]"))
        .stdout(predicate::str::contains("max_unfolded = 5"));
}

#[test]
fn test_log_level_debug_reports_phases() {
    let dir = tempdir().unwrap();
    origami()
        .current_dir(dir.path())
        .args(["--log-level", "debug", "list"])
        .assert()
        .success()
        .stderr(predicate::str::contains("parse_args"));
}

#[test]
fn test_verbose_reports_phase_timings() {
    let dir = tempdir().unwrap();
    let transcript = write_transcript(dir.path());
    origami()
        .current_dir(dir.path())
        .args(["--verbose", "ingest"])
        .arg(&transcript)
        .assert()
        .success()
        .stderr(predicate::str::contains("section_transcript"))
        .stderr(predicate::str::contains("elapsed"));
}

#[test]
fn test_json_parse_error_uses_envelope() {
    origami()
        .args(["--format=json", "restore", "--max-unfolded", "many"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("\"usage_error\""));
}

#[test]
fn test_default_logging_is_quiet() {
    let dir = tempdir().unwrap();
    origami()
        .current_dir(dir.path())
        .arg("list")
        .assert()
        .success()
        .stderr(predicate::str::is_empty());
}

#[test]
fn test_corrupt_store_is_data_error() {
    let dir = tempdir().unwrap();
    ingest_fixture(dir.path());
    let state = dir.path().join(".origami/state.json");
    let mut json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&state).unwrap()).unwrap();
    json["folds"][1]["id"] = serde_json::json!(1);
    fs::write(&state, json.to_string()).unwrap();

    origami()
        .current_dir(dir.path())
        .args(["--format", "json", "list"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("\"invalid_store\""));
}
