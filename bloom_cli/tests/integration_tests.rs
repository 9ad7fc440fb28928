//! Integration tests for the bloom binary.
//!
//! These tests verify end-to-end behavior including:
//! - Day record logging and display
//! - Cycle and pregnancy configuration
//! - Mode switching with reminder re-registration
//! - CSV export

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Helper to create a test data directory
fn setup_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Helper to get the path to the CLI binary
fn cli() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("bloom"))
}

#[test]
fn test_cli_help() {
    cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Personal health signal tracker"));
}

#[test]
fn test_log_then_show_roundtrip() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    cli()
        .args(["log", "--date", "2024-03-10", "--mood", "3", "--weight", "61.4"])
        .args(["--symptom", "cramps:2", "--note", "long walk"])
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Logged record for 2024-03-10"));

    cli()
        .args(["show", "--date", "2024-03-10"])
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Mood: 3/4"))
        .stdout(predicate::str::contains("cramps"))
        .stdout(predicate::str::contains("long walk"));
}

#[test]
fn test_log_replaces_record_for_date() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    cli()
        .args(["log", "--date", "2024-03-10", "--mood", "1"])
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success();

    // Second log for the same date replaces the whole record
    cli()
        .args(["log", "--date", "2024-03-10", "--weight", "60.0"])
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success();

    cli()
        .args(["show", "--date", "2024-03-10"])
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Weight: 60"))
        .stdout(predicate::str::contains("Mood").not());
}

#[test]
fn test_cycle_configuration_and_summary() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    cli()
        .args(["cycle", "--set-start", "2024-01-01", "--length", "28"])
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Cycle configuration updated"))
        .stdout(predicate::str::contains("Next period expected"));
}

#[test]
fn test_cycle_without_start_date_prompts_for_it() {
    let temp_dir = setup_test_dir();

    cli()
        .arg("cycle")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("No period start recorded"));
}

#[test]
fn test_pregnancy_summary_after_setting_start() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    cli()
        .args(["pregnancy", "--set-start", "2024-01-01"])
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Pregnancy start date recorded"))
        .stdout(predicate::str::contains("Estimated due date: 2024-10-07"));
}

#[test]
fn test_mode_switch_lists_new_mode_reminders() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    cli()
        .args(["mode", "pregnancy"])
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Active mode: Pregnancy"))
        .stdout(predicate::str::contains("pregnancy_vitamin"))
        .stdout(predicate::str::contains("cycle_daily_log").not());

    // The switch persists: reminders now lists pregnancy templates
    cli()
        .arg("reminders")
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Reminders for Pregnancy"))
        .stdout(predicate::str::contains("Prenatal vitamin"));
}

#[test]
fn test_unknown_mode_falls_back_to_cycle_tracking() {
    let temp_dir = setup_test_dir();

    cli()
        .args(["mode", "something_else"])
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Active mode: CycleTracking"));
}

#[test]
fn test_export_creates_csv() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();
    let csv_path = temp_dir.path().join("export.csv");

    cli()
        .args(["log", "--date", "2024-03-10", "--mood", "2"])
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success();

    cli()
        .arg("export")
        .arg(&csv_path)
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported 1 day records"));

    let contents = fs::read_to_string(&csv_path).expect("Failed to read CSV");
    assert!(contents.contains("2024-03-10"));
}
