//! Smoke tests for the signup-probe binary
//!
//! Every run here uses the simulated driver, so no browser or network is
//! needed.

#![allow(deprecated)] // Command::cargo_bin
#![allow(clippy::expect_used, clippy::unwrap_used)]

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn signup_probe() -> Command {
    let mut cmd = Command::cargo_bin("signup-probe").expect("signup-probe binary should exist");
    for var in ["BASE_URL", "BROWSER", "HEADLESS", "CI", "DEFAULT_TIMEOUT", "RUST_LOG"] {
        cmd.env_remove(var);
    }
    cmd
}

fn simulated_run(dir: &TempDir) -> Command {
    let mut cmd = signup_probe();
    cmd.args(["test", "--driver", "simulated", "--color", "never"])
        .arg("-o")
        .arg(dir.path().join("results"))
        .arg("--screenshots")
        .arg(dir.path().join("shots"));
    cmd
}

// ============================================================================
// Basic CLI Tests
// ============================================================================

#[test]
fn test_version_flag() {
    signup_probe()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("0.4.0"));
}

#[test]
fn test_help_flag() {
    signup_probe()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("test"))
        .stdout(predicate::str::contains("list"));
}

#[test]
fn test_no_args_fails() {
    signup_probe().assert().failure();
}

#[test]
fn test_test_subcommand_help() {
    signup_probe()
        .args(["test", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--marker"))
        .stdout(predicate::str::contains("--fail-fast"));
}

// ============================================================================
// list
// ============================================================================

#[test]
fn test_list_catalog() {
    signup_probe()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("test_valid_signup_all_fields"))
        .stdout(predicate::str::contains("test_invalid_email_format[invalidemail]"))
        .stdout(predicate::str::contains("17 cases"));
}

#[test]
fn test_list_json_by_marker() {
    let output = signup_probe()
        .args(["list", "--json", "-m", "mobile"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let cases: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(cases.as_array().unwrap().len(), 2);
}

// ============================================================================
// test
// ============================================================================

#[test]
fn test_smoke_run_writes_reports() {
    let dir = TempDir::new().unwrap();
    simulated_run(&dir)
        .args(["-m", "smoke"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 passed, 0 failed, 0 skipped"));

    let results = dir.path().join("results");
    for file in ["report.html", "report.json", "report.xml"] {
        assert!(results.join(file).is_file(), "missing {file}");
    }
    let html = fs::read_to_string(results.join("report.html")).unwrap();
    assert!(html.contains("SwiftAssess Signup Automation Test Report"));
}

#[test]
fn test_regression_run_json() {
    let dir = TempDir::new().unwrap();
    let output = simulated_run(&dir)
        .args(["-m", "regression", "-k", "account_name", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["summary"]["passed"], 3);
    assert_eq!(report["summary"]["failed"], 0);
}

#[test]
fn test_skipped_case_reported() {
    let dir = TempDir::new().unwrap();
    simulated_run(&dir)
        .args(["-m", "security"])
        .assert()
        .success()
        .stdout(predicate::str::contains("0 passed, 0 failed, 1 skipped"));
}

#[test]
fn test_empty_selection_exit_code() {
    let dir = TempDir::new().unwrap();
    simulated_run(&dir)
        .args(["-k", "no_such_case"])
        .assert()
        .code(5)
        .stderr(predicate::str::contains("No cases selected"));
}

#[test]
fn test_bad_timeout_exit_code() {
    let dir = TempDir::new().unwrap();
    simulated_run(&dir)
        .args(["--timeout", "0"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--timeout"));
}

#[test]
fn test_unknown_browser_env() {
    let dir = TempDir::new().unwrap();
    simulated_run(&dir)
        .env("BROWSER", "firefox")
        .args(["-m", "smoke"])
        .assert()
        .code(2);
}
