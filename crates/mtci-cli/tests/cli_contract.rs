#![allow(deprecated)]
//! Exit-code and output contract of the `mtci` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn write_project(dir: &Path, mrs: &[&str]) {
    fs::write(dir.join("data.jsonl"), "{\"text\": \"good\"}\n").unwrap();
    let mrs: String = mrs.iter().map(|m| format!("      - {}\n", m)).collect();
    let cfg = format!(
        r#"profiles:
  pr-fast:
    budget_seconds: 30
    max_examples: 3
    retries_on_fail: 1
    fail_on_flake: true
    mrs:
{mrs}dataset:
  path: data.jsonl
  jsonl_field: text
model:
  mode: local
  entrypoint: mtci.models.simple.SimpleSentimentModel
"#
    );
    fs::write(dir.join("mtci.yml"), cfg).unwrap();
}

fn mtci(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("mtci").unwrap();
    cmd.current_dir(dir).env("RUST_LOG", "warn");
    cmd
}

#[test]
fn test_run_missing_config_exits_2() {
    let dir = tempdir().unwrap();
    mtci(dir.path())
        .args(["run", "--config", "nope.yml"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Config not found"));
}

#[test]
fn test_run_invalid_config_exits_2() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("mtci.yml"), "profiles: {}\n").unwrap();
    mtci(dir.path())
        .arg("run")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Config validation failed:"));
}

#[test]
fn test_run_unknown_profile_exits_2() {
    let dir = tempdir().unwrap();
    write_project(dir.path(), &["whitespace_invariance"]);
    mtci(dir.path())
        .args(["run", "--profile", "nightly"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Profile not found: nightly"));
}

#[test]
fn test_run_unknown_relation_exits_2() {
    let dir = tempdir().unwrap();
    write_project(dir.path(), &["my.mrs.Missing"]);
    mtci(dir.path())
        .arg("run")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("unknown metamorphic relation"));
}

#[test]
fn test_run_flaky_and_failing_exits_1() {
    let dir = tempdir().unwrap();
    write_project(
        dir.path(),
        &["mtci.testing_mrs.FailThenPassMR", "mtci.testing_mrs.AlwaysFailMR"],
    );
    mtci(dir.path())
        .arg("run")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Artifacts: mtci_artifacts/pr-fast-"));

    assert!(dir.path().join(".mtci/state.json").exists());
    let runs: Vec<_> = fs::read_dir(dir.path().join("mtci_artifacts"))
        .unwrap()
        .collect();
    assert_eq!(runs.len(), 1);
}

#[test]
fn test_run_passing_exits_0() {
    let dir = tempdir().unwrap();
    write_project(
        dir.path(),
        &["whitespace_invariance", "mtci.mrs.batching.BatchingInvarianceMR"],
    );
    mtci(dir.path())
        .args(["run", "--out", "out"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Artifacts: out/pr-fast-"));
}

#[test]
fn test_stats_after_run() {
    let dir = tempdir().unwrap();
    write_project(dir.path(), &["always_fail"]);
    mtci(dir.path()).arg("run").assert().code(1);

    let out = mtci(dir.path())
        .args(["stats", "--format", "json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let v: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(v["always_fail"]["runs"], 1);
    assert_eq!(v["always_fail"]["fails"], 1);

    mtci(dir.path())
        .arg("stats")
        .assert()
        .success()
        .stdout(predicate::str::contains("always_fail"));
}

#[test]
fn test_stats_corrupt_state_exits_3() {
    let dir = tempdir().unwrap();
    fs::create_dir_all(dir.path().join(".mtci")).unwrap();
    fs::write(dir.path().join(".mtci/state.json"), "{\"mrs\": [1, 2").unwrap();
    mtci(dir.path())
        .arg("stats")
        .assert()
        .code(3)
        .stderr(predicate::str::contains("corrupt"));
}

#[test]
fn test_run_corrupt_state_exits_3() {
    let dir = tempdir().unwrap();
    write_project(dir.path(), &["whitespace_invariance"]);
    fs::create_dir_all(dir.path().join(".mtci")).unwrap();
    fs::write(dir.path().join(".mtci/state.json"), "not json").unwrap();
    mtci(dir.path()).arg("run").assert().code(3);
}

#[test]
fn test_doctor_local_config() {
    let dir = tempdir().unwrap();
    write_project(dir.path(), &["whitespace_invariance"]);
    mtci(dir.path())
        .arg("doctor")
        .assert()
        .success()
        .stdout(predicate::str::contains("Config validation: ok"))
        .stdout(predicate::str::contains("Dataset: ok (1 examples)"));
}

#[test]
fn test_doctor_reports_unknown_relation() {
    let dir = tempdir().unwrap();
    write_project(dir.path(), &["my.mrs.Missing"]);
    mtci(dir.path())
        .arg("doctor")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("profiles.pr-fast.mrs"));
}

#[test]
fn test_mrs_lists_builtins() {
    mtci(Path::new("."))
        .arg("mrs")
        .assert()
        .success()
        .stdout(predicate::str::contains("whitespace_invariance"))
        .stdout(predicate::str::contains("serialization_invariance [endpoint only]"))
        .stdout(predicate::str::contains("locator: mtci.testing_mrs.FailThenPassMR"));
}
