//! E2E tests for the `qhive` binary: `run`, `select` and `config`.
//!
//! Each test runs the binary in an isolated temp directory so no stray
//! `qhive.toml` is picked up.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::path::Path;
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// Test Harness
// ---------------------------------------------------------------------------

fn qhive_cmd(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("qhive").expect("qhive binary must exist");
    cmd.current_dir(dir);
    cmd.env("QHIVE_LOG", "error");
    cmd.env_remove("QHIVE_FORMAT");
    cmd
}

fn json_stdout(dir: &Path, args: &[&str]) -> Value {
    let output = qhive_cmd(dir)
        .args(args)
        .args(["--format", "json"])
        .output()
        .expect("qhive should not crash");
    assert!(
        output.status.success(),
        "qhive {args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("stdout should be JSON")
}

fn indices(report: &Value) -> Vec<u64> {
    report["selection"]["indices"]
        .as_array()
        .expect("indices array")
        .iter()
        .map(|v| v.as_u64().expect("index"))
        .collect()
}

/// Two equally relevant duplicates plus one distinct candidate.
const DUPLICATES_JSON: &str = r#"{
  "relevance": [0.9, 0.9, 0.4],
  "freshness": [0.5, 0.5, 0.5],
  "embeddings": [[1.0, 0.0], [1.0, 0.0], [0.0, 1.0]],
  "intents": [[1.0, 0.0], [1.0, 0.0], [0.0, 1.0]]
}"#;

const DIVERSITY_TOML: &str = "[selection]\nk = 2\nlambda = 5.0\nmu = 0.1\n";

// ---------------------------------------------------------------------------
// run
// ---------------------------------------------------------------------------

#[test]
fn run_reports_selection_and_metrics() {
    let dir = TempDir::new().unwrap();
    let report = json_stdout(dir.path(), &["run"]);

    assert_eq!(report["seed"], 42);
    assert_eq!(report["candidates"], 12);
    assert_eq!(report["k"], 10);

    let picked = indices(&report);
    assert!(picked.windows(2).all(|w| w[0] < w[1]));
    assert!(picked.iter().all(|&i| i < 12));

    for metric in ["ndcg_at_k", "intent_coverage", "avg_redundancy"] {
        let value = report["metrics"][metric].as_f64().expect(metric);
        assert!((0.0..=1.0 + 1e-9).contains(&value), "{metric}={value}");
    }
    assert_eq!(report["selection"]["fallback"], false);
}

#[test]
fn run_is_deterministic_per_seed() {
    let dir = TempDir::new().unwrap();
    let first = json_stdout(dir.path(), &["run", "--seed", "7"]);
    let second = json_stdout(dir.path(), &["run", "--seed", "7"]);
    assert_eq!(first, second);
}

#[test]
fn run_with_null_backend_falls_back() {
    let dir = TempDir::new().unwrap();
    let report = json_stdout(dir.path(), &["run", "--use-qaoa", "--backend", "null"]);

    assert_eq!(report["selection"]["fallback"], true);
    assert!(
        report["selection"]["solver"]
            .as_str()
            .unwrap()
            .contains("fallback")
    );
}

#[test]
fn run_with_exhaustive_backend_uses_it() {
    let dir = TempDir::new().unwrap();
    let report = json_stdout(
        dir.path(),
        &["run", "--use-qaoa", "--backend", "exhaustive", "--k", "4"],
    );

    assert_eq!(report["selection"]["fallback"], false);
    assert!(
        report["selection"]["solver"]
            .as_str()
            .unwrap()
            .contains("exhaustive")
    );
}

#[test]
fn run_rejects_k_above_candidate_count() {
    let dir = TempDir::new().unwrap();
    qhive_cmd(dir.path())
        .args(["run", "--candidates", "3"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("E1003"));
}

#[test]
fn run_text_output_is_line_oriented() {
    let dir = TempDir::new().unwrap();
    qhive_cmd(dir.path())
        .args(["run", "--format", "text"])
        .assert()
        .success()
        .stdout(predicate::str::contains("selected="))
        .stdout(predicate::str::contains("ndcg_at_k="));
}

// ---------------------------------------------------------------------------
// select
// ---------------------------------------------------------------------------

#[test]
fn select_keeps_one_of_two_duplicates() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("candidates.json"), DUPLICATES_JSON).unwrap();
    std::fs::write(dir.path().join("qhive.toml"), DIVERSITY_TOML).unwrap();

    let report = json_stdout(dir.path(), &["select", "--input", "candidates.json"]);

    assert_eq!(indices(&report), vec![1, 2]);
    assert_eq!(report["k"], 2);
}

#[test]
fn select_reports_length_mismatch() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("bad.json"),
        r#"{"relevance": [0.5, 0.4], "freshness": [0.1], "embeddings": [[1.0], [1.0]], "intents": [[1.0], [1.0]]}"#,
    )
    .unwrap();

    qhive_cmd(dir.path())
        .args(["select", "--input", "bad.json", "--k", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("E1001"));
}

#[test]
fn select_missing_file_fails() {
    let dir = TempDir::new().unwrap();
    qhive_cmd(dir.path())
        .args(["select", "--input", "nope.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read"));
}

// ---------------------------------------------------------------------------
// config
// ---------------------------------------------------------------------------

#[test]
fn config_prints_defaults_as_toml() {
    let dir = TempDir::new().unwrap();
    qhive_cmd(dir.path())
        .args(["config", "--format", "text"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[selection]"))
        .stdout(predicate::str::contains("k = 10"))
        .stdout(predicate::str::contains("[backend]"));
}

#[test]
fn config_applies_flag_overrides() {
    let dir = TempDir::new().unwrap();
    let config = json_stdout(
        dir.path(),
        &["config", "--k", "3", "--use-qaoa", "--backend", "anneal"],
    );

    assert_eq!(config["selection"]["k"], 3);
    assert_eq!(config["selection"]["use_qaoa"], true);
    assert_eq!(config["backend"]["kind"], "anneal");
}

#[test]
fn config_file_aliases_are_accepted() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("qhive.toml"),
        "[selection]\nK = 6\nlambda_ = 0.8\n",
    )
    .unwrap();

    let config = json_stdout(dir.path(), &["config"]);

    assert_eq!(config["selection"]["k"], 6);
    assert_eq!(config["selection"]["lambda"], 0.8);
}

#[test]
fn unknown_config_key_is_rejected() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("qhive.toml"), "[selection]\nbeta = 1.0\n").unwrap();

    qhive_cmd(dir.path())
        .args(["config"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("E2002"));
}
