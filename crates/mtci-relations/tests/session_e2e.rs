//! End-to-end sessions over the built-in registry.

use std::path::Path;

use mtci_core::config::parse_config;
use mtci_core::engine::{run_profile, SessionOptions};
use mtci_core::model::MrStatus;
use mtci_core::state::StatsStore;
use mtci_relations::builtin_registry;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn write_dataset(dir: &Path, lines: &[&str]) -> String {
    let data = dir.join("data.jsonl");
    let body: String = lines.iter().map(|l| format!("{{\"text\": \"{}\"}}\n", l)).collect();
    std::fs::write(&data, body).unwrap();
    data.display().to_string()
}

fn local_config(dataset: &str, mrs: &[&str]) -> String {
    let mrs: String = mrs.iter().map(|m| format!("      - {}\n", m)).collect();
    format!(
        r#"
profiles:
  pr-fast:
    budget_seconds: 30
    max_examples: 3
    retries_on_fail: 1
    fail_on_flake: true
    mrs:
{mrs}dataset:
  path: {dataset}
  jsonl_field: text
model:
  mode: local
  entrypoint: mtci.models.simple.SimpleSentimentModel
"#
    )
}

fn options(dir: &Path) -> SessionOptions {
    SessionOptions {
        profile: "pr-fast".into(),
        out_root: dir.join("mtci_artifacts"),
        state_root: dir.to_path_buf(),
    }
}

#[tokio::test]
async fn test_flaky_and_failing_relations_gate_the_session() {
    let dir = tempfile::tempdir().unwrap();
    let dataset = write_dataset(dir.path(), &["good"]);
    let cfg = parse_config(&local_config(
        &dataset,
        &["mtci.testing_mrs.FailThenPassMR", "mtci.testing_mrs.AlwaysFailMR"],
    ))
    .unwrap();

    let outcome = run_profile(&cfg, &builtin_registry(), &options(dir.path()))
        .await
        .unwrap();

    let statuses: Vec<(&str, MrStatus, u32)> = outcome
        .report
        .results
        .iter()
        .map(|r| (r.name.as_str(), r.status, r.attempts))
        .collect();
    assert_eq!(
        statuses,
        vec![
            ("fail_then_pass", MrStatus::Flaky, 2),
            ("always_fail", MrStatus::Fail, 2),
        ]
    );
    assert_eq!(outcome.exit_code(), 1);
    assert_eq!(outcome.report.flake_summary.total_retries, 2);
    assert_eq!(outcome.report.flake_summary.flaky_count, 1);

    let junit = std::fs::read_to_string(outcome.out_dir.join("junit.xml")).unwrap();
    assert!(junit.contains(r#"tests="2" failures="2" skipped="0""#), "{junit}");
    assert!(outcome
        .out_dir
        .join("failures/fail_then_pass/message.txt")
        .exists());

    let mut store = StatsStore::new(dir.path());
    let stats = store.load().unwrap();
    assert_eq!(stats["fail_then_pass"].flaky_count, 1);
    assert_eq!(stats["always_fail"].fails, 1);
}

#[tokio::test]
async fn test_second_session_is_fresh_and_score_ranked() {
    let dir = tempfile::tempdir().unwrap();
    let dataset = write_dataset(dir.path(), &["good"]);
    let cfg = parse_config(&local_config(
        &dataset,
        &["flake_demo", "always_fail", "whitespace_invariance"],
    ))
    .unwrap();
    let registry = builtin_registry();

    let first = run_profile(&cfg, &registry, &options(dir.path())).await.unwrap();
    let reasons: Vec<String> = first
        .report
        .selected_mrs
        .iter()
        .map(|s| s.reason.to_string())
        .collect();
    assert_eq!(&reasons[..2], &["cold-start smoke MR", "cold-start smoke MR"]);

    let second = run_profile(&cfg, &registry, &options(dir.path())).await.unwrap();
    // with comparable runtimes, recorded failures rank always_fail ahead
    let position = |name: &str| {
        second
            .report
            .selected_mrs
            .iter()
            .position(|s| s.name == name)
            .unwrap()
    };
    assert!(position("always_fail") < position("flake_demo"));
    assert!(second
        .report
        .selected_mrs
        .iter()
        .all(|s| s.reason.to_string() == "score-ranked"));
    // a fresh instance per session: flake_demo fails its first attempt again
    let flake = second
        .report
        .results
        .iter()
        .find(|r| r.name == "flake_demo")
        .unwrap();
    assert_eq!(flake.status, MrStatus::Flaky);
}

#[tokio::test]
async fn test_endpoint_model_session() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/predict"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"scores": [0.9]})))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let dataset = write_dataset(dir.path(), &["good"]);
    let raw = format!(
        r#"
profiles:
  pr-fast:
    budget_seconds: 30
    mrs: [whitespace_invariance, idempotence, serialization_invariance]
dataset:
  path: {dataset}
  jsonl_field: text
model:
  mode: endpoint
  base_url: {}
  timeout_s: 5
"#,
        server.uri()
    );
    let cfg = parse_config(&raw).unwrap();

    let outcome = run_profile(&cfg, &builtin_registry(), &options(dir.path()))
        .await
        .unwrap();
    assert_eq!(outcome.report.results.len(), 3);
    assert!(outcome
        .report
        .results
        .iter()
        .all(|r| r.status == MrStatus::Pass));
    assert_eq!(outcome.exit_code(), 0);
}

#[tokio::test]
async fn test_endpoint_only_relations_dropped_for_local_model() {
    let dir = tempfile::tempdir().unwrap();
    let dataset = write_dataset(dir.path(), &["good", "bad movie"]);
    let cfg = parse_config(&local_config(
        &dataset,
        &[
            "mtci.mrs.whitespace.WhitespaceInvarianceMR",
            "mtci.mrs.idempotence.IdempotenceMR",
            "mtci.mrs.batching:BatchingInvarianceMR",
        ],
    ))
    .unwrap();

    let outcome = run_profile(&cfg, &builtin_registry(), &options(dir.path()))
        .await
        .unwrap();
    let names: Vec<&str> = outcome.report.results.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["whitespace_invariance", "batching_invariance"]);
    assert!(outcome.passed);
}
