use crate::errors::ReportError;
use crate::model::MrStatus;
use crate::report::SessionReport;
use std::path::Path;

pub const REPORT_FILE: &str = "report.json";
pub const FAILURES_DIR: &str = "failures";

pub fn write_report(report: &SessionReport, out_dir: &Path) -> Result<(), ReportError> {
    std::fs::create_dir_all(out_dir).map_err(|e| ReportError::write(out_dir, e))?;
    let path = out_dir.join(REPORT_FILE);
    let body = serde_json::to_string_pretty(report)?;
    std::fs::write(&path, body).map_err(|e| ReportError::write(&path, e))?;
    Ok(())
}

/// `failures/<name>/message.txt` and `failures/<name>/failures.json` for
/// every failed or flaky relation.
pub fn write_failure_artifacts(report: &SessionReport, out_dir: &Path) -> Result<(), ReportError> {
    for result in &report.results {
        if !matches!(result.status, MrStatus::Fail | MrStatus::Flaky) {
            continue;
        }
        let dir = out_dir.join(FAILURES_DIR).join(&result.name);
        std::fs::create_dir_all(&dir).map_err(|e| ReportError::write(&dir, e))?;

        let message = dir.join("message.txt");
        std::fs::write(&message, &result.message).map_err(|e| ReportError::write(&message, e))?;

        let failures = dir.join("failures.json");
        let body = serde_json::to_string_pretty(&result.failures)?;
        std::fs::write(&failures, body).map_err(|e| ReportError::write(&failures, e))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FlakeSummary, MrFailure, MrRunResult};
    use crate::report::RunArtifacts;

    fn report() -> SessionReport {
        let results = vec![
            MrRunResult {
                name: "always_fail".into(),
                status: MrStatus::Fail,
                attempts: 2,
                runtime_s: 0.01,
                message: "1 mismatches".into(),
                failures: vec![MrFailure::new(0, "good", Some("x".into()), 0.9, 0.1)],
            },
            MrRunResult {
                name: "steady".into(),
                status: MrStatus::Pass,
                attempts: 1,
                runtime_s: 0.01,
                message: "pass".into(),
                failures: Vec::new(),
            },
        ];
        SessionReport::new(
            "pr-fast",
            5.0,
            3,
            RunArtifacts {
                selection: Vec::new(),
                results,
                flake_summary: FlakeSummary::default(),
            },
        )
    }

    #[test]
    fn test_write_report_and_failures() {
        let dir = tempfile::tempdir().unwrap();
        let report = report();
        write_report(&report, dir.path()).unwrap();
        write_failure_artifacts(&report, dir.path()).unwrap();

        let raw = std::fs::read_to_string(dir.path().join(REPORT_FILE)).unwrap();
        let back: SessionReport = serde_json::from_str(&raw).unwrap();
        assert_eq!(back.profile, "pr-fast");
        assert_eq!(back.results.len(), 2);

        let fail_dir = dir.path().join("failures/always_fail");
        assert_eq!(
            std::fs::read_to_string(fail_dir.join("message.txt")).unwrap(),
            "1 mismatches"
        );
        let failures: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(fail_dir.join("failures.json")).unwrap())
                .unwrap();
        assert_eq!(failures[0]["original"], "good");
        assert!(!dir.path().join("failures/steady").exists());
    }
}
