pub mod console;
pub mod json;
pub mod junit;

use crate::model::{FlakeSummary, MrRunResult, MrStatus, SelectionItem};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What the runner hands back: the plan it was given, one result per plan
/// item, and the flake counters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunArtifacts {
    pub selection: Vec<SelectionItem>,
    pub results: Vec<MrRunResult>,
    pub flake_summary: FlakeSummary,
}

impl RunArtifacts {
    pub fn counts(&self) -> StatusCounts {
        StatusCounts::from_results(&self.results)
    }

    /// Gate: any `fail`, or any `flaky` when `fail_on_flake` is set.
    pub fn passed(&self) -> bool {
        let counts = self.counts();
        if counts.fail > 0 {
            return false;
        }
        !(self.flake_summary.fail_on_flake && counts.flaky > 0)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub pass: usize,
    pub fail: usize,
    pub flaky: usize,
    pub skipped: usize,
}

impl StatusCounts {
    pub fn from_results(results: &[MrRunResult]) -> Self {
        let mut c = Self::default();
        for r in results {
            match r.status {
                MrStatus::Pass => c.pass += 1,
                MrStatus::Fail => c.fail += 1,
                MrStatus::Flaky => c.flaky += 1,
                MrStatus::Skipped => c.skipped += 1,
            }
        }
        c
    }

    pub fn total(&self) -> usize {
        self.pass + self.fail + self.flaky + self.skipped
    }
}

/// The `report.json` document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionReport {
    pub session_id: String,
    pub timestamp: DateTime<Utc>,
    pub profile: String,
    pub budget_seconds: f64,
    pub max_examples: usize,
    pub selected_mrs: Vec<SelectionItem>,
    pub results: Vec<MrRunResult>,
    pub flake_summary: FlakeSummary,
}

impl SessionReport {
    pub fn new(
        profile: impl Into<String>,
        budget_seconds: f64,
        max_examples: usize,
        artifacts: RunArtifacts,
    ) -> Self {
        Self {
            session_id: uuid::Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            profile: profile.into(),
            budget_seconds,
            max_examples,
            selected_mrs: artifacts.selection,
            results: artifacts.results,
            flake_summary: artifacts.flake_summary,
        }
    }
}
