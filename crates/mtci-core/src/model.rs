//! Data model shared by the selector, the runner and the report writers.

use serde::{Deserialize, Serialize};

/// Terminal status of one relation within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MrStatus {
    Pass,
    Fail,
    Flaky,
    Skipped,
}

impl MrStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pass => "pass",
            Self::Fail => "fail",
            Self::Flaky => "flaky",
            Self::Skipped => "skipped",
        }
    }
}

impl std::fmt::Display for MrStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One mismatching example within a single attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MrFailure {
    pub index: usize,
    pub original: String,
    /// `None` for relations without an input transform.
    pub transformed: Option<String>,
    pub output_original: f64,
    pub output_transformed: f64,
    pub diff: f64,
}

impl MrFailure {
    /// Build a failure record; `diff` is `|output_original - output_transformed|`.
    pub fn new(
        index: usize,
        original: impl Into<String>,
        transformed: Option<String>,
        output_original: f64,
        output_transformed: f64,
    ) -> Self {
        Self {
            index,
            original: original.into(),
            transformed,
            output_original,
            output_transformed,
            diff: (output_original - output_transformed).abs(),
        }
    }
}

/// Outcome of one relation after retries, as handed to the report writers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MrRunResult {
    pub name: String,
    pub status: MrStatus,
    pub attempts: u32,
    /// Duration of the last attempt made.
    pub runtime_s: f64,
    pub message: String,
    pub failures: Vec<MrFailure>,
}

impl MrRunResult {
    pub fn skipped(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: MrStatus::Skipped,
            attempts: 0,
            runtime_s: 0.0,
            message: message.into(),
            failures: Vec::new(),
        }
    }
}

/// Why the selector picked an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectionReason {
    #[serde(rename = "cold-start smoke MR")]
    ColdStartSmoke,
    #[serde(rename = "score-ranked")]
    ScoreRanked,
    #[serde(rename = "budget fallback")]
    BudgetFallback,
}

impl SelectionReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ColdStartSmoke => "cold-start smoke MR",
            Self::ScoreRanked => "score-ranked",
            Self::BudgetFallback => "budget fallback",
        }
    }
}

impl std::fmt::Display for SelectionReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of the selection plan, in run order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionItem {
    pub name: String,
    pub score: f64,
    #[serde(rename = "predicted_runtime_s")]
    pub predicted_runtime_seconds: f64,
    pub reason: SelectionReason,
}

/// Session-wide retry/flake counters plus the gating policy in effect.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlakeSummary {
    pub total_retries: u32,
    pub flaky_count: u32,
    pub fail_on_flake: bool,
}
