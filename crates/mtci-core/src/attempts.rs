use crate::model::MrStatus;

/// What happened on one attempt of a relation.
#[derive(Debug, Clone, PartialEq)]
pub struct AttemptRow {
    /// 1-based.
    pub attempt_no: u32,
    pub passed: bool,
    pub message: String,
    pub duration_s: f64,
    /// Attempt failed because the model could not be invoked.
    pub model_error: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    DeterministicPass,
    DeterministicFail,
    Flaky, // fail -> pass
    Skipped,
}

impl FailureClass {
    pub fn status(self) -> MrStatus {
        match self {
            Self::DeterministicPass => MrStatus::Pass,
            Self::DeterministicFail => MrStatus::Fail,
            Self::Flaky => MrStatus::Flaky,
            Self::Skipped => MrStatus::Skipped,
        }
    }
}

/// Retries stop at the first passing attempt.
pub fn should_stop_retries(row: &AttemptRow) -> bool {
    row.passed
}

/// Classify an attempt sequence as produced by the retry loop.
///
/// The loop stops at the first pass, so the only shapes are: no attempts
/// (skipped), pass on the first attempt, fails followed by a final pass, or
/// all fails. Model errors count as plain failures.
pub fn classify_attempts(attempts: &[AttemptRow]) -> FailureClass {
    let Some(last) = attempts.last() else {
        return FailureClass::Skipped;
    };

    if !last.passed {
        return FailureClass::DeterministicFail;
    }

    if attempts.len() == 1 {
        FailureClass::DeterministicPass
    } else {
        FailureClass::Flaky
    }
}
