use crate::errors::ModelError;
use crate::model::MrFailure;
use crate::providers::model::Model;
use crate::tolerance::Tolerance;
use async_trait::async_trait;

/// Outcome of a single attempt of a relation.
#[derive(Debug, Clone, PartialEq)]
pub struct MrResult {
    pub passed: bool,
    pub message: String,
    pub failures: Vec<MrFailure>,
}

impl MrResult {
    pub fn pass(message: impl Into<String>) -> Self {
        Self {
            passed: true,
            message: message.into(),
            failures: Vec::new(),
        }
    }

    pub fn fail(message: impl Into<String>, failures: Vec<MrFailure>) -> Self {
        Self {
            passed: false,
            message: message.into(),
            failures,
        }
    }

    /// `"pass"` with no mismatches, `"<k> mismatches"` otherwise.
    pub fn from_mismatches(failures: Vec<MrFailure>) -> Self {
        if failures.is_empty() {
            Self::pass("pass")
        } else {
            Self::fail(format!("{} mismatches", failures.len()), failures)
        }
    }
}

/// A metamorphic relation: a semantics-preserving input change that should
/// leave the model output within tolerance.
///
/// `run` must only look at the first `min(inputs.len(), max_examples)` inputs
/// and must be deterministic for deterministic model outputs. Model errors
/// propagate; the runner counts them as a failed attempt.
#[async_trait]
pub trait MetamorphicRelation: Send + Sync {
    fn name(&self) -> &'static str;

    fn description(&self) -> &'static str {
        ""
    }

    /// Only meaningful against a network-addressable model.
    fn requires_endpoint(&self) -> bool {
        false
    }

    async fn run(
        &self,
        model: &dyn Model,
        inputs: &[String],
        max_examples: usize,
        tolerance: &Tolerance,
    ) -> Result<MrResult, ModelError>;
}

/// Number of inputs a relation may use.
pub fn sample_size(inputs: &[String], max_examples: usize) -> usize {
    inputs.len().min(max_examples)
}

/// First score of a prediction, or an `InvalidResponse` if the model returned none.
pub fn first_score(scores: &[f64]) -> Result<f64, ModelError> {
    scores
        .first()
        .copied()
        .ok_or_else(|| ModelError::InvalidResponse {
            message: "model returned no scores".to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mismatch_message() {
        assert_eq!(MrResult::from_mismatches(Vec::new()), MrResult::pass("pass"));
        let r = MrResult::from_mismatches(vec![
            MrFailure::new(0, "a", None, 0.1, 0.9),
            MrFailure::new(1, "b", None, 0.1, 0.9),
        ]);
        assert!(!r.passed);
        assert_eq!(r.message, "2 mismatches");
    }

    #[test]
    fn test_sample_size_truncates() {
        let inputs = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        assert_eq!(sample_size(&inputs, 2), 2);
        assert_eq!(sample_size(&inputs, 20), 3);
    }

    #[test]
    fn test_first_score_empty() {
        assert!(first_score(&[]).is_err());
        assert_eq!(first_score(&[0.4, 0.2]).unwrap(), 0.4);
    }
}
