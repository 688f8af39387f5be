use crate::attempts::{classify_attempts, should_stop_retries, AttemptRow, FailureClass};
use crate::config::Profile;
use crate::errors::StateError;
use crate::model::{FlakeSummary, MrRunResult, MrStatus, SelectionItem};
use crate::providers::model::Model;
use crate::relation_api::{MetamorphicRelation, MrResult};
use crate::report::RunArtifacts;
use crate::state::StatsStore;
use crate::tolerance::Tolerance;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Message on relations that never started because the budget ran out.
pub const BUDGET_EXCEEDED: &str = "budget exceeded";

#[derive(Debug, Clone, PartialEq)]
pub struct RunPolicy {
    pub retries_on_fail: u32,
    pub max_examples: usize,
    pub tolerance: Tolerance,
    pub budget_seconds: f64,
    pub fail_on_flake: bool,
}

impl Default for RunPolicy {
    fn default() -> Self {
        Self {
            retries_on_fail: 1,
            max_examples: 20,
            tolerance: Tolerance::default(),
            budget_seconds: 60.0,
            fail_on_flake: true,
        }
    }
}

impl RunPolicy {
    pub fn from_profile(profile: &Profile) -> Self {
        Self {
            retries_on_fail: profile.retries_on_fail,
            max_examples: profile.max_examples,
            tolerance: profile.tolerance,
            budget_seconds: profile.budget_seconds,
            fail_on_flake: profile.fail_on_flake,
        }
    }
}

/// Sequential executor for a selection plan.
pub struct Runner {
    pub model: Arc<dyn Model>,
    pub relations: Vec<Arc<dyn MetamorphicRelation>>,
    pub policy: RunPolicy,
}

impl Runner {
    /// Run `plan` in order under one wall-clock budget.
    ///
    /// The budget is checked only between relations; a relation that starts
    /// in time runs to completion. Stats are updated per finished relation and
    /// saved once at the end, so an `Err` here means persistence failed.
    pub async fn run_suite(
        &self,
        plan: &[SelectionItem],
        inputs: &[String],
        store: &mut StatsStore,
    ) -> Result<RunArtifacts, StateError> {
        let by_name: HashMap<&str, &dyn MetamorphicRelation> = self
            .relations
            .iter()
            .map(|r| (r.name(), r.as_ref()))
            .collect();

        let started = Instant::now();
        let mut results = Vec::with_capacity(plan.len());
        let mut total_retries = 0u32;

        for item in plan {
            let elapsed = started.elapsed().as_secs_f64();
            if elapsed >= self.policy.budget_seconds {
                warn!(relation = %item.name, elapsed_s = elapsed, "budget exceeded, skipping");
                results.push(MrRunResult::skipped(&item.name, BUDGET_EXCEEDED));
                continue;
            }

            let Some(relation) = by_name.get(item.name.as_str()) else {
                warn!(relation = %item.name, "planned relation is not loaded, skipping");
                results.push(MrRunResult::skipped(&item.name, "relation not loaded"));
                continue;
            };

            let (result, retries) = self.run_relation_with_policy(*relation, inputs).await;
            total_retries += retries;
            store.record_outcome(&result.name, result.status, result.runtime_s);
            info!(
                relation = %result.name,
                status = %result.status,
                attempts = result.attempts,
                runtime_s = result.runtime_s,
                "relation finished"
            );
            results.push(result);
        }

        store.save()?;

        let flaky_count = results
            .iter()
            .filter(|r| r.status == MrStatus::Flaky)
            .count() as u32;

        Ok(RunArtifacts {
            selection: plan.to_vec(),
            results,
            flake_summary: FlakeSummary {
                total_retries,
                flaky_count,
                fail_on_flake: self.policy.fail_on_flake,
            },
        })
    }

    /// Up to `retries_on_fail + 1` attempts, stopping at the first pass.
    /// Returns the result and the number of retries spent.
    async fn run_relation_with_policy(
        &self,
        relation: &dyn MetamorphicRelation,
        inputs: &[String],
    ) -> (MrRunResult, u32) {
        let max_attempts = self.policy.retries_on_fail.saturating_add(1);
        let mut attempts: Vec<AttemptRow> = Vec::new();
        let mut last: Option<MrResult> = None;
        let mut retries = 0;

        for i in 0..max_attempts {
            let (row, outcome) = self.run_attempt(relation, inputs, i + 1).await;
            let stop = should_stop_retries(&row);
            if !row.passed && i + 1 < max_attempts {
                retries += 1;
            }
            attempts.push(row);
            last = Some(outcome);
            if stop {
                break;
            }
        }

        let class = classify_attempts(&attempts);
        let runtime_s = attempts.last().map(|a| a.duration_s).unwrap_or(0.0);
        let outcome = last.unwrap_or_else(|| MrResult::fail("no attempts made", Vec::new()));
        if class == FailureClass::Flaky {
            debug!(relation = relation.name(), attempts = attempts.len(), "passed on retry");
        }

        let result = MrRunResult {
            name: relation.name().to_string(),
            status: class.status(),
            attempts: attempts.len() as u32,
            runtime_s,
            message: outcome.message,
            failures: outcome.failures,
        };
        (result, retries)
    }

    async fn run_attempt(
        &self,
        relation: &dyn MetamorphicRelation,
        inputs: &[String],
        attempt_no: u32,
    ) -> (AttemptRow, MrResult) {
        let t = Instant::now();
        let outcome = relation
            .run(
                self.model.as_ref(),
                inputs,
                self.policy.max_examples,
                &self.policy.tolerance,
            )
            .await;
        let duration_s = t.elapsed().as_secs_f64();

        let (outcome, model_error) = match outcome {
            Ok(r) => (r, false),
            Err(e) => {
                warn!(relation = relation.name(), attempt = attempt_no, error = %e, "model invocation failed");
                (
                    MrResult::fail(format!("model invocation failed: {}", e), Vec::new()),
                    true,
                )
            }
        };
        debug!(
            relation = relation.name(),
            attempt = attempt_no,
            passed = outcome.passed,
            duration_s,
            "attempt finished"
        );

        let row = AttemptRow {
            attempt_no,
            passed: outcome.passed,
            message: outcome.message.clone(),
            duration_s,
            model_error,
        };
        (row, outcome)
    }
}
