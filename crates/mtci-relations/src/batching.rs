use async_trait::async_trait;
use mtci_core::errors::ModelError;
use mtci_core::model::MrFailure;
use mtci_core::providers::model::Model;
use mtci_core::relation_api::{first_score, sample_size, MetamorphicRelation, MrResult};
use mtci_core::{within_tolerance, Tolerance};

/// A single-item prediction should match the same item at the head of a batch.
pub struct BatchingInvarianceMR;

#[async_trait]
impl MetamorphicRelation for BatchingInvarianceMR {
    fn name(&self) -> &'static str {
        "batching_invariance"
    }

    fn description(&self) -> &'static str {
        "Single-item predictions should match their batch position"
    }

    async fn run(
        &self,
        model: &dyn Model,
        inputs: &[String],
        max_examples: usize,
        tolerance: &Tolerance,
    ) -> Result<MrResult, ModelError> {
        let n = sample_size(inputs, max_examples);
        if n < 2 {
            return Ok(MrResult::pass("not enough samples"));
        }
        let mut failures = Vec::new();
        for (i, pair) in inputs[..n].windows(2).enumerate() {
            let single = first_score(&model.predict(&pair[..1]).await?)?;
            let batch = first_score(&model.predict(pair).await?)?;
            if !within_tolerance(single, batch, tolerance) {
                failures.push(MrFailure::new(
                    i,
                    pair[0].as_str(),
                    Some(pair[1].clone()),
                    single,
                    batch,
                ));
            }
        }
        Ok(MrResult::from_mismatches(failures))
    }
}
