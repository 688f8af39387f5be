use async_trait::async_trait;
use mtci_core::errors::ModelError;
use mtci_core::model::MrFailure;
use mtci_core::providers::model::Model;
use mtci_core::relation_api::{sample_size, MetamorphicRelation, MrResult};
use mtci_core::{within_tolerance, Tolerance};

/// The same batch sent twice should score the same.
pub struct IdempotenceMR;

#[async_trait]
impl MetamorphicRelation for IdempotenceMR {
    fn name(&self) -> &'static str {
        "idempotence"
    }

    fn description(&self) -> &'static str {
        "Same request should yield same response"
    }

    fn requires_endpoint(&self) -> bool {
        true
    }

    async fn run(
        &self,
        model: &dyn Model,
        inputs: &[String],
        max_examples: usize,
        tolerance: &Tolerance,
    ) -> Result<MrResult, ModelError> {
        let n = sample_size(inputs, max_examples);
        if n == 0 {
            return Ok(MrResult::pass("no samples"));
        }
        let batch = &inputs[..n];
        let first = model.predict(batch).await?;
        let second = model.predict(batch).await?;

        let failures = first
            .iter()
            .zip(&second)
            .enumerate()
            .filter(|(_, (a, b))| !within_tolerance(**a, **b, tolerance))
            .map(|(i, (a, b))| MrFailure::new(i, batch[i].as_str(), Some(batch[i].clone()), *a, *b))
            .collect();
        Ok(MrResult::from_mismatches(failures))
    }
}
