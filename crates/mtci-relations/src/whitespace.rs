use async_trait::async_trait;
use mtci_core::errors::ModelError;
use mtci_core::model::MrFailure;
use mtci_core::providers::model::Model;
use mtci_core::relation_api::{first_score, sample_size, MetamorphicRelation, MrResult};
use mtci_core::{within_tolerance, Tolerance};

/// Padding and doubled spaces should not change the score.
pub struct WhitespaceInvarianceMR;

impl WhitespaceInvarianceMR {
    pub fn transform(text: &str) -> String {
        format!("\n  {}  \n", text.replace(' ', "  "))
    }
}

#[async_trait]
impl MetamorphicRelation for WhitespaceInvarianceMR {
    fn name(&self) -> &'static str {
        "whitespace_invariance"
    }

    fn description(&self) -> &'static str {
        "Extra whitespace should not change output"
    }

    async fn run(
        &self,
        model: &dyn Model,
        inputs: &[String],
        max_examples: usize,
        tolerance: &Tolerance,
    ) -> Result<MrResult, ModelError> {
        let mut failures = Vec::new();
        for (i, original) in inputs.iter().take(sample_size(inputs, max_examples)).enumerate() {
            let transformed = Self::transform(original);
            let a = first_score(&model.predict(std::slice::from_ref(original)).await?)?;
            let b = first_score(&model.predict(std::slice::from_ref(&transformed)).await?)?;
            if !within_tolerance(a, b, tolerance) {
                failures.push(MrFailure::new(i, original.as_str(), Some(transformed), a, b));
            }
        }
        Ok(MrResult::from_mismatches(failures))
    }
}
