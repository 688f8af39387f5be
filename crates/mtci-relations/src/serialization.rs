use async_trait::async_trait;
use mtci_core::errors::ModelError;
use mtci_core::model::MrFailure;
use mtci_core::providers::model::{is_network_backed, Model};
use mtci_core::relation_api::{first_score, sample_size, MetamorphicRelation, MrResult};
use mtci_core::{within_tolerance, Tolerance};

/// Compact and pretty-printed encodings of the same request should score the same.
pub struct SerializationInvarianceMR;

impl SerializationInvarianceMR {
    /// `(compact, pretty)` request bodies for one input.
    pub fn payloads(text: &str) -> Result<(String, String), ModelError> {
        let payload = serde_json::json!({ "inputs": [text] });
        let encode_err = |e: serde_json::Error| ModelError::Other {
            message: format!("failed to encode payload: {}", e),
        };
        let compact = serde_json::to_string(&payload).map_err(encode_err)?;
        let pretty = serde_json::to_string_pretty(&payload).map_err(encode_err)?;
        Ok((compact, pretty))
    }
}

#[async_trait]
impl MetamorphicRelation for SerializationInvarianceMR {
    fn name(&self) -> &'static str {
        "serialization_invariance"
    }

    fn description(&self) -> &'static str {
        "Equivalent JSON payloads should yield the same output"
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
        if !is_network_backed(model) {
            return Ok(MrResult::pass("endpoint-only MR"));
        }
        let mut failures = Vec::new();
        for (i, text) in inputs.iter().take(sample_size(inputs, max_examples)).enumerate() {
            let (compact, pretty) = Self::payloads(text)?;
            let a = first_score(&model.predict_raw(&compact).await?)?;
            let b = first_score(&model.predict_raw(&pretty).await?)?;
            if !within_tolerance(a, b, tolerance) {
                failures.push(MrFailure::new(i, text.as_str(), Some(text.clone()), a, b));
            }
        }
        Ok(MrResult::from_mismatches(failures))
    }
}
