use async_trait::async_trait;
use mtci_core::errors::ModelError;
use mtci_core::model::MrFailure;
use mtci_core::providers::model::Model;
use mtci_core::relation_api::{MetamorphicRelation, MrResult};
use mtci_core::Tolerance;
use std::sync::atomic::{AtomicBool, Ordering};

/// Fails the first call on an instance and passes afterwards, to exercise
/// flake-aware gating. State is per instance; the registry hands out a fresh
/// one per resolve.
#[derive(Debug, Default)]
pub struct FlakeDemoMR {
    seen_once: AtomicBool,
}

#[async_trait]
impl MetamorphicRelation for FlakeDemoMR {
    fn name(&self) -> &'static str {
        "flake_demo"
    }

    fn description(&self) -> &'static str {
        "Intentionally flaky MR for testing flake-aware gating."
    }

    async fn run(
        &self,
        _model: &dyn Model,
        inputs: &[String],
        _max_examples: usize,
        _tolerance: &Tolerance,
    ) -> Result<MrResult, ModelError> {
        if self.seen_once.swap(true, Ordering::SeqCst) {
            return Ok(MrResult::pass("OK (passed on retry)."));
        }
        let text = inputs.first().cloned().unwrap_or_default();
        Ok(MrResult::fail(
            "Intentional flake: failing first attempt only.",
            vec![MrFailure::new(0, text, None, 0.0, 1.0)],
        ))
    }
}
