//! Deterministic relations for exercising the retry and gating paths.

use async_trait::async_trait;
use mtci_core::errors::ModelError;
use mtci_core::providers::model::Model;
use mtci_core::relation_api::{MetamorphicRelation, MrResult};
use mtci_core::Tolerance;
use std::sync::atomic::{AtomicU32, Ordering};

/// Fails its first call, passes every later one.
#[derive(Debug, Default)]
pub struct FailThenPassMR {
    calls: AtomicU32,
}

#[async_trait]
impl MetamorphicRelation for FailThenPassMR {
    fn name(&self) -> &'static str {
        "fail_then_pass"
    }

    async fn run(
        &self,
        _model: &dyn Model,
        _inputs: &[String],
        _max_examples: usize,
        _tolerance: &Tolerance,
    ) -> Result<MrResult, ModelError> {
        if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
            Ok(MrResult::fail("first fail", Vec::new()))
        } else {
            Ok(MrResult::pass("pass"))
        }
    }
}

pub struct AlwaysFailMR;

#[async_trait]
impl MetamorphicRelation for AlwaysFailMR {
    fn name(&self) -> &'static str {
        "always_fail"
    }

    async fn run(
        &self,
        _model: &dyn Model,
        _inputs: &[String],
        _max_examples: usize,
        _tolerance: &Tolerance,
    ) -> Result<MrResult, ModelError> {
        Ok(MrResult::fail("fail", Vec::new()))
    }
}
