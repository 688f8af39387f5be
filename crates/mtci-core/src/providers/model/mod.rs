//! Model-under-test boundary.
//!
//! [`Model`] is the one capability relations depend on. Adapters for the
//! supported native shapes (built-in local models, HTTP endpoints, scripted
//! fakes) implement it once here instead of being re-detected per call.

pub mod endpoint;
pub mod fake;
pub mod local;

pub use endpoint::EndpointModel;
pub use fake::FakeModel;
pub use local::{LocalModel, SimpleSentimentModel};

use crate::config::ModelConfig;
use crate::errors::{ConfigError, ModelError, MtciError, ValidationIssue};
use async_trait::async_trait;
use std::sync::Arc;

/// How a model is reached. Endpoint-only relations need [`Transport::Endpoint`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    Local,
    Endpoint,
}

#[async_trait]
pub trait Model: Send + Sync {
    fn provider_name(&self) -> &'static str;

    fn transport(&self) -> Transport {
        Transport::Local
    }

    /// One score per input, same order.
    async fn predict(&self, inputs: &[String]) -> Result<Vec<f64>, ModelError>;

    /// Send a pre-serialized request body. Only network-backed models support this.
    async fn predict_raw(&self, _body: &str) -> Result<Vec<f64>, ModelError> {
        Err(ModelError::Unsupported {
            provider: self.provider_name(),
            operation: "raw payload prediction",
        })
    }
}

pub fn is_network_backed(model: &dyn Model) -> bool {
    model.transport() == Transport::Endpoint
}

/// Build the adapter for a validated model config.
pub fn build_model(config: &ModelConfig) -> Result<Arc<dyn Model>, MtciError> {
    match config {
        ModelConfig::Local(local) => {
            let model = LocalModel::from_config(local)?;
            Ok(Arc::new(model))
        }
        ModelConfig::Endpoint(ep) => {
            let model = EndpointModel::from_config(ep).map_err(|e| {
                ConfigError::Validation {
                    issues: vec![ValidationIssue::new("model", e.to_string())],
                }
            })?;
            Ok(Arc::new(model))
        }
    }
}

pub(crate) fn check_len(expected: usize, scores: Vec<f64>) -> Result<Vec<f64>, ModelError> {
    if scores.len() != expected {
        return Err(ModelError::LengthMismatch {
            expected,
            actual: scores.len(),
        });
    }
    Ok(scores)
}
