use super::{Model, Transport};
use crate::errors::ModelError;
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Mutex;

/// Scripted model for tests and demos.
///
/// Scores come from a per-text table with a default; queued errors are
/// returned (one per call) before any scoring happens.
#[derive(Debug)]
pub struct FakeModel {
    scores: HashMap<String, f64>,
    default_score: f64,
    transport: Transport,
    errors: Mutex<VecDeque<ModelError>>,
    calls: AtomicUsize,
}

impl Default for FakeModel {
    fn default() -> Self {
        Self::new(0.5)
    }
}

impl FakeModel {
    pub fn new(default_score: f64) -> Self {
        Self {
            scores: HashMap::new(),
            default_score,
            transport: Transport::Local,
            errors: Mutex::new(VecDeque::new()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_score(mut self, text: impl Into<String>, score: f64) -> Self {
        self.scores.insert(text.into(), score);
        self
    }

    /// Pretend to be network-backed so endpoint-only relations are kept.
    pub fn as_endpoint(mut self) -> Self {
        self.transport = Transport::Endpoint;
        self
    }

    pub fn with_errors(self, errors: impl IntoIterator<Item = ModelError>) -> Self {
        Self {
            errors: Mutex::new(errors.into_iter().collect()),
            ..self
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn score(&self, text: &str) -> f64 {
        self.scores.get(text).copied().unwrap_or(self.default_score)
    }

    async fn begin_call(&self) -> Result<(), ModelError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.errors.lock().await.pop_front() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl Model for FakeModel {
    fn provider_name(&self) -> &'static str {
        "fake"
    }

    fn transport(&self) -> Transport {
        self.transport
    }

    async fn predict(&self, inputs: &[String]) -> Result<Vec<f64>, ModelError> {
        self.begin_call().await?;
        Ok(inputs.iter().map(|t| self.score(t)).collect())
    }

    async fn predict_raw(&self, body: &str) -> Result<Vec<f64>, ModelError> {
        if self.transport != Transport::Endpoint {
            return Err(ModelError::Unsupported {
                provider: self.provider_name(),
                operation: "raw payload prediction",
            });
        }
        self.begin_call().await?;
        #[derive(serde::Deserialize)]
        struct Payload {
            inputs: Vec<String>,
        }
        let payload: Payload =
            serde_json::from_str(body).map_err(|e| ModelError::InvalidResponse {
                message: e.to_string(),
            })?;
        Ok(payload.inputs.iter().map(|t| self.score(t)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scripted_errors_then_scores() {
        let model = FakeModel::new(0.2)
            .with_score("good", 0.9)
            .with_errors([ModelError::Transport {
                message: "connection reset".into(),
            }]);
        let inputs = vec!["good".to_string(), "other".to_string()];

        assert!(model.predict(&inputs).await.is_err());
        assert_eq!(model.predict(&inputs).await.unwrap(), vec![0.9, 0.2]);
        assert_eq!(model.calls(), 2);
    }

    #[tokio::test]
    async fn test_raw_requires_endpoint_transport() {
        let local = FakeModel::new(0.5);
        assert!(matches!(
            local.predict_raw("{\"inputs\":[\"a\"]}").await,
            Err(ModelError::Unsupported { .. })
        ));

        let remote = FakeModel::new(0.5).as_endpoint().with_score("a", 0.7);
        assert_eq!(
            remote.predict_raw("{\n  \"inputs\": [\"a\"]\n}").await.unwrap(),
            vec![0.7]
        );
    }
}
