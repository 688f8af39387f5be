//! HTTP endpoint adapter.

use super::{check_len, Model, Transport};
use crate::config::EndpointModelConfig;
use crate::errors::ModelError;
use async_trait::async_trait;
use reqwest::header::{HeaderValue, CONTENT_TYPE, USER_AGENT};
use std::time::Duration;
use tracing::debug;

const USER_AGENT_VALUE: &str = concat!("mtci/", env!("CARGO_PKG_VERSION"));

/// Model served over HTTP: `POST {base_url}{predict_path}` with `{"inputs": [...]}`,
/// answered by `{"scores": [...]}`.
#[derive(Debug, Clone)]
pub struct EndpointModel {
    client: reqwest::Client,
    base_url: String,
    predict_path: String,
}

impl EndpointModel {
    pub fn from_config(config: &EndpointModelConfig) -> Result<Self, ModelError> {
        let timeout = Duration::try_from_secs_f64(config.timeout_s)
            .ok()
            .filter(|t| !t.is_zero())
            .ok_or_else(|| ModelError::Other {
                message: format!(
                    "timeout_s must be a positive, representable number of seconds, got {}",
                    config.timeout_s
                ),
            })?;
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ModelError::Transport {
                message: format!("failed to create HTTP client: {}", e),
            })?;

        let predict_path = if config.predict_path.starts_with('/') {
            config.predict_path.clone()
        } else {
            format!("/{}", config.predict_path)
        };

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            predict_path,
        })
    }

    fn predict_url(&self) -> String {
        format!("{}{}", self.base_url, self.predict_path)
    }

    /// `GET {base_url}/health`; any 2xx counts as healthy.
    pub async fn health(&self) -> Result<(), ModelError> {
        let url = format!("{}/health", self.base_url);
        debug!(url = %url, "checking endpoint health");
        let response = self
            .client
            .get(&url)
            .header(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE))
            .send()
            .await?;
        ensure_success(response).await.map(|_| ())
    }

    async fn post(&self, request: reqwest::RequestBuilder) -> Result<Vec<f64>, ModelError> {
        let response = request
            .header(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE))
            .send()
            .await?;
        let response = ensure_success(response).await?;
        let body: serde_json::Value = response.json().await?;
        parse_scores(&body)
    }
}

async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, ModelError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(ModelError::Status {
        status: status.as_u16(),
        body,
    })
}

fn parse_scores(body: &serde_json::Value) -> Result<Vec<f64>, ModelError> {
    let scores = body
        .get("scores")
        .and_then(|v| v.as_array())
        .ok_or_else(|| ModelError::InvalidResponse {
            message: "Endpoint response missing 'scores' list".to_string(),
        })?;
    scores
        .iter()
        .map(|v| {
            v.as_f64().ok_or_else(|| ModelError::InvalidResponse {
                message: format!("non-numeric score: {}", v),
            })
        })
        .collect()
}

#[async_trait]
impl Model for EndpointModel {
    fn provider_name(&self) -> &'static str {
        "endpoint"
    }

    fn transport(&self) -> Transport {
        Transport::Endpoint
    }

    async fn predict(&self, inputs: &[String]) -> Result<Vec<f64>, ModelError> {
        let url = self.predict_url();
        debug!(url = %url, inputs = inputs.len(), "endpoint predict");
        let request = self
            .client
            .post(&url)
            .json(&serde_json::json!({ "inputs": inputs }));
        let scores = self.post(request).await?;
        check_len(inputs.len(), scores)
    }

    async fn predict_raw(&self, body: &str) -> Result<Vec<f64>, ModelError> {
        let url = self.predict_url();
        debug!(url = %url, bytes = body.len(), "endpoint raw predict");
        let request = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .body(body.to_string());
        self.post(request).await
    }
}
