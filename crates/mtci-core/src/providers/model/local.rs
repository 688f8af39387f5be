//! In-process models resolved from a closed entrypoint table.

use super::Model;
use crate::config::LocalModelConfig;
use crate::errors::{ModelError, ResolveError};
use crate::registry::normalize_locator;
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};

type KwArgs = BTreeMap<String, serde_json::Value>;
type LocalFactory = fn(&str, &KwArgs) -> Result<Box<dyn Model>, ResolveError>;

struct LocalModelEntry {
    name: &'static str,
    aliases: &'static [&'static str],
    build: LocalFactory,
}

const LOCAL_MODELS: &[LocalModelEntry] = &[LocalModelEntry {
    name: "simple_sentiment",
    aliases: &["mtci.models.simple.SimpleSentimentModel"],
    build: build_simple_sentiment,
}];

/// A built-in model addressed by its config entrypoint.
pub struct LocalModel {
    entrypoint: String,
    inner: Box<dyn Model>,
}

impl LocalModel {
    pub fn from_config(config: &LocalModelConfig) -> Result<Self, ResolveError> {
        let wanted = normalize_locator(&config.entrypoint);
        let entry = LOCAL_MODELS
            .iter()
            .find(|e| e.name == wanted || e.aliases.iter().any(|a| *a == wanted))
            .ok_or_else(|| ResolveError::UnknownModel {
                entrypoint: config.entrypoint.clone(),
            })?;
        let inner = (entry.build)(&config.entrypoint, &config.kwargs)?;
        Ok(Self {
            entrypoint: config.entrypoint.clone(),
            inner,
        })
    }

    pub fn entrypoint(&self) -> &str {
        &self.entrypoint
    }
}

#[async_trait]
impl Model for LocalModel {
    fn provider_name(&self) -> &'static str {
        "local"
    }

    async fn predict(&self, inputs: &[String]) -> Result<Vec<f64>, ModelError> {
        let scores = self.inner.predict(inputs).await?;
        super::check_len(inputs.len(), scores)
    }
}

const DEFAULT_POSITIVE_TOKENS: [&str; 8] = [
    "good",
    "great",
    "love",
    "excellent",
    "amazing",
    "nice",
    "happy",
    "wonderful",
];

/// Keyword sentiment scorer: high score if any token is in the positive set.
#[derive(Debug, Clone)]
pub struct SimpleSentimentModel {
    positive_tokens: BTreeSet<String>,
    positive_score: f64,
    negative_score: f64,
}

impl Default for SimpleSentimentModel {
    fn default() -> Self {
        Self {
            positive_tokens: DEFAULT_POSITIVE_TOKENS
                .iter()
                .map(|t| t.to_string())
                .collect(),
            positive_score: 0.9,
            negative_score: 0.1,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SimpleSentimentKwargs {
    positive_tokens: Option<Vec<String>>,
    positive_score: Option<f64>,
    negative_score: Option<f64>,
}

impl SimpleSentimentModel {
    pub fn score(&self, text: &str) -> f64 {
        let hit = text
            .split_whitespace()
            .map(|w| w.trim_matches(|c| ".,!?;:\"".contains(c)).to_lowercase())
            .any(|w| self.positive_tokens.contains(&w));
        if hit {
            self.positive_score
        } else {
            self.negative_score
        }
    }
}

fn build_simple_sentiment(
    entrypoint: &str,
    kwargs: &KwArgs,
) -> Result<Box<dyn Model>, ResolveError> {
    let object = serde_json::Value::Object(kwargs.clone().into_iter().collect());
    let args: SimpleSentimentKwargs =
        serde_json::from_value(object).map_err(|e| ResolveError::InvalidKwargs {
            entrypoint: entrypoint.to_string(),
            message: e.to_string(),
        })?;

    let mut model = SimpleSentimentModel::default();
    if let Some(tokens) = args.positive_tokens {
        model.positive_tokens = tokens.into_iter().map(|t| t.to_lowercase()).collect();
    }
    if let Some(s) = args.positive_score {
        model.positive_score = s;
    }
    if let Some(s) = args.negative_score {
        model.negative_score = s;
    }
    Ok(Box::new(model))
}

#[async_trait]
impl Model for SimpleSentimentModel {
    fn provider_name(&self) -> &'static str {
        "simple_sentiment"
    }

    async fn predict(&self, inputs: &[String]) -> Result<Vec<f64>, ModelError> {
        Ok(inputs.iter().map(|t| self.score(t)).collect())
    }
}
