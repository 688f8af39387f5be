use crate::errors::{ConfigError, ValidationIssue};
use crate::tolerance::Tolerance;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_CONFIG_PATH: &str = "mtci.yml";

const TOP_LEVEL_KEYS: [&str; 3] = ["profiles", "dataset", "model"];

/// Upper bound on `retries_on_fail`; each retry re-runs the whole relation.
pub const MAX_RETRIES_ON_FAIL: u32 = 100;

/// A named run profile: budget, retry policy and the relations to consider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Profile {
    pub budget_seconds: f64,
    #[serde(default = "default_max_examples")]
    pub max_examples: usize,
    #[serde(default = "default_retries")]
    pub retries_on_fail: u32,
    #[serde(default = "default_true")]
    pub fail_on_flake: bool,
    #[serde(default)]
    pub tolerance: Tolerance,
    pub mrs: Vec<String>,
    #[serde(default = "default_true")]
    pub junit_flaky_as_failure: bool,
}

fn default_max_examples() -> usize {
    20
}

fn default_retries() -> u32 {
    1
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatasetConfig {
    pub path: PathBuf,
    pub jsonl_field: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LocalModelConfig {
    pub entrypoint: String,
    #[serde(default)]
    pub kwargs: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EndpointModelConfig {
    pub base_url: String,
    #[serde(default = "default_predict_path")]
    pub predict_path: String,
    #[serde(default = "default_timeout_s")]
    pub timeout_s: f64,
}

fn default_predict_path() -> String {
    "/predict".to_string()
}

fn default_timeout_s() -> f64 {
    10.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum ModelConfig {
    Local(LocalModelConfig),
    Endpoint(EndpointModelConfig),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub profiles: BTreeMap<String, Profile>,
    pub dataset: DatasetConfig,
    pub model: ModelConfig,
}

impl Config {
    pub fn profile(&self, name: &str) -> Result<&Profile, ConfigError> {
        self.profiles
            .get(name)
            .ok_or_else(|| ConfigError::UnknownProfile {
                name: name.to_string(),
            })
    }
}

pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    parse_config(&raw)
}

/// Parse and validate config text. Collects every problem before failing.
pub fn parse_config(raw: &str) -> Result<Config, ConfigError> {
    let doc: serde_yaml::Value =
        serde_yaml::from_str(raw).map_err(|e| ConfigError::InvalidYaml {
            message: e.to_string(),
        })?;
    if doc.is_null() {
        return Err(ConfigError::Empty);
    }
    let Some(root) = doc.as_mapping() else {
        return Err(ConfigError::Validation {
            issues: vec![ValidationIssue::new("config", "must be a mapping")],
        });
    };

    let mut issues = Vec::new();

    for key in root.keys() {
        let name = key.as_str().unwrap_or("<non-string key>");
        if !TOP_LEVEL_KEYS.contains(&name) {
            issues.push(ValidationIssue::new(name, "extra fields not permitted"));
        }
    }

    let mut profiles = BTreeMap::new();
    match root.get("profiles") {
        None => issues.push(ValidationIssue::new("profiles", "field required")),
        Some(v) => match v.as_mapping() {
            None => issues.push(ValidationIssue::new("profiles", "must be a mapping")),
            Some(m) if m.is_empty() => issues.push(ValidationIssue::new(
                "profiles",
                "profiles must define at least one profile",
            )),
            Some(m) => {
                for (key, value) in m {
                    let name = key.as_str().unwrap_or_default().to_string();
                    let loc = format!("profiles.{}", name);
                    match serde_yaml::from_value::<Profile>(value.clone()) {
                        Ok(profile) => {
                            validate_profile(&loc, &profile, &mut issues);
                            profiles.insert(name, profile);
                        }
                        Err(e) => issues.push(ValidationIssue::new(loc, e.to_string())),
                    }
                }
            }
        },
    }

    let dataset = section::<DatasetConfig>(root, "dataset", &mut issues);
    let model = section::<ModelConfig>(root, "model", &mut issues);
    if let Some(ModelConfig::Endpoint(ep)) = &model {
        if ep.timeout_s <= 0.0 || Duration::try_from_secs_f64(ep.timeout_s).is_err() {
            issues.push(ValidationIssue::new(
                "model.timeout_s",
                "must be a positive, representable number of seconds",
            ));
        }
    }

    match (dataset, model) {
        (Some(dataset), Some(model)) if issues.is_empty() => Ok(Config {
            profiles,
            dataset,
            model,
        }),
        _ => Err(ConfigError::Validation { issues }),
    }
}

fn section<T: serde::de::DeserializeOwned>(
    root: &serde_yaml::Mapping,
    key: &str,
    issues: &mut Vec<ValidationIssue>,
) -> Option<T> {
    let Some(value) = root.get(key) else {
        issues.push(ValidationIssue::new(key, "field required"));
        return None;
    };
    match serde_yaml::from_value::<T>(value.clone()) {
        Ok(v) => Some(v),
        Err(e) => {
            issues.push(ValidationIssue::new(key, e.to_string()));
            None
        }
    }
}

fn validate_profile(loc: &str, profile: &Profile, issues: &mut Vec<ValidationIssue>) {
    if profile.budget_seconds.is_nan() || profile.budget_seconds <= 0.0 {
        issues.push(ValidationIssue::new(
            format!("{}.budget_seconds", loc),
            "must be greater than 0",
        ));
    }
    if profile.max_examples == 0 {
        issues.push(ValidationIssue::new(
            format!("{}.max_examples", loc),
            "must be greater than 0",
        ));
    }
    if profile.retries_on_fail > MAX_RETRIES_ON_FAIL {
        issues.push(ValidationIssue::new(
            format!("{}.retries_on_fail", loc),
            format!("must be at most {}", MAX_RETRIES_ON_FAIL),
        ));
    }
    for (field, value) in [
        ("atol", profile.tolerance.atol),
        ("rtol", profile.tolerance.rtol),
    ] {
        if !value.is_finite() || value < 0.0 {
            issues.push(ValidationIssue::new(
                format!("{}.tolerance.{}", loc, field),
                "must be a finite, non-negative number",
            ));
        }
    }
}
