//! Error types for configuration, data, model invocation and state persistence.
//!
//! Configuration, data and persistence errors are fatal for a session.
//! [`ModelError`] is the one kind the runner absorbs: it becomes a failed
//! attempt instead of aborting the run.

use std::path::PathBuf;

/// Configuration errors: unreadable or invalid YAML, unknown profile.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config not found: {path}")]
    NotFound { path: PathBuf },

    #[error("Config is empty")]
    Empty,

    #[error("Invalid YAML: {message}")]
    InvalidYaml { message: String },

    /// Schema or value validation failures, one entry per problem.
    #[error("{}", format_validation_issues(.issues))]
    Validation { issues: Vec<ValidationIssue> },

    #[error("Profile not found: {name}")]
    UnknownProfile { name: String },

    #[error("failed to read config {path}: {message}")]
    Io { path: PathBuf, message: String },
}

/// A single validation failure at a dotted location (e.g. `profiles.pr-fast.budget_seconds`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    pub location: String,
    pub message: String,
}

impl ValidationIssue {
    pub fn new(location: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            message: message.into(),
        }
    }
}

fn format_validation_issues(issues: &[ValidationIssue]) -> String {
    let mut lines = vec!["Config validation failed:".to_string()];
    for issue in issues {
        lines.push(format!("- {}: {}", issue.location, issue.message));
    }
    lines.join("\n")
}

/// Dataset errors: missing file, invalid JSONL, missing field, empty dataset.
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("Dataset not found: {path}")]
    NotFound { path: PathBuf },

    #[error("Invalid JSONL at line {line}: {message}")]
    InvalidLine { line: usize, message: String },

    #[error("Missing field '{field}' at line {line}")]
    MissingField { field: String, line: usize },

    #[error("Dataset is empty")]
    Empty,

    #[error("failed to read dataset {path}: {message}")]
    Io { path: PathBuf, message: String },
}

/// Model invocation errors. Absorbed per attempt by the runner.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ModelError {
    #[error("transport error: {message}")]
    Transport { message: String },

    #[error("endpoint returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("invalid model response: {message}")]
    InvalidResponse { message: String },

    #[error("model returned {actual} scores for {expected} inputs")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("{operation} is not supported by the {provider} model")]
    Unsupported {
        provider: &'static str,
        operation: &'static str,
    },

    #[error("model error: {message}")]
    Other { message: String },
}

impl From<reqwest::Error> for ModelError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            return Self::Status {
                status: status.as_u16(),
                body: err.to_string(),
            };
        }
        if err.is_decode() {
            return Self::InvalidResponse {
                message: err.to_string(),
            };
        }
        Self::Transport {
            message: err.to_string(),
        }
    }
}

/// Stats persistence errors. Fatal: losing history silently would skew scheduling.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    /// Persisted state exists but cannot be parsed.
    #[error("state file {path} is corrupt: {message}")]
    Corruption { path: PathBuf, message: String },

    #[error("failed to read state {path}: {message}")]
    Read { path: PathBuf, message: String },

    #[error("failed to write state {path}: {message}")]
    Write { path: PathBuf, message: String },
}

/// Locator resolution failures for relations and local models.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    #[error("unknown metamorphic relation: {locator}")]
    UnknownRelation { locator: String },

    #[error("unknown local model entrypoint: {entrypoint}")]
    UnknownModel { entrypoint: String },

    #[error("invalid kwargs for {entrypoint}: {message}")]
    InvalidKwargs { entrypoint: String, message: String },
}

/// Artifact writing failures.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("failed to write {path}: {message}")]
    Write { path: PathBuf, message: String },

    #[error("failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl ReportError {
    pub(crate) fn write(path: &std::path::Path, err: impl std::fmt::Display) -> Self {
        Self::Write {
            path: path.to_path_buf(),
            message: err.to_string(),
        }
    }
}

/// Umbrella error for a session. Each variant is fatal.
#[derive(Debug, thiserror::Error)]
pub enum MtciError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Dataset(#[from] DatasetError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    State(#[from] StateError),

    #[error(transparent)]
    Report(#[from] ReportError),
}

impl MtciError {
    /// Exit code for CLI: 2 for config/data/resolution, 3 for infrastructure.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::Dataset(_) | Self::Resolve(_) => 2,
            Self::State(_) | Self::Report(_) => 3,
        }
    }

    /// Stable machine-readable reason code.
    pub fn reason_code(&self) -> &'static str {
        match self {
            Self::Config(_) => "E_CFG",
            Self::Dataset(_) => "E_DATASET",
            Self::Resolve(_) => "E_RESOLVE",
            Self::State(StateError::Corruption { .. }) => "E_STATE_CORRUPT",
            Self::State(_) => "E_STATE_IO",
            Self::Report(_) => "E_REPORT_IO",
        }
    }
}

/// Result type for session-level operations.
pub type MtciResult<T> = Result<T, MtciError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_renders_one_line_per_issue() {
        let err = ConfigError::Validation {
            issues: vec![
                ValidationIssue::new("profiles", "must define at least one profile"),
                ValidationIssue::new("dataset.path", "missing field"),
            ],
        };
        let rendered = err.to_string();
        assert_eq!(
            rendered,
            "Config validation failed:\n- profiles: must define at least one profile\n- dataset.path: missing field"
        );
    }

    #[test]
    fn test_exit_codes_by_category() {
        let cfg: MtciError = ConfigError::Empty.into();
        assert_eq!(cfg.exit_code(), 2);
        let data: MtciError = DatasetError::Empty.into();
        assert_eq!(data.exit_code(), 2);
        let state: MtciError = StateError::Corruption {
            path: PathBuf::from(".mtci/state.json"),
            message: "expected value".into(),
        }
        .into();
        assert_eq!(state.exit_code(), 3);
        assert_eq!(state.reason_code(), "E_STATE_CORRUPT");
    }
}
