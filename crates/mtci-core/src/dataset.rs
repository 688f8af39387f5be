//! JSONL input sets: one object per line, one text field per example.

use crate::errors::DatasetError;
use std::path::Path;

/// Load the `field` value of every non-blank line of a JSONL file.
///
/// String values are taken verbatim; any other JSON value is rendered as JSON.
pub fn load_jsonl(path: &Path, field: &str) -> Result<Vec<String>, DatasetError> {
    if !path.exists() {
        return Err(DatasetError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let raw = std::fs::read_to_string(path).map_err(|e| DatasetError::Io {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    parse_jsonl(&raw, field)
}

pub fn parse_jsonl(raw: &str, field: &str) -> Result<Vec<String>, DatasetError> {
    let mut values = Vec::new();
    for (idx, line) in raw.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let line_no = idx + 1;
        let record: serde_json::Value =
            serde_json::from_str(line).map_err(|e| DatasetError::InvalidLine {
                line: line_no,
                message: e.to_string(),
            })?;
        let value = record
            .get(field)
            .ok_or_else(|| DatasetError::MissingField {
                field: field.to_string(),
                line: line_no,
            })?;
        values.push(match value {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        });
    }
    if values.is_empty() {
        return Err(DatasetError::Empty);
    }
    Ok(values)
}
