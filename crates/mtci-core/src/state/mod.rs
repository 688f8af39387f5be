//! Durable per-relation statistics.
//!
//! State lives in `<root>/.mtci/state.json` as `{"mrs": {name: MrStats}}`.
//! It is loaded once at session start and saved once at session end; the
//! runner is the only writer in between.

pub mod stats;

pub use stats::{median, MrStats, DEFAULT_MEDIAN_RUNTIME_S, RUNTIME_WINDOW};

use crate::errors::StateError;
use crate::model::MrStatus;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const STATE_DIR: &str = ".mtci";
pub const STATE_FILE: &str = "state.json";

/// Name-keyed statistics; ordered so saved files diff cleanly.
pub type StatsMap = BTreeMap<String, MrStats>;

#[derive(Debug, Default, Serialize, Deserialize)]
struct StateFile {
    #[serde(default)]
    mrs: StatsMap,
}

#[derive(Debug, Clone)]
pub struct StatsStore {
    path: PathBuf,
    data: StatsMap,
}

impl StatsStore {
    /// Store rooted at `root`, i.e. `root/.mtci/state.json`.
    pub fn new(root: &Path) -> Self {
        Self::at_path(root.join(STATE_DIR).join(STATE_FILE))
    }

    pub fn at_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            data: StatsMap::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read persisted state, replacing anything held in memory.
    ///
    /// A missing file is the normal cold state and yields an empty map.
    /// Unparseable content is [`StateError::Corruption`].
    pub fn load(&mut self) -> Result<&StatsMap, StateError> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "no state file, starting cold");
            self.data = StatsMap::new();
            return Ok(&self.data);
        }

        let raw = std::fs::read_to_string(&self.path).map_err(|e| StateError::Read {
            path: self.path.clone(),
            message: e.to_string(),
        })?;
        let file: StateFile =
            serde_json::from_str(&raw).map_err(|e| StateError::Corruption {
                path: self.path.clone(),
                message: e.to_string(),
            })?;

        let mut data = file.mrs;
        for stats in data.values_mut() {
            if !stats.median_runtime_s.is_finite() || stats.median_runtime_s < 0.0 {
                return Err(StateError::Corruption {
                    path: self.path.clone(),
                    message: format!("invalid median_runtime_s {}", stats.median_runtime_s),
                });
            }
            stats.normalize();
        }
        debug!(path = %self.path.display(), entries = data.len(), "loaded state");
        self.data = data;
        Ok(&self.data)
    }

    pub fn stats(&self) -> &StatsMap {
        &self.data
    }

    /// Existing stats for `name`, or fresh defaults registered under it.
    pub fn get(&mut self, name: &str) -> &mut MrStats {
        self.data.entry(name.to_string()).or_default()
    }

    /// Apply one finished relation to its stats. Skipped relations are not charged.
    pub fn record_outcome(&mut self, name: &str, status: MrStatus, runtime_s: f64) {
        if status == MrStatus::Skipped {
            return;
        }
        let stats = self.get(name);
        stats.runs += 1;
        match status {
            MrStatus::Fail => stats.fails += 1,
            MrStatus::Flaky => stats.flaky_count += 1,
            MrStatus::Pass | MrStatus::Skipped => {}
        }
        stats.record_runtime(runtime_s);
    }

    /// Write the whole map atomically: temp file in the same directory, then rename.
    pub fn save(&self) -> Result<(), StateError> {
        let write_err = |e: &dyn std::fmt::Display| StateError::Write {
            path: self.path.clone(),
            message: e.to_string(),
        };

        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&dir).map_err(|e| write_err(&e))?;

        let body = serde_json::to_string_pretty(&StateFile {
            mrs: self.data.clone(),
        })
        .map_err(|e| write_err(&e))?;

        let mut tmp = tempfile::NamedTempFile::new_in(&dir).map_err(|e| write_err(&e))?;
        tmp.write_all(body.as_bytes()).map_err(|e| write_err(&e))?;
        tmp.as_file().sync_all().map_err(|e| write_err(&e))?;
        tmp.persist(&self.path).map_err(|e| write_err(&e.error))?;

        debug!(path = %self.path.display(), entries = self.data.len(), "saved state");
        Ok(())
    }
}
