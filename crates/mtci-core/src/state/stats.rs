use serde::{Deserialize, Deserializer, Serialize};

/// Maximum number of retained runtime samples per relation.
pub const RUNTIME_WINDOW: usize = 50;

/// Median used before any runtime has been recorded.
pub const DEFAULT_MEDIAN_RUNTIME_S: f64 = 1.0;

/// Historical statistics for one relation.
///
/// Field names match the persisted state format (`flaky_count`,
/// `median_runtime_s`), so existing state files keep loading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MrStats {
    #[serde(default)]
    pub runs: u64,
    #[serde(default)]
    pub fails: u64,
    #[serde(default)]
    pub flaky_count: u64,
    #[serde(default = "default_median")]
    pub median_runtime_s: f64,
    /// Oldest first; at most [`RUNTIME_WINDOW`] entries.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub runtimes: Vec<f64>,
}

fn default_median() -> f64 {
    DEFAULT_MEDIAN_RUNTIME_S
}

fn null_as_empty<'de, D>(d: D) -> Result<Vec<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<f64>>::deserialize(d)?.unwrap_or_default())
}

impl Default for MrStats {
    fn default() -> Self {
        Self {
            runs: 0,
            fails: 0,
            flaky_count: 0,
            median_runtime_s: DEFAULT_MEDIAN_RUNTIME_S,
            runtimes: Vec::new(),
        }
    }
}

impl MrStats {
    /// Append a runtime sample, evict the oldest past the window and refresh the median.
    pub fn record_runtime(&mut self, runtime_s: f64) {
        self.runtimes.push(runtime_s);
        if self.runtimes.len() > RUNTIME_WINDOW {
            let excess = self.runtimes.len() - RUNTIME_WINDOW;
            self.runtimes.drain(..excess);
        }
        self.refresh_median();
    }

    /// Trim an over-long window (hand-edited or legacy state) and recompute.
    pub(crate) fn normalize(&mut self) {
        if self.runtimes.len() > RUNTIME_WINDOW {
            let excess = self.runtimes.len() - RUNTIME_WINDOW;
            self.runtimes.drain(..excess);
        }
        if !self.runtimes.is_empty() {
            self.refresh_median();
        }
    }

    fn refresh_median(&mut self) {
        if let Some(m) = median(&self.runtimes) {
            self.median_runtime_s = m;
        }
    }
}

/// Median with the average-of-middle-two rule for even counts.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}
