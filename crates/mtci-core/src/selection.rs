//! Budgeted relation selection.
//!
//! Ranks candidates by `(fails + 1) / (median_runtime + 0.1)` so failure-prone
//! and cheap relations go first, then fills the budget greedily. A fully cold
//! store gets a short smoke phase in input order so the heuristic has data
//! on the next session.

use crate::model::{SelectionItem, SelectionReason};
use crate::state::{MrStats, StatsMap};
use std::cmp::Ordering;

pub const DEFAULT_SMOKE_COUNT: usize = 2;
pub const DEFAULT_RUNTIME_S: f64 = 1.0;

/// Additive guard in the score denominator.
const RUNTIME_EPSILON: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectionPolicy {
    pub smoke_count: usize,
    pub default_runtime_s: f64,
}

impl Default for SelectionPolicy {
    fn default() -> Self {
        Self {
            smoke_count: DEFAULT_SMOKE_COUNT,
            default_runtime_s: DEFAULT_RUNTIME_S,
        }
    }
}

pub fn score_mr(stats: &MrStats, runtime_s: f64) -> f64 {
    (stats.fails as f64 + 1.0) / (runtime_s + RUNTIME_EPSILON)
}

/// Runtime estimate: the recorded median, or the default with no usable history.
fn predicted_runtime(stats: Option<&MrStats>, default_runtime_s: f64) -> f64 {
    match stats {
        Some(s) if s.median_runtime_s > 0.0 => s.median_runtime_s,
        _ => default_runtime_s,
    }
}

/// Select with the default smoke count and runtime.
pub fn select_mrs(
    candidates: &[String],
    stats_by_name: &StatsMap,
    budget_seconds: f64,
) -> Vec<SelectionItem> {
    select_mrs_with(
        candidates,
        stats_by_name,
        budget_seconds,
        SelectionPolicy::default(),
    )
}

/// Produce the ordered run plan for `candidates` under `budget_seconds`.
///
/// Rejected candidates are omitted; skip classification happens at run time.
pub fn select_mrs_with(
    candidates: &[String],
    stats_by_name: &StatsMap,
    budget_seconds: f64,
    policy: SelectionPolicy,
) -> Vec<SelectionItem> {
    let mut selections = Vec::new();
    if candidates.is_empty() {
        return selections;
    }

    let default_runtime = policy.default_runtime_s;
    let mut remaining = budget_seconds.max(0.0);

    let cold = candidates
        .iter()
        .all(|name| !stats_by_name.contains_key(name));

    let mut pending: Vec<&String> = candidates.iter().collect();
    if cold {
        let smoke = policy.smoke_count.min(candidates.len());
        for name in &candidates[..smoke] {
            selections.push(SelectionItem {
                name: name.clone(),
                score: 1.0 / (default_runtime + RUNTIME_EPSILON),
                predicted_runtime_seconds: default_runtime,
                reason: SelectionReason::ColdStartSmoke,
            });
            remaining -= default_runtime;
        }
        pending.retain(|name| !selections.iter().any(|s| &s.name == *name));
    }

    let mut scored: Vec<(&String, f64, f64)> = pending
        .into_iter()
        .map(|name| {
            let stats = stats_by_name.get(name);
            let runtime = predicted_runtime(stats, default_runtime);
            let score = score_mr(stats.unwrap_or(&MrStats::default()), runtime);
            (name, score, runtime)
        })
        .collect();

    scored.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.0.cmp(b.0))
    });

    for (name, score, runtime) in scored {
        if runtime <= remaining {
            selections.push(SelectionItem {
                name: name.clone(),
                score,
                predicted_runtime_seconds: runtime,
                reason: SelectionReason::ScoreRanked,
            });
            remaining -= runtime;
        }
    }

    if selections.is_empty() {
        selections.push(SelectionItem {
            name: candidates[0].clone(),
            score: 1.0,
            predicted_runtime_seconds: default_runtime,
            reason: SelectionReason::BudgetFallback,
        });
    }

    selections
}
