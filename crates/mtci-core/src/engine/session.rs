//! One `mtci run`: resolve everything up front, select, execute, write artifacts.

use crate::config::{Config, Profile};
use crate::dataset::load_jsonl;
use crate::engine::runner::{RunPolicy, Runner};
use crate::errors::{MtciResult, ReportError};
use crate::providers::model::{build_model, is_network_backed, Model};
use crate::registry::MrRegistry;
use crate::relation_api::MetamorphicRelation;
use crate::report::json::{write_failure_artifacts, write_report};
use crate::report::junit::write_junit;
use crate::report::SessionReport;
use crate::selection::select_mrs;
use crate::state::StatsStore;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub profile: String,
    /// Artifacts go to `<out_root>/<profile>-<YYYYmmdd-HHMMSS>/`.
    pub out_root: PathBuf,
    /// Stats live in `<state_root>/.mtci/state.json`.
    pub state_root: PathBuf,
}

#[derive(Debug, Clone)]
pub struct SessionOutcome {
    pub passed: bool,
    pub out_dir: PathBuf,
    pub report: SessionReport,
}

impl SessionOutcome {
    /// `0` when the gate passed, `1` otherwise.
    pub fn exit_code(&self) -> i32 {
        if self.passed {
            0
        } else {
            1
        }
    }
}

/// Run a configured profile end to end.
///
/// Unknown profile, dataset problems, model construction and relation
/// resolution all fail before any relation runs.
pub async fn run_profile(
    cfg: &Config,
    registry: &MrRegistry,
    options: &SessionOptions,
) -> MtciResult<SessionOutcome> {
    let profile = cfg.profile(&options.profile)?;
    let inputs = load_jsonl(&cfg.dataset.path, &cfg.dataset.jsonl_field)?;
    let model = build_model(&cfg.model)?;
    let relations = registry.resolve_all(&profile.mrs)?;
    info!(
        profile = %options.profile,
        examples = inputs.len(),
        relations = relations.len(),
        model = model.provider_name(),
        "session resolved"
    );
    run_with_model(profile, &inputs, model, relations, options).await
}

/// Select and execute already-resolved relations, then write artifacts.
pub async fn run_with_model(
    profile: &Profile,
    inputs: &[String],
    model: Arc<dyn Model>,
    relations: Vec<Arc<dyn MetamorphicRelation>>,
    options: &SessionOptions,
) -> MtciResult<SessionOutcome> {
    let out_dir = session_dir(&options.out_root, &options.profile, chrono::Local::now());
    let relations = applicable_relations(relations, model.as_ref());
    let names: Vec<String> = relations.iter().map(|r| r.name().to_string()).collect();

    let mut store = StatsStore::new(&options.state_root);
    store.load()?;
    let plan = select_mrs(&names, store.stats(), profile.budget_seconds);
    for item in &plan {
        info!(
            relation = %item.name,
            score = item.score,
            predicted_runtime_s = item.predicted_runtime_seconds,
            reason = %item.reason,
            "selected"
        );
    }

    let runner = Runner {
        model,
        relations,
        policy: RunPolicy::from_profile(profile),
    };
    let artifacts = runner.run_suite(&plan, inputs, &mut store).await?;
    let passed = artifacts.passed();

    let report = SessionReport::new(
        options.profile.clone(),
        profile.budget_seconds,
        profile.max_examples,
        artifacts,
    );
    write_artifacts(&report, profile.junit_flaky_as_failure, &out_dir)?;
    info!(out_dir = %out_dir.display(), passed, "session finished");

    Ok(SessionOutcome {
        passed,
        out_dir,
        report,
    })
}

/// Drop endpoint-only relations for local models and repeated names.
fn applicable_relations(
    relations: Vec<Arc<dyn MetamorphicRelation>>,
    model: &dyn Model,
) -> Vec<Arc<dyn MetamorphicRelation>> {
    let network = is_network_backed(model);
    let mut seen = HashSet::new();
    relations
        .into_iter()
        .filter(|r| {
            if r.requires_endpoint() && !network {
                info!(relation = r.name(), "endpoint-only relation dropped for local model");
                return false;
            }
            seen.insert(r.name())
        })
        .collect()
}

/// Stamped with the session start, not the time artifacts are written.
fn session_dir(
    out_root: &Path,
    profile: &str,
    started: chrono::DateTime<chrono::Local>,
) -> PathBuf {
    out_root.join(format!("{}-{}", profile, started.format("%Y%m%d-%H%M%S")))
}

fn write_artifacts(
    report: &SessionReport,
    junit_flaky_as_failure: bool,
    out_dir: &Path,
) -> Result<(), ReportError> {
    write_report(report, out_dir)?;
    write_failure_artifacts(report, out_dir)?;
    write_junit(&report.results, junit_flaky_as_failure, out_dir)
}
