use crate::model::MrStatus;
use crate::report::{SessionReport, StatusCounts};

/// One line per relation plus totals. Deterministic, unit-testable.
#[must_use]
pub fn format_summary(report: &SessionReport) -> Vec<String> {
    let mut lines = Vec::with_capacity(report.results.len() + 3);
    lines.push(format!(
        "Profile {} (budget {:.1}s, {} selected)",
        report.profile,
        report.budget_seconds,
        report.selected_mrs.len()
    ));
    for r in &report.results {
        let icon = match r.status {
            MrStatus::Pass => "✅",
            MrStatus::Fail => "❌",
            MrStatus::Flaky => "⚠️",
            MrStatus::Skipped => "⏭️",
        };
        lines.push(format!(
            "{} {:<28} {:<7} attempts={} ({:.3}s) {}",
            icon,
            r.name,
            r.status.as_str(),
            r.attempts, r.runtime_s, r.message
        ));
    }
    let c = StatusCounts::from_results(&report.results);
    lines.push(format!(
        "Summary: {} passed, {} failed, {} flaky, {} skipped",
        c.pass, c.fail, c.flaky, c.skipped
    ));
    let f = &report.flake_summary;
    lines.push(format!(
        "Flakes: {} retries, {} flaky, fail_on_flake={}",
        f.total_retries, f.flaky_count, f.fail_on_flake
    ));
    lines
}

/// Print the summary to stderr; stdout is left for command output.
pub fn print_summary(report: &SessionReport) {
    for line in format_summary(report) {
        eprintln!("{}", line);
    }
}
