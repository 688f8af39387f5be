use crate::errors::ReportError;
use crate::model::{MrRunResult, MrStatus};
use std::path::Path;

pub const JUNIT_FILE: &str = "junit.xml";

enum Marker<'a> {
    Failure { message: &'a str, text: &'a str },
    Skipped { message: &'a str, text: &'a str },
}

fn or_default<'a>(s: &'a str, default: &'a str) -> &'a str {
    if s.is_empty() {
        default
    } else {
        s
    }
}

fn marker(r: &MrRunResult, flaky_as_failure: bool) -> Option<Marker<'_>> {
    match r.status {
        MrStatus::Pass => None,
        MrStatus::Fail => Some(Marker::Failure {
            message: or_default(&r.message, "fail"),
            text: &r.message,
        }),
        MrStatus::Flaky if flaky_as_failure => Some(Marker::Failure {
            message: "flaky",
            text: or_default(&r.message, "flaky"),
        }),
        MrStatus::Flaky => Some(Marker::Skipped {
            message: "flaky",
            text: or_default(&r.message, "flaky"),
        }),
        MrStatus::Skipped => Some(Marker::Skipped {
            message: or_default(&r.message, "skipped"),
            text: or_default(&r.message, "skipped"),
        }),
    }
}

/// Render one `<testsuite name="mtci">` with a `<testcase>` per result.
///
/// `flaky` becomes a `<failure>` or a `<skipped>` depending on `flaky_as_failure`.
pub fn render_junit(results: &[MrRunResult], flaky_as_failure: bool) -> String {
    let mut failures = 0;
    let mut skipped = 0;
    let mut cases = String::new();

    for r in results {
        cases.push_str(&format!(
            r#"  <testcase classname="mtci" name="{}" time="{:.3}">"#,
            escape(&r.name),
            r.runtime_s
        ));
        match marker(r, flaky_as_failure) {
            None => {}
            Some(Marker::Failure { message, text }) => {
                failures += 1;
                cases.push_str(&format!(
                    r#"<failure message="{}">{}</failure>"#,
                    escape(message),
                    escape(text)
                ));
            }
            Some(Marker::Skipped { message, text }) => {
                skipped += 1;
                cases.push_str(&format!(
                    r#"<skipped message="{}">{}</skipped>"#,
                    escape(message),
                    escape(text)
                ));
            }
        }
        cases.push_str("</testcase>\n");
    }

    let mut xml = String::new();
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    xml.push('\n');
    xml.push_str(&format!(
        r#"<testsuite name="mtci" tests="{}" failures="{}" skipped="{}">"#,
        results.len(),
        failures,
        skipped
    ));
    xml.push('\n');
    xml.push_str(&cases);
    xml.push_str("</testsuite>\n");
    xml
}

pub fn write_junit(
    results: &[MrRunResult],
    flaky_as_failure: bool,
    out_dir: &Path,
) -> Result<(), ReportError> {
    std::fs::create_dir_all(out_dir).map_err(|e| ReportError::write(out_dir, e))?;
    let path = out_dir.join(JUNIT_FILE);
    std::fs::write(&path, render_junit(results, flaky_as_failure))
        .map_err(|e| ReportError::write(&path, e))
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
