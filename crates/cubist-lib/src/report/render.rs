//! Text and Markdown renderings of a report.

use std::fmt::Write;

use super::ValidationReport;
use crate::Diagnostic;

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{n} {word}")
    } else {
        format!("{n} {word}s")
    }
}

fn versions_line(report: &ValidationReport) -> String {
    report
        .metadata
        .standard_versions
        .iter()
        .map(|(standard, version)| format!("{standard} {version}"))
        .collect::<Vec<_>>()
        .join(", ")
}

fn verdict(report: &ValidationReport) -> &'static str {
    if report.summary.passed { "PASSED" } else { "FAILED" }
}

fn counts(report: &ValidationReport) -> String {
    let s = &report.summary;
    format!(
        "{}, {}, {}",
        plural(s.errors, "error"),
        plural(s.warnings, "warning"),
        plural(s.hints, "hint")
    )
}

pub(super) fn text(report: &ValidationReport) -> String {
    let mut out = String::new();
    let meta = &report.metadata;

    let _ = writeln!(out, "Validation report for {}", meta.target);
    let _ = writeln!(out, "Timestamp: {}", meta.timestamp);
    let _ = writeln!(out, "Standards: {}", versions_line(report));
    let _ = writeln!(out, "Duration: {} ms", meta.duration_ms);
    let _ = writeln!(out);
    let _ = writeln!(out, "Result: {} ({})", verdict(report), counts(report));
    if report.summary.aborted {
        let _ = writeln!(out, "Stopped after the symbol table: fix duplicate names first.");
    }

    // The flat list, so sorting and truncation show up here.
    if !report.all_issues.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Issues:");
        for diag in &report.all_issues {
            let _ = writeln!(out, "  {}", text_line(diag));
        }
    }
    if report.truncated > 0 {
        let _ = writeln!(out, "  ... {} not shown", plural(report.truncated, "more issue"));
    }
    out
}

fn text_line(diag: &Diagnostic) -> String {
    match &diag.node.construct {
        Some(construct) => format!("{diag} [{construct}]"),
        None => diag.to_string(),
    }
}

pub(super) fn markdown(report: &ValidationReport) -> String {
    let mut out = String::new();
    let meta = &report.metadata;

    let _ = writeln!(out, "# Validation report: {}", meta.target);
    let _ = writeln!(out);
    let _ = writeln!(out, "| Field | Value |");
    let _ = writeln!(out, "|---|---|");
    let _ = writeln!(out, "| Timestamp | {} |", meta.timestamp);
    let _ = writeln!(out, "| Standards | {} |", versions_line(report));
    let _ = writeln!(out, "| Duration | {} ms |", meta.duration_ms);
    let _ = writeln!(out, "| Result | **{}** |", verdict(report));
    let _ = writeln!(out);
    let _ = writeln!(out, "## Summary");
    let _ = writeln!(out);
    let _ = writeln!(out, "- Errors: {}", report.summary.errors);
    let _ = writeln!(out, "- Warnings: {}", report.summary.warnings);
    let _ = writeln!(out, "- Hints: {}", report.summary.hints);

    for (stage, issues) in &report.results {
        if issues.is_empty() {
            continue;
        }
        let _ = writeln!(out);
        let _ = writeln!(out, "## {}", stage.title());
        let _ = writeln!(out);
        let _ = writeln!(out, "| Severity | Code | Construct | Message |");
        let _ = writeln!(out, "|---|---|---|---|");
        for diag in issues {
            let _ = writeln!(
                out,
                "| {} | {} | {} | {} |",
                diag.severity,
                diag.code.as_deref().unwrap_or(""),
                escape_cell(diag.node.construct.as_deref().unwrap_or("")),
                escape_cell(&diag.message),
            );
        }
    }
    out
}

fn escape_cell(s: &str) -> String {
    s.replace('|', "\\|").replace('\n', " ")
}
