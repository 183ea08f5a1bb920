//! Aggregated validation report.
//!
//! One [`ValidationReport`] is built from a [`ValidationOutcome`] and a
//! [`ReportConfig`]; the JSON, text and Markdown renderings all read from it.

mod render;

#[cfg(test)]
mod tests;

use std::str::FromStr;

use indexmap::IndexMap;
use serde::Serialize;

use crate::validate::{Stage, ValidationOutcome};
use crate::{Diagnostic, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
    Markdown,
}

impl ReportFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Json => "json",
            Self::Markdown => "markdown",
        }
    }
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            "markdown" | "md" => Ok(Self::Markdown),
            other => Err(format!("unknown report format '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportConfig {
    /// When false, warnings and hints are left out of `results` and `allIssues`.
    pub include_warnings: bool,
    /// Stable sort of `allIssues`: errors, then warnings, then hints.
    pub sort_by_severity: bool,
    /// Truncates `allIssues` only.
    pub max_issues: Option<usize>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            include_warnings: true,
            sort_by_severity: false,
            max_issues: None,
        }
    }
}

impl ReportConfig {
    pub fn with_include_warnings(mut self, include: bool) -> Self {
        self.include_warnings = include;
        self
    }

    pub fn with_sort_by_severity(mut self, sort: bool) -> Self {
        self.sort_by_severity = sort;
        self
    }

    pub fn with_max_issues(mut self, max: Option<usize>) -> Self {
        self.max_issues = max;
        self
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportMetadata {
    pub target: String,
    /// RFC 3339, UTC.
    pub timestamp: String,
    pub standard_versions: IndexMap<String, String>,
    pub duration_ms: u64,
}

/// Counts over every diagnostic the run produced, before any filtering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    pub errors: usize,
    pub warnings: usize,
    pub hints: usize,
    pub total: usize,
    pub passed: bool,
    pub aborted: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub metadata: ReportMetadata,
    pub summary: ReportSummary,
    pub results: IndexMap<Stage, Vec<Diagnostic>>,
    pub all_issues: Vec<Diagnostic>,
    /// Issues dropped from `allIssues` by `max_issues`.
    #[serde(skip_serializing_if = "is_zero")]
    pub truncated: usize,
}

fn is_zero(n: &usize) -> bool {
    *n == 0
}

impl ValidationReport {
    pub fn new(outcome: &ValidationOutcome, config: &ReportConfig) -> Self {
        let keep = |d: &&Diagnostic| config.include_warnings || d.is_error();

        let results: IndexMap<Stage, Vec<Diagnostic>> = outcome
            .results
            .iter()
            .map(|(stage, diag)| (*stage, diag.iter().filter(keep).cloned().collect()))
            .collect();

        let mut all_issues: Vec<Diagnostic> = outcome.diagnostics().filter(keep).cloned().collect();
        if config.sort_by_severity {
            all_issues.sort_by_key(|d| d.severity);
        }
        let mut truncated = 0;
        if let Some(max) = config.max_issues
            && all_issues.len() > max
        {
            truncated = all_issues.len() - max;
            all_issues.truncate(max);
        }

        let errors = outcome.error_count();
        let warnings = outcome.warning_count();
        let hints = outcome.hint_count();

        Self {
            metadata: ReportMetadata {
                target: outcome.target.clone(),
                timestamp: outcome
                    .started_at
                    .to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
                standard_versions: outcome.versions.clone(),
                duration_ms: u64::try_from(outcome.duration.as_millis()).unwrap_or(u64::MAX),
            },
            summary: ReportSummary {
                errors,
                warnings,
                hints,
                total: errors + warnings + hints,
                passed: errors == 0,
                aborted: outcome.aborted,
            },
            results,
            all_issues,
            truncated,
        }
    }

    pub fn passed(&self) -> bool {
        self.summary.passed
    }

    pub fn render(&self, format: ReportFormat) -> Result<String> {
        match format {
            ReportFormat::Text => Ok(self.render_text()),
            ReportFormat::Json => self.render_json(),
            ReportFormat::Markdown => Ok(self.render_markdown()),
        }
    }

    pub fn render_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn render_text(&self) -> String {
        render::text(self)
    }

    pub fn render_markdown(&self) -> String {
        render::markdown(self)
    }
}

impl ValidationOutcome {
    pub fn report(&self, config: &ReportConfig) -> ValidationReport {
        ValidationReport::new(self, config)
    }
}
