//! Dispatch logic: extract params from ArgMatches and convert to command args.
//!
//! `*Params` mirror the command `*Args` but are populated from clap; the
//! `From` impls resolve the parts that depend on the environment (color).

use std::path::PathBuf;

use clap::ArgMatches;
use cubist_lib::ReportFormat;

use super::ColorChoice;
use crate::commands::check::CheckArgs;
use crate::commands::rules::RulesArgs;

pub struct CheckParams {
    pub program_path: PathBuf,
    pub source_path: Option<PathBuf>,
    pub format: ReportFormat,
    pub rules_path: Option<PathBuf>,
    pub target: Option<String>,
    pub no_warnings: bool,
    pub sort_by_severity: bool,
    pub max_issues: Option<usize>,
    pub strict: bool,
    pub color: ColorChoice,
}

impl CheckParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            program_path: m
                .get_one::<PathBuf>("program_path")
                .cloned()
                .unwrap_or_else(|| PathBuf::from("-")),
            source_path: m.get_one::<PathBuf>("source_path").cloned(),
            format: parse_format(m),
            rules_path: m.get_one::<PathBuf>("rules_path").cloned(),
            target: m.get_one::<String>("target").cloned(),
            no_warnings: m.get_flag("no_warnings"),
            sort_by_severity: m.get_flag("sort_by_severity"),
            max_issues: m.get_one::<usize>("max_issues").copied(),
            strict: m.get_flag("strict"),
            color: parse_color(m),
        }
    }
}

impl From<CheckParams> for CheckArgs {
    fn from(p: CheckParams) -> Self {
        Self {
            program_path: p.program_path,
            source_path: p.source_path,
            format: p.format,
            rules_path: p.rules_path,
            target: p.target,
            include_warnings: !p.no_warnings,
            sort_by_severity: p.sort_by_severity,
            max_issues: p.max_issues,
            strict: p.strict,
            color: p.color.should_colorize(),
        }
    }
}

pub struct RulesParams {
    pub domain: Option<String>,
    pub rules_path: Option<PathBuf>,
}

impl RulesParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            domain: m.get_one::<String>("domain").cloned(),
            rules_path: m.get_one::<PathBuf>("rules_path").cloned(),
        }
    }
}

impl From<RulesParams> for RulesArgs {
    fn from(p: RulesParams) -> Self {
        Self {
            domain: p.domain,
            rules_path: p.rules_path,
        }
    }
}

/// Parse --format into a report format. clap restricts the values.
fn parse_format(m: &ArgMatches) -> ReportFormat {
    m.get_one::<String>("format")
        .and_then(|s| s.parse().ok())
        .unwrap_or_default()
}

/// Parse --color flag into ColorChoice.
fn parse_color(m: &ArgMatches) -> ColorChoice {
    match m.get_one::<String>("color").map(|s| s.as_str()) {
        Some("always") => ColorChoice::Always,
        Some("never") => ColorChoice::Never,
        _ => ColorChoice::Auto,
    }
}
