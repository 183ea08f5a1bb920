//! Tests for CLI dispatch logic: argument parsing and params extraction.

use std::path::PathBuf;

use cubist_lib::ReportFormat;

use super::*;
use crate::cli::commands::{check_command, rules_command};
use crate::commands::check::CheckArgs;

#[test]
fn check_defaults() {
    let m = check_command()
        .try_get_matches_from(["check", "study.json"])
        .unwrap();
    let params = CheckParams::from_matches(&m);

    assert_eq!(params.program_path, PathBuf::from("study.json"));
    assert_eq!(params.format, ReportFormat::Text);
    assert_eq!(params.color, ColorChoice::Auto);
    assert!(params.source_path.is_none());
    assert!(params.rules_path.is_none());
    assert!(params.target.is_none());
    assert!(params.max_issues.is_none());
    assert!(!params.no_warnings);
    assert!(!params.sort_by_severity);
    assert!(!params.strict);
}

#[test]
fn check_all_flags() {
    let m = check_command()
        .try_get_matches_from([
            "check",
            "study.json",
            "--source",
            "study.cubist",
            "--format",
            "md",
            "--rules",
            "sponsor.json",
            "--target",
            "study-001",
            "--no-warnings",
            "--sort-by-severity",
            "--max-issues",
            "5",
            "--strict",
            "--color",
            "never",
        ])
        .unwrap();
    let params = CheckParams::from_matches(&m);

    assert_eq!(params.source_path, Some(PathBuf::from("study.cubist")));
    assert_eq!(params.format, ReportFormat::Markdown);
    assert_eq!(params.rules_path, Some(PathBuf::from("sponsor.json")));
    assert_eq!(params.target.as_deref(), Some("study-001"));
    assert_eq!(params.max_issues, Some(5));
    assert_eq!(params.color, ColorChoice::Never);
    assert!(params.no_warnings && params.sort_by_severity && params.strict);

    let args: CheckArgs = params.into();
    assert!(!args.include_warnings);
    assert!(!args.color);
}

#[test]
fn check_json_format() {
    let m = check_command()
        .try_get_matches_from(["check", "-", "-f", "json"])
        .unwrap();
    let params = CheckParams::from_matches(&m);
    assert_eq!(params.program_path, PathBuf::from("-"));
    assert_eq!(params.format, ReportFormat::Json);
}

#[test]
fn check_requires_program() {
    let result = check_command().try_get_matches_from(["check"]);
    assert!(result.is_err());
}

#[test]
fn check_rejects_unknown_format() {
    let result = check_command().try_get_matches_from(["check", "p.json", "--format", "pdf"]);
    assert!(result.is_err());
}

#[test]
fn check_rejects_non_numeric_max_issues() {
    let result =
        check_command().try_get_matches_from(["check", "p.json", "--max-issues", "many"]);
    assert!(result.is_err());
}

#[test]
fn rules_params() {
    let m = rules_command()
        .try_get_matches_from(["rules", "-d", "DM", "--rules", "sponsor.json"])
        .unwrap();
    let params = RulesParams::from_matches(&m);
    assert_eq!(params.domain.as_deref(), Some("DM"));
    assert_eq!(params.rules_path, Some(PathBuf::from("sponsor.json")));
}

#[test]
fn rules_without_flags() {
    let m = rules_command().try_get_matches_from(["rules"]).unwrap();
    let params = RulesParams::from_matches(&m);
    assert!(params.domain.is_none());
    assert!(params.rules_path.is_none());
}

#[test]
fn subcommand_is_required() {
    let result = build_cli().try_get_matches_from(["cubist"]);
    assert!(result.is_err());
}

#[test]
fn help_lists_subcommands() {
    let help = build_cli().render_help().to_string();
    assert!(help.contains("check"));
    assert!(help.contains("rules"));
}

#[test]
fn check_help_shows_flags() {
    let help = check_command().render_help().to_string();
    for flag in [
        "--source",
        "--format",
        "--rules",
        "--target",
        "--no-warnings",
        "--sort-by-severity",
        "--max-issues",
        "--strict",
        "--color",
    ] {
        assert!(help.contains(flag), "missing {flag}");
    }
}
