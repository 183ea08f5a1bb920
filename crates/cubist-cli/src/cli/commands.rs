//! Command builders for the CLI.
//!
//! Each command is built using the shared arg builders from `args.rs`.

use clap::Command;

use super::args::*;

/// Build the complete CLI with all subcommands.
pub fn build_cli() -> Command {
    Command::new("cubist")
        .about("Validate cube-oriented statistical analysis specifications")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(check_command())
        .subcommand(rules_command())
}

/// Validate a program and print the report.
pub fn check_command() -> Command {
    Command::new("check")
        .about("Validate a program and print the report")
        .override_usage(
            "\
  cubist check <PROGRAM>
  cubist check <PROGRAM> --format json
  cubist check - < program.json",
        )
        .after_help(
            r#"EXAMPLES:
  cubist check study.json                          # text report
  cubist check study.json --source study.cubist    # with source snippets
  cubist check study.json -f markdown --no-warnings
  cubist check study.json --rules sponsor.json     # custom rule registry
  cubist check study.json --strict                 # warnings fail the run"#,
        )
        .arg(program_path_arg())
        .arg(source_file_arg())
        .arg(format_arg())
        .arg(rules_file_arg())
        .arg(target_arg())
        .arg(no_warnings_arg())
        .arg(sort_by_severity_arg())
        .arg(max_issues_arg())
        .arg(strict_arg())
        .arg(color_arg())
}

/// List conformance rules.
pub fn rules_command() -> Command {
    Command::new("rules")
        .about("List conformance rules")
        .after_help(
            r#"EXAMPLES:
  cubist rules                      # built-in registry
  cubist rules -d DM                # rules for the DM domain
  cubist rules --rules sponsor.json # a custom registry"#,
        )
        .arg(domain_arg())
        .arg(rules_file_arg())
}
