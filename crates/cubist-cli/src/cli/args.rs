//! Shared argument builders for CLI commands.
//!
//! Each function returns a `clap::Arg` that can be composed into commands.

use std::path::PathBuf;

use clap::{Arg, ArgAction, value_parser};

/// Program JSON file (positional, "-" for stdin).
pub fn program_path_arg() -> Arg {
    Arg::new("program_path")
        .value_name("PROGRAM")
        .required(true)
        .value_parser(value_parser!(PathBuf))
        .help("Program JSON file (use \"-\" for stdin)")
}

/// Specification source text, for snippets in diagnostics (--source).
pub fn source_file_arg() -> Arg {
    Arg::new("source_path")
        .long("source")
        .value_name("FILE")
        .value_parser(value_parser!(PathBuf))
        .help("Specification source the program was parsed from (enables snippets)")
}

/// Report format (--format).
pub fn format_arg() -> Arg {
    Arg::new("format")
        .long("format")
        .short('f')
        .value_name("FORMAT")
        .default_value("text")
        .value_parser(["text", "json", "markdown", "md"])
        .help("Report format")
}

/// Conformance rule registry (--rules).
pub fn rules_file_arg() -> Arg {
    Arg::new("rules_path")
        .long("rules")
        .value_name("FILE")
        .value_parser(value_parser!(PathBuf))
        .help("Conformance rule registry JSON (replaces the built-in rules)")
}

/// Report target name (--target).
pub fn target_arg() -> Arg {
    Arg::new("target")
        .long("target")
        .value_name("NAME")
        .help("Name reported in the metadata (default: program file stem)")
}

/// Leave warnings and hints out of the report (--no-warnings).
pub fn no_warnings_arg() -> Arg {
    Arg::new("no_warnings")
        .long("no-warnings")
        .action(ArgAction::SetTrue)
        .help("Only list errors")
}

/// Errors first in the issue list (--sort-by-severity).
pub fn sort_by_severity_arg() -> Arg {
    Arg::new("sort_by_severity")
        .long("sort-by-severity")
        .action(ArgAction::SetTrue)
        .help("List errors first, then warnings, then hints")
}

/// Issue list cap (--max-issues).
pub fn max_issues_arg() -> Arg {
    Arg::new("max_issues")
        .long("max-issues")
        .value_name("N")
        .value_parser(value_parser!(usize))
        .help("Show at most N issues in the flat list")
}

/// Treat warnings as errors (--strict).
pub fn strict_arg() -> Arg {
    Arg::new("strict")
        .long("strict")
        .action(ArgAction::SetTrue)
        .help("Treat warnings as errors")
}

/// Color output control (--color).
pub fn color_arg() -> Arg {
    Arg::new("color")
        .long("color")
        .value_name("WHEN")
        .default_value("auto")
        .value_parser(["auto", "always", "never"])
        .help("Colorize diagnostics")
}

/// Domain filter (--domain).
pub fn domain_arg() -> Arg {
    Arg::new("domain")
        .long("domain")
        .short('d')
        .value_name("DOMAIN")
        .help("Only list rules for this domain or dataset structure")
}
