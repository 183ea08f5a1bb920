use std::path::PathBuf;

use cubist_lib::{Diagnostics, ReportConfig, ReportFormat, ValidationBuilder};

use super::program_loader::{default_target, load_program, load_rules, read_input};

pub struct CheckArgs {
    pub program_path: PathBuf,
    pub source_path: Option<PathBuf>,
    pub format: ReportFormat,
    pub rules_path: Option<PathBuf>,
    pub target: Option<String>,
    pub include_warnings: bool,
    pub sort_by_severity: bool,
    pub max_issues: Option<usize>,
    pub strict: bool,
    pub color: bool,
}

/// Everything `check` prints.
pub struct CheckOutput {
    /// The report, for stdout.
    pub report: String,
    /// Diagnostics with source snippets, for stderr.
    pub snippets: Option<String>,
    pub passed: bool,
}

pub fn run(args: CheckArgs) {
    let output = match check(&args) {
        Ok(output) => output,
        Err(msg) => {
            eprintln!("error: {}", msg);
            std::process::exit(1);
        }
    };

    if let Some(snippets) = &output.snippets {
        eprint!("{}", snippets);
    }
    print!("{}", output.report);

    if !output.passed {
        std::process::exit(1);
    }
}

pub fn check(args: &CheckArgs) -> Result<CheckOutput, String> {
    let program = load_program(&args.program_path).map_err(|e| e.to_string())?;
    let rules = load_rules(args.rules_path.as_deref()).map_err(|e| e.to_string())?;
    let target = args
        .target
        .clone()
        .unwrap_or_else(|| default_target(&args.program_path));

    let outcome = ValidationBuilder::new(&program)
        .with_target(target)
        .with_rules(rules)
        .run();

    let config = ReportConfig::default()
        .with_include_warnings(args.include_warnings)
        .with_sort_by_severity(args.sort_by_severity)
        .with_max_issues(args.max_issues);
    let report = outcome.report(&config);
    let rendered = report.render(args.format).map_err(|e| e.to_string())?;

    // Snippets only make sense next to the human-readable report.
    let snippets = match (&args.source_path, args.format) {
        (Some(path), ReportFormat::Text) if !report.all_issues.is_empty() => {
            let source = read_input(path).map_err(|e| e.to_string())?;
            let path_str = path.to_string_lossy();
            let diagnostics: Diagnostics = report.all_issues.iter().cloned().collect();
            Some(
                diagnostics
                    .printer()
                    .source(&source)
                    .path(&path_str)
                    .colored(args.color)
                    .render(),
            )
        }
        _ => None,
    };

    let passed = if args.strict {
        report.summary.errors == 0 && report.summary.warnings == 0
    } else {
        report.passed()
    };

    Ok(CheckOutput {
        report: rendered,
        snippets,
        passed,
    })
}
