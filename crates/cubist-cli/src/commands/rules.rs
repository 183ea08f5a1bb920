use std::fmt::Write;
use std::path::PathBuf;

use cubist_lib::standards::ConformanceRule;

use super::program_loader::load_rules;

pub struct RulesArgs {
    pub domain: Option<String>,
    pub rules_path: Option<PathBuf>,
}

pub fn run(args: RulesArgs) {
    match list(&args) {
        Ok(out) => print!("{}", out),
        Err(msg) => {
            eprintln!("error: {}", msg);
            std::process::exit(1);
        }
    }
}

pub fn list(args: &RulesArgs) -> Result<String, String> {
    let registry = load_rules(args.rules_path.as_deref()).map_err(|e| e.to_string())?;

    let rules: Vec<&ConformanceRule> = registry
        .rules()
        .iter()
        .filter(|rule| match &args.domain {
            Some(d) => rule.applies_to_domain(d) || rule.applies_to_structure(d),
            None => true,
        })
        .collect();

    let mut out = String::new();
    let _ = writeln!(
        out,
        "Rule registry {} ({} of {} rules)",
        registry.version(),
        rules.len(),
        registry.len()
    );
    for rule in rules {
        let _ = writeln!(
            out,
            "  {:<8} {:<8} {:<16} {}",
            rule.id,
            rule.severity.to_string(),
            scope(rule),
            rule.description
        );
    }
    Ok(out)
}

/// Domains, then structures, comma-separated.
fn scope(rule: &ConformanceRule) -> String {
    rule.domains
        .iter()
        .chain(&rule.structures)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(",")
}
