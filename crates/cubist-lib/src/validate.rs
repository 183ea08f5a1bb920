//! Validation pipeline.
//!
//! Runs every pass over one program and pools the diagnostics per stage.
//! Duplicate names make every later stage meaningless, so symbol-table errors
//! end the run; after that, every stage runs regardless of earlier findings.

use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use cubist_core::{Declaration, Program};
use indexmap::IndexMap;
use serde::Serialize;

use crate::analyze::aggregate::validate_aggregate;
use crate::analyze::derive::validate_derive;
use crate::analyze::display::validate_display;
use crate::analyze::model::validate_model;
use crate::analyze::slice::validate_slice;
use crate::analyze::{ReferenceResolver, SymbolTable, validate_concepts, validate_no_cycles};
use crate::standards::{IntegrityChecker, RuleRegistry, VersionCatalog, VersionManager};
use crate::{Diagnostic, Diagnostics};

const DEFAULT_TARGET: &str = "program";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Stage {
    Symbols,
    Slices,
    Models,
    Derives,
    Aggregates,
    Displays,
    Dependencies,
    Integrity,
    Conformance,
    Versions,
    Concepts,
}

impl Stage {
    pub const ALL: &'static [Stage] = &[
        Self::Symbols,
        Self::Slices,
        Self::Models,
        Self::Derives,
        Self::Aggregates,
        Self::Displays,
        Self::Dependencies,
        Self::Integrity,
        Self::Conformance,
        Self::Versions,
        Self::Concepts,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Symbols => "symbols",
            Self::Slices => "slices",
            Self::Models => "models",
            Self::Derives => "derives",
            Self::Aggregates => "aggregates",
            Self::Displays => "displays",
            Self::Dependencies => "dependencies",
            Self::Integrity => "integrity",
            Self::Conformance => "conformance",
            Self::Versions => "versions",
            Self::Concepts => "concepts",
        }
    }

    /// Heading used by the text and Markdown reports.
    pub fn title(self) -> &'static str {
        match self {
            Self::Symbols => "Symbol table",
            Self::Slices => "Slices",
            Self::Models => "Models",
            Self::Derives => "Derivations",
            Self::Aggregates => "Aggregations",
            Self::Displays => "Displays",
            Self::Dependencies => "Dependencies",
            Self::Integrity => "Integrity constraints",
            Self::Conformance => "Conformance rules",
            Self::Versions => "Standard versions",
            Self::Concepts => "Concepts",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

pub struct ValidationConfig {
    pub target: String,
    pub rules: Option<RuleRegistry>,
    pub catalog: VersionCatalog,
}

pub struct ValidationBuilder<'p> {
    program: &'p Program,
    config: ValidationConfig,
}

impl<'p> ValidationBuilder<'p> {
    pub fn new(program: &'p Program) -> Self {
        let config = ValidationConfig {
            target: DEFAULT_TARGET.to_string(),
            rules: None,
            catalog: VersionCatalog::default(),
        };
        Self { program, config }
    }

    /// Identifier reported in the report metadata.
    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.config.target = target.into();
        self
    }

    /// Replaces the built-in conformance registry.
    pub fn with_rules(mut self, rules: RuleRegistry) -> Self {
        self.config.rules = Some(rules);
        self
    }

    pub fn with_catalog(mut self, catalog: VersionCatalog) -> Self {
        self.config.catalog = catalog;
        self
    }

    pub fn run(self) -> ValidationOutcome {
        let started_at = Utc::now();
        let clock = Instant::now();
        let program = self.program;
        let config = self.config;

        let mut results: IndexMap<Stage, Diagnostics> = IndexMap::new();
        let mut versions = VersionManager::new(config.catalog);
        versions.load_from_program(program);

        let (table, symbol_diag) = SymbolTable::build(program);
        let aborted = symbol_diag.has_errors();
        results.insert(Stage::Symbols, symbol_diag);

        if aborted {
            tracing::warn!(id = %config.target, "symbol errors, skipping later stages");
        } else {
            run_construct_stages(program, &table, &mut results);

            results.insert(Stage::Dependencies, validate_no_cycles(program));
            results.insert(
                Stage::Integrity,
                IntegrityChecker::new(program, &table).check_all(),
            );
            let rules = config.rules.unwrap_or_default();
            results.insert(Stage::Conformance, rules.validate_program(program));
            results.insert(Stage::Versions, versions.validate_versions());
            results.insert(Stage::Concepts, validate_concepts(program));
        }

        for (stage, diag) in &results {
            tracing::debug!(
                stage = stage.as_str(),
                errors = diag.error_count(),
                warnings = diag.warning_count(),
                "stage finished"
            );
        }

        let outcome = ValidationOutcome {
            target: config.target,
            started_at,
            duration: clock.elapsed(),
            versions: versions.effective_versions(),
            results,
            aborted,
        };
        tracing::info!(
            id = %outcome.target,
            errors = outcome.error_count(),
            warnings = outcome.warning_count(),
            "validation finished"
        );
        outcome
    }
}

/// One pass per construct kind; each declaration's findings are tagged with its name.
fn run_construct_stages(
    program: &Program,
    table: &SymbolTable,
    results: &mut IndexMap<Stage, Diagnostics>,
) {
    let resolver = ReferenceResolver::new(table);
    for stage in [
        Stage::Slices,
        Stage::Models,
        Stage::Derives,
        Stage::Aggregates,
        Stage::Displays,
    ] {
        results.insert(stage, Diagnostics::new());
    }

    for decl in program.iter() {
        let mut local = Diagnostics::new();
        let stage = match decl {
            Declaration::Slice(slice) => {
                validate_slice(slice, &resolver, &mut local);
                Stage::Slices
            }
            Declaration::Model(model) => {
                validate_model(model, &resolver, &mut local);
                Stage::Models
            }
            Declaration::Derive(derive) => {
                validate_derive(derive, &resolver, &mut local);
                Stage::Derives
            }
            Declaration::Aggregate(aggregate) => {
                validate_aggregate(aggregate, &resolver, &mut local);
                Stage::Aggregates
            }
            Declaration::Display(display) => {
                validate_display(display, &resolver, &mut local);
                Stage::Displays
            }
            Declaration::Cube(_) | Declaration::Concept(_) | Declaration::Standards(_) => {
                continue;
            }
        };

        let construct = match decl {
            Declaration::Display(display) => display.label(),
            _ => decl.name().unwrap_or_default().to_string(),
        };
        let tagged = local.into_iter().map(|mut d| {
            if d.node.construct.is_none() {
                d.node.construct = Some(construct.clone());
            }
            d
        });
        results.entry(stage).or_default().extend(tagged.collect());
    }
}

/// Everything one run produced.
#[derive(Debug, Clone)]
pub struct ValidationOutcome {
    pub target: String,
    pub started_at: DateTime<Utc>,
    pub duration: Duration,
    /// Standard versions in effect, declared or default.
    pub versions: IndexMap<String, String>,
    pub results: IndexMap<Stage, Diagnostics>,
    /// Set when symbol-table errors stopped the run.
    pub aborted: bool,
}

impl ValidationOutcome {
    pub fn stage(&self, stage: Stage) -> Option<&Diagnostics> {
        self.results.get(&stage)
    }

    /// All diagnostics in stage order.
    pub fn diagnostics(&self) -> impl Iterator<Item = &Diagnostic> {
        self.results.values().flat_map(|diag| diag.iter())
    }

    pub fn all_diagnostics(&self) -> Diagnostics {
        self.diagnostics().cloned().collect()
    }

    pub fn error_count(&self) -> usize {
        self.results.values().map(Diagnostics::error_count).sum()
    }

    pub fn warning_count(&self) -> usize {
        self.results.values().map(Diagnostics::warning_count).sum()
    }

    pub fn hint_count(&self) -> usize {
        self.results.values().map(Diagnostics::hint_count).sum()
    }

    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    /// No errors. Warnings and hints do not fail a run.
    pub fn passed(&self) -> bool {
        !self.has_errors()
    }
}

/// Validates with the built-in rules and catalog.
pub fn validate(program: &Program) -> ValidationOutcome {
    ValidationBuilder::new(program).run()
}
