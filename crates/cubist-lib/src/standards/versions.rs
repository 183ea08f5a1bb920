//! Standard versions: the catalog of known standards and the per-run manager
//! that records which versions a program declares.

use cubist_core::{Program, Span};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::Diagnostics;
use crate::analyze::utils::suggest;
use crate::diagnostics::DiagnosticKind;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandardSpec {
    pub name: String,
    pub default_version: String,
    pub supported: Vec<String>,
}

impl StandardSpec {
    pub fn new(name: &str, default_version: &str, supported: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            default_version: default_version.to_string(),
            supported: supported.iter().map(|v| v.to_string()).collect(),
        }
    }

    pub fn supports(&self, version: &str) -> bool {
        self.supported.iter().any(|v| v == version)
    }
}

/// Which versions of `secondary` go with each version of `primary`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompatibilityMatrix {
    pub primary: String,
    pub secondary: String,
    pub versions: IndexMap<String, Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionCatalog {
    standards: Vec<StandardSpec>,
    compatibility: Vec<CompatibilityMatrix>,
}

impl Default for VersionCatalog {
    fn default() -> Self {
        Self::cdisc()
    }
}

impl VersionCatalog {
    pub fn new(standards: Vec<StandardSpec>, compatibility: Vec<CompatibilityMatrix>) -> Self {
        Self {
            standards,
            compatibility,
        }
    }

    /// SDTM, ADaM and Define-XML with the SDTM/ADaM pairing table.
    pub fn cdisc() -> Self {
        let pairs: &[(&str, &[&str])] = &[
            ("3.2", &["1.0", "1.1"]),
            ("3.3", &["1.1", "1.2"]),
            ("3.4", &["1.2", "1.3"]),
        ];
        Self {
            standards: vec![
                StandardSpec::new("SDTM", "3.4", &["3.2", "3.3", "3.4"]),
                StandardSpec::new("ADaM", "1.2", &["1.0", "1.1", "1.2", "1.3"]),
                StandardSpec::new("DefineXML", "2.1", &["2.0", "2.1"]),
            ],
            compatibility: vec![CompatibilityMatrix {
                primary: "SDTM".to_string(),
                secondary: "ADaM".to_string(),
                versions: pairs
                    .iter()
                    .map(|(v, with)| {
                        let with = with.iter().map(|w| w.to_string()).collect();
                        (v.to_string(), with)
                    })
                    .collect(),
            }],
        }
    }

    pub fn standards(&self) -> &[StandardSpec] {
        &self.standards
    }

    /// Case-insensitive lookup.
    pub fn standard(&self, name: &str) -> Option<&StandardSpec> {
        self.standards
            .iter()
            .find(|s| s.name.eq_ignore_ascii_case(name))
    }

    pub fn compatibility(&self) -> &[CompatibilityMatrix] {
        &self.compatibility
    }
}

#[derive(Debug, Clone)]
struct Declared {
    version: String,
    span: Option<Span>,
}

/// Versions in effect for one run.
#[derive(Debug, Clone, Default)]
pub struct VersionManager {
    catalog: VersionCatalog,
    /// Keyed by the catalog's spelling of the standard name.
    declared: IndexMap<String, Declared>,
    unknown: Vec<(String, Option<Span>)>,
}

impl VersionManager {
    pub fn new(catalog: VersionCatalog) -> Self {
        Self {
            catalog,
            declared: IndexMap::new(),
            unknown: Vec::new(),
        }
    }

    pub fn catalog(&self) -> &VersionCatalog {
        &self.catalog
    }

    /// Reads every standards block in document order; a later entry replaces an earlier one.
    pub fn load_from_program(&mut self, program: &Program) {
        for block in program.standards() {
            for entry in &block.entries {
                let span = entry.span.or(block.span);
                self.declare(&entry.standard, &entry.version, span);
            }
        }
        tracing::debug!(declared = self.declared.len(), "standard versions loaded");
    }

    pub fn declare(&mut self, standard: &str, version: &str, span: Option<Span>) {
        let Some(spec) = self.catalog.standard(standard) else {
            self.unknown.push((standard.to_string(), span));
            return;
        };
        let key = spec.name.clone();
        self.declared.insert(
            key,
            Declared {
                version: version.to_string(),
                span,
            },
        );
    }

    /// Declared version, else the catalog default. `None` for unknown standards.
    pub fn get_version(&self, standard: &str) -> Option<&str> {
        let spec = self.catalog.standard(standard)?;
        match self.declared.get(&spec.name) {
            Some(declared) => Some(declared.version.as_str()),
            None => Some(spec.default_version.as_str()),
        }
    }

    pub fn is_declared(&self, standard: &str) -> bool {
        self.catalog
            .standard(standard)
            .is_some_and(|spec| self.declared.contains_key(&spec.name))
    }

    /// Every catalog standard with the version in effect.
    pub fn effective_versions(&self) -> IndexMap<String, String> {
        self.catalog
            .standards()
            .iter()
            .map(|spec| {
                let version = self
                    .declared
                    .get(&spec.name)
                    .map_or(&spec.default_version, |d| &d.version);
                (spec.name.clone(), version.clone())
            })
            .collect()
    }

    pub fn reset(&mut self) {
        self.declared.clear();
        self.unknown.clear();
    }

    /// Warnings only: unknown standards, unsupported versions, and
    /// incompatible pairs where both sides were declared explicitly.
    pub fn validate_versions(&self) -> Diagnostics {
        let mut diag = Diagnostics::new();

        let known: Vec<&str> = self
            .catalog
            .standards()
            .iter()
            .map(|s| s.name.as_str())
            .collect();
        for (name, span) in &self.unknown {
            let mut message = format!("Unknown standard '{name}'");
            match suggest(name, &known) {
                Some(similar) => message.push_str(&format!(". Did you mean '{similar}'?")),
                None => message.push_str(&format!(". Known standards: {}", known.join(", "))),
            }
            diag.report(DiagnosticKind::UnknownStandard, *span)
                .message(message)
                .emit();
        }

        for (name, declared) in &self.declared {
            let Some(spec) = self.catalog.standard(name) else {
                continue;
            };
            if spec.supports(&declared.version) {
                continue;
            }
            diag.report(DiagnosticKind::UnsupportedVersion, declared.span)
                .message(format!(
                    "{name} version {} is not supported. Supported versions: {}",
                    declared.version,
                    spec.supported.join(", ")
                ))
                .emit();
        }

        for matrix in self.catalog.compatibility() {
            let (Some(primary), Some(secondary)) = (
                self.declared.get(&matrix.primary),
                self.declared.get(&matrix.secondary),
            ) else {
                continue;
            };
            // Unsupported primaries were reported above.
            let Some(compatible) = matrix.versions.get(&primary.version) else {
                continue;
            };
            if compatible.contains(&secondary.version) {
                continue;
            }
            diag.report(DiagnosticKind::IncompatibleVersions, secondary.span.or(primary.span))
                .message(format!(
                    "{} {} and {} {} have compatibility issues",
                    matrix.primary, primary.version, matrix.secondary, secondary.version
                ))
                .hint(format!(
                    "{} {} works with {} {}",
                    matrix.primary,
                    primary.version,
                    matrix.secondary,
                    compatible.join(", ")
                ))
                .emit();
        }

        diag
    }
}
