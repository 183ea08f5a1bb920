//! Domain-specific conformance rules.
//!
//! Rules are data: a registry is loaded from JSON and each rule names the
//! domains or dataset structures it applies to plus one check. The built-in
//! registry is a representative sample and can be replaced wholesale.

use cubist_core::{CubeDecl, Program};
use regex_automata::dfa::{Automaton, StartKind, dense};
use regex_automata::Input;
use serde::{Deserialize, Serialize};

use crate::analyze::{CubeType, Type};
use crate::diagnostics::DiagnosticKind;
use crate::{Diagnostics, Error, Result, Severity};

const BUILT_IN: &str = include_str!("rules/cdisc.json");

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RuleCheck {
    /// Every listed variable is present.
    RequiredVariables { variables: Vec<String> },
    /// At least one listed variable is present.
    RequiredAny { variables: Vec<String> },
    /// Variables whose name matches `pattern` are Date or DateTime.
    IsoDate { pattern: String },
    /// `start` and `end` are declared together, with the same temporal type.
    DatePair { start: String, end: String },
    Conditional {
        if_present: String,
        then_required: Vec<String>,
    },
    /// `variable`, when present, is coded against `codelist`.
    Codelist { variable: String, codelist: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConformanceRule {
    pub id: String,
    pub description: String,
    #[serde(default)]
    pub severity: Severity,
    #[serde(default)]
    pub domains: Vec<String>,
    #[serde(default)]
    pub structures: Vec<String>,
    pub check: RuleCheck,
    #[serde(skip)]
    pattern: Option<dense::DFA<Vec<u32>>>,
}

impl ConformanceRule {
    pub fn applies_to_domain(&self, domain: &str) -> bool {
        self.domains.iter().any(|d| d.eq_ignore_ascii_case(domain))
    }

    pub fn applies_to_structure(&self, structure: &str) -> bool {
        self.structures.iter().any(|s| s.eq_ignore_ascii_case(structure))
    }

    fn compile(&mut self) -> Result<()> {
        let RuleCheck::IsoDate { pattern } = &self.check else {
            return Ok(());
        };
        let dfa = dense::DFA::builder()
            .configure(dense::DFA::config().start_kind(StartKind::Unanchored))
            .build(pattern)
            .map_err(|e| Error::InvalidRulePattern {
                rule: self.id.clone(),
                message: e.to_string(),
            })?;
        self.pattern = Some(dfa);
        Ok(())
    }

    fn name_matches(&self, name: &str) -> bool {
        let Some(dfa) = &self.pattern else {
            return false;
        };
        dfa.try_search_fwd(&Input::new(name))
            .map(|found| found.is_some())
            .unwrap_or(false)
    }

    /// Runs this rule's check against one cube.
    pub fn evaluate(&self, cube_name: &str, cube: &CubeType) -> Vec<RuleViolation> {
        let mut out = Vec::new();
        let mut violate = |variable: Option<&str>, message: String| {
            out.push(RuleViolation {
                rule_id: self.id.clone(),
                severity: self.severity,
                variable: variable.map(str::to_string),
                message: format!("Cube '{cube_name}': {message}"),
            });
        };

        match &self.check {
            RuleCheck::RequiredVariables { variables } => {
                for var in variables.iter().filter(|v| !cube.contains(v)) {
                    let message = format!("required variable '{var}' is missing");
                    violate(Some(var.as_str()), message);
                }
            }
            RuleCheck::RequiredAny { variables } => {
                if !variables.iter().any(|v| cube.contains(v)) {
                    let names = variables
                        .iter()
                        .map(|v| format!("'{v}'"))
                        .collect::<Vec<_>>()
                        .join(", ");
                    violate(None, format!("expected one of {names}, found none"));
                }
            }
            RuleCheck::IsoDate { .. } => {
                for (name, info) in cube.iter() {
                    if !self.name_matches(name) || info.ty.is_temporal() || info.ty.is_error() {
                        continue;
                    }
                    let message =
                        format!("'{name}' must be an ISO 8601 Date or DateTime, found {}", info.ty);
                    violate(Some(name), message);
                }
            }
            RuleCheck::DatePair { start, end } => {
                match (cube.type_of(start), cube.type_of(end)) {
                    (Some(_), None) => {
                        let message = format!("'{start}' is present without '{end}'");
                        violate(Some(start.as_str()), message)
                    }
                    (None, Some(_)) => {
                        let message = format!("'{end}' is present without '{start}'");
                        violate(Some(end.as_str()), message)
                    }
                    (Some(a), Some(b)) if a != b => violate(
                        Some(end.as_str()),
                        format!("'{start}' is {a} but '{end}' is {b}"),
                    ),
                    _ => {}
                }
            }
            RuleCheck::Conditional {
                if_present,
                then_required,
            } => {
                if cube.contains(if_present) {
                    for var in then_required.iter().filter(|v| !cube.contains(v)) {
                        violate(
                            Some(var.as_str()),
                            format!("'{if_present}' is present, so '{var}' is required"),
                        );
                    }
                }
            }
            RuleCheck::Codelist { variable, codelist } => {
                if let Some(ty) = cube.type_of(variable) {
                    let coded = matches!(ty, Type::CodedValue(list) if list == codelist);
                    if !coded && !ty.is_error() {
                        let message = format!(
                            "'{variable}' should be coded against code list '{codelist}', found {ty}"
                        );
                        violate(Some(variable.as_str()), message);
                    }
                }
            }
        }

        tracing::trace!(
            rule = %self.id,
            cube = cube_name,
            violations = out.len(),
            "rule evaluated"
        );
        out
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleViolation {
    pub rule_id: String,
    pub severity: Severity,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variable: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RuleFile {
    version: String,
    rules: Vec<ConformanceRule>,
}

#[derive(Debug, Clone)]
pub struct RuleRegistry {
    version: String,
    rules: Vec<ConformanceRule>,
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::built_in()
    }
}

impl RuleRegistry {
    /// Loads a registry. Rule ids must be unique and patterns must compile.
    pub fn from_json(json: &str) -> Result<Self> {
        let file: RuleFile = serde_json::from_str(json).map_err(|source| Error::Decode {
            what: "rule registry",
            source,
        })?;

        let mut rules: Vec<ConformanceRule> = Vec::with_capacity(file.rules.len());
        for mut rule in file.rules {
            if rules.iter().any(|r| r.id == rule.id) {
                return Err(Error::DuplicateRule(rule.id));
            }
            rule.compile()?;
            rules.push(rule);
        }

        tracing::debug!(version = %file.version, rules = rules.len(), "rule registry loaded");
        Ok(Self {
            version: file.version,
            rules,
        })
    }

    /// The embedded CDISC sample registry.
    pub fn built_in() -> Self {
        Self::from_json(BUILT_IN).expect("embedded rule registry is valid")
    }

    pub fn empty() -> Self {
        Self {
            version: String::new(),
            rules: Vec::new(),
        }
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn rules(&self) -> &[ConformanceRule] {
        &self.rules
    }

    pub fn get(&self, id: &str) -> Option<&ConformanceRule> {
        self.rules.iter().find(|r| r.id == id)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn get_rules_for_domain(&self, domain: &str) -> Vec<&ConformanceRule> {
        self.rules
            .iter()
            .filter(|r| r.applies_to_domain(domain))
            .collect()
    }

    pub fn get_rules_for_structure(&self, structure: &str) -> Vec<&ConformanceRule> {
        self.rules
            .iter()
            .filter(|r| r.applies_to_structure(structure))
            .collect()
    }

    /// Rules of `domain`, plus those of the cube's dataset structure.
    pub fn validate_with_rules(&self, cube: &CubeDecl, domain: &str) -> Vec<RuleViolation> {
        let structure = cube_structure(cube, domain);
        let cube_type = CubeType::from_decl(cube);
        self.rules
            .iter()
            .filter(|r| {
                r.applies_to_domain(domain)
                    || structure.is_some_and(|s| r.applies_to_structure(s))
            })
            .flat_map(|r| r.evaluate(&cube.name, &cube_type))
            .collect()
    }

    pub fn validate_program(&self, program: &Program) -> Diagnostics {
        let mut diag = Diagnostics::new();
        for cube in program.cubes() {
            for violation in self.validate_with_rules(cube, cube.effective_domain()) {
                diag.report(DiagnosticKind::ConformanceViolation, cube.span)
                    .message(violation.message)
                    .severity(violation.severity)
                    .code(violation.rule_id)
                    .construct(&cube.name)
                    .emit();
            }
        }
        diag
    }
}

/// Declared class, else `ADSL` for the subject-level domain.
pub fn cube_structure<'c>(cube: &'c CubeDecl, domain: &str) -> Option<&'c str> {
    if let Some(class) = &cube.class {
        return Some(class.as_str());
    }
    domain.eq_ignore_ascii_case("ADSL").then_some("ADSL")
}
