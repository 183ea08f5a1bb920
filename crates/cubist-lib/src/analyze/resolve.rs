//! Reference resolution with suggestions.
//!
//! Every by-name reference in a program goes through here, so undefined and
//! wrong-kind messages read the same regardless of the construct.

use cubist_core::Span;

use super::symbol_table::{Symbol, SymbolKind, SymbolTable};
use super::types::{ComponentInfo, ComponentKind, CubeType};
use super::utils::{quoted_list, suggest};
use crate::Diagnostics;
use crate::diagnostics::DiagnosticKind;

pub struct ReferenceResolver<'t> {
    table: &'t SymbolTable,
}

impl<'t> ReferenceResolver<'t> {
    pub fn new(table: &'t SymbolTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &'t SymbolTable {
        self.table
    }

    /// Resolve a declaration reference and check its kind.
    ///
    /// `context` names the referencing construct, e.g. `Slice 'S'`.
    pub fn validate_reference(
        &self,
        name: &str,
        expected: &[SymbolKind],
        context: &str,
        span: Option<Span>,
        diag: &mut Diagnostics,
    ) -> Option<&'t Symbol> {
        let Some(symbol) = self.table.resolve_global(name) else {
            let wanted = SymbolKind::describe(expected);
            let mut message = format!("{context} references undefined {wanted} '{name}'");
            let all = self.table.all_global_symbols();
            if let Some(similar) = suggest(name, &all) {
                message.push_str(&format!(". Did you mean '{similar}'?"));
            } else {
                let relevant = self.table.symbols_of_kind(expected);
                if relevant.is_empty() {
                    message.push_str(&format!(". No {wanted} is declared"));
                } else {
                    message.push_str(&format!(". Available: {}", quoted_list(&relevant)));
                }
            }
            diag.report(DiagnosticKind::UndefinedReference, span)
                .message(message)
                .emit();
            return None;
        };

        if !expected.contains(&symbol.kind) {
            diag.report(DiagnosticKind::WrongSymbolKind, span)
                .message(format!(
                    "{context} references '{name}', but it is {}, not {}",
                    with_article(symbol.kind.as_str()),
                    with_article(&SymbolKind::describe(expected)),
                ))
                .related_to(format!("'{name}' is declared here"), symbol.span)
                .emit();
            return None;
        }

        Some(symbol)
    }

    /// Resolve a component of one cube and check its role.
    pub fn validate_component_reference<'c>(
        &self,
        cube: &'c CubeType,
        name: &str,
        expected: &[ComponentKind],
        context: &str,
        span: Option<Span>,
        diag: &mut Diagnostics,
    ) -> Option<&'c ComponentInfo> {
        let Some(component) = cube.get(name) else {
            report_undefined_component(cube, name, expected, context, span, diag);
            return None;
        };

        if !expected.contains(&component.kind) {
            diag.report(DiagnosticKind::WrongComponentKind, span)
                .message(format!(
                    "{context}: '{name}' is referenced as {}, but it is {}",
                    with_article(&describe_components(expected)),
                    component.kind.with_article(),
                ))
                .emit();
            return None;
        }

        Some(component)
    }
}

/// Undefined component, with a suggestion or the list of candidates.
pub fn report_undefined_component(
    cube: &CubeType,
    name: &str,
    expected: &[ComponentKind],
    context: &str,
    span: Option<Span>,
    diag: &mut Diagnostics,
) {
    let wanted = describe_components(expected);
    let mut message = format!("{context} references undefined {wanted} '{name}'");
    if let Some(similar) = suggest(name, &cube.names()) {
        message.push_str(&format!(". Did you mean '{similar}'?"));
    } else {
        let relevant: Vec<&str> = cube
            .iter()
            .filter(|(_, c)| expected.is_empty() || expected.contains(&c.kind))
            .map(|(n, _)| n)
            .collect();
        if !relevant.is_empty() {
            message.push_str(&format!(". Available: {}", quoted_list(&relevant)));
        }
    }
    diag.report(DiagnosticKind::UndefinedComponent, span)
        .message(message)
        .emit();
}

pub fn describe_components(kinds: &[ComponentKind]) -> String {
    match kinds {
        [] => "component".to_string(),
        [only] => only.as_str().to_string(),
        [init @ .., last] => {
            let head: Vec<&str> = init.iter().map(|k| k.as_str()).collect();
            format!("{} or {}", head.join(", "), last.as_str())
        }
    }
}

fn with_article(noun: &str) -> String {
    let article = match noun.chars().next() {
        Some('a' | 'e' | 'i' | 'o' | 'u') => "an",
        _ => "a",
    };
    format!("{article} {noun}")
}
