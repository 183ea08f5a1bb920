//! Display validation.

use cubist_core::DisplayDecl;

use super::resolve::ReferenceResolver;
use super::symbol_table::SymbolKind;
use super::utils::suggest;
use crate::Diagnostics;
use crate::diagnostics::DiagnosticKind;

pub const DISPLAY_TYPES: &[&str] = &["table", "figure", "listing"];

/// Kinds a display may present.
pub const DISPLAY_SOURCES: &[SymbolKind] = &[
    SymbolKind::Cube,
    SymbolKind::Slice,
    SymbolKind::Model,
    SymbolKind::Aggregate,
    SymbolKind::Derive,
];

pub fn validate_display(
    display: &DisplayDecl,
    resolver: &ReferenceResolver<'_>,
    diag: &mut Diagnostics,
) {
    let context = format!("Display {}", display.label());
    resolver.validate_reference(
        &display.source_ref,
        DISPLAY_SOURCES,
        &context,
        display.span,
        diag,
    );

    let known = DISPLAY_TYPES
        .iter()
        .any(|t| t.eq_ignore_ascii_case(&display.display_type));
    if !known {
        let mut message = format!("{context}: unknown display type '{}'", display.display_type);
        match suggest(&display.display_type.to_ascii_lowercase(), DISPLAY_TYPES) {
            Some(similar) => message.push_str(&format!(". Did you mean '{similar}'?")),
            None => message.push_str(&format!(". Known types: {}", DISPLAY_TYPES.join(", "))),
        }
        diag.report(DiagnosticKind::UnknownDisplayType, display.span)
            .message(message)
            .emit();
    }
}
