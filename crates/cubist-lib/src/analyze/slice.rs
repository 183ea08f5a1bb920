//! Slice validation.

use cubist_core::SliceDecl;

use super::expr::ExprChecker;
use super::resolve::ReferenceResolver;
use super::symbol_table::SymbolKind;
use super::types::ComponentKind;
use crate::Diagnostics;
use crate::diagnostics::DiagnosticKind;

pub fn validate_slice(
    slice: &SliceDecl,
    resolver: &ReferenceResolver<'_>,
    diag: &mut Diagnostics,
) {
    let context = format!("Slice '{}'", slice.name);
    let source = resolver.validate_reference(
        &slice.source_ref,
        &[SymbolKind::Cube, SymbolKind::Slice],
        &context,
        slice.span,
        diag,
    );
    // A looping slice chain has no cube; the dependency pass reports it.
    let Some(cube) = source.and_then(|_| resolver.table().resolve_cube(&slice.source_ref)) else {
        return;
    };

    let fix_context = format!("{context} fix");
    for (name, value) in &slice.fix {
        let Some(component) = resolver.validate_component_reference(
            &cube,
            name,
            &[ComponentKind::Dimension, ComponentKind::Attribute],
            &fix_context,
            slice.span,
            diag,
        ) else {
            continue;
        };
        if component.fixed {
            report_already_fixed(slice, name, "fix", diag);
            continue;
        }
        if !component.ty.accepts_literal(value) {
            diag.report(DiagnosticKind::TypeMismatch, slice.span)
                .message(format!(
                    "{context}: cannot fix '{name}' of type {} to {value}",
                    component.ty
                ))
                .emit();
        }
    }

    let vary_context = format!("{context} vary");
    for name in &slice.vary {
        let component = resolver.validate_component_reference(
            &cube,
            name,
            &[ComponentKind::Dimension],
            &vary_context,
            slice.span,
            diag,
        );
        if component.is_some_and(|c| c.fixed) {
            report_already_fixed(slice, name, "vary", diag);
        }
        if slice.fix.contains_key(name) {
            diag.report(DiagnosticKind::FixVaryOverlap, slice.span)
                .message(format!("{context}: '{name}' appears in both fix and vary"))
                .emit();
        }
    }

    if let Some(measures) = &slice.measures {
        let measures_context = format!("{context} measures");
        for name in measures {
            resolver.validate_component_reference(
                &cube,
                name,
                &[ComponentKind::Measure],
                &measures_context,
                slice.span,
                diag,
            );
        }
    }

    if let Some(clause) = &slice.where_clause {
        ExprChecker::new(&cube, &context).check_condition(clause, "where clause", diag);
    }
}

fn report_already_fixed(slice: &SliceDecl, name: &str, clause: &str, diag: &mut Diagnostics) {
    diag.report(DiagnosticKind::AlreadyFixed, slice.span)
        .message(format!(
            "Slice '{}' cannot {clause} '{name}': it is already fixed by '{}'",
            slice.name, slice.source_ref
        ))
        .emit();
}
