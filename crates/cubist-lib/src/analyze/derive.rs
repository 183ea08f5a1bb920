//! Derive validation.
//!
//! Derivations are checked in order against a growing scope: each target is
//! visible to the ones after it, typed as whatever its expression produced.

use cubist_core::DeriveDecl;

use super::expr::ExprChecker;
use super::resolve::ReferenceResolver;
use super::symbol_table::SymbolKind;
use super::types::ComponentKind;
use crate::Diagnostics;
use crate::diagnostics::DiagnosticKind;

pub fn validate_derive(
    derive: &DeriveDecl,
    resolver: &ReferenceResolver<'_>,
    diag: &mut Diagnostics,
) {
    let context = format!("Derive '{}'", derive.name);
    let input = resolver.validate_reference(
        &derive.input_ref,
        &[SymbolKind::Cube, SymbolKind::Slice],
        &context,
        derive.span,
        diag,
    );
    let Some(mut scope) = input.and_then(|_| resolver.table().resolve_cube(&derive.input_ref))
    else {
        return;
    };

    for derivation in &derive.derivations {
        let span = derivation.span.or(derive.span);
        if let Some(existing) = scope.kind_of(&derivation.target) {
            diag.report(DiagnosticKind::ShadowedComponent, span)
                .message(format!(
                    "{context}: target '{}' shadows existing {existing} '{}'",
                    derivation.target, derivation.target
                ))
                .emit();
        }

        let target_context = format!("{context} target '{}'", derivation.target);
        let ty = ExprChecker::new(&scope, &target_context).check(&derivation.expression, diag);
        scope.insert(derivation.target.clone(), ComponentKind::Measure, ty);
    }
}
