//! Aggregate validation.

use std::fmt;

use cubist_core::AggregateDecl;

use super::expr::ExprChecker;
use super::resolve::ReferenceResolver;
use super::symbol_table::SymbolKind;
use super::types::ComponentKind;
use super::utils::suggest;
use crate::Diagnostics;
use crate::diagnostics::DiagnosticKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregateFunction {
    Mean,
    Median,
    Sum,
    Min,
    Max,
    Sd,
    Var,
    Count,
}

impl AggregateFunction {
    pub const ALL: &'static [AggregateFunction] = &[
        Self::Mean,
        Self::Median,
        Self::Sum,
        Self::Min,
        Self::Max,
        Self::Sd,
        Self::Var,
        Self::Count,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Mean => "mean",
            Self::Median => "median",
            Self::Sum => "sum",
            Self::Min => "min",
            Self::Max => "max",
            Self::Sd => "sd",
            Self::Var => "var",
            Self::Count => "count",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|f| f.name().eq_ignore_ascii_case(name))
    }

    pub fn requires_numeric(self) -> bool {
        self != Self::Count
    }
}

impl fmt::Display for AggregateFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

pub fn validate_aggregate(
    aggregate: &AggregateDecl,
    resolver: &ReferenceResolver<'_>,
    diag: &mut Diagnostics,
) {
    let context = format!("Aggregate '{}'", aggregate.name);
    let input = resolver.validate_reference(
        &aggregate.input_ref,
        &[SymbolKind::Cube, SymbolKind::Slice],
        &context,
        aggregate.span,
        diag,
    );
    let Some(cube) = input.and_then(|_| resolver.table().resolve_cube(&aggregate.input_ref))
    else {
        return;
    };

    let group_context = format!("{context} groupBy");
    for name in &aggregate.group_by {
        resolver.validate_component_reference(
            &cube,
            name,
            &[ComponentKind::Dimension, ComponentKind::Attribute],
            &group_context,
            aggregate.span,
            diag,
        );
    }

    for aggregation in &aggregate.aggregations {
        let span = aggregation.span.or(aggregate.span);
        let target_context = format!("{context} target '{}'", aggregation.target);

        let Some(function) = AggregateFunction::parse(&aggregation.function) else {
            let names: Vec<&str> = AggregateFunction::ALL.iter().map(|f| f.name()).collect();
            let mut message = format!(
                "{target_context}: unknown aggregation function '{}'",
                aggregation.function
            );
            match suggest(&aggregation.function, &names) {
                Some(similar) => message.push_str(&format!(". Did you mean '{similar}'?")),
                None => message.push_str(&format!(". Known functions: {}", names.join(", "))),
            }
            diag.report(DiagnosticKind::UnknownAggregation, span)
                .message(message)
                .emit();
            continue;
        };

        let Some(expr) = &aggregation.expression else {
            if function.requires_numeric() {
                diag.report(DiagnosticKind::ArityMismatch, span)
                    .message(format!("{target_context}: '{function}' needs an expression"))
                    .emit();
            }
            continue;
        };

        let ty = ExprChecker::new(&cube, &target_context).check(expr, diag);
        if function.requires_numeric() && !ty.is_numeric() && !ty.is_error() {
            diag.report(DiagnosticKind::TypeMismatch, span)
                .message(format!(
                    "{target_context}: '{function}' requires a numeric expression, found {ty}"
                ))
                .emit();
        }
    }
}
