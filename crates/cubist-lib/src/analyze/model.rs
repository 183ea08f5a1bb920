//! Model and formula validation.
//!
//! Formulas use Wilkinson notation. Only variable leaves matter here: numeric
//! literals, including the intercept markers `1` and `0`, are not variables.

use std::fmt;

use cubist_core::{Expr, ModelDecl, Span};

use super::resolve::{ReferenceResolver, report_undefined_component};
use super::symbol_table::SymbolKind;
use super::types::{ComponentKind, CubeType};
use super::utils::suggest;
use super::visitor::Visitor;
use crate::Diagnostics;
use crate::diagnostics::DiagnosticKind;

/// Error distribution of a generalized linear model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    Gaussian,
    Binomial,
    Poisson,
    Gamma,
}

impl Family {
    pub const ALL: &'static [Family] =
        &[Self::Gaussian, Self::Binomial, Self::Poisson, Self::Gamma];

    pub fn name(self) -> &'static str {
        match self {
            Self::Gaussian => "Gaussian",
            Self::Binomial => "Binomial",
            Self::Poisson => "Poisson",
            Self::Gamma => "Gamma",
        }
    }

    /// Case-insensitive lookup.
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|f| f.name().eq_ignore_ascii_case(name))
    }

    /// Links the family admits. The first entry is the canonical link.
    pub fn allowed_links(self) -> &'static [Link] {
        match self {
            Self::Gaussian => &[Link::Identity, Link::Log, Link::Inverse],
            Self::Binomial => &[Link::Logit, Link::Probit, Link::Cloglog, Link::Log],
            Self::Poisson => &[Link::Log, Link::Identity, Link::Sqrt],
            Self::Gamma => &[Link::Inverse, Link::Identity, Link::Log],
        }
    }

    pub fn canonical_link(self) -> Link {
        self.allowed_links()[0]
    }

    pub fn is_compatible(self, link: Link) -> bool {
        self.allowed_links().contains(&link)
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Link {
    Identity,
    Log,
    Inverse,
    Logit,
    Probit,
    Cloglog,
    Sqrt,
}

impl Link {
    pub const ALL: &'static [Link] = &[
        Self::Identity,
        Self::Log,
        Self::Inverse,
        Self::Logit,
        Self::Probit,
        Self::Cloglog,
        Self::Sqrt,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Identity => "Identity",
            Self::Log => "Log",
            Self::Inverse => "Inverse",
            Self::Logit => "Logit",
            Self::Probit => "Probit",
            Self::Cloglog => "Cloglog",
            Self::Sqrt => "Sqrt",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|l| l.name().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Variable names in a formula side, in first-seen order, without duplicates.
pub fn collect_variables(expr: &Expr) -> Vec<String> {
    struct Collector(Vec<String>);

    impl Visitor for Collector {
        fn visit_ref(&mut self, name: &str, _span: Option<Span>) {
            if !self.0.iter().any(|n| n == name) {
                self.0.push(name.to_string());
            }
        }
    }

    let mut collector = Collector(Vec::new());
    collector.visit_expr(expr);
    collector.0
}

/// Validate one model declaration.
pub fn validate_model(
    model: &ModelDecl,
    resolver: &ReferenceResolver<'_>,
    diag: &mut Diagnostics,
) {
    let context = format!("Model '{}'", model.name);
    let input = resolver.validate_reference(
        &model.input_ref,
        &[SymbolKind::Cube, SymbolKind::Slice],
        &context,
        model.span,
        diag,
    );

    if input.is_some()
        && let Some(cube) = resolver.table().resolve_cube(&model.input_ref)
    {
        FormulaCheck {
            cube: &cube,
            context: &context,
            span: model.formula.span.or(model.span),
        }
        .run(model, resolver, diag);
    }

    check_family_and_link(model, &context, diag);
}

struct FormulaCheck<'a> {
    cube: &'a CubeType,
    context: &'a str,
    span: Option<Span>,
}

impl FormulaCheck<'_> {
    fn run(&self, model: &ModelDecl, resolver: &ReferenceResolver<'_>, diag: &mut Diagnostics) {
        self.check_response(&model.formula.response, diag);
        self.check_predictors(&model.formula.predictors, diag);

        let Some(random) = &model.random else {
            return;
        };
        if let Some(terms) = &random.terms {
            self.check_predictors(terms, diag);
        }
        resolver.validate_component_reference(
            self.cube,
            &random.group,
            &[ComponentKind::Dimension],
            &format!("{} random effects group", self.context),
            random.span.or(self.span),
            diag,
        );
    }

    fn check_response(&self, response: &Expr, diag: &mut Diagnostics) {
        let span = response.span().or(self.span);
        let variables = collect_variables(response);
        let name = match variables.as_slice() {
            [single] => single,
            [] => {
                diag.report(DiagnosticKind::InvalidResponse, span)
                    .message(format!("{}: response must name a measure variable", self.context))
                    .emit();
                return;
            }
            several => {
                let names: Vec<String> = several.iter().map(|n| format!("'{n}'")).collect();
                diag.report(DiagnosticKind::InvalidResponse, span)
                    .message(format!(
                        "{}: response must be a single measure, found {}",
                        self.context,
                        names.join(", ")
                    ))
                    .emit();
                return;
            }
        };

        match self.cube.kind_of(name) {
            None => report_undefined_component(
                self.cube,
                name,
                &[ComponentKind::Measure],
                self.context,
                span,
                diag,
            ),
            Some(ComponentKind::Measure) => {}
            Some(kind) => {
                diag.report(DiagnosticKind::InvalidResponse, span)
                    .message(format!(
                        "{}: Response variable '{name}' must be a measure, but it is {}",
                        self.context,
                        kind.with_article()
                    ))
                    .emit();
            }
        }
    }

    fn check_predictors(&self, predictors: &Expr, diag: &mut Diagnostics) {
        let span = predictors.span().or(self.span);
        for name in collect_variables(predictors) {
            match self.cube.kind_of(&name) {
                None => report_undefined_component(
                    self.cube,
                    &name,
                    &[ComponentKind::Dimension, ComponentKind::Measure],
                    self.context,
                    span,
                    diag,
                ),
                Some(ComponentKind::Attribute) => {
                    diag.report(DiagnosticKind::InvalidPredictor, span)
                        .message(format!(
                            "{}: Predictor variable '{name}' cannot be an attribute",
                            self.context
                        ))
                        .emit();
                }
                Some(_) => {}
            }
        }
    }
}

fn check_family_and_link(model: &ModelDecl, context: &str, diag: &mut Diagnostics) {
    let family = Family::parse(&model.family);
    if family.is_none() {
        let names: Vec<&str> = Family::ALL.iter().map(|f| f.name()).collect();
        let mut message = format!("{context}: unknown family '{}'", model.family);
        match suggest(&model.family, &names) {
            Some(similar) => message.push_str(&format!(". Did you mean '{similar}'?")),
            None => message.push_str(&format!(". Known families: {}", names.join(", "))),
        }
        diag.report(DiagnosticKind::UnknownFamily, model.span)
            .message(message)
            .emit();
    }

    let Some(link_name) = &model.link else {
        if let Some(family) = family {
            diag.report(DiagnosticKind::CanonicalLinkAssumed, model.span)
                .message(format!(
                    "{context}: no link given, using the canonical {} link for family {family}",
                    family.canonical_link()
                ))
                .emit();
        }
        return;
    };

    let Some(link) = Link::parse(link_name) else {
        let names: Vec<&str> = Link::ALL.iter().map(|l| l.name()).collect();
        let mut message = format!("{context}: unknown link '{link_name}'");
        if let Some(similar) = suggest(link_name, &names) {
            message.push_str(&format!(". Did you mean '{similar}'?"));
        }
        diag.report(DiagnosticKind::UnknownLink, model.span)
            .message(message)
            .emit();
        return;
    };

    let Some(family) = family else {
        return;
    };
    if !family.is_compatible(link) {
        let allowed: Vec<&str> = family.allowed_links().iter().map(|l| l.name()).collect();
        diag.report(DiagnosticKind::IncompatibleLink, model.span)
            .message(format!("{context}: link '{link}' is not compatible with family '{family}'"))
            .hint(format!("{family} supports: {}", allowed.join(", ")))
            .emit();
    }
}
