//! AST builders and dump helpers for unit tests.

use cubist_core::{
    AggregateDecl, Aggregation, CodeEntry, Component, ConceptDecl, CubeDecl, CubeStructure,
    Declaration, Derivation, DeriveDecl, DisplayDecl, Expr, Formula, Literal, ModelDecl, Program,
    Property, SliceDecl, StandardEntry, StandardsDecl, TypeExpr,
};
use indexmap::IndexMap;

use crate::Diagnostics;

pub struct CubeBuilder {
    cube: CubeDecl,
}

impl CubeBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            cube: CubeDecl {
                name: name.to_string(),
                domain: None,
                class: None,
                structure: CubeStructure::default(),
                span: None,
            },
        }
    }

    pub fn domain(mut self, domain: &str) -> Self {
        self.cube.domain = Some(domain.to_string());
        self
    }

    pub fn class(mut self, class: &str) -> Self {
        self.cube.class = Some(class.to_string());
        self
    }

    pub fn dimension(mut self, name: &str, ty: TypeExpr) -> Self {
        self.cube.structure.dimensions.push(Component::new(name, ty));
        self
    }

    pub fn measure(mut self, name: &str, ty: TypeExpr) -> Self {
        self.cube.structure.measures.push(Component::new(name, ty));
        self
    }

    pub fn attribute(mut self, name: &str, ty: TypeExpr) -> Self {
        self.cube.structure.attributes.push(Component::new(name, ty));
        self
    }

    pub fn optional_measure(mut self, name: &str, ty: TypeExpr) -> Self {
        let mut component = Component::new(name, ty);
        component.optional = true;
        self.cube.structure.measures.push(component);
        self
    }

    pub fn build(self) -> CubeDecl {
        self.cube
    }

    pub fn decl(self) -> Declaration {
        Declaration::Cube(self.cube)
    }
}

pub struct SliceBuilder {
    slice: SliceDecl,
}

impl SliceBuilder {
    pub fn new(name: &str, source: &str) -> Self {
        Self {
            slice: SliceDecl {
                name: name.to_string(),
                source_ref: source.to_string(),
                fix: IndexMap::new(),
                vary: Vec::new(),
                measures: None,
                where_clause: None,
                span: None,
            },
        }
    }

    pub fn fix(mut self, name: &str, value: impl Into<Literal>) -> Self {
        self.slice.fix.insert(name.to_string(), value.into());
        self
    }

    pub fn vary(mut self, names: &[&str]) -> Self {
        self.slice.vary = names.iter().map(|n| n.to_string()).collect();
        self
    }

    pub fn measures(mut self, names: &[&str]) -> Self {
        self.slice.measures = Some(names.iter().map(|n| n.to_string()).collect());
        self
    }

    pub fn where_clause(mut self, expr: Expr) -> Self {
        self.slice.where_clause = Some(expr);
        self
    }

    pub fn build(self) -> SliceDecl {
        self.slice
    }

    pub fn decl(self) -> Declaration {
        Declaration::Slice(self.slice)
    }
}

pub fn model(
    name: &str,
    input: &str,
    response: Expr,
    predictors: Expr,
    family: &str,
    link: Option<&str>,
) -> ModelDecl {
    ModelDecl {
        name: name.to_string(),
        input_ref: input.to_string(),
        formula: Formula {
            response,
            predictors,
            span: None,
        },
        family: family.to_string(),
        link: link.map(str::to_string),
        random: None,
        span: None,
    }
}

pub fn derive(name: &str, input: &str, derivations: Vec<(&str, Expr)>) -> DeriveDecl {
    DeriveDecl {
        name: name.to_string(),
        input_ref: input.to_string(),
        derivations: derivations
            .into_iter()
            .map(|(target, expression)| Derivation {
                target: target.to_string(),
                expression,
                span: None,
            })
            .collect(),
        span: None,
    }
}

pub fn aggregate(
    name: &str,
    input: &str,
    group_by: &[&str],
    aggregations: Vec<(&str, &str, Option<Expr>)>,
) -> AggregateDecl {
    AggregateDecl {
        name: name.to_string(),
        input_ref: input.to_string(),
        group_by: group_by.iter().map(|n| n.to_string()).collect(),
        aggregations: aggregations
            .into_iter()
            .map(|(target, function, expression)| Aggregation {
                target: target.to_string(),
                function: function.to_string(),
                expression,
                span: None,
            })
            .collect(),
        span: None,
    }
}

pub fn display(display_type: &str, source: &str) -> DisplayDecl {
    DisplayDecl {
        name: None,
        display_type: display_type.to_string(),
        title: None,
        source_ref: source.to_string(),
        span: None,
    }
}

pub fn concept(
    name: &str,
    namespace: Option<&str>,
    parent: Option<&str>,
    properties: &[(&str, &str)],
) -> ConceptDecl {
    ConceptDecl {
        name: name.to_string(),
        namespace: namespace.map(str::to_string),
        parent_type: parent.map(str::to_string),
        properties: properties
            .iter()
            .map(|(n, t)| Property {
                name: n.to_string(),
                type_name: t.to_string(),
                span: None,
            })
            .collect(),
        code_lists: Vec::new(),
        span: None,
    }
}

pub fn codelist(name: &str, codes: &[&str]) -> ConceptDecl {
    let mut decl = concept(name, None, None, &[]);
    decl.code_lists = codes
        .iter()
        .map(|c| CodeEntry {
            code: c.to_string(),
            label: None,
            span: None,
        })
        .collect();
    decl
}

pub fn standards(entries: &[(&str, &str)]) -> Declaration {
    Declaration::Standards(StandardsDecl {
        entries: entries
            .iter()
            .map(|(s, v)| StandardEntry {
                standard: s.to_string(),
                version: v.to_string(),
                span: None,
            })
            .collect(),
        span: None,
    })
}

pub fn program(declarations: Vec<Declaration>) -> Program {
    Program::new(declarations)
}

/// `ADADAS{dims: USUBJID, AVISIT; measures: AVAL, CHG}`.
pub fn adadas() -> CubeBuilder {
    CubeBuilder::new("ADADAS")
        .dimension("USUBJID", TypeExpr::Identifier)
        .dimension("AVISIT", TypeExpr::Text)
        .measure("AVAL", TypeExpr::numeric())
        .measure("CHG", TypeExpr::numeric())
}

/// Subject-level cube with a treatment attribute.
pub fn adsl() -> CubeBuilder {
    CubeBuilder::new("ADSL")
        .dimension("USUBJID", TypeExpr::Identifier)
        .dimension("TRT01P", TypeExpr::Text)
        .measure("AGE", TypeExpr::Integer)
        .measure("WEIGHT", TypeExpr::numeric_in("kg"))
        .attribute("SITEID", TypeExpr::Text)
}

/// One line per diagnostic, plain format.
pub fn dump(diag: &Diagnostics) -> String {
    diag.printer().render()
}
