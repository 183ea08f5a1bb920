//! AST Visitor pattern.
//!
//! # Usage
//!
//! Implement `Visitor` for your struct. Override `visit_*` methods to add logic.
//! Call `walk_*` within your override to continue recursion (or omit it to stop).
//!
//! ```ignore
//! impl Visitor for MyPass {
//!     fn visit_slice(&mut self, slice: &SliceDecl) {
//!         // Pre-order logic
//!         walk_slice(self, slice);
//!         // Post-order logic
//!     }
//! }
//! ```

use cubist_core::{
    AggregateDecl, ConceptDecl, CubeDecl, Declaration, DeriveDecl, DisplayDecl, Expr, Literal,
    ModelDecl, Program, SliceDecl, Span, StandardsDecl,
};

pub trait Visitor: Sized {
    fn visit_program(&mut self, program: &Program) {
        walk_program(self, program);
    }

    fn visit_declaration(&mut self, decl: &Declaration) {
        walk_declaration(self, decl);
    }

    fn visit_cube(&mut self, _cube: &CubeDecl) {
        // Leaf node
    }

    fn visit_slice(&mut self, slice: &SliceDecl) {
        walk_slice(self, slice);
    }

    fn visit_model(&mut self, model: &ModelDecl) {
        walk_model(self, model);
    }

    fn visit_derive(&mut self, derive: &DeriveDecl) {
        walk_derive(self, derive);
    }

    fn visit_aggregate(&mut self, aggregate: &AggregateDecl) {
        walk_aggregate(self, aggregate);
    }

    fn visit_display(&mut self, _display: &DisplayDecl) {
        // Leaf node
    }

    fn visit_concept(&mut self, _concept: &ConceptDecl) {
        // Leaf node
    }

    fn visit_standards(&mut self, _standards: &StandardsDecl) {
        // Leaf node
    }

    fn visit_expr(&mut self, expr: &Expr) {
        walk_expr(self, expr);
    }

    fn visit_ref(&mut self, _name: &str, _span: Option<Span>) {
        // Leaf node
    }

    fn visit_literal(&mut self, _value: &Literal, _span: Option<Span>) {
        // Leaf node
    }
}

pub fn walk_program<V: Visitor>(visitor: &mut V, program: &Program) {
    for decl in program.iter() {
        visitor.visit_declaration(decl);
    }
}

pub fn walk_declaration<V: Visitor>(visitor: &mut V, decl: &Declaration) {
    match decl {
        Declaration::Cube(cube) => visitor.visit_cube(cube),
        Declaration::Slice(slice) => visitor.visit_slice(slice),
        Declaration::Model(model) => visitor.visit_model(model),
        Declaration::Derive(derive) => visitor.visit_derive(derive),
        Declaration::Aggregate(aggregate) => visitor.visit_aggregate(aggregate),
        Declaration::Display(display) => visitor.visit_display(display),
        Declaration::Concept(concept) => visitor.visit_concept(concept),
        Declaration::Standards(standards) => visitor.visit_standards(standards),
    }
}

pub fn walk_slice<V: Visitor>(visitor: &mut V, slice: &SliceDecl) {
    if let Some(clause) = &slice.where_clause {
        visitor.visit_expr(clause);
    }
}

pub fn walk_model<V: Visitor>(visitor: &mut V, model: &ModelDecl) {
    visitor.visit_expr(&model.formula.response);
    visitor.visit_expr(&model.formula.predictors);
    if let Some(terms) = model.random.as_ref().and_then(|r| r.terms.as_ref()) {
        visitor.visit_expr(terms);
    }
}

pub fn walk_derive<V: Visitor>(visitor: &mut V, derive: &DeriveDecl) {
    for derivation in &derive.derivations {
        visitor.visit_expr(&derivation.expression);
    }
}

pub fn walk_aggregate<V: Visitor>(visitor: &mut V, aggregate: &AggregateDecl) {
    for expr in aggregate
        .aggregations
        .iter()
        .filter_map(|a| a.expression.as_ref())
    {
        visitor.visit_expr(expr);
    }
}

pub fn walk_expr<V: Visitor>(visitor: &mut V, expr: &Expr) {
    match expr {
        Expr::Ref { name, span } => visitor.visit_ref(name, *span),
        Expr::Literal { value, span } => visitor.visit_literal(value, *span),
        Expr::Binary { lhs, rhs, .. } => {
            visitor.visit_expr(lhs);
            visitor.visit_expr(rhs);
        }
        Expr::Unary { operand, .. } => visitor.visit_expr(operand),
        Expr::Call { args, .. } => {
            for arg in args {
                visitor.visit_expr(arg);
            }
        }
    }
}
