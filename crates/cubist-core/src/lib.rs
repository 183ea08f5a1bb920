#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Core data structures for Cubist programs.
//!
//! The AST is the boundary between the external parser and the analyzer:
//! the parser emits it as JSON, `cubist-lib` consumes it read-only.

pub mod ast;

#[cfg(test)]
mod ast_tests;

pub use ast::{
    AggregateDecl, Aggregation, BinaryOp, CodeEntry, Component, ConceptDecl, CubeDecl,
    CubeStructure, Declaration, Derivation, DeriveDecl, DisplayDecl, Expr, Formula, Literal,
    ModelDecl, Program, Property, RandomEffects, SliceDecl, Span, StandardEntry, StandardsDecl,
    TypeExpr, UnaryOp,
};

/// Parse the parser's JSON output into a [`Program`].
pub fn parse_program(json: &str) -> Result<Program, serde_json::Error> {
    Program::from_json(json)
}
