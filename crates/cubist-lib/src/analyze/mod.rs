//! Semantic analysis passes.
//!
//! - Name resolution (symbol_table, resolve)
//! - Value types and cube component namespaces (types)
//! - Expression typing (expr)
//! - Per-construct validation (slice, model, derive, aggregate, display)
//! - Cross-entity dependency cycles (dependencies)
//! - Concept hierarchy checks (concepts)

pub mod aggregate;
pub mod concepts;
pub mod dependencies;
pub mod derive;
pub mod display;
pub mod expr;
pub mod model;
pub mod resolve;
pub mod slice;
pub mod symbol_table;
pub mod types;
pub mod utils;
pub mod visitor;

#[cfg(test)]
mod dependencies_tests;
#[cfg(test)]
mod derive_tests;
#[cfg(test)]
mod expr_tests;
#[cfg(test)]
mod resolve_tests;
#[cfg(test)]
mod utils_tests;

pub use concepts::{ConceptHierarchy, validate_concepts};
pub use dependencies::{DependencyGraph, EntityId, validate_no_cycles};
pub use expr::ExprChecker;
pub use model::{Family, Link, collect_variables};
pub use resolve::ReferenceResolver;
pub use symbol_table::{Symbol, SymbolKind, SymbolTable, SymbolType};
pub use types::{ComponentKind, CubeType, Type, Unit};
pub use visitor::{Visitor, walk_declaration, walk_expr, walk_program};
