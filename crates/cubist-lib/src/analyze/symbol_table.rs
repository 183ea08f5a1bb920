//! Symbol table: the global namespace of a program.
//!
//! Every named declaration gets one `Symbol`. Concepts live in their own
//! `(namespace, name)` scope so the same name may appear in two namespaces;
//! clashes inside one namespace are the concept validator's business. Concepts
//! in the default namespace share the global scope with every other construct.

use cubist_core::{Declaration, Program, Span};
use indexmap::IndexMap;

use super::types::CubeType;
use super::visitor::{Visitor, walk_program};
use crate::Diagnostics;
use crate::diagnostics::DiagnosticKind;

/// Namespace used by concepts that do not declare one.
pub const DEFAULT_NAMESPACE: &str = "default";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    Cube,
    Slice,
    Model,
    Derive,
    Aggregate,
    Display,
    Concept,
}

impl SymbolKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cube => "cube",
            Self::Slice => "slice",
            Self::Model => "model",
            Self::Derive => "derive",
            Self::Aggregate => "aggregate",
            Self::Display => "display",
            Self::Concept => "concept",
        }
    }

    /// Joins kinds for messages: "cube", "cube or slice", "cube, slice or model".
    pub fn describe(kinds: &[SymbolKind]) -> String {
        match kinds {
            [] => String::new(),
            [only] => only.as_str().to_string(),
            [init @ .., last] => {
                let head: Vec<&str> = init.iter().map(|k| k.as_str()).collect();
                format!("{} or {}", head.join(", "), last.as_str())
            }
        }
    }
}

impl std::fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a symbol stands for beyond its kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SymbolType {
    /// A cube owns its component namespace.
    Cube(CubeType),
    /// Slices, models, derives, aggregates and displays reference their input by name.
    View { input: String },
    Concept { namespace: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    pub name: String,
    pub kind: SymbolKind,
    pub ty: SymbolType,
    pub span: Option<Span>,
}

#[derive(Clone, Debug, Default)]
pub struct SymbolTable {
    globals: IndexMap<String, Symbol>,
    concepts: IndexMap<(String, String), Symbol>,
    /// Slice name → measures it retains, for `resolve_cube`.
    slice_measures: IndexMap<String, Vec<String>>,
    /// Slice name → dimensions it fixes, for `resolve_cube`.
    slice_fixed: IndexMap<String, Vec<String>>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the table for one program snapshot.
    ///
    /// A name defined twice keeps its first entry; the second site is reported.
    pub fn build(program: &Program) -> (Self, Diagnostics) {
        let mut builder = TableBuilder {
            table: Self::new(),
            diag: Diagnostics::new(),
        };
        walk_program(&mut builder, program);
        tracing::debug!(
            symbols = builder.table.len(),
            concepts = builder.table.concepts.len(),
            errors = builder.diag.error_count(),
            "symbol table built"
        );
        (builder.table, builder.diag)
    }

    /// Look up a global name. Falls back to concepts in the default namespace.
    pub fn resolve_global(&self, name: &str) -> Option<&Symbol> {
        self.globals
            .get(name)
            .or_else(|| self.resolve_concept(DEFAULT_NAMESPACE, name))
    }

    pub fn resolve_concept(&self, namespace: &str, name: &str) -> Option<&Symbol> {
        self.concepts
            .get(&(namespace.to_string(), name.to_string()))
    }

    /// Names of all global symbols, in declaration order.
    pub fn all_global_symbols(&self) -> Vec<&str> {
        self.globals.keys().map(String::as_str).collect()
    }

    pub fn symbols_of_kind(&self, kinds: &[SymbolKind]) -> Vec<&str> {
        self.globals
            .values()
            .filter(|s| kinds.contains(&s.kind))
            .map(|s| s.name.as_str())
            .collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.globals.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.globals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.globals.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Symbol> {
        self.globals.values()
    }

    /// Component namespace visible through `name`.
    ///
    /// Cubes answer directly; slices follow their source, keep only the
    /// measures they select and mark the dimensions they fix. Anything else,
    /// or a slice chain that loops, has none.
    pub fn resolve_cube(&self, name: &str) -> Option<CubeType> {
        let mut chain: Vec<&str> = Vec::new();
        let mut current = name;
        let mut cube = loop {
            if chain.contains(&current) {
                return None;
            }
            let symbol = self.globals.get(current)?;
            match (&symbol.kind, &symbol.ty) {
                (SymbolKind::Cube, SymbolType::Cube(cube)) => break cube.clone(),
                (SymbolKind::Slice, SymbolType::View { input }) => {
                    chain.push(current);
                    current = input;
                }
                _ => return None,
            }
        };

        // Innermost slice first, so narrower selections apply last.
        for slice in chain.iter().rev() {
            if let Some(measures) = self.slice_measures.get(*slice) {
                cube.retain_measures(measures);
            }
            if let Some(fixed) = self.slice_fixed.get(*slice) {
                cube.fix_dimensions(fixed);
            }
        }
        Some(cube)
    }
}

struct TableBuilder {
    table: SymbolTable,
    diag: Diagnostics,
}

impl TableBuilder {
    fn insert(&mut self, symbol: Symbol) {
        if let Some(existing) = self.table.resolve_global(&symbol.name) {
            let existing = (existing.kind, existing.span);
            self.report_duplicate(&symbol, existing);
            return;
        }
        self.table.globals.insert(symbol.name.clone(), symbol);
    }

    fn insert_concept(&mut self, namespace: String, symbol: Symbol) {
        if namespace == DEFAULT_NAMESPACE
            && let Some(existing) = self.table.globals.get(&symbol.name)
        {
            let existing = (existing.kind, existing.span);
            self.report_duplicate(&symbol, existing);
            return;
        }
        // Same-namespace concept clashes are reported by the concept validator.
        self.table
            .concepts
            .entry((namespace, symbol.name.clone()))
            .or_insert(symbol);
    }

    fn report_duplicate(&mut self, symbol: &Symbol, (kind, span): (SymbolKind, Option<Span>)) {
        self.diag
            .report(DiagnosticKind::DuplicateDefinition, symbol.span)
            .message(&symbol.name)
            .construct(&symbol.name)
            .related_to(format!("first defined here as a {kind}"), span)
            .emit();
    }
}

impl Visitor for TableBuilder {
    fn visit_declaration(&mut self, decl: &Declaration) {
        let (kind, ty) = match decl {
            Declaration::Cube(cube) => {
                let cube_type = CubeType::from_decl(cube);
                (SymbolKind::Cube, SymbolType::Cube(cube_type))
            }
            Declaration::Slice(slice) => {
                if !slice.fix.is_empty() {
                    self.table
                        .slice_fixed
                        .entry(slice.name.clone())
                        .or_insert_with(|| slice.fix.keys().cloned().collect());
                }
                if let Some(measures) = &slice.measures {
                    self.table
                        .slice_measures
                        .entry(slice.name.clone())
                        .or_insert_with(|| measures.clone());
                }
                let input = slice.source_ref.clone();
                (SymbolKind::Slice, SymbolType::View { input })
            }
            Declaration::Model(model) => {
                let input = model.input_ref.clone();
                (SymbolKind::Model, SymbolType::View { input })
            }
            Declaration::Derive(derive) => {
                let input = derive.input_ref.clone();
                (SymbolKind::Derive, SymbolType::View { input })
            }
            Declaration::Aggregate(aggregate) => {
                let input = aggregate.input_ref.clone();
                (SymbolKind::Aggregate, SymbolType::View { input })
            }
            Declaration::Display(display) => {
                let input = display.source_ref.clone();
                (SymbolKind::Display, SymbolType::View { input })
            }
            Declaration::Concept(concept) => {
                let namespace = concept
                    .namespace
                    .clone()
                    .unwrap_or_else(|| DEFAULT_NAMESPACE.to_string());
                let symbol = Symbol {
                    name: concept.name.clone(),
                    kind: SymbolKind::Concept,
                    ty: SymbolType::Concept {
                        namespace: namespace.clone(),
                    },
                    span: concept.span,
                };
                self.insert_concept(namespace, symbol);
                return;
            }
            Declaration::Standards(_) => return,
        };

        // Untitled displays are anonymous.
        let Some(name) = decl.name() else {
            return;
        };
        self.insert(Symbol {
            name: name.to_string(),
            kind,
            ty,
            span: decl.span(),
        });
    }
}
