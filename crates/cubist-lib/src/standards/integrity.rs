//! Structural integrity constraints over cubes and slices.
//!
//! Numbering follows the data-cube integrity constraint table; only the
//! constraints that apply to declarations (rather than observations) are
//! checked. Every diagnostic carries the constraint id as its code.

use cubist_core::{CubeDecl, Declaration, Literal, Program, SliceDecl};
use indexmap::{IndexMap, IndexSet};

use crate::Diagnostics;
use crate::analyze::{ComponentKind, SymbolTable, Type};
use crate::diagnostics::DiagnosticKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntegrityConstraint {
    /// Every cube declares at least one measure.
    Ic3,
    /// Every dimension declares a usable range.
    Ic4,
    /// Coded values reference a declared code list.
    Ic5,
    /// Only attributes may be optional.
    Ic6,
    /// A slice fixes or varies every dimension.
    Ic10,
    /// Component names are unique within a cube.
    Ic12,
    /// A slice selects at least one measure.
    Ic14,
    /// Fixed coded values come from their code list.
    Ic19,
}

impl IntegrityConstraint {
    pub const ALL: &'static [IntegrityConstraint] = &[
        Self::Ic3,
        Self::Ic4,
        Self::Ic5,
        Self::Ic6,
        Self::Ic10,
        Self::Ic12,
        Self::Ic14,
        Self::Ic19,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Self::Ic3 => "IC-3",
            Self::Ic4 => "IC-4",
            Self::Ic5 => "IC-5",
            Self::Ic6 => "IC-6",
            Self::Ic10 => "IC-10",
            Self::Ic12 => "IC-12",
            Self::Ic14 => "IC-14",
            Self::Ic19 => "IC-19",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.id().eq_ignore_ascii_case(id))
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Ic3 => "cube declares at least one measure",
            Self::Ic4 => "dimensions declare a range",
            Self::Ic5 => "coded values reference a declared code list",
            Self::Ic6 => "only attributes may be optional",
            Self::Ic10 => "slices specify every dimension",
            Self::Ic12 => "component names are unique within a cube",
            Self::Ic14 => "slices select at least one measure",
            Self::Ic19 => "fixed codes come from the code list",
        }
    }
}

impl std::fmt::Display for IntegrityConstraint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

/// Code lists declared by concepts, keyed by concept name.
pub type CodeLists<'p> = IndexMap<&'p str, IndexSet<&'p str>>;

pub fn collect_code_lists(program: &Program) -> CodeLists<'_> {
    let mut lists = CodeLists::new();
    for concept in program.concepts() {
        if concept.code_lists.is_empty() {
            continue;
        }
        let codes = lists.entry(concept.name.as_str()).or_default();
        codes.extend(concept.code_lists.iter().map(|entry| entry.code.as_str()));
    }
    lists
}

pub struct IntegrityChecker<'p> {
    program: &'p Program,
    table: &'p SymbolTable,
    code_lists: CodeLists<'p>,
}

impl<'p> IntegrityChecker<'p> {
    pub fn new(program: &'p Program, table: &'p SymbolTable) -> Self {
        Self {
            program,
            table,
            code_lists: collect_code_lists(program),
        }
    }

    /// Every constraint, then the duplicate-slice warning.
    pub fn check_all(&self) -> Diagnostics {
        let mut diag = Diagnostics::new();
        for &constraint in IntegrityConstraint::ALL {
            diag.extend(self.check(constraint));
        }
        self.check_duplicate_slices(&mut diag);
        diag
    }

    pub fn check(&self, constraint: IntegrityConstraint) -> Diagnostics {
        let mut diag = Diagnostics::new();
        for decl in self.program.iter() {
            match decl {
                Declaration::Cube(cube) => self.check_cube(constraint, cube, &mut diag),
                Declaration::Slice(slice) => self.check_slice(constraint, slice, &mut diag),
                _ => {}
            }
        }
        tracing::trace!(constraint = constraint.id(), violations = diag.len(), "integrity");
        diag
    }

    fn check_cube(&self, constraint: IntegrityConstraint, cube: &CubeDecl, diag: &mut Diagnostics) {
        let structure = &cube.structure;
        match constraint {
            IntegrityConstraint::Ic3 => {
                if structure.measures.is_empty() {
                    violation(diag, constraint, &cube.name, cube.span)
                        .message(format!("Cube '{}' declares no measures", cube.name))
                        .emit();
                }
            }
            IntegrityConstraint::Ic4 => {
                for dim in &structure.dimensions {
                    if Type::from_type_expr(&dim.ty).has_declared_range() {
                        continue;
                    }
                    violation(diag, constraint, &cube.name, dim.span.or(cube.span))
                        .message(format!(
                            "Cube '{}': dimension '{}' declares no range",
                            cube.name, dim.name
                        ))
                        .hint("name the code list the dimension draws from")
                        .emit();
                }
            }
            IntegrityConstraint::Ic5 => {
                for component in cube.components() {
                    let Type::CodedValue(list) = Type::from_type_expr(&component.ty) else {
                        continue;
                    };
                    if self.code_lists.contains_key(list.as_str()) {
                        continue;
                    }
                    violation(diag, constraint, &cube.name, component.span.or(cube.span))
                        .message(format!(
                            "Cube '{}': component '{}' references undeclared code list '{list}'",
                            cube.name, component.name
                        ))
                        .emit();
                }
            }
            IntegrityConstraint::Ic6 => {
                let required = [
                    (ComponentKind::Dimension, &structure.dimensions),
                    (ComponentKind::Measure, &structure.measures),
                ];
                for (kind, components) in required {
                    for component in components.iter().filter(|c| c.optional) {
                        violation(diag, constraint, &cube.name, component.span.or(cube.span))
                            .message(format!(
                                "Cube '{}': {kind} '{}' is optional, but only attributes may be optional",
                                cube.name, component.name
                            ))
                            .emit();
                    }
                }
            }
            IntegrityConstraint::Ic12 => {
                let mut seen = IndexSet::new();
                let mut reported = IndexSet::new();
                for component in cube.components() {
                    let name = component.name.as_str();
                    if seen.insert(name) || !reported.insert(name) {
                        continue;
                    }
                    violation(diag, constraint, &cube.name, component.span.or(cube.span))
                        .message(format!(
                            "Cube '{}' declares component '{name}' more than once",
                            cube.name
                        ))
                        .emit();
                }
            }
            _ => {}
        }
    }

    fn check_slice(
        &self,
        constraint: IntegrityConstraint,
        slice: &SliceDecl,
        diag: &mut Diagnostics,
    ) {
        // Unresolvable sources are reported by reference resolution.
        let Some(cube) = self.table.resolve_cube(&slice.source_ref) else {
            return;
        };

        match constraint {
            IntegrityConstraint::Ic10 => {
                // Dimensions pinned by an upstream slice are already specified.
                let missing: Vec<&str> = cube
                    .free_dimensions()
                    .into_iter()
                    .filter(|dim| {
                        !slice.fix.contains_key(*dim) && !slice.vary.iter().any(|v| v == dim)
                    })
                    .collect();
                if missing.is_empty() {
                    return;
                }
                let missing = missing
                    .iter()
                    .map(|m| format!("'{m}'"))
                    .collect::<Vec<_>>()
                    .join(", ");
                violation(diag, constraint, &slice.name, slice.span)
                    .message(format!(
                        "Slice '{}' does not specify all dimensions of '{}': missing {missing}",
                        slice.name, slice.source_ref
                    ))
                    .hint("add the missing dimensions to `fix` or `vary`")
                    .emit();
            }
            IntegrityConstraint::Ic14 => {
                let selected = match &slice.measures {
                    Some(names) => names
                        .iter()
                        .filter(|m| cube.kind_of(m) == Some(ComponentKind::Measure))
                        .count(),
                    None => cube.measures().len(),
                };
                if selected == 0 {
                    violation(diag, constraint, &slice.name, slice.span)
                        .message(format!("Slice '{}' selects no measures", slice.name))
                        .emit();
                }
            }
            IntegrityConstraint::Ic19 => {
                for (name, value) in &slice.fix {
                    let Some(Type::CodedValue(list)) = cube.type_of(name) else {
                        continue;
                    };
                    let Literal::Text(code) = value else {
                        continue;
                    };
                    // Undeclared lists are IC-5's concern.
                    let Some(codes) = self.code_lists.get(list.as_str()) else {
                        continue;
                    };
                    if codes.contains(code.as_str()) {
                        continue;
                    }
                    violation(diag, constraint, &slice.name, slice.span)
                        .message(format!(
                            "Slice '{}': '{code}' is not a code of '{list}' (fixing '{name}')",
                            slice.name
                        ))
                        .emit();
                }
            }
            _ => {}
        }
    }

    fn check_duplicate_slices(&self, diag: &mut Diagnostics) {
        let mut shapes: IndexMap<SliceShape, &SliceDecl> = IndexMap::new();
        for slice in self.program.slices() {
            let shape = SliceShape::of(slice);
            let Some(first) = shapes.get(&shape) else {
                shapes.insert(shape, slice);
                continue;
            };
            diag.report(DiagnosticKind::DuplicateSlice, slice.span)
                .construct(&slice.name)
                .message(format!(
                    "Slice '{}' selects the same cells as slice '{}'",
                    slice.name, first.name
                ))
                .related_to(format!("'{}' is declared here", first.name), first.span)
                .emit();
        }
    }
}

fn violation<'d>(
    diag: &'d mut Diagnostics,
    constraint: IntegrityConstraint,
    construct: &str,
    span: Option<cubist_core::Span>,
) -> crate::diagnostics::DiagnosticBuilder<'d> {
    diag.report(DiagnosticKind::IntegrityViolation, span)
        .code(constraint.id())
        .construct(construct)
}

/// Order-insensitive identity of a slice: source, fixed values, varied and selected names.
#[derive(Debug, PartialEq, Eq, Hash)]
struct SliceShape {
    source: String,
    fix: Vec<(String, String)>,
    vary: Vec<String>,
    measures: Option<Vec<String>>,
}

impl SliceShape {
    fn of(slice: &SliceDecl) -> Self {
        let mut fix: Vec<(String, String)> = slice
            .fix
            .iter()
            .map(|(name, value)| (name.clone(), value.to_string()))
            .collect();
        fix.sort();
        let mut vary = slice.vary.clone();
        vary.sort();
        let measures = slice.measures.clone().map(|mut m| {
            m.sort();
            m
        });
        Self {
            source: slice.source_ref.clone(),
            fix,
            vary,
            measures,
        }
    }
}
