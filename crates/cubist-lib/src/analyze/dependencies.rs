//! Cross-entity dependency graph and cycle detection.
//!
//! Every named construct is an entity with a dense `EntityId`; edges follow
//! `sourceRef`/`inputRef`. Cycle detection is an iterative DFS over a color
//! array, so deep reference chains cannot overflow the stack.

use cubist_core::{Declaration, Program, Span};
use indexmap::{IndexMap, IndexSet};

use crate::Diagnostics;
use crate::diagnostics::DiagnosticKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(u32);

impl EntityId {
    pub fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Color {
    White,
    Grey,
    Black,
}

#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    names: Vec<String>,
    spans: Vec<Option<Span>>,
    ids: IndexMap<String, EntityId>,
    /// Indexed by `EntityId`: the entities this one reads from.
    edges: Vec<IndexSet<EntityId>>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Graph of every named construct and the names it references.
    pub fn build(program: &Program) -> Self {
        let mut graph = Self::new();
        for decl in program.iter() {
            let Some(name) = decl.name() else {
                continue;
            };
            let id = graph.intern(name);
            if graph.spans[id.index()].is_none() {
                graph.spans[id.index()] = decl.span();
            }

            let target = match decl {
                Declaration::Slice(slice) => Some(&slice.source_ref),
                Declaration::Model(model) => Some(&model.input_ref),
                Declaration::Derive(derive) => Some(&derive.input_ref),
                Declaration::Aggregate(aggregate) => Some(&aggregate.input_ref),
                Declaration::Display(display) => Some(&display.source_ref),
                Declaration::Cube(_) | Declaration::Concept(_) | Declaration::Standards(_) => None,
            };
            if let Some(target) = target {
                graph.add_edge(name, target);
            }
        }
        tracing::debug!(entities = graph.len(), "dependency graph built");
        graph
    }

    fn intern(&mut self, name: &str) -> EntityId {
        if let Some(&id) = self.ids.get(name) {
            return id;
        }
        let id = EntityId::from_raw(self.names.len() as u32);
        self.names.push(name.to_string());
        self.spans.push(None);
        self.edges.push(IndexSet::new());
        self.ids.insert(name.to_string(), id);
        id
    }

    pub fn add_edge(&mut self, from: &str, to: &str) {
        let from = self.intern(from);
        let to = self.intern(to);
        self.edges[from.index()].insert(to);
    }

    pub fn id(&self, name: &str) -> Option<EntityId> {
        self.ids.get(name).copied()
    }

    pub fn name(&self, id: EntityId) -> &str {
        &self.names[id.index()]
    }

    pub fn span(&self, id: EntityId) -> Option<Span> {
        self.spans[id.index()]
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Direct dependencies of `name`.
    pub fn dependencies(&self, name: &str) -> Vec<&str> {
        let Some(id) = self.id(name) else {
            return Vec::new();
        };
        self.edges[id.index()]
            .iter()
            .map(|&to| self.name(to))
            .collect()
    }

    /// Every cycle found, each as entity names in traversal order.
    ///
    /// Cycles are reported once regardless of which member the search entered at.
    pub fn detect_cycles(&self) -> Option<Vec<Vec<String>>> {
        let mut color = vec![Color::White; self.len()];
        let mut seen: IndexSet<Vec<EntityId>> = IndexSet::new();
        let mut cycles: Vec<Vec<EntityId>> = Vec::new();

        for root in 0..self.len() {
            if color[root] != Color::White {
                continue;
            }

            // (entity, index of the next edge to follow)
            let mut stack: Vec<(EntityId, usize)> = vec![(EntityId::from_raw(root as u32), 0)];
            color[root] = Color::Grey;

            while let Some(&mut (node, ref mut next)) = stack.last_mut() {
                let Some(&target) = self.edges[node.index()].get_index(*next) else {
                    color[node.index()] = Color::Black;
                    stack.pop();
                    continue;
                };
                *next += 1;

                match color[target.index()] {
                    Color::White => {
                        color[target.index()] = Color::Grey;
                        stack.push((target, 0));
                    }
                    Color::Grey => {
                        let start = stack
                            .iter()
                            .position(|(n, _)| *n == target)
                            .unwrap_or_default();
                        let cycle: Vec<EntityId> = stack[start..].iter().map(|(n, _)| *n).collect();
                        if seen.insert(canonical_rotation(&cycle)) {
                            cycles.push(cycle);
                        }
                    }
                    Color::Black => {}
                }
            }
        }

        if cycles.is_empty() {
            return None;
        }
        Some(
            cycles
                .into_iter()
                .map(|c| c.into_iter().map(|id| self.name(id).to_string()).collect())
                .collect(),
        )
    }

    /// Everything `name` depends on, directly or not, in discovery order.
    pub fn transitive_dependencies(&self, name: &str) -> Vec<&str> {
        let Some(start) = self.id(name) else {
            return Vec::new();
        };
        let mut visited = vec![false; self.len()];
        visited[start.index()] = true;
        let mut order = Vec::new();
        let mut stack = vec![start];

        while let Some(node) = stack.pop() {
            for &target in self.edges[node.index()].iter().rev() {
                if visited[target.index()] {
                    continue;
                }
                visited[target.index()] = true;
                order.push(target);
                stack.push(target);
            }
        }

        order.into_iter().map(|id| self.name(id)).collect()
    }

    /// Entities that reference `name` directly.
    pub fn reverse_dependencies(&self, name: &str) -> Vec<&str> {
        let Some(target) = self.id(name) else {
            return Vec::new();
        };
        self.edges
            .iter()
            .enumerate()
            .filter(|(_, targets)| targets.contains(&target))
            .map(|(from, _)| self.names[from].as_str())
            .collect()
    }
}

/// Rotate so the smallest id comes first; two traversals of one cycle then compare equal.
fn canonical_rotation(cycle: &[EntityId]) -> Vec<EntityId> {
    let pivot = cycle
        .iter()
        .enumerate()
        .min_by_key(|(_, id)| **id)
        .map(|(i, _)| i)
        .unwrap_or_default();
    cycle[pivot..].iter().chain(&cycle[..pivot]).copied().collect()
}

/// One error per dependency cycle in the program.
pub fn validate_no_cycles(program: &Program) -> Diagnostics {
    let graph = DependencyGraph::build(program);
    let mut diag = Diagnostics::new();

    let Some(cycles) = graph.detect_cycles() else {
        return diag;
    };

    for cycle in cycles {
        let Some(first) = cycle.first() else {
            continue;
        };
        let chain = format!("{} -> {first}", cycle.join(" -> "));
        let span = graph.id(first).and_then(|id| graph.span(id));

        let mut builder = diag
            .report(DiagnosticKind::CircularDependency, span)
            .message(chain)
            .construct(first);
        for (i, name) in cycle.iter().enumerate().skip(1) {
            let next = &cycle[(i + 1) % cycle.len()];
            let related_span = graph.id(name).and_then(|id| graph.span(id));
            builder = builder.related_to(format!("'{name}' references '{next}'"), related_span);
        }
        builder.emit();
    }

    diag
}
