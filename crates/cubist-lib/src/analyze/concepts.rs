//! Concept hierarchy validation.
//!
//! Concepts are keyed by `(namespace, name)`. A concept's parent is looked up
//! in its own namespace first, then in the default one. Properties are
//! inherited down the parent chain; a child redeclaring a property keeps its
//! own type.

use cubist_core::{ConceptDecl, Declaration, Program};
use indexmap::{IndexMap, IndexSet};

use super::symbol_table::DEFAULT_NAMESPACE;
use super::utils::suggest;
use crate::Diagnostics;
use crate::diagnostics::DiagnosticKind;

/// Type names a property may use without declaring a concept.
pub const PRIMITIVE_TYPES: &[&str] = &[
    "Identifier",
    "Text",
    "Integer",
    "Numeric",
    "DateTime",
    "Date",
    "Flag",
    "CodedValue",
];

pub type ConceptKey = (String, String);

fn key_of(concept: &ConceptDecl) -> ConceptKey {
    (namespace_of(concept).to_string(), concept.name.clone())
}

fn namespace_of(concept: &ConceptDecl) -> &str {
    concept.namespace.as_deref().unwrap_or(DEFAULT_NAMESPACE)
}

/// A property as seen on a concept after inheritance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectiveProperty<'p> {
    pub name: &'p str,
    pub type_name: &'p str,
    /// Name of the concept that declared this property.
    pub declared_in: &'p str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redefinition<'p> {
    pub property: &'p str,
    pub inherited_type: &'p str,
    pub inherited_from: &'p str,
    pub own_type: &'p str,
}

#[derive(Debug, Default)]
pub struct ConceptHierarchy<'p> {
    concepts: IndexMap<ConceptKey, &'p ConceptDecl>,
    duplicates: Vec<&'p ConceptDecl>,
}

impl<'p> ConceptHierarchy<'p> {
    /// First declaration of each `(namespace, name)` wins; the rest are kept as duplicates.
    pub fn build(program: &'p Program) -> Self {
        let mut hierarchy = Self::default();
        for decl in program.iter() {
            let Declaration::Concept(concept) = decl else {
                continue;
            };
            let key = key_of(concept);
            if hierarchy.concepts.contains_key(&key) {
                hierarchy.duplicates.push(concept);
            } else {
                hierarchy.concepts.insert(key, concept);
            }
        }
        hierarchy
    }

    pub fn len(&self) -> usize {
        self.concepts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.concepts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'p ConceptDecl> + '_ {
        self.concepts.values().copied()
    }

    pub fn get(&self, namespace: &str, name: &str) -> Option<&'p ConceptDecl> {
        self.concepts
            .get(&(namespace.to_string(), name.to_string()))
            .copied()
    }

    /// Resolves `name` (or `ns.Name`) as seen from `namespace`.
    pub fn lookup(&self, namespace: &str, name: &str) -> Option<&'p ConceptDecl> {
        if let Some((ns, local)) = name.split_once('.') {
            return self.get(ns, local);
        }
        self.get(namespace, name)
            .or_else(|| self.get(DEFAULT_NAMESPACE, name))
    }

    pub fn parent_of(&self, concept: &ConceptDecl) -> Option<&'p ConceptDecl> {
        let parent = concept.parent_type.as_deref()?;
        self.lookup(namespace_of(concept), parent)
    }

    pub fn is_known_type(&self, namespace: &str, type_name: &str) -> bool {
        PRIMITIVE_TYPES.contains(&type_name) || self.lookup(namespace, type_name).is_some()
    }

    /// Parent chain starting at the direct parent, stopping before any repeat.
    pub fn ancestors(&self, concept: &'p ConceptDecl) -> Vec<&'p ConceptDecl> {
        let mut seen: IndexSet<ConceptKey> = IndexSet::new();
        seen.insert(key_of(concept));
        let mut chain = Vec::new();
        let mut current = concept;
        while let Some(parent) = self.parent_of(current) {
            if !seen.insert(key_of(parent)) {
                break;
            }
            chain.push(parent);
            current = parent;
        }
        chain
    }

    /// Cycle reachable from `concept` through parent links, as concept names.
    pub fn find_cycle(&self, concept: &'p ConceptDecl) -> Option<Vec<&'p str>> {
        let mut path: IndexSet<ConceptKey> = IndexSet::new();
        let mut names = Vec::new();
        let mut current = concept;
        loop {
            let key = key_of(current);
            if let Some(start) = path.get_index_of(&key) {
                return Some(names.split_off(start));
            }
            path.insert(key);
            names.push(current.name.as_str());
            current = self.parent_of(current)?;
        }
    }

    /// Inherited properties (root first) followed by the concept's own.
    pub fn effective_properties(&self, concept: &'p ConceptDecl) -> Vec<EffectiveProperty<'p>> {
        let mut merged: IndexMap<&'p str, EffectiveProperty<'p>> = IndexMap::new();
        let mut chain = self.ancestors(concept);
        chain.reverse();
        chain.push(concept);

        for owner in chain {
            for property in &owner.properties {
                merged.insert(
                    property.name.as_str(),
                    EffectiveProperty {
                        name: &property.name,
                        type_name: &property.type_name,
                        declared_in: &owner.name,
                    },
                );
            }
        }
        merged.into_values().collect()
    }

    /// Own properties that change the type of an inherited one.
    pub fn redefinitions(&self, concept: &'p ConceptDecl) -> Vec<Redefinition<'p>> {
        let Some(parent) = self.parent_of(concept) else {
            return Vec::new();
        };
        if self.find_cycle(concept).is_some() {
            return Vec::new();
        }
        let inherited = self.effective_properties(parent);
        concept
            .properties
            .iter()
            .filter_map(|own| {
                let base = inherited.iter().find(|p| p.name == own.name)?;
                (base.type_name != own.type_name).then(|| Redefinition {
                    property: &own.name,
                    inherited_type: base.type_name,
                    inherited_from: base.declared_in,
                    own_type: &own.type_name,
                })
            })
            .collect()
    }

    fn type_candidates(&self) -> Vec<&str> {
        let mut candidates: Vec<&str> = PRIMITIVE_TYPES.to_vec();
        candidates.extend(self.concepts.keys().map(|(_, name)| name.as_str()));
        candidates
    }
}

/// Runs every concept check in order: cycles, types, duplicates, code values,
/// then inherited-property redefinitions.
pub fn validate_concepts(program: &Program) -> Diagnostics {
    let hierarchy = ConceptHierarchy::build(program);
    let mut diag = Diagnostics::new();
    if hierarchy.is_empty() {
        return diag;
    }

    check_cycles(&hierarchy, &mut diag);
    check_types(&hierarchy, &mut diag);
    check_duplicates(&hierarchy, &mut diag);
    check_code_values(&hierarchy, &mut diag);
    check_redefinitions(&hierarchy, &mut diag);

    tracing::debug!(
        concepts = hierarchy.len(),
        diagnostics = diag.len(),
        "concepts validated"
    );
    diag
}

fn check_cycles(hierarchy: &ConceptHierarchy<'_>, diag: &mut Diagnostics) {
    let mut reported: IndexSet<Vec<&str>> = IndexSet::new();
    for concept in hierarchy.iter() {
        let Some(cycle) = hierarchy.find_cycle(concept) else {
            continue;
        };
        let mut members = cycle.clone();
        members.sort_unstable();
        if !reported.insert(members) {
            continue;
        }

        let Some(&first) = cycle.first() else {
            continue;
        };
        let chain = format!("{} -> {first}", cycle.join(" -> "));
        let span = hierarchy
            .iter()
            .find(|c| c.name == first)
            .and_then(|c| c.span);
        diag.report(DiagnosticKind::CircularConceptReference, span)
            .message(chain)
            .construct(first)
            .emit();
    }
}

fn check_types(hierarchy: &ConceptHierarchy<'_>, diag: &mut Diagnostics) {
    for concept in hierarchy.iter() {
        let namespace = namespace_of(concept);

        if let Some(parent) = &concept.parent_type
            && hierarchy.lookup(namespace, parent).is_none()
        {
            let mut message = format!(
                "Concept '{}': parent type '{parent}' is an undefined type",
                concept.name
            );
            push_suggestion(&mut message, parent, hierarchy);
            diag.report(DiagnosticKind::UndefinedPropertyType, concept.span)
                .message(message)
                .construct(&concept.name)
                .emit();
        }

        for property in &concept.properties {
            if hierarchy.is_known_type(namespace, &property.type_name) {
                continue;
            }
            let mut message = format!(
                "Concept '{}': property '{}' has undefined type '{}'",
                concept.name, property.name, property.type_name
            );
            push_suggestion(&mut message, &property.type_name, hierarchy);
            diag.report(DiagnosticKind::UndefinedPropertyType, property.span.or(concept.span))
                .message(message)
                .construct(&concept.name)
                .emit();
        }
    }
}

fn push_suggestion(message: &mut String, name: &str, hierarchy: &ConceptHierarchy<'_>) {
    let local = name.rsplit('.').next().unwrap_or(name);
    if let Some(similar) = suggest(local, &hierarchy.type_candidates()) {
        message.push_str(&format!(". Did you mean '{similar}'?"));
    }
}

fn check_duplicates(hierarchy: &ConceptHierarchy<'_>, diag: &mut Diagnostics) {
    for duplicate in &hierarchy.duplicates {
        let namespace = namespace_of(duplicate);
        let first = hierarchy.get(namespace, &duplicate.name);
        let mut builder = diag
            .report(DiagnosticKind::DuplicateConcept, duplicate.span)
            .message(format!(
                "Concept '{}' is defined multiple times in namespace '{namespace}'",
                duplicate.name
            ))
            .construct(&duplicate.name);
        if let Some(first) = first {
            builder = builder.related_to("first defined here", first.span);
        }
        builder.emit();
    }
}

fn check_code_values(hierarchy: &ConceptHierarchy<'_>, diag: &mut Diagnostics) {
    for concept in hierarchy.iter() {
        for (position, entry) in concept.code_lists.iter().enumerate() {
            if !entry.code.trim().is_empty() {
                continue;
            }
            diag.report(DiagnosticKind::EmptyCodeValue, entry.span.or(concept.span))
                .message(format!(
                    "Concept '{}': empty code value at position {}",
                    concept.name,
                    position + 1
                ))
                .construct(&concept.name)
                .emit();
        }
    }
}

fn check_redefinitions(hierarchy: &ConceptHierarchy<'_>, diag: &mut Diagnostics) {
    for concept in hierarchy.iter() {
        for redefinition in hierarchy.redefinitions(concept) {
            diag.report(DiagnosticKind::PropertyRedefinition, concept.span)
                .message(format!(
                    "Concept '{}': property '{}' redefines inherited type {} from '{}' as {}",
                    concept.name,
                    redefinition.property,
                    redefinition.inherited_type,
                    redefinition.inherited_from,
                    redefinition.own_type
                ))
                .construct(&concept.name)
                .emit();
        }
    }
}
