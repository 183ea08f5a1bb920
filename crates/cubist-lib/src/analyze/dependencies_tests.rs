use cubist_core::{Declaration, Expr};

use super::dependencies::{DependencyGraph, validate_no_cycles};
use crate::test_utils::{SliceBuilder, adadas, aggregate, display, dump, model, program};

#[test]
fn two_slice_cycle() {
    let program = program(vec![
        adadas().decl(),
        SliceBuilder::new("S1", "S2").decl(),
        SliceBuilder::new("S2", "S1").decl(),
    ]);
    let diag = validate_no_cycles(&program);
    insta::assert_snapshot!(dump(&diag), @"error[circular-dependency]: Circular dependency detected: S1 -> S2 -> S1 (related: 'S2' references 'S1') (hint: break the cycle by reading one of these constructs from a cube)");
}

#[test]
fn self_reference_is_a_cycle() {
    let program = program(vec![SliceBuilder::new("S", "S").decl()]);
    let graph = DependencyGraph::build(&program);
    assert_eq!(graph.detect_cycles(), Some(vec![vec!["S".to_string()]]));
}

#[test]
fn cycle_reported_once() {
    let program = program(vec![
        SliceBuilder::new("A", "B").decl(),
        SliceBuilder::new("B", "C").decl(),
        SliceBuilder::new("C", "A").decl(),
        SliceBuilder::new("D", "B").decl(),
    ]);
    let cycles = DependencyGraph::build(&program).detect_cycles().unwrap();
    assert_eq!(cycles, vec![vec!["A", "B", "C"]]);
}

#[test]
fn disjoint_cycles() {
    let program = program(vec![
        SliceBuilder::new("A", "B").decl(),
        SliceBuilder::new("B", "A").decl(),
        SliceBuilder::new("X", "Y").decl(),
        SliceBuilder::new("Y", "X").decl(),
    ]);
    let diag = validate_no_cycles(&program);
    assert_eq!(diag.error_count(), 2);
    assert!(diag.as_slice()[1].message.ends_with("X -> Y -> X"));
}

#[test]
fn acyclic_chain() {
    let program = program(vec![
        adadas().decl(),
        SliceBuilder::new("S1", "ADADAS").decl(),
        Declaration::Model(model(
            "M",
            "S1",
            Expr::var("AVAL"),
            Expr::var("AVISIT"),
            "Gaussian",
            None,
        )),
        Declaration::Aggregate(aggregate("A", "ADADAS", &["AVISIT"], vec![])),
        Declaration::Display(display("table", "M")),
    ]);
    assert!(validate_no_cycles(&program).is_empty());

    let graph = DependencyGraph::build(&program);
    assert_eq!(graph.transitive_dependencies("M"), vec!["S1", "ADADAS"]);
    assert_eq!(graph.reverse_dependencies("ADADAS"), vec!["S1", "A"]);
    assert_eq!(graph.dependencies("S1"), vec!["ADADAS"]);
    assert!(graph.transitive_dependencies("missing").is_empty());
}

#[test]
fn deep_chain_does_not_overflow() {
    let mut decls = vec![adadas().decl(), SliceBuilder::new("S0", "ADADAS").decl()];
    for i in 1..20_000 {
        decls.push(SliceBuilder::new(&format!("S{i}"), &format!("S{}", i - 1)).decl());
    }
    let graph = DependencyGraph::build(&program(decls));
    assert_eq!(graph.detect_cycles(), None);
    assert_eq!(graph.transitive_dependencies("S19999").len(), 20_000);
}
