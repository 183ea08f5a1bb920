use cubist_core::{BinaryOp, Declaration, DeriveDecl, Expr};

use super::derive::validate_derive;
use super::resolve::ReferenceResolver;
use super::symbol_table::SymbolTable;
use crate::Diagnostics;
use crate::test_utils::{adadas, derive, dump, program};

fn run(decl: DeriveDecl) -> Diagnostics {
    let program = program(vec![adadas().decl(), Declaration::Derive(decl.clone())]);
    let (table, _) = SymbolTable::build(&program);
    let resolver = ReferenceResolver::new(&table);
    let mut diag = Diagnostics::new();
    validate_derive(&decl, &resolver, &mut diag);
    diag
}

#[test]
fn later_targets_see_earlier_ones() {
    let diag = run(derive(
        "D",
        "ADADAS",
        vec![
            ("BASE", Expr::binary(BinaryOp::Sub, Expr::var("AVAL"), Expr::var("CHG"))),
            ("PCHG", Expr::binary(BinaryOp::Div, Expr::var("CHG"), Expr::var("BASE"))),
            ("IMPROVED", Expr::binary(BinaryOp::Lt, Expr::var("PCHG"), Expr::int(0))),
        ],
    ));
    assert!(diag.is_empty(), "{}", dump(&diag));
}

#[test]
fn shadowing_an_existing_component_warns() {
    let diag = run(derive(
        "D",
        "ADADAS",
        vec![("AVAL", Expr::binary(BinaryOp::Mul, Expr::var("AVAL"), Expr::int(2)))],
    ));
    insta::assert_snapshot!(dump(&diag), @"warning[shadowed-component]: Derive 'D': target 'AVAL' shadows existing measure 'AVAL'");
}

#[test]
fn failed_target_does_not_cascade() {
    let diag = run(derive(
        "D",
        "ADADAS",
        vec![
            ("X", Expr::binary(BinaryOp::Add, Expr::var("AVISIT"), Expr::int(1))),
            ("Y", Expr::binary(BinaryOp::Mul, Expr::var("X"), Expr::int(2))),
        ],
    ));
    insta::assert_snapshot!(dump(&diag), @"error[type-mismatch]: Derive 'D' target 'X': operator '+' expects numeric operands, found Text and Integer");
}

#[test]
fn undefined_input() {
    let diag = run(derive("D", "ADADS", vec![("X", Expr::int(1))]));
    assert_eq!(diag.error_count(), 1);
    assert!(diag.as_slice()[0].message.contains("Did you mean 'ADADAS'?"));
}
