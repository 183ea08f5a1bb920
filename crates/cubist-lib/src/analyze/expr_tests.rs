use cubist_core::{BinaryOp, Expr, TypeExpr, UnaryOp};

use super::expr::{Builtin, ExprChecker};
use super::types::{CubeType, Type, Unit};
use crate::Diagnostics;
use crate::test_utils::{CubeBuilder, dump};

fn scope() -> CubeType {
    let cube = CubeBuilder::new("ADLB")
        .dimension("USUBJID", TypeExpr::Identifier)
        .dimension("ADT", TypeExpr::Date)
        .measure("AVAL", TypeExpr::numeric())
        .measure("BASE", TypeExpr::numeric())
        .measure("WEIGHT", TypeExpr::numeric_in("kg"))
        .measure("HEIGHT", TypeExpr::numeric_in("cm"))
        .measure("AGE", TypeExpr::Integer)
        .attribute("ANL01FL", TypeExpr::Flag)
        .attribute("SEX", TypeExpr::coded("SEX"))
        .build();
    CubeType::from_decl(&cube)
}

fn check(expr: &Expr) -> (Type, Diagnostics) {
    let scope = scope();
    let checker = ExprChecker::new(&scope, "Derive 'D'");
    let mut diag = Diagnostics::new();
    let ty = checker.check(expr, &mut diag);
    (ty, diag)
}

fn bin(op: BinaryOp, lhs: Expr, rhs: Expr) -> Expr {
    Expr::binary(op, lhs, rhs)
}

#[test]
fn arithmetic_over_measures() {
    let (ty, diag) = check(&bin(BinaryOp::Sub, Expr::var("AVAL"), Expr::var("BASE")));
    assert!(diag.is_empty());
    assert_eq!(ty, Type::numeric());
}

#[test]
fn integer_arithmetic_stays_integer() {
    let (ty, _) = check(&bin(BinaryOp::Add, Expr::var("AGE"), Expr::int(1)));
    assert_eq!(ty, Type::Integer);
    let (ty, _) = check(&bin(BinaryOp::Div, Expr::var("AGE"), Expr::int(2)));
    assert_eq!(ty, Type::numeric());
}

#[test]
fn units_survive_scaling() {
    let (ty, diag) = check(&bin(BinaryOp::Mul, Expr::var("WEIGHT"), Expr::int(2)));
    assert!(diag.is_empty());
    assert_eq!(ty, Type::Numeric(Some(Unit::new("kg"))));
}

#[test]
fn adding_incompatible_units() {
    let (ty, diag) = check(&bin(BinaryOp::Add, Expr::var("WEIGHT"), Expr::var("HEIGHT")));
    assert!(ty.is_error());
    insta::assert_snapshot!(dump(&diag), @"error[type-mismatch]: Derive 'D': operator '+' combines incompatible units in Numeric[kg] and Numeric[cm]");
}

#[test]
fn comparison_yields_flag() {
    let (ty, diag) = check(&bin(BinaryOp::Gt, Expr::var("AVAL"), Expr::int(3)));
    assert!(diag.is_empty());
    assert_eq!(ty, Type::Flag);

    let (ty, diag) = check(&bin(BinaryOp::Eq, Expr::var("SEX"), Expr::text("F")));
    assert!(diag.is_empty());
    assert_eq!(ty, Type::Flag);
}

#[test]
fn logical_connective_on_numbers() {
    let (ty, diag) = check(&bin(BinaryOp::And, Expr::var("AVAL"), Expr::var("BASE")));
    assert!(ty.is_error());
    insta::assert_snapshot!(dump(&diag), @"error[type-mismatch]: Derive 'D': operator 'and' expects Flag operands, found Numeric and Numeric");
}

#[test]
fn error_type_suppresses_cascade() {
    // (MISSING + 1) > 3 and ANL01FL: one root cause, one diagnostic.
    let expr = bin(
        BinaryOp::And,
        bin(
            BinaryOp::Gt,
            bin(BinaryOp::Add, Expr::var("MISSING"), Expr::int(1)),
            Expr::int(3),
        ),
        Expr::var("ANL01FL"),
    );
    let (ty, diag) = check(&expr);
    assert!(ty.is_error());
    assert_eq!(diag.len(), 1);
    assert!(diag.as_slice()[0].message.contains("undefined component 'MISSING'"));
}

#[test]
fn unary_operators() {
    let (ty, diag) = check(&Expr::unary(UnaryOp::Not, Expr::var("ANL01FL")));
    assert!(diag.is_empty());
    assert_eq!(ty, Type::Flag);

    let (_, diag) = check(&Expr::unary(UnaryOp::Neg, Expr::var("SEX")));
    insta::assert_snapshot!(dump(&diag), @"error[type-mismatch]: Derive 'D': unary '-' expects a numeric operand, found CodedValue[SEX]");
}

#[test]
fn builtin_calls() {
    let (ty, diag) = check(&Expr::call("log", vec![Expr::var("AVAL")]));
    assert!(diag.is_empty());
    assert_eq!(ty, Type::numeric());

    let (ty, _) = check(&Expr::call("year", vec![Expr::var("ADT")]));
    assert_eq!(ty, Type::Integer);

    let (ty, _) = check(&Expr::call("is_missing", vec![Expr::var("SEX")]));
    assert_eq!(ty, Type::Flag);

    let (ty, _) = check(&Expr::call("round", vec![Expr::var("WEIGHT"), Expr::int(1)]));
    assert_eq!(ty, Type::Numeric(Some(Unit::new("kg"))));
}

#[test]
fn unknown_function_suggests() {
    let (ty, diag) = check(&Expr::call("sqr", vec![Expr::var("AVAL")]));
    assert!(ty.is_error());
    insta::assert_snapshot!(dump(&diag), @"error[unknown-function]: Derive 'D': unknown function 'sqr'. Did you mean 'sqrt'?");
}

#[test]
fn arity_mismatch() {
    let (_, diag) = check(&Expr::call("log", vec![Expr::var("AVAL"), Expr::var("BASE")]));
    insta::assert_snapshot!(dump(&diag), @"error[arity-mismatch]: Derive 'D': function 'log' expects 1 argument, found 2");
}

#[test]
fn wrong_argument_type() {
    let (_, diag) = check(&Expr::call("year", vec![Expr::var("AVAL")]));
    insta::assert_snapshot!(dump(&diag), @"error[type-mismatch]: Derive 'D': function 'year' expects a Date or DateTime argument, found Numeric");
}

#[test]
fn interaction_outside_formula() {
    let (ty, diag) = check(&bin(BinaryOp::Interaction, Expr::var("AVAL"), Expr::var("AGE")));
    assert!(ty.is_error());
    assert_eq!(diag.len(), 1);
}

#[test]
fn condition_must_be_flag() {
    let scope = scope();
    let checker = ExprChecker::new(&scope, "Slice 'S'");
    let mut diag = Diagnostics::new();

    checker.check_condition(&Expr::var("AVAL"), "where clause", &mut diag);

    insta::assert_snapshot!(dump(&diag), @"error[non-flag-condition]: Slice 'S' where clause must be a Flag, found Numeric (hint: use a comparison such as `AVAL > 0` to get a Flag)");
}

#[test]
fn builtin_names_round_trip() {
    for builtin in Builtin::ALL {
        assert_eq!(Builtin::from_name(builtin.name()), Some(*builtin));
    }
}
