use indoc::indoc;

use crate::{BinaryOp, Declaration, Expr, Literal, TypeExpr, parse_program};

#[test]
fn decode_cube_and_slice() {
    let json = indoc! {r#"
    {
      "declarations": [
        {
          "kind": "cube",
          "name": "ADADAS",
          "structure": {
            "dimensions": [
              { "name": "USUBJID", "type": { "base": "identifier" } },
              { "name": "AVISIT", "type": { "base": "text" } }
            ],
            "measures": [
              { "name": "AVAL", "type": { "base": "numeric" } },
              { "name": "CHG", "type": { "base": "numeric", "unit": "points" } }
            ]
          }
        },
        {
          "kind": "slice",
          "name": "Week24",
          "sourceRef": "ADADAS",
          "fix": { "AVISIT": "Week 24" },
          "vary": ["USUBJID"],
          "measures": ["CHG"],
          "span": { "start": 10, "end": 42 }
        }
      ]
    }
    "#};

    let program = parse_program(json).unwrap();
    assert_eq!(program.len(), 2);

    let Declaration::Cube(cube) = &program.declarations[0] else {
        panic!("expected cube");
    };
    assert_eq!(cube.structure.dimensions.len(), 2);
    assert_eq!(cube.structure.measures[1].ty, TypeExpr::numeric_in("points"));

    let Declaration::Slice(slice) = &program.declarations[1] else {
        panic!("expected slice");
    };
    assert_eq!(slice.source_ref, "ADADAS");
    assert_eq!(slice.fix["AVISIT"], Literal::Text("Week 24".into()));
    assert_eq!(slice.measures.as_deref(), Some(&["CHG".to_string()][..]));
    assert_eq!(program.declarations[1].span().map(|s| s.range()), Some(10..42));
}

#[test]
fn decode_literals_untagged() {
    let json = r#"{ "declarations": [ {
        "kind": "slice", "name": "S", "sourceRef": "C",
        "fix": { "A": true, "B": 3, "C": 2.5, "D": "x" }
    } ] }"#;

    let program = parse_program(json).unwrap();
    let Declaration::Slice(slice) = &program.declarations[0] else {
        panic!("expected slice");
    };
    assert_eq!(slice.fix["A"], Literal::Flag(true));
    assert_eq!(slice.fix["B"], Literal::Integer(3));
    assert_eq!(slice.fix["C"], Literal::Numeric(2.5));
    assert_eq!(slice.fix["D"], Literal::Text("x".into()));
}

#[test]
fn decode_model_formula() {
    let json = indoc! {r#"
    { "declarations": [ {
        "kind": "model",
        "name": "Anova",
        "inputRef": "ADADAS",
        "family": "gaussian",
        "formula": {
          "response": { "kind": "ref", "name": "CHG" },
          "predictors": {
            "kind": "binary", "op": "add",
            "lhs": { "kind": "literal", "value": 1 },
            "rhs": { "kind": "ref", "name": "TRTP" }
          }
        },
        "random": { "group": "SITEID" }
    } ] }
    "#};

    let program = parse_program(json).unwrap();
    let Declaration::Model(model) = &program.declarations[0] else {
        panic!("expected model");
    };
    assert_eq!(model.link, None);
    assert_eq!(model.random.as_ref().map(|r| r.group.as_str()), Some("SITEID"));
    assert_eq!(
        model.formula.predictors,
        Expr::binary(BinaryOp::Add, Expr::int(1), Expr::var("TRTP"))
    );
}

#[test]
fn unknown_declaration_kind_is_rejected() {
    let json = r#"{ "declarations": [ { "kind": "macro", "name": "X" } ] }"#;
    assert!(parse_program(json).is_err());
}

#[test]
fn expr_display() {
    let expr = Expr::binary(
        BinaryOp::And,
        Expr::binary(BinaryOp::Gt, Expr::var("AVAL"), Expr::int(3)),
        Expr::call("is_missing", vec![Expr::var("CHG")]),
    );
    assert_eq!(expr.to_string(), "((AVAL > 3) and is_missing(CHG))");
}

#[test]
fn intercepts() {
    assert!(Literal::Integer(1).is_intercept());
    assert!(Literal::Integer(0).is_intercept());
    assert!(!Literal::Integer(2).is_intercept());
    assert!(!Literal::Numeric(1.0).is_intercept());
}
