use super::resolve::ReferenceResolver;
use super::symbol_table::{SymbolKind, SymbolTable};
use super::types::{ComponentKind, CubeType};
use crate::Diagnostics;
use crate::test_utils::{SliceBuilder, adadas, adsl, dump, program};

const CUBE_OR_SLICE: &[SymbolKind] = &[SymbolKind::Cube, SymbolKind::Slice];

fn table() -> SymbolTable {
    let program = program(vec![
        adsl().decl(),
        adadas().decl(),
        SliceBuilder::new("ADULTS", "ADSL").decl(),
    ]);
    SymbolTable::build(&program).0
}

#[test]
fn resolves_expected_kind() {
    let table = table();
    let resolver = ReferenceResolver::new(&table);
    let mut diag = Diagnostics::new();

    let symbol = resolver.validate_reference("ADULTS", CUBE_OR_SLICE, "Model 'M'", None, &mut diag);

    assert_eq!(symbol.map(|s| s.kind), Some(SymbolKind::Slice));
    assert!(diag.is_empty());
}

#[test]
fn undefined_with_suggestion() {
    let table = table();
    let resolver = ReferenceResolver::new(&table);
    let mut diag = Diagnostics::new();

    resolver.validate_reference("ADLS", CUBE_OR_SLICE, "Slice 'S'", None, &mut diag);

    insta::assert_snapshot!(dump(&diag), @"error[undefined-reference]: Slice 'S' references undefined cube or slice 'ADLS'. Did you mean 'ADSL'?");
}

#[test]
fn undefined_lists_alternatives_when_nothing_is_close() {
    let table = table();
    let resolver = ReferenceResolver::new(&table);
    let mut diag = Diagnostics::new();

    resolver.validate_reference("NonExistent", CUBE_OR_SLICE, "Slice 'S'", None, &mut diag);

    insta::assert_snapshot!(dump(&diag), @"error[undefined-reference]: Slice 'S' references undefined cube or slice 'NonExistent'. Available: 'ADSL', 'ADADAS', 'ADULTS'");
}

#[test]
fn undefined_in_empty_program() {
    let table = SymbolTable::build(&program(vec![])).0;
    let resolver = ReferenceResolver::new(&table);
    let mut diag = Diagnostics::new();

    resolver.validate_reference("X", &[SymbolKind::Cube], "Slice 'S'", None, &mut diag);

    assert_eq!(
        diag.as_slice()[0].message,
        "Slice 'S' references undefined cube 'X'. No cube is declared"
    );
}

#[test]
fn wrong_kind() {
    let table = table();
    let resolver = ReferenceResolver::new(&table);
    let mut diag = Diagnostics::new();

    let symbol = resolver.validate_reference("ADULTS", &[SymbolKind::Cube], "Cube check", None, &mut diag);

    assert!(symbol.is_none());
    insta::assert_snapshot!(dump(&diag), @"error[wrong-symbol-kind]: Cube check references 'ADULTS', but it is a slice, not a cube (related: 'ADULTS' is declared here)");
}

#[test]
fn component_kind_mismatch() {
    let cube = CubeType::from_decl(&adsl().build());
    let table = table();
    let resolver = ReferenceResolver::new(&table);
    let mut diag = Diagnostics::new();

    let found = resolver.validate_component_reference(
        &cube,
        "SITEID",
        &[ComponentKind::Dimension],
        "Slice 'S' vary",
        None,
        &mut diag,
    );

    assert!(found.is_none());
    insta::assert_snapshot!(dump(&diag), @"error[wrong-component-kind]: Slice 'S' vary: 'SITEID' is referenced as a dimension, but it is an attribute");
}

#[test]
fn component_suggestion() {
    let cube = CubeType::from_decl(&adadas().build());
    let table = table();
    let resolver = ReferenceResolver::new(&table);
    let mut diag = Diagnostics::new();

    resolver.validate_component_reference(
        &cube,
        "AVISITN",
        &[ComponentKind::Dimension],
        "Slice 'S'",
        None,
        &mut diag,
    );

    insta::assert_snapshot!(dump(&diag), @"error[undefined-component]: Slice 'S' references undefined dimension 'AVISITN'. Did you mean 'AVISIT'?");
}

#[test]
fn component_alternatives() {
    let cube = CubeType::from_decl(&adadas().build());
    let table = table();
    let resolver = ReferenceResolver::new(&table);
    let mut diag = Diagnostics::new();

    resolver.validate_component_reference(
        &cube,
        "RESPONSE_RATE",
        &[ComponentKind::Measure],
        "Model 'M'",
        None,
        &mut diag,
    );

    insta::assert_snapshot!(dump(&diag), @"error[undefined-component]: Model 'M' references undefined measure 'RESPONSE_RATE'. Available: 'AVAL', 'CHG'");
}
