use std::fs;
use std::path::Path;

use tempfile::TempDir;

use super::program_loader::{LoadError, default_target, load_program, load_rules, read_input};

#[test]
fn loads_program() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("p.json");
    fs::write(
        &path,
        r#"{ "declarations": [ { "kind": "cube", "name": "ADSL" } ] }"#,
    )
    .unwrap();

    let program = load_program(&path).unwrap();
    assert_eq!(program.declarations.len(), 1);
}

#[test]
fn empty_file_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("empty.json");
    fs::write(&path, "  \n").unwrap();

    let err = read_input(&path).unwrap_err();
    assert!(matches!(err, LoadError::Empty { .. }));
    assert!(err.to_string().ends_with("empty.json' is empty"));
}

#[test]
fn missing_file() {
    let err = load_program(Path::new("/nonexistent/p.json")).unwrap_err();
    assert!(matches!(err, LoadError::Read { .. }));
    assert!(err.to_string().starts_with("failed to read '/nonexistent/p.json': "));
}

#[test]
fn invalid_rules_name_the_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("rules.json");
    fs::write(
        &path,
        r#"{ "version": "1", "rules": [
            { "id": "R1", "description": "a", "check": { "type": "required_any", "variables": [] } },
            { "id": "R1", "description": "b", "check": { "type": "required_any", "variables": [] } }
        ] }"#,
    )
    .unwrap();

    let err = load_rules(Some(&path)).unwrap_err();
    assert!(matches!(err, LoadError::Invalid { .. }));
    assert!(err.to_string().ends_with("rule id R1 is declared more than once"));
}

#[test]
fn built_in_rules_by_default() {
    let rules = load_rules(None).unwrap();
    assert!(rules.len() >= 20);
}

#[test]
fn target_from_path() {
    assert_eq!(default_target(Path::new("studies/cdisc-01.json")), "cdisc-01");
    assert_eq!(default_target(Path::new("-")), "stdin");
}
