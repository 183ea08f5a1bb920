use cubist_core::{Declaration, Expr, Program};

use super::*;
use crate::test_utils::{SliceBuilder, adadas, model, program};
use crate::validate::validate;

/// One warning, one error and one hint, in that document order.
fn mixed() -> Program {
    program(vec![
        adadas().decl(),
        SliceBuilder::new("S", "ADADAS")
            .fix("AVISIT", "Week 24")
            .vary(&["USUBJID", "AVISIT"])
            .decl(),
        Declaration::Model(model(
            "M",
            "ADADAS",
            Expr::var("AVAL"),
            Expr::var("AVISIT"),
            "Gaussian",
            None,
        )),
        SliceBuilder::new("T", "ADADSA").decl(),
    ])
}

fn report(config: &ReportConfig) -> ValidationReport {
    let mut report = validate(&mixed()).report(config);
    report.metadata.timestamp = "2026-01-01T00:00:00.000Z".to_string();
    report.metadata.duration_ms = 0;
    report
}

#[test]
fn text_rendering() {
    let report = report(&ReportConfig::default());
    insta::assert_snapshot!(report.render_text(), @r"
    Validation report for program
    Timestamp: 2026-01-01T00:00:00.000Z
    Standards: SDTM 3.4, ADaM 1.2, DefineXML 2.1
    Duration: 0 ms

    Result: FAILED (1 error, 1 warning, 1 hint)

    Issues:
      warning[fix-vary-overlap]: Slice 'S': 'AVISIT' appears in both fix and vary (hint: remove the name from either `fix` or `vary`) [S]
      error[undefined-reference]: Slice 'T' references undefined cube or slice 'ADADSA'. Did you mean 'ADADAS'? [T]
      hint[canonical-link]: Model 'M': no link given, using the canonical Identity link for family Gaussian [M]
    ");
}

#[test]
fn sorted_and_truncated() {
    let config = ReportConfig::default()
        .with_sort_by_severity(true)
        .with_max_issues(Some(1));
    let report = report(&config);
    assert_eq!(report.truncated, 2);
    assert_eq!(report.all_issues.len(), 1);
    assert!(report.all_issues[0].is_error());
    // Grouped results are never truncated.
    assert_eq!(report.results[&Stage::Slices].len(), 2);
    assert!(report.render_text().ends_with("  ... 2 more issues not shown\n"));
}

#[test]
fn sort_is_stable_within_severity() {
    let program = program(vec![
        adadas().decl(),
        SliceBuilder::new("A", "MISSING_A").decl(),
        SliceBuilder::new("B", "ADADAS").fix("AVISIT", "x").vary(&["AVISIT", "USUBJID"]).decl(),
        SliceBuilder::new("C", "MISSING_C").decl(),
    ]);
    let config = ReportConfig::default().with_sort_by_severity(true);
    let report = validate(&program).report(&config);
    let constructs: Vec<_> = report
        .all_issues
        .iter()
        .map(|d| d.node.construct.as_deref().unwrap_or(""))
        .collect();
    assert_eq!(constructs, vec!["A", "C", "B"]);
}

#[test]
fn warnings_can_be_excluded() {
    let config = ReportConfig::default().with_include_warnings(false);
    let report = report(&config);
    assert_eq!(report.all_issues.len(), 1);
    assert_eq!(report.results[&Stage::Slices].len(), 1);
    assert!(report.results[&Stage::Models].is_empty());
    // Summary still counts everything.
    assert_eq!(report.summary.warnings, 1);
    assert_eq!(report.summary.hints, 1);
}

#[test]
fn json_shape() {
    let report = report(&ReportConfig::default());
    let json: serde_json::Value = serde_json::from_str(&report.render_json().unwrap()).unwrap();

    assert_eq!(json["metadata"]["target"], "program");
    assert_eq!(json["metadata"]["standardVersions"]["ADaM"], "1.2");
    assert_eq!(json["metadata"]["durationMs"], 0);
    assert_eq!(json["summary"]["errors"], 1);
    assert_eq!(json["summary"]["passed"], false);
    assert_eq!(json["results"]["slices"].as_array().unwrap().len(), 2);
    assert_eq!(json["results"]["symbols"].as_array().unwrap().len(), 0);
    assert_eq!(json["allIssues"].as_array().unwrap().len(), 3);
    assert_eq!(json["allIssues"][1]["severity"], "error");
    assert_eq!(json["allIssues"][1]["code"], "undefined-reference");
    assert_eq!(json["allIssues"][1]["node"]["construct"], "T");
    assert!(json.get("truncated").is_none());
}

#[test]
fn markdown_rendering() {
    let report = report(&ReportConfig::default());
    insta::assert_snapshot!(report.render_markdown(), @r"
    # Validation report: program

    | Field | Value |
    |---|---|
    | Timestamp | 2026-01-01T00:00:00.000Z |
    | Standards | SDTM 3.4, ADaM 1.2, DefineXML 2.1 |
    | Duration | 0 ms |
    | Result | **FAILED** |

    ## Summary

    - Errors: 1
    - Warnings: 1
    - Hints: 1

    ## Slices

    | Severity | Code | Construct | Message |
    |---|---|---|---|
    | warning | fix-vary-overlap | S | Slice 'S': 'AVISIT' appears in both fix and vary |
    | error | undefined-reference | T | Slice 'T' references undefined cube or slice 'ADADSA'. Did you mean 'ADADAS'? |

    ## Models

    | Severity | Code | Construct | Message |
    |---|---|---|---|
    | hint | canonical-link | M | Model 'M': no link given, using the canonical Identity link for family Gaussian |
    ");
}

#[test]
fn passing_report() {
    let program = program(vec![adadas().decl()]);
    let report = validate(&program).report(&ReportConfig::default());
    assert!(report.passed());
    assert!(report.render_text().contains("Result: PASSED (0 errors, 0 warnings, 0 hints)"));
    assert!(!report.render_text().contains("Issues:"));
}

#[test]
fn format_names() {
    assert_eq!("JSON".parse::<ReportFormat>(), Ok(ReportFormat::Json));
    assert_eq!("md".parse::<ReportFormat>(), Ok(ReportFormat::Markdown));
    assert!("pdf".parse::<ReportFormat>().is_err());
    assert_eq!(ReportFormat::default().as_str(), "text");
}
