use cubist_core::Span;

use super::*;

fn span(start: u32, end: u32) -> Option<Span> {
    Some(Span::new(start, end))
}

#[test]
fn severity_display() {
    insta::assert_snapshot!(format!("{}", Severity::Error), @"error");
    insta::assert_snapshot!(format!("{}", Severity::Warning), @"warning");
    insta::assert_snapshot!(format!("{}", Severity::Hint), @"hint");
}

#[test]
fn severity_orders_errors_first() {
    let mut severities = vec![Severity::Hint, Severity::Error, Severity::Warning];
    severities.sort();
    assert_eq!(
        severities,
        vec![Severity::Error, Severity::Warning, Severity::Hint]
    );
}

#[test]
fn report_with_default_message() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::UndefinedReference, span(0, 5))
        .emit();

    assert_eq!(diagnostics.len(), 1);
    assert!(diagnostics.has_errors());
    let diag = &diagnostics.as_slice()[0];
    assert_eq!(diag.message, "undefined reference");
    assert_eq!(diag.code.as_deref(), Some("undefined-reference"));
}

#[test]
fn report_with_custom_message() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::DuplicateDefinition, span(0, 5))
        .message("ADSL")
        .emit();

    assert_eq!(diagnostics.as_slice()[0].message, "'ADSL' is defined multiple times");
}

#[test]
fn default_severity_per_kind() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::FixVaryOverlap, None)
        .emit();
    diagnostics
        .report(DiagnosticKind::CanonicalLinkAssumed, None)
        .emit();
    diagnostics
        .report(DiagnosticKind::TypeMismatch, None)
        .emit();

    assert_eq!(diagnostics.error_count(), 1);
    assert_eq!(diagnostics.warning_count(), 1);
    assert_eq!(diagnostics.hint_count(), 1);
}

#[test]
fn severity_and_code_override() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::ConformanceViolation, None)
        .severity(Severity::Warning)
        .code("SD0002")
        .message("Required variable STUDYID is missing")
        .emit();

    assert!(!diagnostics.has_errors());
    let diag = &diagnostics.as_slice()[0];
    insta::assert_snapshot!(diag.to_string(), @"warning[SD0002]: Required variable STUDYID is missing");
}

#[test]
fn default_hint_attached_once() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::FixVaryOverlap, span(3, 7))
        .message("'PARAMCD' appears in both fix and vary")
        .hint("remove the name from either `fix` or `vary`")
        .emit();

    assert_eq!(diagnostics.as_slice()[0].hints.len(), 1);
}

#[test]
fn plain_display_with_related_and_hint() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::UndefinedReference, span(10, 14))
        .message("Slice 'S' references undefined 'ADS'")
        .related_to("declared here", span(0, 4))
        .hint("Did you mean 'ADSL'?")
        .emit();

    let rendered = diagnostics.printer().render();
    insta::assert_snapshot!(rendered, @"error[undefined-reference] at 10..14: Slice 'S' references undefined 'ADS' (related: declared here at 0..4) (hint: Did you mean 'ADSL'?)");
}

#[test]
fn render_joins_lines_and_handles_empty() {
    assert_eq!(Diagnostics::new().printer().render(), "");

    let mut diagnostics = Diagnostics::new();
    diagnostics.report(DiagnosticKind::AlreadyFixed, None).emit();
    diagnostics.report(DiagnosticKind::DuplicateSlice, None).emit();
    insta::assert_snapshot!(diagnostics.printer().render(), @r"
    error[already-fixed]: dimension is already fixed by the source slice
    warning[duplicate-slice]: slice duplicates another slice
    ");
}

#[test]
fn source_rendering_mentions_message() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::UndefinedReference, span(6, 9))
        .message("undefined 'ADS'")
        .emit();

    let rendered = diagnostics.printer().source("slice ADS").render();
    assert!(rendered.contains("error"));
    assert!(rendered.contains("undefined 'ADS'"));
    assert!(rendered.contains("slice ADS"));
}

#[test]
fn source_rendering_falls_back_without_span() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::UnknownStandard, None)
        .message("Unknown standard 'FOO'")
        .emit();

    let rendered = diagnostics.printer().source("standards { FOO: 1.0 }").render();
    insta::assert_snapshot!(rendered.trim_end(), @"warning[unknown-standard]: Unknown standard 'FOO'");
}

#[test]
fn serializes_for_editors() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::TypeMismatch, span(1, 2))
        .construct("ADAE_D")
        .message("bad")
        .emit();

    let json = serde_json::to_string(&diagnostics.as_slice()[0]).unwrap();
    insta::assert_snapshot!(json, @r#"{"severity":"error","message":"bad","node":{"construct":"ADAE_D","span":{"start":1,"end":2}},"code":"type-mismatch"}"#);
}

#[test]
fn extend_and_collect() {
    let mut a = Diagnostics::new();
    a.report(DiagnosticKind::TypeMismatch, None).emit();
    let mut b = Diagnostics::new();
    b.report(DiagnosticKind::UnknownStandard, None).emit();

    a.extend(b);
    assert_eq!(a.len(), 2);

    let warnings: Diagnostics = a.into_iter().filter(|d| d.is_warning()).collect();
    assert_eq!(warnings.len(), 1);
}
