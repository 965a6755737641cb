use super::*;

#[test]
fn test_code_round_trip_through_str() {
    for code in DiagnosticCode::ALL {
        assert_eq!(DiagnosticCode::parse(code.as_str()), Some(code));
    }
    assert_eq!(DiagnosticCode::parse("A020"), None);
}

#[test]
fn test_default_severity() {
    let d = Diagnostic::new(DiagnosticCode::DJ010, "unknown explore");
    assert_eq!(d.severity, Severity::Warning);

    let d = Diagnostic::new(DiagnosticCode::DJ021, "retried");
    assert_eq!(d.severity, Severity::Info);
}

#[test]
fn test_display_includes_code_and_hint() {
    let d = Diagnostic::new(DiagnosticCode::DJ001, "explore #2 has no name")
        .with_hint("give every explore a name");
    assert_eq!(
        d.to_string(),
        "[DJ001] explore #2 has no name (hint: give every explore a name)"
    );
}

#[test]
fn test_severity_overrides() {
    let diags = vec![
        Diagnostic::new(DiagnosticCode::DJ010, "a"),
        Diagnostic::new(DiagnosticCode::DJ020, "b"),
        Diagnostic::new(DiagnosticCode::DJ021, "c"),
    ];
    let mut overrides = HashMap::new();
    overrides.insert("DJ010".to_string(), ConfigSeverity::Error);
    overrides.insert("DJ021".to_string(), ConfigSeverity::Off);

    let out = apply_severity_overrides(diags, &overrides);
    assert_eq!(out.len(), 2);
    assert_eq!(out[0].severity, Severity::Error);
    assert_eq!(out[1].code, DiagnosticCode::DJ020);
    assert_eq!(out[1].severity, Severity::Warning);
}

#[test]
fn test_severity_ordering() {
    assert!(Severity::Info < Severity::Warning);
    assert!(Severity::Warning < Severity::Error);
}
