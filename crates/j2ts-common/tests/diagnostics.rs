use super::*;

#[test]
fn test_format_message_placeholders() {
    assert_eq!(format_message("{0} and {1}, {0}", &["a", "b"]), "a and b, a");
}

#[test]
fn test_from_code_uses_template() {
    let diag = Diagnostic::from_code(diagnostic_codes::MISSING_FILTER_INCLUDE, &["@Erased"]);
    assert!(diag.is_warning());
    assert_eq!(
        diag.message_text,
        "annotation entry @Erased does not have a mandatory 'include' entry"
    );
}

#[test]
fn test_every_code_has_a_message() {
    for code in [
        diagnostic_codes::INVALID_FILTER_PATTERN,
        diagnostic_codes::MISSING_FILTER_INCLUDE,
        diagnostic_codes::MALFORMED_FILTER_KEY,
        diagnostic_codes::MULTIPLE_ROOT_PACKAGES,
        diagnostic_codes::CIRCULAR_MODULE_DEPENDENCY,
    ] {
        assert!(get_diagnostic_message(code).is_some(), "missing {code}");
    }
}
