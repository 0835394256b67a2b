use wafer_core::model::Status;
use wafer_core::version;

#[test]
fn version_is_non_empty() {
    let v = version();
    assert!(!v.is_empty());
}

#[test]
fn status_tokens_parse_case_insensitively() {
    assert_eq!(Status::from_token("PASS"), Some(Status::Pass));
    assert_eq!(Status::from_token("fail"), Some(Status::Fail));
    assert_eq!(Status::from_token("  Pass "), Some(Status::Pass));
    assert_eq!(Status::from_token("MAYBE"), None);
    assert_eq!(Status::from_token(""), None);
}

#[test]
fn status_displays_as_report_tokens() {
    assert_eq!(Status::Pass.to_string(), "PASS");
    assert_eq!(Status::Fail.to_string(), "FAIL");
}
