//! Loading `LayoutPolicy` from TOML and JSON.
//!
//! Run:
//!   cargo test -p folio-layout --features policy-config --test policy_config

use std::io::Write;

use folio_layout::{LayoutPolicy, PolicyConfigError, Ratio};

#[test]
fn partial_toml_keeps_defaults() {
    let policy = LayoutPolicy::from_toml_str("page_width = 794\npage_height = 1123\n")
        .expect("valid toml");
    assert_eq!((policy.page_width, policy.page_height), (794, 1123));
    assert_eq!(policy.split_ratio(), Ratio::HALF);
    assert_eq!(policy.divider_thickness, 4.0);
}

#[test]
fn empty_sources_are_default() {
    assert_eq!(
        LayoutPolicy::from_toml_str("").expect("empty toml"),
        LayoutPolicy::default()
    );
    assert_eq!(
        LayoutPolicy::from_json_str("{}").expect("empty json"),
        LayoutPolicy::default()
    );
}

#[test]
fn json_round_trip() {
    let policy = LayoutPolicy {
        split_ratio: 0.3,
        divider_thickness: 2.0,
        ..LayoutPolicy::default()
    };
    let json = serde_json::to_string(&policy).expect("serialize");
    assert_eq!(LayoutPolicy::from_json_str(&json).expect("parse"), policy);
}

#[test]
fn files_load_from_disk() {
    let mut toml_file = tempfile::NamedTempFile::new().expect("temp file");
    writeln!(toml_file, "split_ratio = 0.4").expect("write");
    let policy = LayoutPolicy::from_toml_file(toml_file.path()).expect("load toml");
    assert_eq!(policy.split_ratio, 0.4);

    let mut json_file = tempfile::NamedTempFile::new().expect("temp file");
    write!(json_file, r#"{{"divider_thickness": 8.0}}"#).expect("write");
    let policy = LayoutPolicy::from_json_file(json_file.path()).expect("load json");
    assert_eq!(policy.divider_thickness, 8.0);
}

#[test]
fn errors_are_reported_by_kind() {
    let missing = LayoutPolicy::from_toml_file("/nonexistent/folio.toml");
    assert!(matches!(missing, Err(PolicyConfigError::Io(_))));

    let bad_toml = LayoutPolicy::from_toml_str("page_width = \"wide\"");
    assert!(matches!(bad_toml, Err(PolicyConfigError::Toml(_))));

    let bad_json = LayoutPolicy::from_json_str("{");
    let err = bad_json.expect_err("truncated json");
    assert!(err.to_string().starts_with("JSON parse error"));

    let invalid = LayoutPolicy::from_toml_str("page_height = 0\nsplit_ratio = 2.0")
        .expect("parses")
        .validated()
        .expect_err("fails validation");
    let PolicyConfigError::Validation(errors) = invalid else {
        panic!("expected validation error");
    };
    assert_eq!(errors.len(), 2);
}
