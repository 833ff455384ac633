//! Tests for csvgen-model types.

use csvgen_model::{
    CsvGenError, ErrorKind, FieldDescriptor, FieldRule, FormatContext, Schema, TypeRule, ValueKind,
};

#[test]
fn descriptor_deserializes_from_config_shape() {
    let json = r#"[
        {"name": "Isbn", "kind": "text"},
        {"name": "Price", "kind": "decimal", "optional": true},
        {"name": "PublicationDate", "kind": "datetime"}
    ]"#;
    let descriptors: Vec<FieldDescriptor> = serde_json::from_str(json).expect("parse descriptors");
    let schema = Schema::from_descriptors(descriptors);

    assert_eq!(schema.len(), 3);
    assert_eq!(
        schema.field("Price"),
        Some(&FieldDescriptor::optional("Price", ValueKind::Decimal))
    );
    assert!(!schema.field("Isbn").expect("isbn").optional);
    assert!(schema.contains_kind(ValueKind::DateTime));
}

#[test]
fn descriptor_serializes_kind_lowercase() {
    let json = serde_json::to_string(&FieldDescriptor::required("When", ValueKind::DateTime))
        .expect("serialize descriptor");
    assert_eq!(json, r#"{"name":"When","kind":"datetime","optional":false}"#);
}

#[test]
fn configuration_errors_share_a_kind() {
    let errors = [
        FieldRule::hidden("").unwrap_err(),
        TypeRule::formatted(ValueKind::Boolean, "yyyy").unwrap_err(),
        TypeRule::formatted(ValueKind::Decimal, "D2").unwrap_err(),
        FormatContext::by_name("tlh").unwrap_err(),
    ];
    for err in errors {
        assert_eq!(err.kind(), ErrorKind::Configuration, "{err}");
    }
}

#[test]
fn pattern_error_names_kind_and_pattern() {
    let err = TypeRule::formatted(ValueKind::Text, "c").unwrap_err();
    assert!(matches!(
        &err,
        CsvGenError::PatternNotSupported { kind: ValueKind::Text, pattern } if pattern == "c"
    ));
    assert_eq!(
        err.to_string(),
        "text values cannot use a format pattern (got 'c')"
    );
}

#[test]
fn hidden_type_rule_has_no_format() {
    let rule = TypeRule::hidden(ValueKind::Identifier);
    assert!(!rule.is_visible());
    assert!(rule.pattern().is_none());
    assert!(rule.context().is_none());
}
