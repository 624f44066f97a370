//! Tests for the field type registry

use super::*;

#[test]
fn test_builtin_loads() {
    let registry = FieldRegistry::builtin().unwrap();
    assert!(!registry.is_empty());
    assert!(registry.len() > 30);
}

#[test]
fn test_lookup_known_columns() {
    let registry = FieldRegistry::builtin().unwrap();

    let clicks = registry.lookup("# of Clicks").unwrap();
    assert_eq!(clicks.slug, "num_of_clicks");
    assert_eq!(clicks.field_type, FieldType::Integer);

    let sales = registry.lookup("Sales").unwrap();
    assert_eq!(sales.slug, "sales");
    assert_eq!(sales.field_type, FieldType::Number);

    let name = registry.lookup("Publisher Name").unwrap();
    assert_eq!(name.slug, "publisher_name");
    assert_eq!(name.field_type, FieldType::String);

    let date = registry.lookup("Transaction Date").unwrap();
    assert_eq!(date.slug, "transaction_date");
    assert_eq!(date.field_type, FieldType::Date);
}

#[test]
fn test_lookup_trims_whitespace() {
    let registry = FieldRegistry::builtin().unwrap();
    assert!(registry.lookup("  Sales ").is_some());
    assert!(registry.lookup("\u{feff}Sales").is_none());
}

#[test]
fn test_lookup_unknown_column() {
    let registry = FieldRegistry::builtin().unwrap();
    assert!(registry.lookup("Completely Unknown").is_none());
}

#[test]
fn test_from_json_custom_table() {
    let registry = FieldRegistry::from_json(
        r#"{"My Column": {"slug": "my_column", "type": "boolean"}}"#,
    )
    .unwrap();

    let def = registry.lookup("My Column").unwrap();
    assert_eq!(def.slug, "my_column");
    assert_eq!(def.field_type, FieldType::Other("boolean".to_string()));
}

#[test]
fn test_from_json_malformed_is_fatal() {
    let err = FieldRegistry::from_json("not json").unwrap_err();
    assert!(matches!(err, Error::FieldTable { .. }));

    let err = FieldRegistry::from_json("{}").unwrap_err();
    assert!(matches!(err, Error::FieldTable { .. }));

    let err =
        FieldRegistry::from_json(r#"{"Col": {"slug": "", "type": "string"}}"#).unwrap_err();
    assert!(matches!(err, Error::FieldTable { .. }));
}
