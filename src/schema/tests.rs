//! Tests for schema types

use super::*;
use pretty_assertions::assert_eq;
use serde_json::json;

#[test]
fn test_property_schema_nullable() {
    let prop = PropertySchema::nullable("integer");
    assert_eq!(prop.types, vec!["integer", "null"]);
    assert!(prop.format.is_none());
}

#[test]
fn test_property_schema_date_time() {
    let prop = PropertySchema::date_time();
    assert_eq!(prop.types, vec!["string", "null"]);
    assert_eq!(prop.format.as_deref(), Some("date-time"));
}

#[test]
fn test_report_schema_serialization() {
    let mut schema = ReportSchema::new();
    schema.add_property("sales", PropertySchema::nullable("number"));
    schema.add_property("transaction_datetime", PropertySchema::date_time());

    assert_eq!(
        schema.to_json(),
        json!({
            "type": "object",
            "properties": {
                "sales": { "type": ["number", "null"] },
                "transaction_datetime": {
                    "type": ["string", "null"],
                    "format": "date-time"
                }
            }
        })
    );
}

#[test]
fn test_report_schema_roundtrip() {
    let mut schema = ReportSchema::new();
    schema.add_property("publisher_id", PropertySchema::nullable("integer"));

    let json = serde_json::to_string(&schema).unwrap();
    let restored: ReportSchema = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, schema);
    assert_eq!(restored.property_names(), vec!["publisher_id"]);
}
