//! Tests for column mapping and row transformation

use super::*;
use crate::registry::FieldRegistry;
use crate::types::JsonValue;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::collections::HashMap;
use test_case::test_case;

fn registry() -> FieldRegistry {
    FieldRegistry::builtin().unwrap()
}

fn headers(names: &[&str]) -> Vec<String> {
    names.iter().map(ToString::to_string).collect()
}

fn row(cells: &[(&str, &str)]) -> HashMap<String, String> {
    cells
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

// ============================================================================
// Coercion
// ============================================================================

#[test_case("5", json!(5); "plain integer")]
#[test_case(" 42 ", json!(42); "whitespace tolerated")]
#[test_case("-7", json!(-7); "negative integer")]
#[test_case("not a number", JsonValue::Null; "unparseable yields null")]
#[test_case("35.5", JsonValue::Null; "float is not an integer")]
#[test_case("", JsonValue::Null; "empty yields null")]
fn test_coercion_parse_integer(cell: &str, expected: JsonValue) {
    assert_eq!(Coercion::ParseInteger.apply(&[cell]), expected);
}

#[test_case("35.5", json!(35.5); "plain float")]
#[test_case("35", json!(35.0); "integer cell parses as float")]
#[test_case("oops", JsonValue::Null; "unparseable yields null")]
fn test_coercion_parse_number(cell: &str, expected: JsonValue) {
    assert_eq!(Coercion::ParseNumber.apply(&[cell]), expected);
}

#[test_case("12/12/18", json!("2018-12-12T00:00:00.000000Z"); "renders utc midnight")]
#[test_case("2/22/19", json!("2019-02-22T00:00:00.000000Z"); "single digit month")]
#[test_case("2018-12-12", JsonValue::Null; "iso input is not the report format")]
#[test_case("", JsonValue::Null; "empty yields null")]
fn test_coercion_parse_date(cell: &str, expected: JsonValue) {
    assert_eq!(Coercion::ParseDate.apply(&[cell]), expected);
}

#[test]
fn test_coercion_merge_date_time() {
    assert_eq!(
        Coercion::MergeDateTime.apply(&["2/22/19", "10:00:05"]),
        json!("2019-02-22T10:00:05.000000Z")
    );

    // either half failing degrades the pair to null
    assert_eq!(
        Coercion::MergeDateTime.apply(&["garbage", "10:00:05"]),
        JsonValue::Null
    );
    assert_eq!(
        Coercion::MergeDateTime.apply(&["2/22/19", "garbage"]),
        JsonValue::Null
    );
    assert_eq!(Coercion::MergeDateTime.apply(&["2/22/19"]), JsonValue::Null);
}

#[test_case("Test Publisher", json!("Test Publisher"); "plain string passes")]
#[test_case("null", JsonValue::Null; "literal null token")]
#[test_case("", JsonValue::Null; "empty string")]
fn test_coercion_clean_string(cell: &str, expected: JsonValue) {
    assert_eq!(Coercion::CleanString.apply(&[cell]), expected);
}

#[test]
fn test_coercion_identity() {
    assert_eq!(Coercion::Identity.apply(&["null"]), json!("null"));
    assert_eq!(Coercion::Identity.apply(&[""]), json!(""));
}

// ============================================================================
// Column map construction
// ============================================================================

#[test]
fn test_build_merges_transaction_date_time_pair() {
    let map = ColumnMap::build(
        &registry(),
        &headers(&["Transaction Date", "Transaction Time", "Sales"]),
        false,
    )
    .unwrap();

    let merged: Vec<_> = map
        .entries()
        .iter()
        .filter(|e| e.coercion == Coercion::MergeDateTime)
        .collect();
    assert_eq!(merged.len(), 1);
    assert_eq!(merged[0].slug, "transaction_datetime");
    assert_eq!(merged[0].schema.types, vec!["string", "null"]);
    assert_eq!(merged[0].schema.format.as_deref(), Some("date-time"));
    assert_eq!(
        merged[0].sources,
        SourceColumns::MergedPair {
            date: "Transaction Date".to_string(),
            time: "Transaction Time".to_string(),
        }
    );

    // the two source fields are absent from the remaining entries
    let slugs: Vec<_> = map.entries().iter().map(|e| e.slug.as_str()).collect();
    assert_eq!(slugs, vec!["transaction_datetime", "sales"]);
}

#[test]
fn test_build_no_merge_without_time_column() {
    let map = ColumnMap::build(
        &registry(),
        &headers(&["Signature Match Date", "Sales"]),
        false,
    )
    .unwrap();

    let slugs: Vec<_> = map.entries().iter().map(|e| e.slug.as_str()).collect();
    assert_eq!(slugs, vec!["signature_match_date", "sales"]);
    assert_eq!(map.entries()[0].coercion, Coercion::ParseDate);
}

#[test]
fn test_build_preserves_header_order() {
    let map = ColumnMap::build(
        &registry(),
        &headers(&["Sales", "Publisher ID", "# of Clicks"]),
        false,
    )
    .unwrap();

    let slugs: Vec<_> = map.entries().iter().map(|e| e.slug.as_str()).collect();
    assert_eq!(slugs, vec!["sales", "publisher_id", "num_of_clicks"]);
}

#[test]
fn test_build_drops_unknown_headers() {
    let map = ColumnMap::build(
        &registry(),
        &headers(&["Sales", "Mystery Column"]),
        false,
    )
    .unwrap();

    assert_eq!(map.len(), 1);
    assert_eq!(map.entries()[0].slug, "sales");
}

#[test]
fn test_build_strict_rejects_unknown_headers() {
    let err = ColumnMap::build(
        &registry(),
        &headers(&["Sales", "Mystery Column"]),
        true,
    )
    .unwrap_err();

    assert!(matches!(
        err,
        crate::error::Error::UnknownColumn { column } if column == "Mystery Column"
    ));
}

#[test]
fn test_build_drops_duplicate_slugs() {
    // the same header twice resolves to the same slug; the first entry wins
    let map = ColumnMap::build(&registry(), &headers(&["Sales", "Sales"]), false).unwrap();
    assert_eq!(map.len(), 1);
}

#[test]
fn test_schema_projection() {
    let map = ColumnMap::build(
        &registry(),
        &headers(&[
            "# of Clicks",
            "Sales",
            "Publisher ID",
            "Publisher Name",
            "Transaction Date",
            "Transaction Time",
            "Transaction Created On Time",
            "Signature Match Date",
        ]),
        false,
    )
    .unwrap();

    assert_eq!(
        map.schema().to_json(),
        json!({
            "type": "object",
            "properties": {
                "num_of_clicks": { "type": ["integer", "null"] },
                "sales": { "type": ["number", "null"] },
                "publisher_id": { "type": ["integer", "null"] },
                "publisher_name": { "type": ["string", "null"] },
                "transaction_datetime": {
                    "type": ["string", "null"],
                    "format": "date-time"
                },
                "transaction_created_on_time": { "type": ["string", "null"] },
                "signature_match_date": {
                    "type": ["string", "null"],
                    "format": "date-time"
                }
            }
        })
    );
}

// ============================================================================
// Row transformation
// ============================================================================

#[test]
fn test_transform_literal_row() {
    let raw = row(&[
        ("# of Clicks", "5"),
        ("Sales", "35.5"),
        ("Publisher ID", "1000001"),
        ("Publisher Name", "Test Publisher"),
        ("Transaction Date", "2/22/19"),
        ("Transaction Time", "10:00:05"),
        ("Signature Match Date", "12/12/18"),
    ]);

    let record = transform_row(&registry(), &raw).unwrap();

    assert_eq!(
        JsonValue::Object(record),
        json!({
            "num_of_clicks": 5,
            "sales": 35.5,
            "publisher_id": 1000001,
            "publisher_name": "Test Publisher",
            "transaction_datetime": "2019-02-22T10:00:05.000000Z",
            "signature_match_date": "2018-12-12T00:00:00.000000Z"
        })
    );
}

#[test]
fn test_transform_unparseable_cells_become_null() {
    let map = ColumnMap::build(
        &registry(),
        &headers(&["# of Clicks", "Sales", "Transaction Date"]),
        false,
    )
    .unwrap();

    let record = map.transform(&row(&[
        ("# of Clicks", "many"),
        ("Sales", "n/a"),
        ("Transaction Date", "tomorrow"),
    ]));

    assert_eq!(record["num_of_clicks"], JsonValue::Null);
    assert_eq!(record["sales"], JsonValue::Null);
    assert_eq!(record["transaction_date"], JsonValue::Null);
}

#[test]
fn test_transform_missing_cells_become_null() {
    let map = ColumnMap::build(
        &registry(),
        &headers(&["# of Clicks", "Publisher Name"]),
        false,
    )
    .unwrap();

    let record = map.transform(&HashMap::new());
    assert_eq!(record["num_of_clicks"], JsonValue::Null);
    assert_eq!(record["publisher_name"], JsonValue::Null);
}

#[test]
fn test_schema_and_transform_round_trip() {
    // schema property names and transformed record keys always agree
    let header_set = headers(&[
        "Process Date",
        "Process Time",
        "Sales",
        "Publisher ID",
        "Currency",
    ]);
    let map = ColumnMap::build(&registry(), &header_set, false).unwrap();

    let raw = row(&[
        ("Process Date", "1/2/24"),
        ("Process Time", "00:30:00"),
        ("Sales", "10.0"),
        ("Publisher ID", "7"),
        ("Currency", "USD"),
    ]);
    let record = map.transform(&raw);

    let schema = map.schema();
    let mut schema_keys = schema.property_names();
    schema_keys.sort_unstable();
    let mut record_keys: Vec<&str> = record.keys().map(String::as_str).collect();
    record_keys.sort_unstable();
    assert_eq!(schema_keys, record_keys);
}

#[test]
fn test_transform_reuses_map_across_rows() {
    let map = ColumnMap::build(&registry(), &headers(&["Sales"]), false).unwrap();

    for cell in ["1.0", "2.5", "bad", ""] {
        let record = map.transform(&row(&[("Sales", cell)]));
        assert_eq!(record.len(), 1);
        assert!(record.contains_key("sales"));
    }
}
