//! Discovery catalog
//!
//! Describes, per stream, its identifier, inferred schema, and field
//! metadata (key-like fields are always included, the rest are optional)
//! without performing any row extraction. Catalogs round-trip through
//! JSON so a consumer can mark streams as selected and feed the catalog
//! back into a sync.

use crate::config::Stream;
use crate::error::{Error, Result};
use crate::report::ReportClient;
use crate::schema::ReportSchema;
use crate::types::JsonValue;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::path::Path;

/// Discovered catalog
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    /// Available streams
    pub streams: Vec<CatalogEntry>,
}

/// One stream in the catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Report slug
    pub stream: String,

    /// Normalized stream identifier
    pub tap_stream_id: String,

    /// Inferred record schema
    pub schema: ReportSchema,

    /// Field and stream metadata
    #[serde(default)]
    pub metadata: Vec<MetadataEntry>,
}

/// One metadata entry, addressed by breadcrumb
///
/// The empty breadcrumb addresses the stream itself; `["properties", x]`
/// addresses field `x`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetadataEntry {
    /// Path to the annotated node
    pub breadcrumb: Vec<String>,

    /// The annotations
    pub metadata: JsonValue,
}

impl Catalog {
    /// Discover the catalog for every configured stream.
    ///
    /// Infers each schema from a headers-only probe; no rows are read and
    /// no state is touched.
    pub async fn discover(client: &ReportClient, streams: &[Stream]) -> Result<Self> {
        let mut entries = Vec::with_capacity(streams.len());

        for stream in streams {
            let schema = client
                .infer_schema(&stream.report_slug, Some(stream.date_type))
                .await?;
            entries.push(CatalogEntry::new(stream, schema));
        }

        Ok(Self { streams: entries })
    }

    /// Load a catalog from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())
            .map_err(|e| Error::config(format!("Failed to read catalog file: {e}")))?;
        serde_json::from_str(&contents)
            .map_err(|e| Error::config(format!("Invalid catalog JSON: {e}")))
    }

    /// Find an entry by stream identifier
    pub fn get_entry(&self, tap_stream_id: &str) -> Option<&CatalogEntry> {
        self.streams.iter().find(|e| e.tap_stream_id == tap_stream_id)
    }

    /// Render as pretty-printed JSON
    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(Error::JsonParse)
    }
}

impl CatalogEntry {
    /// Build an entry for a stream, deriving metadata from its schema
    pub fn new(stream: &Stream, schema: ReportSchema) -> Self {
        let metadata = build_metadata(&schema);
        Self {
            stream: stream.report_slug.clone(),
            tap_stream_id: stream.stream_id.clone(),
            schema,
            metadata,
        }
    }

    /// Key-like property names from the stream-level metadata
    pub fn key_properties(&self) -> Vec<String> {
        self.stream_metadata()
            .and_then(|m| m.get("table-key-properties"))
            .and_then(JsonValue::as_array)
            .map(|keys| {
                keys.iter()
                    .filter_map(|k| k.as_str().map(ToString::to_string))
                    .collect()
            })
            .unwrap_or_else(|| key_properties(&self.schema))
    }

    /// Whether this stream should be synced.
    ///
    /// Explicit `selected` metadata wins; `selected-by-default` is the
    /// fallback; a stream with neither is not selected.
    pub fn is_selected(&self) -> bool {
        let Some(metadata) = self.stream_metadata() else {
            return false;
        };
        metadata
            .get("selected")
            .or_else(|| metadata.get("selected-by-default"))
            .and_then(JsonValue::as_bool)
            .unwrap_or(false)
    }

    /// The empty-breadcrumb (stream-level) metadata
    fn stream_metadata(&self) -> Option<&JsonValue> {
        self.metadata
            .iter()
            .find(|e| e.breadcrumb.is_empty())
            .map(|e| &e.metadata)
    }
}

/// Key-like properties of a schema: every field whose slug mentions a date
pub fn key_properties(schema: &ReportSchema) -> Vec<String> {
    schema
        .property_names()
        .into_iter()
        .filter(|name| name.contains("date"))
        .map(ToString::to_string)
        .collect()
}

/// Derive the metadata list for a schema
fn build_metadata(schema: &ReportSchema) -> Vec<MetadataEntry> {
    let keys = key_properties(schema);

    let mut entries = vec![MetadataEntry {
        breadcrumb: Vec::new(),
        metadata: json!({
            "table-key-properties": keys,
            "forced-replication-method": "INCREMENTAL",
        }),
    }];

    for name in schema.property_names() {
        let inclusion = if keys.iter().any(|k| k == name) {
            "automatic"
        } else {
            "available"
        };
        entries.push(MetadataEntry {
            breadcrumb: vec!["properties".to_string(), name.to_string()],
            metadata: json!({
                "inclusion": inclusion,
                "selected-by-default": true,
            }),
        });
    }

    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::PropertySchema;
    use crate::types::DateType;
    use chrono::NaiveDate;

    fn test_stream() -> Stream {
        Stream {
            report_slug: "My-Report".to_string(),
            stream_id: "my_report".to_string(),
            start_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            date_type: DateType::Transaction,
        }
    }

    fn test_schema() -> ReportSchema {
        let mut schema = ReportSchema::new();
        schema.add_property("sales", PropertySchema::nullable("number"));
        schema.add_property("transaction_datetime", PropertySchema::date_time());
        schema.add_property("signature_match_date", PropertySchema::date_time());
        schema
    }

    #[test]
    fn test_key_properties_are_date_like_fields() {
        assert_eq!(
            key_properties(&test_schema()),
            vec!["signature_match_date", "transaction_datetime"]
        );
    }

    #[test]
    fn test_entry_metadata_inclusion() {
        let entry = CatalogEntry::new(&test_stream(), test_schema());

        assert_eq!(entry.stream, "My-Report");
        assert_eq!(entry.tap_stream_id, "my_report");
        assert_eq!(
            entry.key_properties(),
            vec!["signature_match_date", "transaction_datetime"]
        );

        let field_metadata = |name: &str| {
            entry
                .metadata
                .iter()
                .find(|e| e.breadcrumb == vec!["properties".to_string(), name.to_string()])
                .map(|e| e.metadata.clone())
                .unwrap()
        };

        assert_eq!(field_metadata("transaction_datetime")["inclusion"], "automatic");
        assert_eq!(field_metadata("sales")["inclusion"], "available");
        assert_eq!(field_metadata("sales")["selected-by-default"], true);
    }

    #[test]
    fn test_selection_defaults_off_for_discovered_entries() {
        // discovery writes no stream-level selection; a consumer must
        // mark streams selected before feeding the catalog back
        let entry = CatalogEntry::new(&test_stream(), test_schema());
        assert!(!entry.is_selected());
    }

    #[test]
    fn test_explicit_selection_wins() {
        let mut entry = CatalogEntry::new(&test_stream(), test_schema());
        if let Some(stream_meta) = entry
            .metadata
            .iter_mut()
            .find(|e| e.breadcrumb.is_empty())
        {
            stream_meta.metadata["selected"] = json!(true);
        }
        assert!(entry.is_selected());
    }

    #[test]
    fn test_catalog_round_trips_through_json() {
        let catalog = Catalog {
            streams: vec![CatalogEntry::new(&test_stream(), test_schema())],
        };

        let json = catalog.to_json_pretty().unwrap();
        let restored: Catalog = serde_json::from_str(&json).unwrap();

        assert_eq!(restored.streams.len(), 1);
        let entry = restored.get_entry("my_report").unwrap();
        assert_eq!(entry.schema, catalog.streams[0].schema);
        assert_eq!(entry.key_properties(), catalog.streams[0].key_properties());
    }
}
