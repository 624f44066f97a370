//! Common types used throughout the Rakuten connector
//!
//! This module contains shared type definitions, type aliases,
//! and utility types used across multiple modules.

use serde::{Deserialize, Serialize};

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// JSON object type
pub type JsonObject = serde_json::Map<String, JsonValue>;

// ============================================================================
// Date Type
// ============================================================================

/// Which date the reporting API windows a report on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateType {
    /// Window on the transaction date
    #[default]
    Transaction,
    /// Window on the process date
    Process,
}

impl DateType {
    /// The query-parameter value the reporting API expects
    pub fn as_str(self) -> &'static str {
        match self {
            DateType::Transaction => "transaction",
            DateType::Process => "process",
        }
    }

    /// Parse a configured value, returning `None` for anything unrecognized.
    ///
    /// Callers drop unrecognized values and fall back to their default
    /// rather than failing the request.
    pub fn parse_lenient(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "transaction" => Some(DateType::Transaction),
            "process" => Some(DateType::Process),
            _ => None,
        }
    }
}

impl std::fmt::Display for DateType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Field Type
// ============================================================================

/// Primitive type declared for a report column in the field type table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    String,
    Integer,
    Number,
    Date,
    /// Any other declared type; values pass through untouched
    #[serde(untagged)]
    Other(String),
}

impl FieldType {
    /// The JSON-schema type name for this field type
    pub fn type_name(&self) -> &str {
        match self {
            FieldType::String => "string",
            FieldType::Integer => "integer",
            FieldType::Number => "number",
            // Dates render as ISO-8601 strings
            FieldType::Date => "string",
            FieldType::Other(name) => name,
        }
    }
}

// ============================================================================
// Utilities
// ============================================================================

/// Normalize a report slug into a stream identifier (`My-Report` → `my_report`)
pub fn stream_id_from_slug(slug: &str) -> String {
    slug.replace('-', "_").to_lowercase()
}
