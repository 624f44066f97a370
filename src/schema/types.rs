//! Schema types

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Schema for a single output field
///
/// The `type` member is always an array carrying `"null"` alongside the
/// primitive type: coercion never raises, it degrades to null.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertySchema {
    /// Property type(s), e.g. `["integer", "null"]`
    #[serde(rename = "type")]
    pub types: Vec<String>,

    /// Format hint (e.g. "date-time")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

impl PropertySchema {
    /// Create a nullable property of the given primitive type
    pub fn nullable(type_name: &str) -> Self {
        Self {
            types: vec![type_name.to_string(), "null".to_string()],
            format: None,
        }
    }

    /// Set the format hint
    #[must_use]
    pub fn with_format(mut self, format: &str) -> Self {
        self.format = Some(format.to_string());
        self
    }

    /// Create a nullable date-time string property
    pub fn date_time() -> Self {
        Self::nullable("string").with_format("date-time")
    }
}

/// Structural schema for one report stream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSchema {
    /// Always "object"
    #[serde(rename = "type")]
    pub schema_type: String,

    /// Output slug → property schema
    #[serde(default)]
    pub properties: BTreeMap<String, PropertySchema>,
}

impl Default for ReportSchema {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportSchema {
    /// Create a new empty schema
    pub fn new() -> Self {
        Self {
            schema_type: "object".to_string(),
            properties: BTreeMap::new(),
        }
    }

    /// Add a property
    pub fn add_property(&mut self, slug: &str, property: PropertySchema) {
        self.properties.insert(slug.to_string(), property);
    }

    /// Get a property
    pub fn get_property(&self, slug: &str) -> Option<&PropertySchema> {
        self.properties.get(slug)
    }

    /// Names of all properties, in serialization order
    pub fn property_names(&self) -> Vec<&str> {
        self.properties.keys().map(String::as_str).collect()
    }

    /// Convert to JSON value
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}
