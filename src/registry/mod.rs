//! Field type registry
//!
//! Static lookup from a raw CSV column header to its semantic field
//! definition (output slug and primitive type). The table ships with the
//! binary and is parsed once at startup; a malformed table is a fatal
//! configuration error, not something to recover from mid-sync.

use crate::error::{Error, Result};
use crate::types::FieldType;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The built-in header → field definition table
const FIELD_TYPES_JSON: &str = include_str!("field_types.json");

/// Semantic definition of a report column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDefinition {
    /// Normalized output field name
    pub slug: String,

    /// Declared primitive type
    #[serde(rename = "type")]
    pub field_type: FieldType,
}

/// Immutable registry of known report columns, keyed by exact header text
#[derive(Debug, Clone)]
pub struct FieldRegistry {
    fields: HashMap<String, FieldDefinition>,
}

impl FieldRegistry {
    /// Load the built-in field type table.
    ///
    /// Fails fast if the embedded table does not parse or is empty.
    pub fn builtin() -> Result<Self> {
        Self::from_json(FIELD_TYPES_JSON)
    }

    /// Load a registry from a JSON table (header → `{slug, type}`)
    pub fn from_json(json: &str) -> Result<Self> {
        let fields: HashMap<String, FieldDefinition> = serde_json::from_str(json)
            .map_err(|e| Error::field_table(e.to_string()))?;

        if fields.is_empty() {
            return Err(Error::field_table("table contains no fields"));
        }
        for (name, def) in &fields {
            if def.slug.is_empty() {
                return Err(Error::field_table(format!("empty slug for column '{name}'")));
            }
        }

        Ok(Self { fields })
    }

    /// Look up a column by its display name.
    ///
    /// The name is trimmed first; report headers occasionally carry
    /// surrounding whitespace.
    pub fn lookup(&self, display_name: &str) -> Option<&FieldDefinition> {
        self.fields.get(display_name.trim())
    }

    /// Number of known columns
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[cfg(test)]
mod tests;
