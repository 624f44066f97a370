//! Column map construction and row transformation

use super::coercion::Coercion;
use crate::error::{Error, Result};
use crate::registry::{FieldDefinition, FieldRegistry};
use crate::schema::{PropertySchema, ReportSchema};
use crate::types::{FieldType, JsonObject};
use std::collections::{HashMap, HashSet};
use tracing::warn;

/// Logical datetime concepts whose `<concept>_date` / `<concept>_time`
/// column pairs merge into a single `<concept>_datetime` field
pub const DATETIME_CONCEPTS: [&str; 4] = [
    "process",
    "transaction",
    "signature_match",
    "transaction_created",
];

/// Raw header name(s) feeding one output field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceColumns {
    /// One raw column
    Single(String),
    /// A merged date + time column pair; order matters for coercion
    MergedPair {
        /// Header carrying the date cell
        date: String,
        /// Header carrying the time cell
        time: String,
    },
}

impl SourceColumns {
    /// Raw header names, in coercion order
    pub fn names(&self) -> Vec<&str> {
        match self {
            SourceColumns::Single(name) => vec![name],
            SourceColumns::MergedPair { date, time } => vec![date, time],
        }
    }
}

/// Mapping from one or two raw columns to one typed output field
#[derive(Debug, Clone)]
pub struct ColumnMapEntry {
    /// Source header name(s)
    pub sources: SourceColumns,

    /// Output field name
    pub slug: String,

    /// Schema for the output field
    pub schema: PropertySchema,

    /// How the raw cell(s) become the typed value
    pub coercion: Coercion,
}

/// Ordered set of column map entries for one report response
///
/// Built once per distinct header set and reused across all rows of that
/// response. Entries are stored in an explicit list: merged datetime
/// fields first (in concept order), then the remaining fields in resolved
/// header order.
#[derive(Debug, Clone)]
pub struct ColumnMap {
    entries: Vec<ColumnMapEntry>,
}

impl ColumnMap {
    /// Build a column map from the raw header names of one response.
    ///
    /// Headers absent from the registry are dropped with a warning, or
    /// rejected when `strict` is set. Duplicate output slugs keep the
    /// first entry; later collisions are dropped with a warning.
    pub fn build(registry: &FieldRegistry, headers: &[String], strict: bool) -> Result<Self> {
        let resolved = resolve_headers(registry, headers, strict)?;

        let by_slug: HashMap<&str, usize> = resolved
            .iter()
            .enumerate()
            .map(|(i, (_, def))| (def.slug.as_str(), i))
            .collect();

        let mut entries = Vec::new();
        let mut consumed: HashSet<usize> = HashSet::new();
        let mut used_slugs: HashSet<String> = HashSet::new();

        for concept in DATETIME_CONCEPTS {
            let date_slug = format!("{concept}_date");
            let time_slug = format!("{concept}_time");

            let (Some(&date_idx), Some(&time_idx)) =
                (by_slug.get(date_slug.as_str()), by_slug.get(time_slug.as_str()))
            else {
                continue;
            };

            let slug = format!("{concept}_datetime");
            entries.push(ColumnMapEntry {
                sources: SourceColumns::MergedPair {
                    date: resolved[date_idx].0.clone(),
                    time: resolved[time_idx].0.clone(),
                },
                slug: slug.clone(),
                schema: PropertySchema::date_time(),
                coercion: Coercion::MergeDateTime,
            });
            used_slugs.insert(slug);
            consumed.insert(date_idx);
            consumed.insert(time_idx);
        }

        for (idx, (name, def)) in resolved.iter().enumerate() {
            if consumed.contains(&idx) {
                continue;
            }
            if !used_slugs.insert(def.slug.clone()) {
                warn!(column = %name, slug = %def.slug, "duplicate output slug, dropping column");
                continue;
            }

            let (schema, coercion) = match &def.field_type {
                FieldType::Date => (PropertySchema::date_time(), Coercion::ParseDate),
                FieldType::Integer => (PropertySchema::nullable("integer"), Coercion::ParseInteger),
                FieldType::Number => (PropertySchema::nullable("number"), Coercion::ParseNumber),
                FieldType::String => (PropertySchema::nullable("string"), Coercion::CleanString),
                FieldType::Other(_) => (
                    PropertySchema::nullable(def.field_type.type_name()),
                    Coercion::Identity,
                ),
            };

            entries.push(ColumnMapEntry {
                sources: SourceColumns::Single(name.clone()),
                slug: def.slug.clone(),
                schema,
                coercion,
            });
        }

        Ok(Self { entries })
    }

    /// The ordered entries
    pub fn entries(&self) -> &[ColumnMapEntry] {
        &self.entries
    }

    /// Number of output fields
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the map has no output fields
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Project the schema half of every entry
    pub fn schema(&self) -> ReportSchema {
        let mut schema = ReportSchema::new();
        for entry in &self.entries {
            schema.add_property(&entry.slug, entry.schema.clone());
        }
        schema
    }

    /// Transform one raw row into a typed record.
    ///
    /// Pure function of its inputs; missing source cells read as empty
    /// strings and coerce to null like any unparseable cell.
    pub fn transform(&self, row: &HashMap<String, String>) -> JsonObject {
        let mut output = JsonObject::new();

        for entry in &self.entries {
            let names = entry.sources.names();
            let values: Vec<&str> = names
                .iter()
                .map(|name| row.get(*name).map_or("", String::as_str))
                .collect();
            output.insert(entry.slug.clone(), entry.coercion.apply(&values));
        }

        output
    }
}

/// Transform a single row without a prebuilt column map.
///
/// Synthesizes the map from the row's own keys (sorted for determinism).
/// Slower path, intended for ad hoc single-row transforms only.
pub fn transform_row(
    registry: &FieldRegistry,
    row: &HashMap<String, String>,
) -> Result<JsonObject> {
    let mut headers: Vec<String> = row.keys().cloned().collect();
    headers.sort();

    let column_map = ColumnMap::build(registry, &headers, false)?;
    Ok(column_map.transform(row))
}

/// Resolve headers against the registry, preserving header order
fn resolve_headers(
    registry: &FieldRegistry,
    headers: &[String],
    strict: bool,
) -> Result<Vec<(String, FieldDefinition)>> {
    let mut resolved = Vec::with_capacity(headers.len());

    for header in headers {
        let name = header.trim();
        if name.is_empty() {
            continue;
        }
        match registry.lookup(name) {
            Some(def) => resolved.push((name.to_string(), def.clone())),
            None if strict => return Err(Error::unknown_column(name)),
            None => warn!(column = %name, "unknown report column, dropping"),
        }
    }

    Ok(resolved)
}
