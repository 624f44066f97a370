//! Engine types
//!
//! Output message types and statistics for the sync engine.

use crate::schema::ReportSchema;
use crate::state::State;
use crate::types::{JsonObject, JsonValue};
use chrono::{DateTime, Utc};
use serde_json::json;

/// Timestamp format used in emitted messages
const MESSAGE_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6fZ";

/// A message emitted to the downstream consumer
#[derive(Debug, Clone)]
pub enum Message {
    /// Stream schema, emitted once before the first record
    Schema {
        /// Stream identifier
        stream: String,
        /// Structural schema for the stream's records
        schema: ReportSchema,
        /// Key-like property names
        key_properties: Vec<String>,
    },

    /// One typed record
    Record {
        /// Stream identifier
        stream: String,
        /// The typed row
        record: JsonObject,
        /// When the record was extracted
        time_extracted: DateTime<Utc>,
    },

    /// State checkpoint, emitted after each day's rows
    State {
        /// Full state snapshot
        value: State,
    },
}

impl Message {
    /// Create a schema message
    pub fn schema(
        stream: impl Into<String>,
        schema: ReportSchema,
        key_properties: Vec<String>,
    ) -> Self {
        Self::Schema {
            stream: stream.into(),
            schema,
            key_properties,
        }
    }

    /// Create a record message
    pub fn record(stream: impl Into<String>, record: JsonObject) -> Self {
        Self::Record {
            stream: stream.into(),
            record,
            time_extracted: Utc::now(),
        }
    }

    /// Create a state message
    pub fn state(value: State) -> Self {
        Self::State { value }
    }

    /// Check if this is a schema message
    pub fn is_schema(&self) -> bool {
        matches!(self, Self::Schema { .. })
    }

    /// Check if this is a record message
    pub fn is_record(&self) -> bool {
        matches!(self, Self::Record { .. })
    }

    /// Check if this is a state message
    pub fn is_state(&self) -> bool {
        matches!(self, Self::State { .. })
    }

    /// Render the message as one line-protocol JSON object
    pub fn to_json(&self) -> JsonValue {
        match self {
            Message::Schema {
                stream,
                schema,
                key_properties,
            } => json!({
                "type": "SCHEMA",
                "stream": stream,
                "schema": schema.to_json(),
                "key_properties": key_properties,
            }),
            Message::Record {
                stream,
                record,
                time_extracted,
            } => json!({
                "type": "RECORD",
                "stream": stream,
                "record": record,
                "time_extracted": time_extracted.format(MESSAGE_TIMESTAMP_FORMAT).to_string(),
            }),
            Message::State { value } => json!({
                "type": "STATE",
                "value": serde_json::to_value(value).unwrap_or_default(),
            }),
        }
    }
}

/// Statistics from a sync operation
#[derive(Debug, Clone, Default)]
pub struct SyncStats {
    /// Total records emitted
    pub rows_emitted: usize,
    /// Total days fetched and checkpointed
    pub days_synced: usize,
    /// Total streams synced
    pub streams_synced: usize,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

impl SyncStats {
    /// Create new stats
    pub fn new() -> Self {
        Self::default()
    }

    /// Add emitted rows
    pub fn add_rows(&mut self, count: usize) {
        self.rows_emitted += count;
    }

    /// Add a checkpointed day
    pub fn add_day(&mut self) {
        self.days_synced += 1;
    }

    /// Add a completed stream
    pub fn add_stream(&mut self) {
        self.streams_synced += 1;
    }

    /// Set duration
    pub fn set_duration(&mut self, ms: u64) {
        self.duration_ms = ms;
    }
}
