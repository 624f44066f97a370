//! Cell coercion
//!
//! Each output field carries one `Coercion` variant, dispatched through a
//! single `apply` function. Coercion failures never raise; an unparseable
//! cell degrades to JSON null so one bad value cannot stall a day's rows.

use crate::types::JsonValue;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use tracing::debug;

/// Report date cells use two-digit month-first dates, e.g. `2/22/19`
const REPORT_DATE_FORMAT: &str = "%m/%d/%y";

/// Report time cells use 24-hour clock times, e.g. `10:00:05`
const REPORT_TIME_FORMAT: &str = "%H:%M:%S";

/// Emitted timestamps are UTC ISO-8601 with microsecond precision
const UTC_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6fZ";

/// How a raw cell (or pair of cells) becomes a typed value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coercion {
    /// Pass the raw cell through unmodified
    Identity,
    /// Pass the cell through, normalizing `""` and the literal `"null"` to null
    CleanString,
    /// Parse as a signed integer, null on failure
    ParseInteger,
    /// Parse as a floating point number, null on failure
    ParseNumber,
    /// Parse a `MM/DD/YY` date, rendered as a UTC midnight timestamp
    ParseDate,
    /// Compose a `MM/DD/YY` date cell and an `HH:MM:SS` time cell into one
    /// UTC timestamp
    MergeDateTime,
}

impl Coercion {
    /// Apply this coercion to the source cell values.
    ///
    /// `values` holds one cell for every variant except [`MergeDateTime`],
    /// which receives the date cell followed by the time cell.
    ///
    /// [`MergeDateTime`]: Coercion::MergeDateTime
    pub fn apply(&self, values: &[&str]) -> JsonValue {
        let first = values.first().copied().unwrap_or("");

        match self {
            Coercion::Identity => JsonValue::String(first.to_string()),
            Coercion::CleanString => {
                if first.is_empty() || first == "null" {
                    JsonValue::Null
                } else {
                    JsonValue::String(first.to_string())
                }
            }
            Coercion::ParseInteger => match first.trim().parse::<i64>() {
                Ok(n) => JsonValue::Number(n.into()),
                Err(_) => {
                    debug!(cell = first, "integer cell did not parse, emitting null");
                    JsonValue::Null
                }
            },
            Coercion::ParseNumber => first
                .trim()
                .parse::<f64>()
                .ok()
                .and_then(serde_json::Number::from_f64)
                .map_or(JsonValue::Null, JsonValue::Number),
            Coercion::ParseDate => match parse_report_date(first) {
                Some(date) => {
                    JsonValue::String(utc_timestamp_string(date.and_time(NaiveTime::MIN)))
                }
                None => {
                    debug!(cell = first, "date cell did not parse, emitting null");
                    JsonValue::Null
                }
            },
            Coercion::MergeDateTime => {
                let date = parse_report_date(first);
                let time = values.get(1).copied().and_then(parse_report_time);
                match (date, time) {
                    (Some(date), Some(time)) => {
                        JsonValue::String(utc_timestamp_string(date.and_time(time)))
                    }
                    _ => {
                        debug!("date/time cell pair did not parse, emitting null");
                        JsonValue::Null
                    }
                }
            }
        }
    }
}

/// Parse a report date cell (`MM/DD/YY`)
pub(crate) fn parse_report_date(cell: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(cell.trim(), REPORT_DATE_FORMAT).ok()
}

/// Parse a report time cell (`HH:MM:SS`)
pub(crate) fn parse_report_time(cell: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(cell.trim(), REPORT_TIME_FORMAT).ok()
}

/// Render a naive datetime as a UTC ISO-8601 timestamp string
pub(crate) fn utc_timestamp_string(datetime: NaiveDateTime) -> String {
    datetime.format(UTC_TIMESTAMP_FORMAT).to_string()
}
