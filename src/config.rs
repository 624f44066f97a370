//! Connector configuration
//!
//! The configuration contract: region code, authentication token, one or
//! more report slugs each with its own start date and date-type default,
//! plus global defaults. Loaded from a JSON file or inline JSON; missing
//! required fields are fatal at startup.

use crate::error::{Error, Result};
use crate::types::{stream_id_from_slug, DateType};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::warn;

fn default_region() -> String {
    "en".to_string()
}

fn default_timeout() -> u64 {
    30
}

/// Complete connector configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectorConfig {
    /// Authentication token for the reporting API
    #[serde(default)]
    pub token: String,

    /// Region code segment of the report URL
    #[serde(default = "default_region")]
    pub region: String,

    /// Start date used by reports that do not set their own
    #[serde(default)]
    pub default_start_date: Option<NaiveDate>,

    /// Date type used by reports that do not set their own
    #[serde(default)]
    pub default_date_type: Option<String>,

    /// Reports to extract
    #[serde(default)]
    pub reports: Vec<ReportConfig>,

    /// Override the reporting endpoint (tests)
    #[serde(default)]
    pub base_url: Option<String>,

    /// Reject unknown report columns instead of dropping them
    #[serde(default)]
    pub strict_fields: bool,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

/// Configuration for a single report stream
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Report identifier on the reporting endpoint
    pub report_slug: String,

    /// First day to extract
    #[serde(default)]
    pub start_date: Option<NaiveDate>,

    /// Date type for this report (`transaction` or `process`)
    #[serde(default)]
    pub date_type: Option<String>,
}

/// A report stream with configuration defaults resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stream {
    /// Report identifier on the reporting endpoint
    pub report_slug: String,
    /// Normalized stream identifier
    pub stream_id: String,
    /// First day to extract when no bookmark exists
    pub start_date: NaiveDate,
    /// Date type for this report
    pub date_type: DateType,
}

impl ConnectorConfig {
    /// Load and validate configuration from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())
            .map_err(|e| Error::config(format!("Failed to read config file: {e}")))?;
        Self::from_json(&contents)
    }

    /// Parse and validate configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| Error::config(format!("Invalid config JSON: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate required fields
    pub fn validate(&self) -> Result<()> {
        if self.token.trim().is_empty() {
            return Err(Error::missing_field("token"));
        }
        if self.region.trim().is_empty() {
            return Err(Error::missing_field("region"));
        }
        if self.reports.is_empty() {
            return Err(Error::missing_field("reports"));
        }
        for report in &self.reports {
            if report.report_slug.trim().is_empty() {
                return Err(Error::InvalidConfigValue {
                    field: "reports".to_string(),
                    message: "report_slug must not be empty".to_string(),
                });
            }
            if report.start_date.or(self.default_start_date).is_none() {
                return Err(Error::InvalidConfigValue {
                    field: "reports".to_string(),
                    message: format!(
                        "report '{}' has no start_date and no default_start_date is set",
                        report.report_slug
                    ),
                });
            }
        }
        Ok(())
    }

    /// The resolved global date type default
    pub fn default_date_type(&self) -> DateType {
        resolve_date_type(self.default_date_type.as_deref(), DateType::default())
    }

    /// Resolve every configured report into a stream
    pub fn streams(&self) -> Result<Vec<Stream>> {
        let default_date_type = self.default_date_type();

        self.reports
            .iter()
            .map(|report| {
                let start_date = report
                    .start_date
                    .or(self.default_start_date)
                    .ok_or_else(|| Error::InvalidConfigValue {
                        field: "reports".to_string(),
                        message: format!("report '{}' has no start date", report.report_slug),
                    })?;

                Ok(Stream {
                    report_slug: report.report_slug.clone(),
                    stream_id: stream_id_from_slug(&report.report_slug),
                    start_date,
                    date_type: resolve_date_type(report.date_type.as_deref(), default_date_type),
                })
            })
            .collect()
    }
}

/// Resolve a configured date type, dropping unrecognized values.
///
/// The endpoint accepts exactly two values; anything else falls back to
/// the supplied default with a warning rather than failing the stream.
fn resolve_date_type(value: Option<&str>, default: DateType) -> DateType {
    match value {
        Some(raw) => DateType::parse_lenient(raw).unwrap_or_else(|| {
            warn!(value = raw, "unrecognized date_type, using default");
            default
        }),
        None => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_minimal_config() {
        let config = ConnectorConfig::from_json(
            r#"{
                "token": "TOKEN",
                "reports": [
                    {"report_slug": "my-report", "start_date": "2024-03-01"}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(config.token, "TOKEN");
        assert_eq!(config.region, "en");
        assert_eq!(config.timeout_seconds, 30);
    }

    #[test]
    fn test_missing_token_is_fatal() {
        let err = ConnectorConfig::from_json(
            r#"{"reports": [{"report_slug": "r", "start_date": "2024-03-01"}]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, Error::MissingConfigField { field } if field == "token"));
    }

    #[test]
    fn test_missing_reports_is_fatal() {
        let err = ConnectorConfig::from_json(r#"{"token": "TOKEN"}"#).unwrap_err();
        assert!(matches!(err, Error::MissingConfigField { field } if field == "reports"));
    }

    #[test]
    fn test_report_without_any_start_date_is_fatal() {
        let err = ConnectorConfig::from_json(
            r#"{"token": "TOKEN", "reports": [{"report_slug": "my-report"}]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidConfigValue { .. }));
    }

    #[test]
    fn test_streams_resolve_defaults() {
        let config = ConnectorConfig::from_json(
            r#"{
                "token": "TOKEN",
                "default_start_date": "2024-03-01",
                "default_date_type": "process",
                "reports": [
                    {"report_slug": "My-Report"},
                    {"report_slug": "other", "start_date": "2024-04-01", "date_type": "transaction"}
                ]
            }"#,
        )
        .unwrap();

        let streams = config.streams().unwrap();
        assert_eq!(streams.len(), 2);

        assert_eq!(streams[0].stream_id, "my_report");
        assert_eq!(streams[0].start_date, day(2024, 3, 1));
        assert_eq!(streams[0].date_type, DateType::Process);

        assert_eq!(streams[1].stream_id, "other");
        assert_eq!(streams[1].start_date, day(2024, 4, 1));
        assert_eq!(streams[1].date_type, DateType::Transaction);
    }

    #[test]
    fn test_unrecognized_date_type_falls_back() {
        let config = ConnectorConfig::from_json(
            r#"{
                "token": "TOKEN",
                "reports": [
                    {"report_slug": "r", "start_date": "2024-03-01", "date_type": "signature"}
                ]
            }"#,
        )
        .unwrap();

        let streams = config.streams().unwrap();
        assert_eq!(streams[0].date_type, DateType::Transaction);
    }
}
