//! HTTP client for the reporting endpoint

use super::csv::parse_csv_line;
use super::lines::LineStream;
use crate::columns::ColumnMap;
use crate::error::{Error, Result};
use crate::registry::FieldRegistry;
use crate::schema::ReportSchema;
use crate::types::DateType;
use chrono::{Duration, NaiveDate, Utc};
use reqwest::Response;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration as StdDuration;
use tracing::{debug, info};
use url::Url;

/// Default reporting endpoint host
const DEFAULT_BASE_URL: &str = "https://ran-reporting.rakutenmarketing.com";

/// Query date format (`YYYY-MM-DD`)
const DAY_FORMAT: &str = "%Y-%m-%d";

/// Configuration for the report client
#[derive(Debug, Clone)]
pub struct ReportClientConfig {
    /// Base URL of the reporting endpoint
    pub base_url: String,
    /// Region code segment of the report URL
    pub region: String,
    /// Authentication token, passed as a query parameter
    pub token: String,
    /// Date type used when a fetch does not specify one
    pub default_date_type: DateType,
    /// Request timeout
    pub timeout: StdDuration,
    /// User agent string
    pub user_agent: String,
}

impl Default for ReportClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            region: "en".to_string(),
            token: String::new(),
            default_date_type: DateType::default(),
            timeout: StdDuration::from_secs(30),
            user_agent: format!("rakuten-connector/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Client for fetching report CSVs over single date windows
pub struct ReportClient {
    http: reqwest::Client,
    config: ReportClientConfig,
    registry: Arc<FieldRegistry>,
}

impl ReportClient {
    /// Create a new report client
    pub fn new(config: ReportClientConfig, registry: Arc<FieldRegistry>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()?;

        Ok(Self {
            http,
            config,
            registry,
        })
    }

    /// The field registry this client resolves columns against
    pub fn registry(&self) -> &Arc<FieldRegistry> {
        &self.registry
    }

    /// Fetch a report as a stream of CSV lines.
    ///
    /// `end_date` defaults to `start_date` (single-day report) and
    /// `date_type` to the configured default. The summary block is always
    /// suppressed and the timezone pinned to GMT; summary rows would break
    /// the one-record-per-line shape and a drifting timezone would
    /// misalign day windows.
    pub async fn fetch(
        &self,
        report_slug: &str,
        start_date: NaiveDate,
        end_date: Option<NaiveDate>,
        date_type: Option<DateType>,
    ) -> Result<LineStream> {
        let end_date = end_date.unwrap_or(start_date);
        let date_type = date_type.unwrap_or(self.config.default_date_type);
        let url = self.report_url(report_slug)?;

        info!(report = report_slug, "requesting report CSV");
        debug!(
            report = report_slug,
            start = %start_date,
            end = %end_date,
            date_type = %date_type,
            "report window"
        );

        let response = self
            .http
            .get(url)
            .query(&[
                ("start_date", start_date.format(DAY_FORMAT).to_string()),
                ("end_date", end_date.format(DAY_FORMAT).to_string()),
                ("date_type", date_type.as_str().to_string()),
                ("tz", "GMT".to_string()),
                ("include_summary", "N".to_string()),
                ("token", self.config.token.clone()),
            ])
            .send()
            .await?;

        let response = validate_response(response).await?;
        Ok(LineStream::new(response))
    }

    /// Infer the report's schema without reading any data rows.
    ///
    /// Requests the report for a date two days in the future; the response
    /// carries the header line and no transactions. Only the first line is
    /// read. Deterministic for a given header set, mutates nothing.
    pub async fn infer_schema(
        &self,
        report_slug: &str,
        date_type: Option<DateType>,
    ) -> Result<ReportSchema> {
        let probe_date = (Utc::now() + Duration::days(2)).date_naive();

        let mut lines = self.fetch(report_slug, probe_date, None, date_type).await?;
        let header_line = lines
            .next_line()
            .await?
            .ok_or_else(|| Error::decode("report response had no header line"))?;

        let headers = parse_csv_line(&header_line);
        let column_map = ColumnMap::build(&self.registry, &headers, false)?;
        Ok(column_map.schema())
    }

    fn report_url(&self, report_slug: &str) -> Result<Url> {
        let base = self.config.base_url.trim_end_matches('/');
        let url = format!(
            "{base}/{region}/reports/{report_slug}/filters",
            region = self.config.region
        );
        Ok(Url::parse(&url)?)
    }
}

impl std::fmt::Debug for ReportClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReportClient")
            .field("base_url", &self.config.base_url)
            .field("region", &self.config.region)
            .finish_non_exhaustive()
    }
}

/// Shape of the endpoint's JSON error body
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    errors: Option<Vec<String>>,
    #[serde(default)]
    message: Option<String>,
}

/// Classify the response status.
///
/// 400/403 carry a JSON error body; 429 is a distinct rate-limit signal
/// (retry policy belongs to the caller); 499/500 are generic server
/// errors. Every other status is success and the body is left unread.
async fn validate_response(response: Response) -> Result<Response> {
    let status = response.status().as_u16();

    match status {
        400 | 403 => {
            let body = response.text().await.unwrap_or_default();
            Err(api_error_from_body(&body))
        }
        429 => Err(Error::RateLimited),
        499 | 500 => Err(Error::Server { status }),
        _ => Ok(response),
    }
}

fn api_error_from_body(body: &str) -> Error {
    match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(parsed) => {
            if let Some(errors) = parsed.errors.filter(|e| !e.is_empty()) {
                Error::api(errors.join("; "))
            } else if let Some(message) = parsed.message {
                Error::api(message)
            } else {
                Error::api(body)
            }
        }
        Err(_) => Error::api(body),
    }
}
