//! Report client
//!
//! Fetches one report over one date window from the Rakuten Advertising
//! reporting endpoint, classifies transport-level errors, and exposes the
//! response as a forward-only stream of CSV lines. Also hosts the schema
//! inference probe: a request for a date two days out returns headers and
//! no data rows.

mod client;
mod csv;
mod lines;

pub use client::{ReportClient, ReportClientConfig};
pub use csv::{parse_csv_line, CsvReader};
pub use lines::LineStream;
