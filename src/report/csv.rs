//! CSV decoding over a line stream

use super::lines::LineStream;
use crate::error::Result;
use std::collections::HashMap;

/// Forward-only CSV reader: one header line, then one raw row per line.
///
/// Each row is surfaced as a header → cell map, the shape the column
/// mapper consumes. Rows shorter than the header read as empty cells.
pub struct CsvReader {
    lines: LineStream,
    headers: Vec<String>,
}

impl CsvReader {
    /// Read the header line and wrap the remaining lines.
    ///
    /// Returns `None` when the body has no non-empty line at all (an
    /// entirely empty response).
    pub async fn new(mut lines: LineStream) -> Result<Option<Self>> {
        loop {
            match lines.next_line().await? {
                Some(line) if line.trim().is_empty() => continue,
                Some(line) => {
                    let headers = parse_csv_line(&line);
                    return Ok(Some(Self { lines, headers }));
                }
                None => return Ok(None),
            }
        }
    }

    /// The header names, in column order
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Read the next data row, or `None` once the body is drained
    pub async fn next_row(&mut self) -> Result<Option<HashMap<String, String>>> {
        while let Some(line) = self.lines.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }

            let cells = parse_csv_line(&line);
            let row = self
                .headers
                .iter()
                .enumerate()
                .map(|(i, header)| (header.clone(), cells.get(i).cloned().unwrap_or_default()))
                .collect();
            return Ok(Some(row));
        }
        Ok(None)
    }
}

/// Parse a CSV line into fields (comma delimiter, `"` quoting, `""` escapes)
pub fn parse_csv_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '"' {
            if in_quotes {
                // Check for escaped quote
                if chars.peek() == Some(&'"') {
                    current.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            } else {
                in_quotes = true;
            }
        } else if c == ',' && !in_quotes {
            fields.push(current.trim().to_string());
            current = String::new();
        } else {
            current.push(c);
        }
    }

    fields.push(current.trim().to_string());
    fields
}
