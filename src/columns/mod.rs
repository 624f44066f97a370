//! Column mapping and row transformation
//!
//! Builds the per-report mapping from raw CSV headers to typed output
//! fields, merging split date/time column pairs into single timestamp
//! fields, and applies it row by row. The mapping is built once per
//! response (from the header line) and reused for every row of that
//! response.

mod coercion;
mod mapper;

pub use coercion::Coercion;
pub use mapper::{transform_row, ColumnMap, ColumnMapEntry, SourceColumns, DATETIME_CONCEPTS};

#[cfg(test)]
mod tests;
