//! Report schema types
//!
//! JSON-schema shaped description of the typed records a report stream
//! emits. Schemas are projected from a column map (see [`crate::columns`]);
//! every property is nullable because coercion failures degrade to null.

mod types;

pub use types::{PropertySchema, ReportSchema};

#[cfg(test)]
mod tests;
