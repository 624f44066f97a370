//! Message output
//!
//! Line-oriented structured-message protocol consumed by an external
//! downstream process: one JSON object per line, schema before records,
//! state after each day's rows.

mod writer;

pub use writer::{JsonLinesWriter, MemoryWriter, MessageWriter};
