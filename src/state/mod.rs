//! State management and checkpointing
//!
//! One bookmark per stream: the last fully-synced UTC day. Only the sync
//! engine writes it, only after a day's rows have all been emitted, and
//! every write is flushed atomically so a crash mid-day loses at most that
//! day's work.

mod manager;
mod types;

pub use manager::StateManager;
pub use types::{State, StreamState};
