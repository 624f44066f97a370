//! State types for tracking sync progress
//!
//! These types are serialized to JSON and persisted between runs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Complete state for a connector
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct State {
    /// Per-stream state
    #[serde(default)]
    pub streams: HashMap<String, StreamState>,
}

impl State {
    /// Create a new empty state
    pub fn new() -> Self {
        Self::default()
    }

    /// Get state for a stream
    pub fn get_stream(&self, stream: &str) -> Option<&StreamState> {
        self.streams.get(stream)
    }

    /// Get mutable state for a stream, creating if needed
    pub fn get_stream_mut(&mut self, stream: &str) -> &mut StreamState {
        self.streams.entry(stream.to_string()).or_default()
    }

    /// Get the bookmark (last fully-synced day) for a stream
    pub fn get_bookmark(&self, stream: &str) -> Option<NaiveDate> {
        self.streams.get(stream)?.last_synced
    }

    /// Set the bookmark for a stream
    pub fn set_bookmark(&mut self, stream: &str, day: NaiveDate) {
        self.get_stream_mut(stream).last_synced = Some(day);
    }
}

/// State for a single stream
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamState {
    /// Last fully-synced UTC day; the next run resumes at the day after
    #[serde(default)]
    pub last_synced: Option<NaiveDate>,
}

impl StreamState {
    /// Create a new empty stream state
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_state_default() {
        let state = State::new();
        assert!(state.streams.is_empty());
    }

    #[test]
    fn test_state_bookmark() {
        let mut state = State::new();
        assert!(state.get_bookmark("my_report").is_none());

        state.set_bookmark("my_report", day(2024, 3, 8));
        assert_eq!(state.get_bookmark("my_report"), Some(day(2024, 3, 8)));
        assert!(state.get_bookmark("other_report").is_none());
    }

    #[test]
    fn test_state_serialization() {
        let mut state = State::new();
        state.set_bookmark("my_report", day(2024, 3, 8));

        let json = serde_json::to_string(&state).unwrap();
        assert!(json.contains("2024-03-08"));

        let restored: State = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, state);
    }

    #[test]
    fn test_state_deserializes_missing_streams() {
        let state: State = serde_json::from_str("{}").unwrap();
        assert!(state.streams.is_empty());
    }
}
