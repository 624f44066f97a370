//! Incremental sync engine
//!
//! Orchestrates repeated day-sized extraction cycles from a resumable
//! bookmark up to (but excluding) the current UTC day. Each day is
//! fetched as a single-day report, transformed row by row through a
//! column map built once from that day's header line, and checkpointed
//! after its rows are fully emitted. A failed fetch aborts the run
//! without a checkpoint, so the next run resumes at the same day.

mod types;

pub use types::{Message, SyncStats};

use crate::columns::ColumnMap;
use crate::config::Stream;
use crate::error::{Error, Result};
use crate::output::MessageWriter;
use crate::report::{CsvReader, LineStream, ReportClient};
use crate::state::StateManager;
use chrono::{DateTime, Utc};
use std::time::Instant;
use tracing::{debug, info};

/// Sync engine for day-windowed incremental extraction
pub struct SyncEngine {
    /// Report client
    client: ReportClient,
    /// Bookmark state
    state: StateManager,
    /// Reject unknown report columns instead of dropping them
    strict_fields: bool,
    /// "Now", captured once at engine construction; the UTC day of this
    /// instant is never fetched
    now: DateTime<Utc>,
    /// Statistics
    stats: SyncStats,
}

impl SyncEngine {
    /// Create a new sync engine
    pub fn new(client: ReportClient, state: StateManager) -> Self {
        Self {
            client,
            state,
            strict_fields: false,
            now: Utc::now(),
            stats: SyncStats::default(),
        }
    }

    /// Reject unknown report columns instead of dropping them
    #[must_use]
    pub fn with_strict_fields(mut self, strict: bool) -> Self {
        self.strict_fields = strict;
        self
    }

    /// Pin the engine clock (tests)
    #[must_use]
    pub fn with_now(mut self, now: DateTime<Utc>) -> Self {
        self.now = now;
        self
    }

    /// Get the state manager
    pub fn state(&self) -> &StateManager {
        &self.state
    }

    /// Get statistics
    pub fn stats(&self) -> &SyncStats {
        &self.stats
    }

    /// Sync one stream, emitting record and state messages.
    ///
    /// Resumes at the day after the bookmark (or the stream's configured
    /// start date when no bookmark exists) and advances one UTC calendar
    /// day at a time. The in-progress current day is excluded, avoiding
    /// partial-day reports. Returns the number of rows emitted.
    pub async fn sync_stream(
        &mut self,
        stream: &Stream,
        writer: &mut dyn MessageWriter,
    ) -> Result<usize> {
        let start = Instant::now();

        let resume = match self.state.get_bookmark(&stream.stream_id).await {
            Some(last_synced) => last_synced
                .succ_opt()
                .ok_or_else(|| Error::state("bookmark day out of range"))?,
            None => stream.start_date,
        };
        let today = self.now.date_naive();

        let mut rows_emitted = 0usize;
        let mut day = resume;

        while day < today {
            debug!(stream = %stream.stream_id, %day, "fetching day");
            let lines = self
                .client
                .fetch(&stream.report_slug, day, None, Some(stream.date_type))
                .await?;

            let day_rows = self.emit_day_rows(stream, lines, writer).await?;
            rows_emitted += day_rows;

            // The resumability boundary: persist only after the day's rows
            // are fully emitted. An empty day is still a completed day.
            self.state.set_bookmark(&stream.stream_id, day).await?;
            writer.write(&Message::state(self.state.snapshot().await))?;
            self.stats.add_day();
            debug!(stream = %stream.stream_id, %day, rows = day_rows, "day checkpointed");

            match day.succ_opt() {
                Some(next) => day = next,
                None => break,
            }
        }

        self.stats.add_rows(rows_emitted);
        self.stats.add_stream();
        self.stats.set_duration(start.elapsed().as_millis() as u64);

        info!(
            stream = %stream.stream_id,
            rows = rows_emitted,
            "completed sync"
        );

        Ok(rows_emitted)
    }

    /// Emit every row of one day's response.
    ///
    /// The column map is built once from the header line and reused for
    /// the remainder of the day.
    async fn emit_day_rows(
        &self,
        stream: &Stream,
        lines: LineStream,
        writer: &mut dyn MessageWriter,
    ) -> Result<usize> {
        let Some(mut reader) = CsvReader::new(lines).await? else {
            return Ok(0);
        };

        let column_map =
            ColumnMap::build(self.client.registry(), reader.headers(), self.strict_fields)?;
        debug!(stream = %stream.stream_id, "transforming CSV into record stream");

        let mut count = 0usize;
        while let Some(row) = reader.next_row().await? {
            let record = column_map.transform(&row);
            writer.write(&Message::record(stream.stream_id.clone(), record))?;
            count += 1;
        }

        Ok(count)
    }
}
