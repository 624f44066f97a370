//! Streaming line reader over an HTTP response body
//!
//! The response is consumed as decoded lines, never buffered wholesale,
//! to bound memory for large reports. The stream is forward-only and
//! single-pass; dropping it releases the connection on every exit path.

use crate::error::{Error, Result};
use bytes::Bytes;
use futures::{Stream, StreamExt};
use std::pin::Pin;

type ByteStream = Pin<Box<dyn Stream<Item = reqwest::Result<Bytes>> + Send>>;

/// Pull-based line iterator over a streaming response body.
///
/// Lines are UTF-8 decoded (lossily, the endpoint promises UTF-8), a
/// leading byte-order mark is stripped, and `\r\n` endings are tolerated.
pub struct LineStream {
    body: ByteStream,
    buffer: Vec<u8>,
    exhausted: bool,
    at_start: bool,
}

impl LineStream {
    /// Wrap a streaming HTTP response
    pub(crate) fn new(response: reqwest::Response) -> Self {
        Self::from_byte_stream(Box::pin(response.bytes_stream()))
    }

    fn from_byte_stream(body: ByteStream) -> Self {
        Self {
            body,
            buffer: Vec::new(),
            exhausted: false,
            at_start: true,
        }
    }

    /// Build a line stream over fixed text (test fixture path)
    #[cfg(test)]
    pub(crate) fn from_text(text: &str) -> Self {
        let chunk = Bytes::copy_from_slice(text.as_bytes());
        Self::from_byte_stream(Box::pin(futures::stream::once(async move { Ok(chunk) })))
    }

    /// Read the next line, or `None` once the body is drained.
    ///
    /// Transport errors while reading the body surface here; the stream
    /// is not restartable after an error.
    pub async fn next_line(&mut self) -> Result<Option<String>> {
        loop {
            if let Some(pos) = self.buffer.iter().position(|&b| b == b'\n') {
                let mut line: Vec<u8> = self.buffer.drain(..=pos).collect();
                line.pop();
                if line.last() == Some(&b'\r') {
                    line.pop();
                }
                return Ok(Some(self.finish_line(&line)));
            }

            if self.exhausted {
                if self.buffer.is_empty() {
                    return Ok(None);
                }
                let mut line = std::mem::take(&mut self.buffer);
                if line.last() == Some(&b'\r') {
                    line.pop();
                }
                return Ok(Some(self.finish_line(&line)));
            }

            match self.body.next().await {
                Some(Ok(chunk)) => self.buffer.extend_from_slice(&chunk),
                Some(Err(e)) => return Err(Error::Http(e)),
                None => self.exhausted = true,
            }
        }
    }

    fn finish_line(&mut self, bytes: &[u8]) -> String {
        let line = String::from_utf8_lossy(bytes).into_owned();
        if self.at_start {
            self.at_start = false;
            if let Some(stripped) = line.strip_prefix('\u{feff}') {
                return stripped.to_string();
            }
        }
        line
    }
}

impl std::fmt::Debug for LineStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LineStream")
            .field("buffered_bytes", &self.buffer.len())
            .field("exhausted", &self.exhausted)
            .finish_non_exhaustive()
    }
}
