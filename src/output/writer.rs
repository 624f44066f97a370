//! Message writers

use crate::engine::Message;
use crate::error::{Error, Result};
use std::io::Write;

/// Sink for emitted messages
pub trait MessageWriter {
    /// Write one message
    fn write(&mut self, message: &Message) -> Result<()>;
}

/// Writes one JSON object per line to any `io::Write` sink.
///
/// State messages flush the sink: they are checkpoint boundaries, and the
/// downstream consumer must see them before the next day starts.
pub struct JsonLinesWriter<W: Write> {
    out: W,
}

impl<W: Write> JsonLinesWriter<W> {
    /// Create a writer over the given sink
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Consume the writer, returning the sink
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl JsonLinesWriter<std::io::Stdout> {
    /// Create a writer over stdout
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> MessageWriter for JsonLinesWriter<W> {
    fn write(&mut self, message: &Message) -> Result<()> {
        let line = serde_json::to_string(&message.to_json())?;
        writeln!(self.out, "{line}").map_err(Error::Io)?;

        if message.is_state() {
            self.out.flush().map_err(Error::Io)?;
        }
        Ok(())
    }
}

/// Collects messages in memory (tests, dry runs)
#[derive(Debug, Default)]
pub struct MemoryWriter {
    messages: Vec<Message>,
}

impl MemoryWriter {
    /// Create an empty writer
    pub fn new() -> Self {
        Self::default()
    }

    /// All collected messages, in emission order
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Collected record messages only
    pub fn records(&self) -> Vec<&Message> {
        self.messages.iter().filter(|m| m.is_record()).collect()
    }

    /// Collected state messages only
    pub fn states(&self) -> Vec<&Message> {
        self.messages.iter().filter(|m| m.is_state()).collect()
    }
}

impl MessageWriter for MemoryWriter {
    fn write(&mut self, message: &Message) -> Result<()> {
        self.messages.push(message.clone());
        Ok(())
    }
}
