use crate::event::GameEvent;
use std::io::Write;

/// Outbound transport for game events. Delivery is best-effort: a sink may
/// drop events, and the game never waits on it.
pub trait EventSink {
    fn emit(&mut self, event: &GameEvent);
}

impl EventSink for Vec<GameEvent> {
    fn emit(&mut self, event: &GameEvent) {
        self.push(*event);
    }
}

/// How a [`LineSink`] encodes each event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineFormat {
    /// The pipe-delimited wire form, e.g. `collect|2`.
    #[default]
    Wire,
    /// One JSON object per line.
    Json,
}

/// Writes one event per line to any [`Write`]r and flushes after each one.
pub struct LineSink<W: Write> {
    writer: W,
    format: LineFormat,
}

impl<W: Write> LineSink<W> {
    pub fn new(writer: W, format: LineFormat) -> Self {
        Self { writer, format }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_event(&mut self, event: &GameEvent) -> std::io::Result<()> {
        match self.format {
            LineFormat::Wire => writeln!(self.writer, "{event}")?,
            LineFormat::Json => {
                serde_json::to_writer(&mut self.writer, event)?;
                self.writer.write_all(b"\n")?;
            }
        }
        self.writer.flush()
    }
}

impl<W: Write> EventSink for LineSink<W> {
    fn emit(&mut self, event: &GameEvent) {
        if let Err(err) = self.write_event(event) {
            tracing::warn!(%err, %event, "dropping outbound event");
        }
    }
}
