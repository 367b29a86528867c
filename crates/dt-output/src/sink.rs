//! `OutputSink<W>`: bridges `TelemetrySink` to an `OutputWriter`.

use dt_events::Event;
use dt_sim::{PositionTick, TelemetrySink};

use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

/// A [`TelemetrySink`] that forwards both streams to any [`OutputWriter`].
///
/// Sink methods have no return value, so the first writer error is stored
/// and later ones are only logged.  Check it with
/// [`take_error`][Self::take_error] once the scheduler has stopped.
pub struct OutputSink<W: OutputWriter> {
    writer:     W,
    positions:  u64,
    events:     u64,
    last_error: Option<OutputError>,
}

impl<W: OutputWriter> OutputSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, positions: 0, events: 0, last_error: None }
    }

    /// Take the stored write error, if any.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Position records successfully written so far.
    pub fn positions_written(&self) -> u64 {
        self.positions
    }

    /// Events successfully written so far.
    pub fn events_written(&self) -> u64 {
        self.events
    }

    /// Flush the writer now rather than waiting for `on_stop`.
    pub fn finish(&mut self) -> OutputResult<()> {
        self.writer.finish()
    }

    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, e: OutputError) {
        log::error!("telemetry write failed: {e}");
        if self.last_error.is_none() {
            self.last_error = Some(e);
        }
    }
}

impl<W: OutputWriter> TelemetrySink for OutputSink<W> {
    fn on_position_tick(&mut self, batch: &[PositionTick]) {
        match self.writer.write_positions(batch) {
            Ok(())  => self.positions += batch.len() as u64,
            Err(e) => self.store_err(e),
        }
    }

    fn on_event(&mut self, event: &Event) {
        match self.writer.write_event(event) {
            Ok(())  => self.events += 1,
            Err(e) => self.store_err(e),
        }
    }

    fn on_stop(&mut self) {
        if let Err(e) = self.writer.finish() {
            self.store_err(e);
        }
    }
}
