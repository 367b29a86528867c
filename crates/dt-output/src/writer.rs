//! The `OutputWriter` trait implemented by telemetry backends.

use dt_events::Event;
use dt_sim::PositionTick;

use crate::OutputResult;

/// A destination for the position and event streams.
///
/// Errors are returned to the caller; [`OutputSink`](crate::OutputSink)
/// keeps the first one for [`take_error`](crate::OutputSink::take_error).
pub trait OutputWriter {
    /// Write one tick's position batch.
    fn write_positions(&mut self, batch: &[PositionTick]) -> OutputResult<()>;

    /// Write one event.
    fn write_event(&mut self, event: &Event) -> OutputResult<()>;

    /// Flush and close all underlying file handles.
    ///
    /// Idempotent: safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}
