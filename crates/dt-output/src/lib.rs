//! `dt-output`: telemetry writers for the facility movement twin.
//!
//! | Writer        | Files created                         |
//! |---------------|---------------------------------------|
//! | [`CsvWriter`] | `position_ticks.csv`, `events.csv`    |
//!
//! Writers implement [`OutputWriter`] and are driven by [`OutputSink`],
//! which implements `dt_sim::TelemetrySink` and can therefore be handed
//! straight to `Sim::step` or a `Scheduler`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use dt_output::{CsvWriter, OutputSink};
//!
//! let writer = CsvWriter::new(Path::new("./output"))?;
//! let mut scheduler = Scheduler::new(sim, OutputSink::new(writer));
//! scheduler.start()?;
//! // ...
//! let (_sim, mut sink) = scheduler.into_inner()?;
//! if let Some(e) = sink.take_error() { log::error!("output error: {e}"); }
//! ```

pub mod csv;
pub mod error;
pub mod row;
pub mod sink;
pub mod writer;


pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use row::EventRow;
pub use sink::OutputSink;
pub use writer::OutputWriter;
