//! `dt-sim`: tick orchestration for the facility movement twin.
//!
//! # One tick
//!
//! ```text
//! Sim::step(sink):
//!   ① Motion: MotionEngine::update for every entity (grid or lane model),
//!             zone reclassified; failures recovered per entity.
//!   ② Events: EventDetector runs random / proximity / congestion.
//!   ③ Emit:   one PositionTick per entity → sink.on_position_tick,
//!             then sink.on_event once per event.
//! ```
//!
//! [`Scheduler`] drives `step` from a timer thread at the configured wall-clock
//! interval; [`Sim::run_ticks`] steps synchronously for tests and batch runs.
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use dt_core::SimConfig;
//! use dt_sim::{CallbackSink, Scheduler, SimBuilder};
//!
//! let sim = SimBuilder::new(SimConfig::default(), Arc::new(graph)).build()?;
//! let sink = CallbackSink::new(|ticks| println!("{} positions", ticks.len()), |ev| println!("{ev:?}"));
//! let mut scheduler = Scheduler::new(sim, sink);
//! scheduler.start()?;
//! std::thread::sleep(std::time::Duration::from_secs(5));
//! scheduler.stop()?;
//! ```

pub mod builder;
pub mod error;
pub mod scheduler;
pub mod sim;
pub mod sink;

#[cfg(test)]
mod tests;

pub use builder::SimBuilder;
pub use error::{SimError, SimResult};
pub use scheduler::Scheduler;
pub use sim::{Sim, TickReport};
pub use sink::{CallbackSink, NoopSink, PositionTick, TelemetrySink};
