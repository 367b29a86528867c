//! Fixed-interval driver: one timer thread that owns the `Sim` while running.
//!
//! # Lifecycle
//!
//! ```text
//!   Idle(sim, sink) ──start()──▶ Running(thread) ──stop()──▶ Idle(sim, sink)
//! ```
//!
//! `start` and `stop` are idempotent.  The tick thread waits on a
//! `crossbeam_channel::tick` ticker, which buffers at most one pending tick:
//! a step that overruns the interval delays the next one instead of queuing a
//! burst.  Stopping never interrupts a step; the in-flight tick completes and
//! the thread hands the `Sim` and sink back when it exits.

use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{Receiver, Sender, select};

use crate::{Sim, SimError, SimResult, TelemetrySink};

struct Running<S> {
    stop_tx: Sender<()>,
    handle:  JoinHandle<(Sim, S)>,
}

/// Drives [`Sim::step`] every `tick_ms` of wall-clock time.
pub struct Scheduler<S: TelemetrySink + Send + 'static> {
    idle:    Option<(Sim, S)>,
    running: Option<Running<S>>,
}

impl<S: TelemetrySink + Send + 'static> Scheduler<S> {
    pub fn new(sim: Sim, sink: S) -> Self {
        Self { idle: Some((sim, sink)), running: None }
    }

    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }

    /// The simulation, while stopped.
    pub fn sim(&self) -> Option<&Sim> {
        self.idle.as_ref().map(|(sim, _)| sim)
    }

    /// The sink, while stopped.
    pub fn sink(&self) -> Option<&S> {
        self.idle.as_ref().map(|(_, sink)| sink)
    }

    /// Start the tick thread.  Returns `Ok(false)` if it was already running.
    pub fn start(&mut self) -> SimResult<bool> {
        if self.running.is_some() {
            log::debug!("scheduler already running; start ignored");
            return Ok(false);
        }
        let (sim, sink) = self
            .idle
            .take()
            .ok_or_else(|| SimError::SchedulerThread("simulation lost by an earlier failure".into()))?;

        let interval = sim.clock.interval();
        let (stop_tx, stop_rx) = crossbeam_channel::bounded(1);
        log::info!("scheduler starting at {} ({} ms interval)", sim.clock, interval.as_millis());

        let handle = thread::Builder::new()
            .name("dt-tick".into())
            .spawn(move || tick_loop(sim, sink, interval, stop_rx))
            .map_err(|e| SimError::SchedulerThread(e.to_string()))?;

        self.running = Some(Running { stop_tx, handle });
        Ok(true)
    }

    /// Stop the tick thread and wait for it.  Returns `Ok(false)` if it was
    /// not running.
    pub fn stop(&mut self) -> SimResult<bool> {
        let Some(Running { stop_tx, handle }) = self.running.take() else {
            return Ok(false);
        };
        // The receiver only disappears if the thread already exited.
        let _ = stop_tx.send(());
        drop(stop_tx);

        let (sim, sink) = handle
            .join()
            .map_err(|_| SimError::SchedulerThread("tick thread panicked".into()))?;
        log::info!("scheduler stopped at {}", sim.clock);
        self.idle = Some((sim, sink));
        Ok(true)
    }

    /// Stop if running and return the simulation and sink.
    pub fn into_inner(mut self) -> SimResult<(Sim, S)> {
        self.stop()?;
        self.idle
            .take()
            .ok_or_else(|| SimError::SchedulerThread("simulation lost by an earlier failure".into()))
    }
}

impl<S: TelemetrySink + Send + 'static> Drop for Scheduler<S> {
    fn drop(&mut self) {
        if let Err(e) = self.stop() {
            log::error!("scheduler shutdown: {e}");
        }
    }
}

fn tick_loop<S: TelemetrySink>(
    mut sim:  Sim,
    mut sink: S,
    interval: Duration,
    stop_rx:  Receiver<()>,
) -> (Sim, S) {
    let ticker = crossbeam_channel::tick(interval);
    loop {
        select! {
            recv(stop_rx) -> _ => break,
            recv(ticker) -> _ => {
                sim.step(&mut sink);
            }
        }
    }
    sink.on_stop();
    (sim, sink)
}
