//! The `Sim` struct and its single-tick step.

use std::sync::Arc;

use dt_core::geo::to_degrees_positive;
use dt_core::{SimClock, SimConfig, SimRng, Tick};
use dt_entity::{EntityRngs, EntityStore};
use dt_events::EventDetector;
use dt_motion::{MotionEngine, StepContext, UpdateOutcome};
use dt_spatial::{LaneGraph, PathGeometry, ZoneClassifier};

use crate::{PositionTick, TelemetrySink};

/// Lower bound of the synthetic telemetry confidence.
const MIN_CONFIDENCE: f64 = 0.90;

/// Summary of one [`Sim::step`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TickReport {
    /// The tick that was just processed.
    pub tick:         Tick,
    /// Simulated Unix milliseconds stamped on this tick's output.
    pub timestamp_ms: i64,
    pub positions:    usize,
    pub events:       usize,
    /// Entities whose update failed and were reset.
    pub recovered:    usize,
    /// Entities whose update failed and could not be reset.
    pub fatal:        usize,
}

/// All state of one simulation.
///
/// Create via [`SimBuilder`](crate::SimBuilder).  Nothing here is global: two
/// `Sim`s over the same `Arc<LaneGraph>` run independently.
pub struct Sim {
    pub config: SimConfig,

    /// Simulation clock; tracks the current tick and maps to Unix time.
    pub clock: SimClock,

    pub entities: EntityStore,

    /// Per-entity deterministic RNGs, separated for the split-borrow pattern.
    pub rngs: EntityRngs,

    pub graph: Arc<LaneGraph>,
    pub paths: PathGeometry,
    pub zones: ZoneClassifier,

    pub engine:   MotionEngine,
    pub detector: EventDetector,

    /// Draws telemetry confidence values.
    pub(crate) telemetry_rng: SimRng,
}

impl Sim {
    /// Run one tick and deliver its output to `sink`.
    pub fn step<S: TelemetrySink + ?Sized>(&mut self, sink: &mut S) -> TickReport {
        let tick = self.clock.current_tick;

        // ── Motion ────────────────────────────────────────────────────────
        let ctx = StepContext {
            dt:           self.clock.tick_secs(),
            sim_time:     self.clock.elapsed_secs(),
            graph:        &self.graph,
            paths:        &self.paths,
            zones:        &self.zones,
            route_length: self.config.route_length,
        };
        let (mut recovered, mut fatal) = (0, 0);
        for (entity, rng) in self.entities.iter_mut().zip(self.rngs.iter_mut()) {
            match self.engine.update(entity, rng, &ctx) {
                UpdateOutcome::Moved => {}
                UpdateOutcome::Recovered { error } => {
                    recovered += 1;
                    log::warn!("{tick}: entity {} reset after error: {error}", entity.id);
                }
                UpdateOutcome::Fatal { error } => {
                    fatal += 1;
                    log::error!("{tick}: entity {} could not be reset: {error}", entity.id);
                }
            }
        }

        self.clock.advance();
        let now_ms = self.clock.current_unix_ms();

        // ── Events ────────────────────────────────────────────────────────
        let events = self.detector.detect(
            self.entities.as_mut_slice(),
            &self.graph,
            &self.zones,
            now_ms,
        );

        // ── Emit ──────────────────────────────────────────────────────────
        let batch: Vec<PositionTick> = self
            .entities
            .iter()
            .map(|e| PositionTick {
                entity:       e.id,
                kind:         e.kind,
                x:            e.position.x,
                y:            e.position.y,
                speed:        e.speed,
                heading_deg:  to_degrees_positive(e.heading),
                zone:         self.zones.name(e.zone).to_owned(),
                confidence:   self.telemetry_rng.gen_range(MIN_CONFIDENCE..1.0),
                timestamp_ms: now_ms,
            })
            .collect();

        sink.on_position_tick(&batch);
        for event in &events {
            sink.on_event(event);
        }

        log::trace!("{tick}: {} positions, {} events", batch.len(), events.len());
        TickReport {
            tick,
            timestamp_ms: now_ms,
            positions: batch.len(),
            events: events.len(),
            recovered,
            fatal,
        }
    }

    /// Run exactly `n` ticks synchronously.  Returns the report of each tick.
    pub fn run_ticks<S: TelemetrySink + ?Sized>(&mut self, n: u64, sink: &mut S) -> Vec<TickReport> {
        (0..n).map(|_| self.step(sink)).collect()
    }
}
