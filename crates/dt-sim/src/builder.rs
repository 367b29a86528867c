//! Fluent builder for constructing a [`Sim`].

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use dt_core::{EntityKind, Point, SimConfig, SimRng};
use dt_entity::EntityStoreBuilder;
use dt_events::{DetectorConfig, EventDetector};
use dt_motion::MotionEngine;
use dt_spatial::{LaneGraph, PathGeometry, ZoneClassifier};

use crate::{Sim, SimError, SimResult};

/// Seed offsets for the simulation-level RNG streams.
const DETECTOR_STREAM: u64 = 1;
const TELEMETRY_STREAM: u64 = 2;

/// Fluent builder for [`Sim`].
///
/// # Required inputs
///
/// - [`SimConfig`]: population, speeds, tick interval, thresholds, seed
/// - `Arc<LaneGraph>`: the built lane network
///
/// # Optional inputs (have defaults)
///
/// | Method             | Default                                         |
/// |--------------------|-------------------------------------------------|
/// | `.paths(p)`        | `PathGeometry::from_lane_graph(&graph)`         |
/// | `.zones(z)`        | `ZoneClassifier::single_zone()`                 |
/// | `.safe_point(p)`   | start of the first path segment, else origin    |
///
/// # Example
///
/// ```rust,ignore
/// let mut sim = SimBuilder::new(config, Arc::new(graph))
///     .zones(ZoneClassifier::warehouse()?)
///     .build()?;
/// sim.run_ticks(100, &mut NoopSink);
/// ```
pub struct SimBuilder {
    config:     SimConfig,
    graph:      Arc<LaneGraph>,
    paths:      Option<PathGeometry>,
    zones:      Option<ZoneClassifier>,
    safe_point: Option<Point>,
}

impl SimBuilder {
    pub fn new(config: SimConfig, graph: Arc<LaneGraph>) -> Self {
        Self { config, graph, paths: None, zones: None, safe_point: None }
    }

    /// Geometry for grid-mode entities.
    pub fn paths(mut self, paths: PathGeometry) -> Self {
        self.paths = Some(paths);
        self
    }

    pub fn zones(mut self, zones: ZoneClassifier) -> Self {
        self.zones = Some(zones);
        self
    }

    /// Where grid-mode entities are reset to after a failed update.
    pub fn safe_point(mut self, p: Point) -> Self {
        self.safe_point = Some(p);
        self
    }

    /// Validate the configuration, spawn the population, and return a
    /// ready-to-step [`Sim`].
    pub fn build(self) -> SimResult<Sim> {
        self.config.validate()?;

        let paths = self.paths.unwrap_or_else(|| PathGeometry::from_lane_graph(&self.graph));
        let zones = self.zones.unwrap_or_default();
        let safe_point = self
            .safe_point
            .or_else(|| paths.segments().first().map(|s| s.start))
            .unwrap_or(Point::ORIGIN);

        if !safe_point.is_finite() {
            return Err(SimError::Config(format!("safe point {safe_point} is not finite")));
        }
        if self.config.population.vehicles > 0 && paths.is_empty() {
            log::warn!("no path geometry: vehicles will stay at the safe point {safe_point}");
        }

        let (entities, rngs) = EntityStoreBuilder::new(&self.config, &self.graph)
            .paths(&paths)
            .zones(&zones)
            .safe_point(safe_point)
            .build()?;

        let start_unix_ms = self.config.start_unix_ms.unwrap_or_else(now_unix_ms);
        let mut master = SimRng::new(self.config.seed);
        let detector = EventDetector::new(DetectorConfig::from(&self.config), master.child(DETECTOR_STREAM));

        log::info!(
            "simulation built: {} vehicles, {} loads, {} persons, {} lanes, {} path segments, {} zones, tick {} ms x{}",
            entities.count_of(EntityKind::Vehicle),
            entities.count_of(EntityKind::Load),
            entities.count_of(EntityKind::Person),
            self.graph.lane_count(),
            paths.segments().len(),
            zones.zone_count(),
            self.config.tick_ms,
            self.config.sim_speed,
        );

        Ok(Sim {
            clock:         self.config.make_clock(start_unix_ms),
            telemetry_rng: master.child(TELEMETRY_STREAM),
            engine:        MotionEngine::new(safe_point),
            config:        self.config,
            entities,
            rngs,
            graph:         self.graph,
            paths,
            zones,
            detector,
        })
    }
}

fn now_unix_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_millis() as i64)
}
