//! Top-level simulation configuration.
//!
//! Typically loaded from a JSON file by the application crate (with the
//! `serde` feature) and passed to `dt_sim::SimBuilder`.  Every field has a
//! default so a config file only needs to name what it changes.

use crate::{DtError, DtResult, EntityKind, SimClock};

/// Inclusive speed range in distance units per simulated second.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpeedRange {
    pub min: f64,
    pub max: f64,
}

impl SpeedRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, v: f64) -> bool {
        (self.min..=self.max).contains(&v)
    }
}

/// How many entities of each kind exist for the whole session.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Population {
    pub vehicles: usize,
    pub loads:    usize,
    pub persons:  usize,
}

impl Population {
    pub fn count(&self, kind: EntityKind) -> usize {
        match kind {
            EntityKind::Vehicle => self.vehicles,
            EntityKind::Load    => self.loads,
            EntityKind::Person  => self.persons,
        }
    }

    pub fn total(&self) -> usize {
        self.vehicles + self.loads + self.persons
    }
}

/// Simulation configuration.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimConfig {
    /// Entity counts per kind.
    pub population: Population,

    pub vehicle_speed: SpeedRange,
    pub load_speed:    SpeedRange,
    pub person_speed:  SpeedRange,

    /// Wall-clock milliseconds between ticks.
    pub tick_ms: u32,

    /// Simulated-time multiplier: each tick advances `tick_ms * sim_speed`
    /// simulated milliseconds.
    pub sim_speed: f64,

    /// Per-entity, per-tick probability of a random operational event.
    pub event_probability: f64,

    /// Minimum simulated seconds between two random events for one entity.
    pub event_cooldown_secs: f64,

    /// Pairs closer than this emit a near-collision event.
    pub collision_radius: f64,

    /// A pair only counts as a near-collision if at least one entity moves
    /// faster than this.
    pub motion_threshold: f64,

    /// Multiplier applied to both entities' speeds after a near-collision.
    pub collision_speed_factor: f64,

    /// Lane occupancy at or above which a congestion event fires.
    pub congestion_threshold: usize,

    /// Number of lanes in each generated route.
    pub route_length: usize,

    /// Master RNG seed.  The same seed always produces identical motion.
    pub seed: u64,

    /// Unix milliseconds of tick 0.  `None` means "now" at build time.
    pub start_unix_ms: Option<i64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            population:             Population { vehicles: 4, loads: 6, persons: 8 },
            vehicle_speed:          SpeedRange::new(1.5, 3.0),
            load_speed:             SpeedRange::new(0.8, 1.5),
            person_speed:           SpeedRange::new(1.0, 1.6),
            tick_ms:                100,
            sim_speed:              1.0,
            event_probability:      0.002,
            event_cooldown_secs:    30.0,
            collision_radius:       1.5,
            motion_threshold:       0.1,
            collision_speed_factor: 0.5,
            congestion_threshold:   3,
            route_length:           5,
            seed:                   42,
            start_unix_ms:          None,
        }
    }
}

impl SimConfig {
    /// Configured speed range for `kind`.
    pub fn speed_range(&self, kind: EntityKind) -> SpeedRange {
        match kind {
            EntityKind::Vehicle => self.vehicle_speed,
            EntityKind::Load    => self.load_speed,
            EntityKind::Person  => self.person_speed,
        }
    }

    /// Simulated seconds per tick.
    #[inline]
    pub fn tick_secs(&self) -> f64 {
        self.tick_ms as f64 / 1000.0 * self.sim_speed
    }

    /// Construct a `SimClock` pre-configured for this run.
    pub fn make_clock(&self, start_unix_ms: i64) -> SimClock {
        SimClock::new(start_unix_ms, self.tick_ms, self.sim_speed)
    }

    /// Reject configurations the engine cannot run.
    pub fn validate(&self) -> DtResult<()> {
        if self.tick_ms == 0 {
            return Err(DtError::Config("tick_ms must be > 0".into()));
        }
        if !(self.sim_speed.is_finite() && self.sim_speed > 0.0) {
            return Err(DtError::Config(format!("sim_speed must be > 0, got {}", self.sim_speed)));
        }
        if !(0.0..=1.0).contains(&self.event_probability) {
            return Err(DtError::Config(format!(
                "event_probability must be in [0, 1], got {}",
                self.event_probability
            )));
        }
        if !(0.0..=1.0).contains(&self.collision_speed_factor) {
            return Err(DtError::Config(format!(
                "collision_speed_factor must be in [0, 1], got {}",
                self.collision_speed_factor
            )));
        }
        if !(self.collision_radius >= 0.0) {
            return Err(DtError::Config("collision_radius must be >= 0".into()));
        }
        if self.congestion_threshold < 2 {
            return Err(DtError::Config(format!(
                "congestion_threshold must be >= 2, got {}",
                self.congestion_threshold
            )));
        }
        if self.route_length < 2 {
            return Err(DtError::Config("route_length must be >= 2".into()));
        }
        for kind in EntityKind::ALL {
            let r = self.speed_range(kind);
            if !(r.min >= 0.0 && r.min <= r.max && r.max.is_finite()) {
                return Err(DtError::Config(format!(
                    "{kind} speed range [{}, {}] is invalid",
                    r.min, r.max
                )));
            }
        }
        Ok(())
    }
}
