//! Simulation time model.
//!
//! # Design
//!
//! Time is represented as a monotonically increasing `Tick` counter.  The
//! mapping to simulated time is held in `SimClock`:
//!
//!   sim_secs_per_tick = tick_ms / 1000 * sim_speed
//!   sim_time_ms       = start_unix_ms + tick * tick_ms * sim_speed
//!
//! The wall-clock interval between ticks is always `tick_ms`; `sim_speed`
//! only scales how much simulated time each tick represents.  Using an integer
//! tick as the canonical unit keeps long runs free of accumulated drift.

use std::fmt;
use std::time::Duration;

// ── Tick ─────────────────────────────────────────────────────────────────────

/// An absolute simulation tick counter.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

// ── SimClock ──────────────────────────────────────────────────────────────────

/// Converts between tick counts and simulated / Unix milliseconds.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimClock {
    /// Unix timestamp (milliseconds since epoch) of tick 0.
    pub start_unix_ms: i64,
    /// Wall-clock milliseconds between ticks.
    pub tick_ms: u32,
    /// Simulated-time multiplier applied to every tick.
    pub sim_speed: f64,
    /// The current tick, advanced by `SimClock::advance()` each iteration.
    pub current_tick: Tick,
}

impl SimClock {
    pub fn new(start_unix_ms: i64, tick_ms: u32, sim_speed: f64) -> Self {
        Self {
            start_unix_ms,
            tick_ms,
            sim_speed,
            current_tick: Tick::ZERO,
        }
    }

    /// Advance the clock by one tick.
    #[inline]
    pub fn advance(&mut self) {
        self.current_tick = Tick(self.current_tick.0 + 1);
    }

    /// Simulated seconds covered by one tick (the motion models' `dt`).
    #[inline]
    pub fn tick_secs(&self) -> f64 {
        self.tick_ms as f64 / 1000.0 * self.sim_speed
    }

    /// Wall-clock interval between ticks.
    #[inline]
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.tick_ms as u64)
    }

    /// Elapsed simulated seconds since tick 0.
    #[inline]
    pub fn elapsed_secs(&self) -> f64 {
        self.current_tick.0 as f64 * self.tick_secs()
    }

    /// Elapsed simulated milliseconds since tick 0 (rounded).
    #[inline]
    pub fn elapsed_ms(&self) -> i64 {
        (self.elapsed_secs() * 1000.0).round() as i64
    }

    /// Simulated Unix timestamp in milliseconds for `current_tick`.
    #[inline]
    pub fn current_unix_ms(&self) -> i64 {
        self.start_unix_ms + self.elapsed_ms()
    }

    /// Break elapsed simulated time into (hours, minutes, seconds).
    pub fn elapsed_hms(&self) -> (u64, u32, u32) {
        let total = self.elapsed_secs().max(0.0) as u64;
        (total / 3_600, ((total % 3_600) / 60) as u32, (total % 60) as u32)
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (h, m, s) = self.elapsed_hms();
        write!(f, "{} ({:02}:{:02}:{:02})", self.current_tick, h, m, s)
    }
}
