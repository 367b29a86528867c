//! Grid motion: target seeking along the straight segments of a
//! [`PathGeometry`](dt_spatial::PathGeometry).
//!
//! Each tick is either **recovering** (the entity drifted off every segment:
//! snap back, choose a new target, do not move) or **moving** (walk toward
//! the current target, re-snap, turn toward the bearing).  Speed wobbles
//! around the target speed with a small sinusoid of simulated time.

use dt_core::geo::lerp_angle;
use dt_core::{EntityRng, Point};
use dt_entity::EntityState;
use dt_spatial::{PathGeometry, PathSegment};

use crate::{MotionError, MotionModel, MotionResult, StepContext};

/// Phase offset between consecutive entity ids (the golden angle), so
/// vehicles do not wobble in lockstep.
const WOBBLE_PHASE_STEP: f64 = 2.399_963_229_728_653;

/// Tunables for [`GridMotion`].  Distances are world units.
#[derive(Clone, Debug)]
pub struct GridMotion {
    /// Farther than this from every segment means off-path.
    pub on_path_tolerance: f64,
    /// A target closer than this counts as reached.
    pub arrival_threshold: f64,
    /// Snapping never reaches farther than this; beyond it the entity is lost.
    pub recovery_radius:   f64,
    /// Fraction of the remaining turn applied per tick.
    pub turn_rate:         f64,
    /// Fraction of the remaining speed gap closed per tick.
    pub speed_smoothing:   f64,
    /// Sinusoidal speed perturbation amplitude (units/s).
    pub wobble_amplitude:  f64,
    /// Sinusoidal speed perturbation angular frequency (rad per sim second).
    pub wobble_frequency:  f64,
}

impl Default for GridMotion {
    fn default() -> Self {
        Self {
            on_path_tolerance: 0.5,
            arrival_threshold: 0.5,
            recovery_radius:   50.0,
            turn_rate:         0.3,
            speed_smoothing:   0.1,
            wobble_amplitude:  0.15,
            wobble_frequency:  0.8,
        }
    }
}

impl GridMotion {
    /// Pick a target on one of the segments meeting at `at`.
    fn acquire_target(&self, paths: &PathGeometry, at: Point, rng: &mut EntityRng) -> Option<Point> {
        let candidates: Vec<&PathSegment> = paths.paths_near(at, self.on_path_tolerance);
        let segment = match rng.choose(&candidates) {
            Some(seg) => *seg,
            None => paths.path_at(at, self.recovery_radius)?,
        };
        Some(paths.pick_target(segment, at, rng))
    }

    fn smooth_speed(&self, entity: &mut EntityState, sim_time: f64) {
        let phase = entity.id.0 as f64 * WOBBLE_PHASE_STEP;
        let wobble = self.wobble_amplitude * (self.wobble_frequency * sim_time + phase).sin();
        let desired = (entity.target_speed + wobble).max(0.0);
        entity.speed = (entity.speed + (desired - entity.speed) * self.speed_smoothing).max(0.0);
    }
}

impl MotionModel for GridMotion {
    fn advance(
        &self,
        entity: &mut EntityState,
        rng:    &mut EntityRng,
        ctx:    &StepContext<'_>,
    ) -> MotionResult<()> {
        let paths = ctx.paths;
        let nearest = paths.nearest(entity.position).ok_or(MotionError::OffNetwork {
            entity:   entity.id,
            distance: f64::INFINITY,
        })?;

        // ── Recovering ────────────────────────────────────────────────────
        if nearest.distance > self.on_path_tolerance {
            if nearest.distance > self.recovery_radius {
                return Err(MotionError::OffNetwork { entity: entity.id, distance: nearest.distance });
            }
            entity.position = nearest.point;
            entity.target = self.acquire_target(paths, entity.position, rng);
            return Ok(());
        }

        // ── Moving ────────────────────────────────────────────────────────
        if let Some(t) = entity.target {
            if !paths.is_on_path(t, self.on_path_tolerance) {
                let snapped = paths.snap_to_nearest_path(t, self.recovery_radius);
                entity.target = paths.is_on_path(snapped, self.on_path_tolerance).then_some(snapped);
            }
        }
        let reached = entity
            .target
            .is_none_or(|t| t.distance(entity.position) <= self.arrival_threshold);
        if reached {
            entity.target = self.acquire_target(paths, entity.position, rng);
        }
        let Some(target) = entity.target else {
            return Ok(());
        };

        let from = entity.position;
        let remaining = from.distance(target);
        let step = entity.speed * ctx.dt;
        let moved = if step >= remaining {
            target
        } else {
            from.lerp(target, step / remaining)
        };
        entity.position = paths.snap_to_nearest_path(moved, self.recovery_radius);

        if remaining > f64::EPSILON {
            entity.heading = lerp_angle(entity.heading, from.bearing_to(target), self.turn_rate);
        }
        self.smooth_speed(entity, ctx.sim_time);
        Ok(())
    }
}
