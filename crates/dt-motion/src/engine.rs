//! Dispatch by motion mode, zone reclassification, and per-entity recovery.

use dt_core::{EntityRng, MotionMode, Point};
use dt_entity::EntityState;

use crate::{GridMotion, LaneMotion, MotionError, MotionModel, MotionResult, StepContext};

/// What happened to one entity during one update.
#[derive(Debug)]
pub enum UpdateOutcome {
    /// The model advanced the entity normally.
    Moved,
    /// The model failed; the entity was reset to a valid place.
    Recovered { error: MotionError },
    /// The model failed and the reset failed too.  The entity keeps whatever
    /// state the failed update left behind.
    Fatal { error: MotionError },
}

impl UpdateOutcome {
    pub fn is_moved(&self) -> bool {
        matches!(self, UpdateOutcome::Moved)
    }
}

/// Owns one instance of each motion model and routes every entity to the
/// model its kind selects.
///
/// ```ignore
/// let engine = MotionEngine::new(safe_point);
/// for (entity, rng) in store.iter_mut().zip(rngs.iter_mut()) {
///     match engine.update(entity, rng, &ctx) {
///         UpdateOutcome::Moved => {}
///         UpdateOutcome::Recovered { error } => log::warn!("{error}"),
///         UpdateOutcome::Fatal { error } => log::error!("{error}"),
///     }
/// }
/// ```
pub struct MotionEngine {
    pub grid: GridMotion,
    pub lane: LaneMotion,

    /// Where grid-mode entities are put back after a failed update.
    pub safe_point: Point,

    /// Fraction of the gap between target and cruise speed closed per tick.
    pub target_relax_rate: f64,
}

impl MotionEngine {
    pub fn new(safe_point: Point) -> Self {
        Self {
            grid: GridMotion::default(),
            lane: LaneMotion::default(),
            safe_point,
            target_relax_rate: 0.02,
        }
    }

    /// The model responsible for `mode`.
    pub fn model(&self, mode: MotionMode) -> &dyn MotionModel {
        match mode {
            MotionMode::Grid => &self.grid,
            MotionMode::Lane => &self.lane,
        }
    }

    /// Advance one entity by one tick and reclassify its zone.
    pub fn update(
        &self,
        entity: &mut EntityState,
        rng:    &mut EntityRng,
        ctx:    &StepContext<'_>,
    ) -> UpdateOutcome {
        entity.target_speed += (entity.cruise_speed - entity.target_speed) * self.target_relax_rate;

        let result = self
            .model(entity.motion_mode())
            .advance(entity, rng, ctx)
            .and_then(|()| check_finite(entity));

        let outcome = match result {
            Ok(()) => UpdateOutcome::Moved,
            Err(error) => match self.reset(entity, rng, ctx) {
                Ok(()) => UpdateOutcome::Recovered { error },
                Err(_) => UpdateOutcome::Fatal { error },
            },
        };

        if entity.position.is_finite() {
            entity.zone = ctx.zones.classify(entity.position);
        }
        outcome
    }

    /// Put `entity` back somewhere valid.
    ///
    /// Grid entities go to [`safe_point`](Self::safe_point); lane entities to
    /// the start of a random lane with a new route.  Speeds fall back to the
    /// cruise speed when they are no longer usable.
    pub fn reset(
        &self,
        entity: &mut EntityState,
        rng:    &mut EntityRng,
        ctx:    &StepContext<'_>,
    ) -> MotionResult<()> {
        if !(entity.cruise_speed.is_finite() && entity.cruise_speed >= 0.0) {
            entity.cruise_speed = 0.0;
        }
        if !(entity.speed.is_finite() && entity.target_speed.is_finite()) {
            entity.speed = entity.cruise_speed;
            entity.target_speed = entity.cruise_speed;
        }

        match entity.motion_mode() {
            MotionMode::Grid => {
                entity.position = self.safe_point;
                entity.target = None;
                entity.heading = 0.0;
            }
            MotionMode::Lane => {
                let lane = ctx.graph.random_lane(rng)?;
                entity.set_route(ctx.graph.random_route(lane, ctx.route_length, rng)?);
                entity.enter_lane(lane);
                entity.position = ctx.graph.position_at_progress(lane, 0.0)?;
                entity.heading = ctx.graph.heading_at_progress(lane, 0.0)?;
            }
        }
        Ok(())
    }
}

fn check_finite(entity: &EntityState) -> MotionResult<()> {
    let finite = entity.position.is_finite()
        && entity.speed.is_finite()
        && entity.heading.is_finite()
        && entity.progress.is_finite();
    if finite { Ok(()) } else { Err(MotionError::NonFinite(entity.id)) }
}
