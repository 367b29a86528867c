//! Lane motion: progress along the current lane polyline.

use dt_core::EntityRng;
use dt_entity::EntityState;

use crate::{MotionError, MotionModel, MotionResult, StepContext};

/// Tunables for [`LaneMotion`].
#[derive(Clone, Debug)]
pub struct LaneMotion {
    /// Half-width of the uniform per-tick speed noise (units/s).
    pub jitter:          f64,
    /// Fraction of the remaining speed gap closed per tick.
    pub speed_smoothing: f64,
}

impl Default for LaneMotion {
    fn default() -> Self {
        Self { jitter: 0.05, speed_smoothing: 0.1 }
    }
}

impl LaneMotion {
    /// Move `entity` onto its next lane with progress 0.
    ///
    /// Order of preference: the planned next lane if connected, any lane the
    /// graph chooses (including a reversal at a dead end), otherwise a fresh
    /// route rooted here.  A lane nothing connects to restarts from its own
    /// beginning.
    fn transition(
        &self,
        entity: &mut EntityState,
        rng:    &mut EntityRng,
        ctx:    &StepContext<'_>,
    ) -> MotionResult<()> {
        let current = entity.lane;
        let chosen = ctx.graph.choose_next_lane(current, entity.planned_next(), rng)?;

        let next = match chosen {
            Some(next) => {
                if !entity.advance_route(next) || entity.planned_next().is_none() {
                    entity.set_route(ctx.graph.random_route(next, ctx.route_length, rng)?);
                    log::debug!("entity {} rerouted from lane {}", entity.id, ctx.graph.lane_name(next));
                }
                next
            }
            None => {
                let route = ctx.graph.random_route(current, ctx.route_length, rng)?;
                let resume = route.get(1).copied();
                entity.set_route(route);
                match resume {
                    Some(lane) => {
                        entity.route_cursor = 1;
                        lane
                    }
                    None => current,
                }
            }
        };

        log::debug!(
            "entity {} lane {} -> {}",
            entity.id,
            ctx.graph.lane_name(current),
            ctx.graph.lane_name(next)
        );
        entity.enter_lane(next);
        Ok(())
    }
}

impl MotionModel for LaneMotion {
    fn advance(
        &self,
        entity: &mut EntityState,
        rng:    &mut EntityRng,
        ctx:    &StepContext<'_>,
    ) -> MotionResult<()> {
        if !entity.on_lane() {
            return Err(MotionError::NotOnLane(entity.id));
        }
        let length = ctx.graph.lane(entity.lane)?.length_floored();

        entity.progress += entity.speed * ctx.dt / length;
        if entity.progress >= 1.0 {
            self.transition(entity, rng, ctx)?;
        }

        entity.position = ctx.graph.position_at_progress(entity.lane, entity.progress)?;
        entity.heading = ctx.graph.heading_at_progress(entity.lane, entity.progress)?;

        let noisy = entity.target_speed + rng.gen_range(-self.jitter..=self.jitter);
        entity.speed = (entity.speed + (noisy - entity.speed) * self.speed_smoothing).max(0.0);
        Ok(())
    }
}
