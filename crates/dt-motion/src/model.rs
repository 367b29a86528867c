//! The `MotionModel` trait and the read-only inputs shared by every update.

use dt_core::EntityRng;
use dt_entity::EntityState;
use dt_spatial::{LaneGraph, PathGeometry, ZoneClassifier};

use crate::MotionResult;

/// Read-only inputs for one tick, built once by the scheduler and shared by
/// every entity update in that tick.
pub struct StepContext<'a> {
    /// Simulated seconds covered by this tick.
    pub dt: f64,

    /// Simulated seconds since tick 0, at the start of this tick.
    pub sim_time: f64,

    pub graph: &'a LaneGraph,
    pub paths: &'a PathGeometry,
    pub zones: &'a ZoneClassifier,

    /// Length of freshly generated routes.
    pub route_length: usize,
}

/// A per-kind movement strategy.
///
/// Implementations mutate one entity in place.  Returning `Err` hands the
/// entity to [`MotionEngine`](crate::MotionEngine) recovery; the model itself
/// never needs to restore a valid state.
pub trait MotionModel: Send + Sync {
    fn advance(
        &self,
        entity: &mut EntityState,
        rng:    &mut EntityRng,
        ctx:    &StepContext<'_>,
    ) -> MotionResult<()>;
}
