use dt_core::EntityId;
use dt_spatial::SpatialError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MotionError {
    #[error(transparent)]
    Spatial(#[from] SpatialError),

    #[error("entity {entity} is {distance:.2} units from the nearest path")]
    OffNetwork { entity: EntityId, distance: f64 },

    #[error("entity {0} has a non-finite position or speed")]
    NonFinite(EntityId),

    #[error("entity {0} is in lane mode but has no lane")]
    NotOnLane(EntityId),
}

pub type MotionResult<T> = Result<T, MotionError>;
