use dt_core::DtError;
use dt_spatial::SpatialError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Core(#[from] DtError),

    #[error(transparent)]
    Spatial(#[from] SpatialError),

    #[error("scheduler thread: {0}")]
    SchedulerThread(String),
}

pub type SimResult<T> = Result<T, SimError>;
