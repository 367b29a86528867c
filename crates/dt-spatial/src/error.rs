//! Spatial-subsystem error type.

use thiserror::Error;

use dt_core::LaneId;

/// Errors produced by `dt-spatial`.
///
/// Lane lookups never fall back to a substitute lane: an unknown id is always
/// reported to the caller.
#[derive(Debug, Error)]
pub enum SpatialError {
    #[error("lane {0} not found in graph")]
    LaneNotFound(LaneId),

    #[error("no lane named {0:?}")]
    UnknownLane(String),

    #[error("lane {0:?} defined twice")]
    DuplicateLane(String),

    #[error("lane {name:?} is degenerate: {reason}")]
    DegenerateLane { name: String, reason: &'static str },

    #[error("lane graph has no lanes")]
    EmptyGraph,

    #[error("zone bands {a:?} and {b:?} overlap on the same axis")]
    OverlappingZones { a: String, b: String },

    #[error("lane layout parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type SpatialResult<T> = Result<T, SpatialError>;
