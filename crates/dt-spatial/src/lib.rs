//! `dt-spatial`: lane network, path geometry, and zone classification.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                    |
//! |-------------|-------------------------------------------------------------|
//! | [`lane`]    | `Lane` polyline with progress ↔ position helpers           |
//! | [`graph`]   | `LaneGraph` (connectivity + R-tree endpoint index), builder |
//! | [`paths`]   | `PathGeometry` straight-segment service for grid motion     |
//! | [`zone`]    | `ZoneClassifier` axis-aligned zone bands                    |
//! | [`loader`]  | CSV lane loading                                            |
//! | [`error`]   | `SpatialError`, `SpatialResult<T>`                          |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on `dt-core` types.        |

pub mod error;
pub mod graph;
pub mod lane;
pub mod loader;
pub mod paths;
pub mod zone;


pub use error::{SpatialError, SpatialResult};
pub use graph::{CONNECTION_RADIUS, LaneGraph, LaneGraphBuilder, NetworkPoint};
pub use lane::{Lane, MIN_LANE_LENGTH};
pub use loader::{load_lane_graph_csv, load_lanes_reader};
pub use paths::{CoordinateFrame, NearestPath, Orientation, PathGeometry, PathSegment, SegmentKind};
pub use zone::{Axis, DEFAULT_ZONE, ZoneBand, ZoneClassifier, warehouse_bands};
