//! `dt-core`: foundational types for the facility movement twin.
//!
//! This crate is a dependency of every other `dt-*` crate.  It intentionally
//! has no `dt-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `EntityId`, `LaneId`, `ZoneId`, `EventId`             |
//! | [`geo`]         | `Point`, segment projection, angle helpers            |
//! | [`time`]        | `Tick`, `SimClock`                                    |
//! | [`rng`]         | `EntityRng` (per-entity), `SimRng` (global)           |
//! | [`kind`]        | `EntityKind`, `MotionMode`                            |
//! | [`config`]      | `SimConfig`, `SpeedRange`, `Population`               |
//! | [`error`]       | `DtError`, `DtResult`                                 |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod config;
pub mod error;
pub mod geo;
pub mod ids;
pub mod kind;
pub mod rng;
pub mod time;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{Population, SimConfig, SpeedRange};
pub use error::{DtError, DtResult};
pub use geo::Point;
pub use ids::{EntityId, EventId, LaneId, ZoneId};
pub use kind::{EntityKind, MotionMode};
pub use rng::{EntityRng, SimRng};
pub use time::{SimClock, Tick};
