//! `dt-motion`: per-entity motion models and the recovering dispatch engine.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                      |
//! |-------------|---------------------------------------------------------------|
//! | [`model`]   | `MotionModel` trait, `StepContext` (read-only tick inputs)     |
//! | [`grid`]    | `GridMotion`: target seeking along straight path segments     |
//! | [`lane`]    | `LaneMotion`: progress along lane polylines with transitions  |
//! | [`engine`]  | `MotionEngine`, `UpdateOutcome`: dispatch by kind + recovery  |
//! | [`error`]   | `MotionError`, `MotionResult<T>`                               |
//!
//! # Tick contract
//!
//! [`MotionEngine::update`] is called once per entity per tick.  The matching
//! model advances the entity, then the zone is reclassified.  A model error
//! never escapes: the entity is reset to a known-valid place and the error is
//! returned inside [`UpdateOutcome::Recovered`] for the caller to log.

pub mod engine;
pub mod error;
pub mod grid;
pub mod lane;
pub mod model;

#[cfg(test)]
mod tests;

pub use engine::{MotionEngine, UpdateOutcome};
pub use error::{MotionError, MotionResult};
pub use grid::GridMotion;
pub use lane::LaneMotion;
pub use model::{MotionModel, StepContext};
