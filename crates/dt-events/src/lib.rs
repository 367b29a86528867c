//! `dt-events`: discrete events derived from entity state each tick.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                   |
//! |--------------|------------------------------------------------------------|
//! | [`event`]    | `Event` envelope, `EventKind`, `Severity`, `EventLocation` |
//! | [`catalog`]  | Random-event kinds and their reason phrase pools            |
//! | [`detector`] | `EventDetector`, `DetectorConfig`                           |
//!
//! # Detectors
//!
//! Three detectors run once per tick over the whole population, in order:
//!
//! 1. **Random operational events**: blockage / dwell exceeded / zone
//!    breach, per entity with a small probability, throttled by a cooldown.
//! 2. **Proximity**: every close pair with at least one moving entity.  This
//!    is the only detector with a side effect: both entities slow down.
//! 3. **Congestion**: lanes whose occupancy meets the threshold.
//!
//! # Feature flags
//!
//! | Flag      | Effect                                                  |
//! |-----------|---------------------------------------------------------|
//! | `fx-hash` | `FxHashMap` for lane occupancy grouping.                |
//! | `serde`   | Derives `Serialize`/`Deserialize` on `Event` and kin.   |

pub mod catalog;
pub mod detector;
pub mod event;


pub use detector::{DetectorConfig, EventDetector};
pub use event::{Event, EventKind, EventLocation, Severity};
