//! `dt-entity`: per-entity state for the facility movement twin.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                 |
//! |-------------|----------------------------------------------------------|
//! | [`state`]   | `EntityState`, the mutable record for one entity         |
//! | [`store`]   | `EntityStore` (records), `EntityRngs` (per-entity RNG)   |
//! | [`builder`] | `EntityStoreBuilder` (population spawning from config)   |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                 |
//! |---------|--------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on `EntityState`.    |

pub mod builder;
pub mod state;
pub mod store;


pub use builder::EntityStoreBuilder;
pub use state::EntityState;
pub use store::{EntityRngs, EntityStore};
