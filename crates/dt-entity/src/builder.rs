//! Population spawning: `SimConfig` + lane network → `EntityStore` + `EntityRngs`.
//!
//! # Placement
//!
//! | Kind      | Mode | Initial placement                                    |
//! |-----------|------|------------------------------------------------------|
//! | `Vehicle` | grid | random point on the path geometry (safe point if none) |
//! | `Load`    | lane | start of a random lane                               |
//! | `Person`  | lane | random progress along a random lane                  |
//!
//! Ids are assigned in kind order (all vehicles, then loads, then persons).
//! Each entity draws its placement and speed from its own `EntityRng`, so the
//! outcome for one entity does not depend on the population of another kind.
//!
//! # Usage
//!
//! ```rust
//! use dt_core::{Point, SimConfig};
//! use dt_entity::EntityStoreBuilder;
//! use dt_spatial::LaneGraphBuilder;
//!
//! let mut b = LaneGraphBuilder::new();
//! b.add_lane("L1", vec![Point::new(0.0, 0.0), Point::new(30.0, 0.0)], None).unwrap();
//! let graph = b.build();
//!
//! let config = SimConfig::default();
//! let (store, rngs) = EntityStoreBuilder::new(&config, &graph).build().unwrap();
//! assert_eq!(store.len(), config.population.total());
//! assert_eq!(rngs.len(), store.len());
//! ```

use dt_core::{EntityId, EntityKind, EntityRng, MotionMode, Point, SimConfig};
use dt_spatial::{LaneGraph, PathGeometry, SpatialResult, ZoneClassifier};

use crate::{EntityRngs, EntityState, EntityStore};

/// Fluent builder for [`EntityStore`] + [`EntityRngs`].
pub struct EntityStoreBuilder<'a> {
    config:     &'a SimConfig,
    graph:      &'a LaneGraph,
    paths:      Option<&'a PathGeometry>,
    zones:      Option<&'a ZoneClassifier>,
    safe_point: Point,
}

impl<'a> EntityStoreBuilder<'a> {
    pub fn new(config: &'a SimConfig, graph: &'a LaneGraph) -> Self {
        Self { config, graph, paths: None, zones: None, safe_point: Point::ORIGIN }
    }

    /// Geometry grid-mode entities are placed on.
    pub fn paths(mut self, paths: &'a PathGeometry) -> Self {
        self.paths = Some(paths);
        self
    }

    /// Classifier used to set each entity's initial zone.
    pub fn zones(mut self, zones: &'a ZoneClassifier) -> Self {
        self.zones = Some(zones);
        self
    }

    /// Fallback position for grid-mode entities when no geometry is given.
    pub fn safe_point(mut self, p: Point) -> Self {
        self.safe_point = p;
        self
    }

    /// Spawn the configured population.
    ///
    /// Fails with [`dt_spatial::SpatialError::EmptyGraph`] when lane-mode entities are
    /// requested on a graph without lanes.
    pub fn build(self) -> SpatialResult<(EntityStore, EntityRngs)> {
        let total = self.config.population.total();
        let mut rngs = EntityRngs::new(total, self.config.seed);
        let mut entities = Vec::with_capacity(total);

        for kind in EntityKind::ALL {
            for _ in 0..self.config.population.count(kind) {
                let id = EntityId(entities.len() as u32);
                let rng = &mut rngs.inner[id.index()];
                entities.push(self.spawn(id, kind, rng)?);
            }
        }

        log::debug!(
            "spawned {} entities ({} vehicles, {} loads, {} persons)",
            entities.len(),
            self.config.population.vehicles,
            self.config.population.loads,
            self.config.population.persons,
        );
        Ok((EntityStore::from_entities(entities), rngs))
    }

    fn spawn(&self, id: EntityId, kind: EntityKind, rng: &mut EntityRng) -> SpatialResult<EntityState> {
        let range = self.config.speed_range(kind);
        let speed = rng.gen_range(range.min..=range.max);

        let mut entity = match kind.motion_mode() {
            MotionMode::Grid => {
                let position = self
                    .paths
                    .and_then(|p| p.random_point(rng))
                    .unwrap_or(self.safe_point);
                EntityState::new(id, kind, position, speed)
            }
            MotionMode::Lane => {
                let lane = self.graph.random_lane(rng)?;
                let progress = match kind {
                    EntityKind::Person => rng.gen_range(0.0..1.0),
                    _ => 0.0,
                };
                let mut e = EntityState::new(id, kind, self.graph.position_at_progress(lane, progress)?, speed);
                e.lane = lane;
                e.progress = progress;
                e.heading = self.graph.heading_at_progress(lane, progress)?;
                e.set_route(self.graph.random_route(lane, self.config.route_length, rng)?);
                e
            }
        };

        if let Some(zones) = self.zones {
            entity.zone = zones.classify(entity.position);
        }
        Ok(entity)
    }
}
