//! The mutable per-entity record.

use dt_core::{EntityId, EntityKind, LaneId, MotionMode, Point, ZoneId};

/// Everything the engine knows about one entity.
///
/// Lane-mode entities keep `lane` valid and `progress` in `[0, 1]`.  Grid-mode
/// entities hold `LaneId::INVALID` and steer by `target` instead.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntityState {
    pub id:   EntityId,
    pub kind: EntityKind,

    // ── Kinematics ────────────────────────────────────────────────────────
    pub position:     Point,
    /// Radians, counter-clockwise from +x.
    pub heading:      f64,
    pub speed:        f64,
    pub target_speed: f64,
    /// Speed sampled at creation; `target_speed` relaxes back to it.
    pub cruise_speed: f64,

    // ── Lane navigation ───────────────────────────────────────────────────
    pub lane:         LaneId,
    pub progress:     f64,
    /// Planned lanes; `route[route_cursor]` is the lane being driven.
    pub route:        Vec<LaneId>,
    pub route_cursor: usize,

    // ── Grid navigation ───────────────────────────────────────────────────
    pub target: Option<Point>,

    // ── Bookkeeping ───────────────────────────────────────────────────────
    /// Sim timestamp of the last random event this entity raised.
    pub last_event_ms: Option<i64>,
    pub zone:          ZoneId,
}

impl EntityState {
    /// A stationary entity at `position` with no lane, route, or target.
    pub fn new(id: EntityId, kind: EntityKind, position: Point, speed: f64) -> Self {
        Self {
            id,
            kind,
            position,
            heading:       0.0,
            speed,
            target_speed:  speed,
            cruise_speed:  speed,
            lane:          LaneId::INVALID,
            progress:      0.0,
            route:         Vec::new(),
            route_cursor:  0,
            target:        None,
            last_event_ms: None,
            zone:          ZoneId(0),
        }
    }

    #[inline]
    pub fn motion_mode(&self) -> MotionMode {
        self.kind.motion_mode()
    }

    /// `true` if the entity is currently assigned to a lane.
    #[inline]
    pub fn on_lane(&self) -> bool {
        self.lane.is_valid()
    }

    /// The lane the route plans after the current one.
    pub fn planned_next(&self) -> Option<LaneId> {
        self.route.get(self.route_cursor + 1).copied()
    }

    /// Replace the route and point the cursor at its first lane.
    pub fn set_route(&mut self, route: Vec<LaneId>) {
        self.route = route;
        self.route_cursor = 0;
    }

    /// Move the cursor onto `next`.  Returns `false` when `next` is not the
    /// planned lane; the caller then regenerates the route.
    pub fn advance_route(&mut self, next: LaneId) -> bool {
        if self.planned_next() == Some(next) {
            self.route_cursor += 1;
            true
        } else {
            false
        }
    }

    /// Put the entity at the start of `lane`.
    pub fn enter_lane(&mut self, lane: LaneId) {
        self.lane = lane;
        self.progress = 0.0;
    }
}
