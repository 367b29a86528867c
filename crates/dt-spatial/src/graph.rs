//! Lane connectivity graph and builder.
//!
//! # Connectivity
//!
//! Two lanes are connected when an endpoint of one lies within
//! [`CONNECTION_RADIUS`] (inclusive) of an endpoint of the other.  Inferred
//! connections are symmetric.  The builder also accepts explicit one-way
//! connections for layouts whose connectivity is authored by hand; those are
//! the only asymmetric edges and make "dead end that another lane still feeds"
//! expressible.
//!
//! # Spatial index
//!
//! Lane endpoints are bulk-loaded into an R-tree (via `rstar`) at build time.
//! Each endpoint then queries its neighbours within the radius, which gives
//! the same edge set as the all-pairs endpoint check without the O(L²) scan.
//!
//! The graph is immutable once built and shared between simulations by `Arc`.

use std::collections::HashMap;

use rstar::{AABB, PointDistance, RTree, RTreeObject};

use dt_core::{EntityRng, LaneId, Point};

use crate::{Lane, SpatialError, SpatialResult};

/// Endpoint proximity (distance units) that makes two lanes connected.
pub const CONNECTION_RADIUS: f64 = 3.0;

// ── R-tree endpoint entry ─────────────────────────────────────────────────────

/// Entry stored in the endpoint index: a 2-D point and the lane it ends.
#[derive(Clone)]
struct EndpointEntry {
    point: [f64; 2],
    lane:  LaneId,
}

impl RTreeObject for EndpointEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for EndpointEntry {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}

// ── NetworkPoint ──────────────────────────────────────────────────────────────

/// The closest location on the lane network to some query point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NetworkPoint {
    pub lane:     LaneId,
    pub point:    Point,
    /// Progress along `lane` in `[0, 1]` (segment parameterization).
    pub progress: f64,
    /// Distance from the query point to `point`.
    pub distance: f64,
}

// ── LaneGraph ─────────────────────────────────────────────────────────────────

/// Immutable lane network with precomputed connectivity.
///
/// Do not construct directly; use [`LaneGraphBuilder`].
pub struct LaneGraph {
    lanes:       Vec<Lane>,
    by_name:     HashMap<String, LaneId>,
    /// Outgoing connections per lane, sorted ascending, no duplicates.
    connections: Vec<Vec<LaneId>>,
}

impl LaneGraph {
    // ── Dimensions and lookup ─────────────────────────────────────────────

    pub fn lane_count(&self) -> usize {
        self.lanes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lanes.is_empty()
    }

    /// Iterator over every `LaneId` in ascending order.
    pub fn lane_ids(&self) -> impl Iterator<Item = LaneId> + '_ {
        (0..self.lanes.len() as u32).map(LaneId)
    }

    pub fn lanes(&self) -> &[Lane] {
        &self.lanes
    }

    /// Resolve a lane name.
    pub fn lane_id(&self, name: &str) -> SpatialResult<LaneId> {
        self.by_name
            .get(name)
            .copied()
            .ok_or_else(|| SpatialError::UnknownLane(name.to_owned()))
    }

    pub fn lane(&self, id: LaneId) -> SpatialResult<&Lane> {
        self.lanes.get(id.index()).ok_or(SpatialError::LaneNotFound(id))
    }

    /// Lane name for display, `"?"` for an unknown id.
    pub fn lane_name(&self, id: LaneId) -> &str {
        self.lanes.get(id.index()).map_or("?", Lane::name)
    }

    pub fn lane_length(&self, id: LaneId) -> SpatialResult<f64> {
        self.lane(id).map(Lane::length)
    }

    // ── Connectivity ──────────────────────────────────────────────────────

    /// Lanes reachable directly from `id`.
    pub fn connections(&self, id: LaneId) -> SpatialResult<&[LaneId]> {
        self.connections
            .get(id.index())
            .map(Vec::as_slice)
            .ok_or(SpatialError::LaneNotFound(id))
    }

    /// `true` if `to` is a connection of `from`.
    pub fn is_connected(&self, from: LaneId, to: LaneId) -> SpatialResult<bool> {
        Ok(self.connections(from)?.binary_search(&to).is_ok())
    }

    /// Lanes that list `id` as one of their connections.
    pub fn incoming(&self, id: LaneId) -> SpatialResult<Vec<LaneId>> {
        self.lane(id)?;
        Ok(self
            .lane_ids()
            .filter(|&other| self.connections[other.index()].binary_search(&id).is_ok())
            .collect())
    }

    // ── Geometry ──────────────────────────────────────────────────────────

    /// Project `p` onto every segment of every lane and return the closest
    /// hit.  Returns `None` only for an empty graph.
    pub fn nearest_point_on_network(&self, p: Point) -> Option<NetworkPoint> {
        let mut best: Option<NetworkPoint> = None;
        for (i, lane) in self.lanes.iter().enumerate() {
            let (point, progress, distance) = lane.project(p);
            if best.is_none_or(|b| distance < b.distance) {
                best = Some(NetworkPoint { lane: LaneId(i as u32), point, progress, distance });
            }
        }
        best
    }

    pub fn position_at_progress(&self, id: LaneId, progress: f64) -> SpatialResult<Point> {
        Ok(self.lane(id)?.position_at(progress))
    }

    /// Heading in radians at `progress` along `id`.
    pub fn heading_at_progress(&self, id: LaneId, progress: f64) -> SpatialResult<f64> {
        Ok(self.lane(id)?.heading_at(progress))
    }

    // ── Route choice ──────────────────────────────────────────────────────

    /// Pick the lane to enter after finishing `current`.
    ///
    /// 1. `planned`, if it is a connection of `current`.
    /// 2. Otherwise a uniformly random connection.
    /// 3. At a dead end, the first lane that lists `current` as a connection
    ///    (the entity turns around onto the lane that fed it).
    ///
    /// `Ok(None)` means nothing connects to `current` in either direction.
    pub fn choose_next_lane(
        &self,
        current: LaneId,
        planned: Option<LaneId>,
        rng:     &mut EntityRng,
    ) -> SpatialResult<Option<LaneId>> {
        let conns = self.connections(current)?;

        if let Some(next) = planned {
            if conns.binary_search(&next).is_ok() {
                return Ok(Some(next));
            }
        }

        if let Some(&next) = rng.choose(conns) {
            return Ok(Some(next));
        }

        Ok(self.incoming(current)?.first().copied())
    }

    /// Uniformly random lane.
    pub fn random_lane(&self, rng: &mut EntityRng) -> SpatialResult<LaneId> {
        if self.lanes.is_empty() {
            return Err(SpatialError::EmptyGraph);
        }
        Ok(LaneId(rng.gen_range(0..self.lanes.len() as u32)))
    }

    /// Random walk of up to `length` lanes starting at (and including) `start`.
    ///
    /// Each hop avoids the lane just left unless it is the only connection.
    /// The walk stops early at a lane with no connections.
    pub fn random_route(
        &self,
        start:  LaneId,
        length: usize,
        rng:    &mut EntityRng,
    ) -> SpatialResult<Vec<LaneId>> {
        self.lane(start)?;
        let mut route = Vec::with_capacity(length);
        if length == 0 {
            return Ok(route);
        }
        route.push(start);

        while route.len() < length {
            let current = route[route.len() - 1];
            let conns = &self.connections[current.index()];
            let previous = route.len().checked_sub(2).map(|i| route[i]);

            let forward: Vec<LaneId> = conns
                .iter()
                .copied()
                .filter(|&l| Some(l) != previous)
                .collect();
            let pool = if forward.is_empty() { conns.as_slice() } else { forward.as_slice() };

            match rng.choose(pool) {
                Some(&next) => route.push(next),
                None => break,
            }
        }
        Ok(route)
    }
}

// ── LaneGraphBuilder ──────────────────────────────────────────────────────────

/// Construct a [`LaneGraph`] incrementally, then call [`build`](Self::build).
///
/// # Example
///
/// ```
/// use dt_core::Point;
/// use dt_spatial::LaneGraphBuilder;
///
/// let mut b = LaneGraphBuilder::new();
/// let a = b.add_lane("A", vec![Point::new(0.0, 0.0), Point::new(10.0, 0.0)], None).unwrap();
/// let c = b.add_lane("B", vec![Point::new(11.0, 0.0), Point::new(20.0, 0.0)], None).unwrap();
/// let graph = b.build();
/// assert_eq!(graph.connections(a).unwrap(), &[c]);
/// assert_eq!(graph.connections(c).unwrap(), &[a]);
/// ```
#[derive(Debug)]
pub struct LaneGraphBuilder {
    lanes:    Vec<Lane>,
    by_name:  HashMap<String, LaneId>,
    explicit: Vec<(LaneId, LaneId)>,
    radius:   Option<f64>,
}

impl LaneGraphBuilder {
    pub fn new() -> Self {
        Self {
            lanes:    Vec::new(),
            by_name:  HashMap::new(),
            explicit: Vec::new(),
            radius:   Some(CONNECTION_RADIUS),
        }
    }

    /// Override the endpoint connection radius.
    pub fn connection_radius(mut self, radius: f64) -> Self {
        self.radius = Some(radius);
        self
    }

    /// Disable endpoint inference; only explicit connections will exist.
    pub fn explicit_connections_only(mut self) -> Self {
        self.radius = None;
        self
    }

    /// Add a lane and return its `LaneId` (sequential from 0).
    pub fn add_lane(
        &mut self,
        name:   impl Into<String>,
        points: Vec<Point>,
        width:  Option<f64>,
    ) -> SpatialResult<LaneId> {
        let lane = Lane::new(name, points, width)?;
        if self.by_name.contains_key(lane.name()) {
            return Err(SpatialError::DuplicateLane(lane.name().to_owned()));
        }
        let id = LaneId(self.lanes.len() as u32);
        self.by_name.insert(lane.name().to_owned(), id);
        self.lanes.push(lane);
        Ok(id)
    }

    /// Add a **one-way** connection `from → to`.
    pub fn connect(&mut self, from: LaneId, to: LaneId) -> SpatialResult<()> {
        for id in [from, to] {
            if id.index() >= self.lanes.len() {
                return Err(SpatialError::LaneNotFound(id));
            }
        }
        self.explicit.push((from, to));
        Ok(())
    }

    /// [`connect`](Self::connect) by lane name.
    pub fn connect_names(&mut self, from: &str, to: &str) -> SpatialResult<()> {
        let lookup = |n: &str| {
            self.by_name
                .get(n)
                .copied()
                .ok_or_else(|| SpatialError::UnknownLane(n.to_owned()))
        };
        let (f, t) = (lookup(from)?, lookup(to)?);
        self.connect(f, t)
    }

    pub fn lane_count(&self) -> usize {
        self.lanes.len()
    }

    /// Consume the builder and produce a [`LaneGraph`].
    pub fn build(self) -> LaneGraph {
        let mut connections: Vec<Vec<LaneId>> = vec![Vec::new(); self.lanes.len()];

        if let Some(radius) = self.radius {
            let entries: Vec<EndpointEntry> = self
                .lanes
                .iter()
                .enumerate()
                .flat_map(|(i, lane)| {
                    let id = LaneId(i as u32);
                    [lane.start(), lane.end()]
                        .map(|p| EndpointEntry { point: p.as_array(), lane: id })
                })
                .collect();
            let index = RTree::bulk_load(entries);
            let radius_sq = radius * radius;

            for entry in index.iter() {
                for near in index.locate_within_distance(entry.point, radius_sq) {
                    if near.lane != entry.lane {
                        connections[entry.lane.index()].push(near.lane);
                    }
                }
            }
        }

        for (from, to) in self.explicit {
            if from != to {
                connections[from.index()].push(to);
            }
        }

        for conns in &mut connections {
            conns.sort_unstable();
            conns.dedup();
        }

        log::debug!(
            "lane graph built: {} lanes, {} directed connections",
            self.lanes.len(),
            connections.iter().map(Vec::len).sum::<usize>()
        );

        LaneGraph { lanes: self.lanes, by_name: self.by_name, connections }
    }
}

impl Default for LaneGraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}
