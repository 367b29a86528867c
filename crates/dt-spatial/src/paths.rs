//! Path Geometry Service: a table of straight segments used by grid motion.
//!
//! # Coordinate contract
//!
//! Segments are stored in the caller's **world** units.  A layout authored in
//! its own units is placed into the world with a [`CoordinateFrame`]:
//!
//! ```text
//! world = origin + layout * scale
//! ```
//!
//! Target-acquisition step sizes are defined in layout units and multiplied by
//! the same `scale`, so a layout behaves identically whatever frame it is
//! placed in.  Tolerances passed to the query methods are always world units.
//!
//! [`PathGeometry::from_lane_graph`] derives a layout directly from lane
//! polylines, which lets grid-mode and lane-mode entities share one geometry.

use std::ops::RangeInclusive;

use dt_core::geo::{Projection, project_onto_segment};
use dt_core::{EntityRng, Point};

use crate::LaneGraph;

/// Step along a horizontal segment when picking a new target (layout units).
pub const HORIZONTAL_TARGET_STEP: RangeInclusive<f64> = 5.0..=15.0;

/// Step along a vertical segment when picking a new target (layout units).
pub const VERTICAL_TARGET_STEP: RangeInclusive<f64> = 3.0..=9.0;

// ── Segments ──────────────────────────────────────────────────────────────────

/// What a path segment represents in the facility drawing.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SegmentKind {
    /// Outer travel loop along the facility boundary.
    Boundary,
    /// Aisle or cross-connector between boundary runs.
    Connector,
    /// Painted line separating zones; drivable.
    ZoneLine,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

/// A straight drivable segment.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PathSegment {
    pub kind:  SegmentKind,
    pub start: Point,
    pub end:   Point,
}

impl PathSegment {
    pub const fn new(kind: SegmentKind, start: Point, end: Point) -> Self {
        Self { kind, start, end }
    }

    pub fn length(&self) -> f64 {
        self.start.distance(self.end)
    }

    /// Dominant axis; diagonal segments count as horizontal when `|dx| >= |dy|`.
    pub fn orientation(&self) -> Orientation {
        let dx = (self.end.x - self.start.x).abs();
        let dy = (self.end.y - self.start.y).abs();
        if dx >= dy { Orientation::Horizontal } else { Orientation::Vertical }
    }

    #[inline]
    pub fn project(&self, p: Point) -> Projection {
        project_onto_segment(p, self.start, self.end)
    }
}

// ── CoordinateFrame ───────────────────────────────────────────────────────────

/// Affine placement of a layout into world coordinates (uniform scale).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CoordinateFrame {
    pub scale:  f64,
    pub origin: Point,
}

impl CoordinateFrame {
    pub const IDENTITY: CoordinateFrame = CoordinateFrame { scale: 1.0, origin: Point::ORIGIN };

    pub fn to_world(&self, p: Point) -> Point {
        Point::new(self.origin.x + p.x * self.scale, self.origin.y + p.y * self.scale)
    }
}

impl Default for CoordinateFrame {
    fn default() -> Self {
        Self::IDENTITY
    }
}

// ── PathGeometry ──────────────────────────────────────────────────────────────

/// Closest segment hit for a query point.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct NearestPath {
    /// Index into [`PathGeometry::segments`].
    pub index:    usize,
    pub point:    Point,
    pub distance: f64,
}

/// Immutable table of path segments plus projection and snapping queries.
#[derive(Clone, Debug)]
pub struct PathGeometry {
    segments: Vec<PathSegment>,
    scale:    f64,
}

impl PathGeometry {
    /// Segments already in world units.
    pub fn new(segments: Vec<PathSegment>) -> Self {
        Self { segments, scale: 1.0 }
    }

    /// Place layout-unit `segments` into the world through `frame`.
    pub fn in_frame(segments: &[PathSegment], frame: CoordinateFrame) -> Self {
        let segments = segments
            .iter()
            .map(|s| PathSegment::new(s.kind, frame.to_world(s.start), frame.to_world(s.end)))
            .collect();
        Self { segments, scale: frame.scale }
    }

    /// One connector segment per non-degenerate lane polyline segment.
    pub fn from_lane_graph(graph: &LaneGraph) -> Self {
        let segments = graph
            .lanes()
            .iter()
            .flat_map(|lane| lane.segments())
            .filter(|(a, b)| a.distance_sq(*b) > f64::EPSILON)
            .map(|(a, b)| PathSegment::new(SegmentKind::Connector, a, b))
            .collect();
        Self::new(segments)
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Layout → world scale factor applied to target steps.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    // ── Queries ───────────────────────────────────────────────────────────

    /// Closest segment to `p` regardless of kind.  `None` if there are no
    /// segments.
    pub fn nearest(&self, p: Point) -> Option<NearestPath> {
        let mut best: Option<NearestPath> = None;
        for (index, seg) in self.segments.iter().enumerate() {
            let proj = seg.project(p);
            if best.is_none_or(|b| proj.distance < b.distance) {
                best = Some(NearestPath { index, point: proj.point, distance: proj.distance });
            }
        }
        best
    }

    /// `true` if some segment lies within `tolerance` of `p`.
    pub fn is_on_path(&self, p: Point, tolerance: f64) -> bool {
        self.nearest(p).is_some_and(|n| n.distance <= tolerance)
    }

    /// Closest on-path point to `p`, or `p` unchanged when nothing lies within
    /// `max_distance`.
    pub fn snap_to_nearest_path(&self, p: Point, max_distance: f64) -> Point {
        match self.nearest(p) {
            Some(n) if n.distance <= max_distance => n.point,
            _ => p,
        }
    }

    /// The segment governing movement at `p`, if one lies within `tolerance`.
    pub fn path_at(&self, p: Point, tolerance: f64) -> Option<&PathSegment> {
        self.nearest(p)
            .filter(|n| n.distance <= tolerance)
            .map(|n| &self.segments[n.index])
    }

    /// Every segment within `tolerance` of `p`.  At a junction this is all
    /// segments meeting there.
    pub fn paths_near(&self, p: Point, tolerance: f64) -> Vec<&PathSegment> {
        self.segments
            .iter()
            .filter(|s| s.project(p).distance <= tolerance)
            .collect()
    }

    // ── Sampling ──────────────────────────────────────────────────────────

    /// Pick the next grid-motion target on `segment` starting from `from`.
    ///
    /// Moves 5–15 layout units along a horizontal segment or 3–9 along a
    /// vertical one, in a random direction, clamped to the segment extent.
    /// If the chosen direction is blocked by the segment end the opposite
    /// direction is used instead.
    pub fn pick_target(&self, segment: &PathSegment, from: Point, rng: &mut EntityRng) -> Point {
        let len = segment.length();
        if len <= f64::EPSILON {
            return segment.start;
        }

        let range = match segment.orientation() {
            Orientation::Horizontal => HORIZONTAL_TARGET_STEP,
            Orientation::Vertical   => VERTICAL_TARGET_STEP,
        };
        let step = rng.gen_range(range) * self.scale / len;
        let t0 = segment.project(from).t;
        let sign = if rng.gen_bool(0.5) { 1.0 } else { -1.0 };

        let mut t = (t0 + sign * step).clamp(0.0, 1.0);
        if (t - t0).abs() * len < f64::EPSILON.sqrt() {
            t = (t0 - sign * step).clamp(0.0, 1.0);
        }
        segment.start.lerp(segment.end, t)
    }

    /// Uniformly random point on a uniformly random segment.
    pub fn random_point(&self, rng: &mut EntityRng) -> Option<Point> {
        let seg = rng.choose(&self.segments)?;
        let t = rng.gen_range(0.0..=1.0);
        Some(seg.start.lerp(seg.end, t))
    }
}
