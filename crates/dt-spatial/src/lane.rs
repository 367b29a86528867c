//! A single lane: a named, immutable polyline.
//!
//! # Progress parameterization
//!
//! Progress runs from `0.0` at the first point to `1.0` at the last and is
//! distributed evenly across *segments*, not across length:
//!
//! ```text
//! progress = (segment_index + t) / segment_count
//! ```
//!
//! where `t ∈ [0, 1]` is the parametric position inside the segment.  The
//! nearest-point query and `position_at` use the same mapping, so projecting a
//! point and reading it back lands on the same place.

use dt_core::geo::project_onto_segment;
use dt_core::Point;

use crate::{SpatialError, SpatialResult};

/// Lengths below this are treated as this value when dividing, so a
/// zero-length lane can never produce a division by zero.
pub const MIN_LANE_LENGTH: f64 = 1e-3;

/// Segments shorter than this have no usable direction.
const DEGENERATE_SEGMENT: f64 = 1e-9;

/// An immutable lane polyline.
#[derive(Debug, Clone)]
pub struct Lane {
    name:   String,
    points: Vec<Point>,
    width:  Option<f64>,
    length: f64,
}

impl Lane {
    /// Validate and construct a lane.  Requires at least two finite points.
    pub fn new(name: impl Into<String>, points: Vec<Point>, width: Option<f64>) -> SpatialResult<Self> {
        let name = name.into();
        if points.len() < 2 {
            return Err(SpatialError::DegenerateLane { name, reason: "fewer than 2 points" });
        }
        if points.iter().any(|p| !p.is_finite()) {
            return Err(SpatialError::DegenerateLane { name, reason: "non-finite coordinate" });
        }
        let length = points.windows(2).map(|w| w[0].distance(w[1])).sum();
        Ok(Self { name, points, width, length })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn width(&self) -> Option<f64> {
        self.width
    }

    /// Total polyline length.  Zero-length segments contribute nothing.
    pub fn length(&self) -> f64 {
        self.length
    }

    /// Length with the [`MIN_LANE_LENGTH`] floor applied; safe as a divisor.
    pub fn length_floored(&self) -> f64 {
        self.length.max(MIN_LANE_LENGTH)
    }

    pub fn segment_count(&self) -> usize {
        self.points.len() - 1
    }

    /// Iterator over `(start, end)` pairs.
    pub fn segments(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        self.points.windows(2).map(|w| (w[0], w[1]))
    }

    pub fn start(&self) -> Point {
        self.points[0]
    }

    pub fn end(&self) -> Point {
        self.points[self.points.len() - 1]
    }

    /// Split a progress value into `(segment_index, t)`.
    fn locate(&self, progress: f64) -> (usize, f64) {
        let n = self.segment_count();
        let scaled = progress.clamp(0.0, 1.0) * n as f64;
        let idx = (scaled.floor() as usize).min(n - 1);
        (idx, scaled - idx as f64)
    }

    /// Position at `progress` (clamped to `[0, 1]`).
    pub fn position_at(&self, progress: f64) -> Point {
        let (idx, t) = self.locate(progress);
        self.points[idx].lerp(self.points[idx + 1], t)
    }

    /// Heading in radians of the segment containing `progress`.
    ///
    /// Zero-length segments borrow the direction of the nearest usable
    /// segment (forward first, then backward); a lane with no usable segment
    /// reports `0.0`.
    pub fn heading_at(&self, progress: f64) -> f64 {
        let (idx, _) = self.locate(progress);
        let usable = |i: usize| {
            let (a, b) = (self.points[i], self.points[i + 1]);
            (a.distance_sq(b) > DEGENERATE_SEGMENT).then(|| a.bearing_to(b))
        };
        (idx..self.segment_count())
            .find_map(usable)
            .or_else(|| (0..idx).rev().find_map(usable))
            .unwrap_or(0.0)
    }

    /// Closest point on this lane to `p`: `(point, progress, distance)`.
    pub fn project(&self, p: Point) -> (Point, f64, f64) {
        let n = self.segment_count() as f64;
        let mut best = (self.points[0], 0.0, f64::INFINITY);
        for (i, (a, b)) in self.segments().enumerate() {
            let proj = project_onto_segment(p, a, b);
            if proj.distance < best.2 {
                best = (proj.point, (i as f64 + proj.t) / n, proj.distance);
            }
        }
        best
    }
}
