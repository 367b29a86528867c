//! Planar facility coordinates and geometric helpers.
//!
//! Facility layouts are small (hundreds of distance units across), so plain
//! Euclidean `f64` geometry is used throughout.  Angles are radians; the
//! telemetry boundary converts to degrees.

use std::f64::consts::{PI, TAU};

/// A point in facility coordinates.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance.
    #[inline]
    pub fn distance(self, other: Point) -> f64 {
        self.distance_sq(other).sqrt()
    }

    /// Squared Euclidean distance; cheaper for comparisons.
    #[inline]
    pub fn distance_sq(self, other: Point) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        dx * dx + dy * dy
    }

    /// Linear interpolation: `t = 0` is `self`, `t = 1` is `other`.
    #[inline]
    pub fn lerp(self, other: Point, t: f64) -> Point {
        Point::new(
            self.x + (other.x - self.x) * t,
            self.y + (other.y - self.y) * t,
        )
    }

    /// Bearing from `self` to `other` in radians, `atan2` convention
    /// (0 = +x, counter-clockwise positive).
    #[inline]
    pub fn bearing_to(self, other: Point) -> f64 {
        (other.y - self.y).atan2(other.x - self.x)
    }

    /// `true` when both coordinates are finite.
    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    #[inline]
    pub fn as_array(self) -> [f64; 2] {
        [self.x, self.y]
    }
}

impl std::fmt::Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.2}, {:.2})", self.x, self.y)
    }
}

/// Result of projecting a point onto a segment.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Projection {
    /// Closest point on the segment.
    pub point: Point,
    /// Parametric position of `point` along the segment, in `[0, 1]`.
    pub t: f64,
    /// Distance from the query point to `point`.
    pub distance: f64,
}

/// Project `p` onto segment `a → b`, clamping the parameter to `[0, 1]`.
///
/// A zero-length segment projects everything onto `a` with `t = 0`.
pub fn project_onto_segment(p: Point, a: Point, b: Point) -> Projection {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len_sq = dx * dx + dy * dy;

    let t = if len_sq <= f64::EPSILON {
        0.0
    } else {
        (((p.x - a.x) * dx + (p.y - a.y) * dy) / len_sq).clamp(0.0, 1.0)
    };

    let point = a.lerp(b, t);
    Projection { point, t, distance: p.distance(point) }
}

// ── Angles ────────────────────────────────────────────────────────────────────

/// Wrap an angle into `(-π, π]`.
pub fn normalize_angle(a: f64) -> f64 {
    let mut r = a.rem_euclid(TAU);
    if r > PI {
        r -= TAU;
    }
    r
}

/// Interpolate from `from` toward `to` by fraction `t` along the shorter arc.
///
/// Handles the ±π wrap: rotating from 170° to -170° turns 20°, not 340°.
pub fn lerp_angle(from: f64, to: f64, t: f64) -> f64 {
    let delta = normalize_angle(to - from);
    normalize_angle(from + delta * t)
}

/// Radians → compass-free degrees in `[0, 360)`.
pub fn to_degrees_positive(rad: f64) -> f64 {
    let d = rad.to_degrees().rem_euclid(360.0);
    // rem_euclid can return exactly 360.0 for tiny negative inputs.
    if d >= 360.0 { 0.0 } else { d }
}
