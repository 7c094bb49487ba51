//! Plane geometry used to keep wire curves looking consistent.
//!
//! None of this affects voltage propagation. A wire stores three points
//! (start, mid, end) and the renderer draws a spline through them; when an
//! end moves the midpoint is nudged toward the new true midpoint, but by a
//! reduced amount so that long wires keep more of their curve.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Distance above which a wire keeps the most curvature.
pub const LONG_WIRE_DISTANCE: f64 = 300.0;

/// Distance above which a wire keeps moderate curvature.
pub const MEDIUM_WIRE_DISTANCE: f64 = 100.0;

/// A point (or vector) on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Create a new point.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Vector that moves `original` onto `new`.
pub fn translation_vector(original: Point, new: Point) -> Point {
    Point::new(new.x - original.x, new.y - original.y)
}

/// Apply `vector` to `point`, dividing the movement by `adjustment_factor`.
pub fn apply_translation_vector(vector: Point, point: Point, adjustment_factor: f64) -> Point {
    let (dx, dy) = if adjustment_factor == 1.0 {
        (vector.x, vector.y)
    } else {
        (vector.x / adjustment_factor, vector.y / adjustment_factor)
    };
    Point::new(point.x + dx, point.y + dy)
}

/// Midpoint of the segment between two points.
pub fn mid_point(start: Point, end: Point) -> Point {
    Point::new((start.x + end.x) / 2.0, (start.y + end.y) / 2.0)
}

/// Euclidean distance.
pub fn distance(start: Point, end: Point) -> f64 {
    (end.x - start.x).hypot(end.y - start.y)
}

/// How much to shrink the midpoint movement for a wire of the given span.
///
/// Longer wires get more reduction (keep more curve); short wires get
/// less and straighten out.
pub fn midpoint_reduction(start: Point, end: Point) -> f64 {
    let span = distance(start, end);
    if span > LONG_WIRE_DISTANCE {
        2.0
    } else if span > MEDIUM_WIRE_DISTANCE {
        1.5
    } else {
        1.25
    }
}

/// New curve-control midpoint after one of the wire's ends moved.
pub fn recompute_mid_point(start: Point, mid: Point, end: Point) -> Point {
    let true_mid = mid_point(start, end);
    let vector = translation_vector(mid, true_mid);
    apply_translation_vector(vector, mid, midpoint_reduction(start, end))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_translation_and_apply() {
        let v = translation_vector(Point::new(1.0, 2.0), Point::new(4.0, 6.0));
        assert_eq!(v, Point::new(3.0, 4.0));

        let p = apply_translation_vector(v, Point::new(0.0, 0.0), 1.0);
        assert_eq!(p, Point::new(3.0, 4.0));

        let halved = apply_translation_vector(v, Point::new(0.0, 0.0), 2.0);
        assert_relative_eq!(halved.x, 1.5);
        assert_relative_eq!(halved.y, 2.0);
    }

    #[test]
    fn test_distance_and_mid_point() {
        assert_relative_eq!(distance(Point::new(0.0, 0.0), Point::new(3.0, 4.0)), 5.0);
        assert_eq!(
            mid_point(Point::new(0.0, 0.0), Point::new(10.0, -4.0)),
            Point::new(5.0, -2.0)
        );
    }

    #[test]
    fn test_midpoint_reduction_thresholds() {
        let origin = Point::new(0.0, 0.0);
        assert_relative_eq!(midpoint_reduction(origin, Point::new(50.0, 0.0)), 1.25);
        assert_relative_eq!(midpoint_reduction(origin, Point::new(100.0, 0.0)), 1.25);
        assert_relative_eq!(midpoint_reduction(origin, Point::new(200.0, 0.0)), 1.5);
        assert_relative_eq!(midpoint_reduction(origin, Point::new(301.0, 0.0)), 2.0);
    }

    #[test]
    fn test_recompute_mid_point_moves_partway() {
        // span 400 -> reduction 2.0; true mid (200, 0), old mid (0, 100)
        let mid = recompute_mid_point(
            Point::new(0.0, 0.0),
            Point::new(0.0, 100.0),
            Point::new(400.0, 0.0),
        );
        assert_relative_eq!(mid.x, 100.0);
        assert_relative_eq!(mid.y, 50.0);
    }
}
