//! Shared geometry calculations for annotations
//!
//! Pure math used by the renderer. Degenerate (zero-length) input is
//! accepted and produces degenerate output.

use std::f32::consts::{FRAC_PI_2, FRAC_PI_6};

use crate::domain::{Point, Segment};

/// Arrow geometry
pub mod arrow {
    use super::*;

    /// Default arrowhead length in surface pixels
    pub const HEAD_LENGTH: f32 = 20.0;
    /// Arrowhead angle from the reversed shaft (30 degrees)
    pub const HEAD_ANGLE: f32 = FRAC_PI_6;

    /// The two head segments of an arrow pointing from `from` to `to`.
    /// Both start at the tip and are offset by +-30 degrees from the
    /// reverse direction.
    pub fn head_segments(from: Point, to: Point, head_length: f32) -> [Segment; 2] {
        let angle = from.angle_to(to);
        let barb = |offset: f32| {
            Point::new(
                to.x - head_length * (angle + offset).cos(),
                to.y - head_length * (angle + offset).sin(),
            )
        };
        [
            Segment::new(to, barb(-HEAD_ANGLE)),
            Segment::new(to, barb(HEAD_ANGLE)),
        ]
    }
}

/// Measurement line geometry
pub mod measure {
    use super::*;

    /// Default half-length of the perpendicular end caps
    pub const CAP_HALF_LENGTH: f32 = 15.0;

    /// Perpendicular caps at the start and end of a measurement line
    pub fn cap_segments(start: Point, end: Point, half_length: f32) -> [Segment; 2] {
        let perp = start.angle_to(end) + FRAC_PI_2;
        let (dx, dy) = (half_length * perp.cos(), half_length * perp.sin());
        let cap = |p: Point| Segment::new(p.translate(dx, dy), p.translate(-dx, -dy));
        [cap(start), cap(end)]
    }
}

/// Circle defined by a center and a point on its edge
#[inline]
pub fn circle_radius(center: Point, edge: Point) -> f32 {
    center.distance_to(edge)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: Point, b: Point) {
        assert!(
            (a.x - b.x).abs() < 1e-3 && (a.y - b.y).abs() < 1e-3,
            "{a:?} != {b:?}"
        );
    }

    #[test]
    fn test_arrow_head_points_backwards() {
        let [h1, h2] = arrow::head_segments(Point::new(0.0, 0.0), Point::new(100.0, 0.0), 20.0);
        let cos30 = 20.0 * FRAC_PI_6.cos();
        let sin30 = 20.0 * FRAC_PI_6.sin();
        assert_eq!(h1.start, Point::new(100.0, 0.0));
        assert_eq!(h2.start, Point::new(100.0, 0.0));
        assert_close(h1.end, Point::new(100.0 - cos30, sin30));
        assert_close(h2.end, Point::new(100.0 - cos30, -sin30));
        assert!((h1.length() - 20.0).abs() < 1e-3);
    }

    #[test]
    fn test_arrow_head_zero_length_is_finite() {
        let p = Point::new(5.0, 5.0);
        for seg in arrow::head_segments(p, p, 20.0) {
            assert!(seg.end.x.is_finite() && seg.end.y.is_finite());
        }
    }

    #[test]
    fn test_measure_caps_are_perpendicular() {
        let [a, b] = measure::cap_segments(Point::new(100.0, 100.0), Point::new(300.0, 100.0), 15.0);
        assert_close(a.start, Point::new(100.0, 115.0));
        assert_close(a.end, Point::new(100.0, 85.0));
        assert_close(b.start, Point::new(300.0, 115.0));
        assert_close(b.end, Point::new(300.0, 85.0));
    }

    #[test]
    fn test_circle_radius() {
        assert_eq!(circle_radius(Point::new(0.0, 0.0), Point::new(3.0, 4.0)), 5.0);
    }
}
