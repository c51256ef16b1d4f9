//! Cubic Bezier segments and the Catmull-Rom conversion used for cell
//! boundary curves.

use glam::DVec2;

/// A cubic Bezier segment with endpoints `p0`, `p3` and inner control
/// points `p1`, `p2`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicBezier {
    pub p0: DVec2,
    pub p1: DVec2,
    pub p2: DVec2,
    pub p3: DVec2,
}

impl CubicBezier {
    /// Evaluates the curve at `t ∈ [0, 1]` with the cubic Bernstein blend.
    pub fn eval(&self, t: f64) -> DVec2 {
        let it = 1.0 - t;
        let b0 = it * it * it;
        let b1 = 3.0 * it * it * t;
        let b2 = 3.0 * it * t * t;
        let b3 = t * t * t;
        self.p0 * b0 + self.p1 * b1 + self.p2 * b2 + self.p3 * b3
    }
}

/// Converts the Catmull-Rom segment through `b → c` (with neighbors `a`, `d`)
/// into the equivalent cubic Bezier.
///
/// Two cells sharing an edge reference the same four source points, so both
/// derive the identical curve, which is what keeps the warp seamless.
pub fn catmull_rom_to_bezier(a: DVec2, b: DVec2, c: DVec2, d: DVec2) -> CubicBezier {
    CubicBezier {
        p0: b,
        p1: b + (c - a) / 6.0,
        p2: c - (d - b) / 6.0,
        p3: c,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn eval_endpoints_are_exact() {
        let bz = CubicBezier {
            p0: DVec2::new(0.0, 0.0),
            p1: DVec2::new(1.0, 2.0),
            p2: DVec2::new(3.0, 2.0),
            p3: DVec2::new(4.0, 0.0),
        };
        assert_eq!(bz.eval(0.0), bz.p0);
        assert_eq!(bz.eval(1.0), bz.p3);
    }

    #[test]
    fn eval_midpoint_of_symmetric_curve() {
        let bz = CubicBezier {
            p0: DVec2::new(0.0, 0.0),
            p1: DVec2::new(1.0, 1.0),
            p2: DVec2::new(3.0, 1.0),
            p3: DVec2::new(4.0, 0.0),
        };
        let mid = bz.eval(0.5);
        assert_relative_eq!(mid.x, 2.0, epsilon = 1e-12);
        assert_relative_eq!(mid.y, 0.75, epsilon = 1e-12);
    }

    #[test]
    fn catmull_rom_tangents_use_one_sixth_rule() {
        let a = DVec2::new(0.0, 0.0);
        let b = DVec2::new(10.0, 0.0);
        let c = DVec2::new(20.0, 0.0);
        let d = DVec2::new(30.0, 0.0);
        let bz = catmull_rom_to_bezier(a, b, c, d);
        assert_eq!(bz.p0, b);
        assert_eq!(bz.p3, c);
        assert_eq!(bz.p1, DVec2::new(10.0 + 20.0 / 6.0, 0.0));
        assert_eq!(bz.p2, DVec2::new(20.0 - 20.0 / 6.0, 0.0));
    }

    #[test]
    fn collinear_points_yield_straight_segment() {
        // Evenly spaced collinear inputs must stay on the line.
        let bz = catmull_rom_to_bezier(
            DVec2::new(0.0, 0.0),
            DVec2::new(1.0, 1.0),
            DVec2::new(2.0, 2.0),
            DVec2::new(3.0, 3.0),
        );
        for i in 0..=10 {
            let p = bz.eval(i as f64 / 10.0);
            assert_relative_eq!(p.x, p.y, epsilon = 1e-12);
        }
    }

    #[test]
    fn shared_edge_builds_identical_curve() {
        // The same four points always produce the same curve, bit for bit.
        let pts = [
            DVec2::new(3.0, 7.0),
            DVec2::new(11.0, 5.0),
            DVec2::new(19.0, 9.0),
            DVec2::new(27.0, 6.0),
        ];
        let first = catmull_rom_to_bezier(pts[0], pts[1], pts[2], pts[3]);
        let second = catmull_rom_to_bezier(pts[0], pts[1], pts[2], pts[3]);
        assert_eq!(first, second);
    }
}
