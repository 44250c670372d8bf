//! Centripetal Catmull-Rom spline through a list of 3D control points.
//!
//! The curve passes through every control point in order.  Knot spacing uses
//! the square root of chord length, which avoids cusps and self-intersection
//! on the tight corners a hand-drawn stroke produces.  The open ends are
//! extended by reflecting the neighbouring control point.

use nalgebra::{Point3, Vector3};

/// Chord-length exponent for centripetal parameterization.
const ALPHA: f32 = 0.5;

/// Knot intervals below this are treated as coincident points.
const MIN_KNOT: f32 = 1e-4;

/// Cubic `c0 + c1·t + c2·t² + c3·t³` per axis.
#[derive(Debug, Clone, Copy)]
struct CubicPoly {
    c0: Vector3<f32>,
    c1: Vector3<f32>,
    c2: Vector3<f32>,
    c3: Vector3<f32>,
}

impl CubicPoly {
    /// Hermite form from endpoints and tangents.
    fn hermite(x0: Vector3<f32>, x1: Vector3<f32>, t0: Vector3<f32>, t1: Vector3<f32>) -> Self {
        CubicPoly {
            c0: x0,
            c1: t0,
            c2: -3.0 * x0 + 3.0 * x1 - 2.0 * t0 - t1,
            c3: 2.0 * x0 - 2.0 * x1 + t0 + t1,
        }
    }

    /// Non-uniform Catmull-Rom segment between `x1` and `x2`.
    fn nonuniform(
        x0: Vector3<f32>,
        x1: Vector3<f32>,
        x2: Vector3<f32>,
        x3: Vector3<f32>,
        dt0: f32,
        dt1: f32,
        dt2: f32,
    ) -> Self {
        let t1 = (x1 - x0) / dt0 - (x2 - x0) / (dt0 + dt1) + (x2 - x1) / dt1;
        let t2 = (x2 - x1) / dt1 - (x3 - x1) / (dt1 + dt2) + (x3 - x2) / dt2;
        Self::hermite(x1, x2, t1 * dt1, t2 * dt1)
    }

    fn eval(&self, t: f32) -> Vector3<f32> {
        let t2 = t * t;
        self.c0 + self.c1 * t + self.c2 * t2 + self.c3 * (t2 * t)
    }
}

/// An open centripetal Catmull-Rom spline.
#[derive(Debug, Clone, PartialEq)]
pub struct CatmullRom {
    points: Vec<Point3<f32>>,
}

impl CatmullRom {
    /// Returns `None` for fewer than two control points.
    pub fn new(points: Vec<Point3<f32>>) -> Option<Self> {
        (points.len() >= 2).then_some(CatmullRom { points })
    }

    /// Position at parameter `t ∈ [0, 1]`; `t = k/(n−1)` lands exactly on
    /// control point `k`.
    pub fn point_at(&self, t: f32) -> Point3<f32> {
        let pts = &self.points;
        let n = pts.len();
        let p = (n - 1) as f32 * t.clamp(0.0, 1.0);
        let mut seg = p.floor() as usize;
        let mut weight = p - seg as f32;
        if seg >= n - 1 {
            seg = n - 2;
            weight = 1.0;
        }

        let p1 = pts[seg].coords;
        let p2 = pts[seg + 1].coords;
        let p0 = if seg > 0 { pts[seg - 1].coords } else { 2.0 * p1 - p2 };
        let p3 = if seg + 2 < n { pts[seg + 2].coords } else { 2.0 * p2 - p1 };

        let mut dt0 = (p1 - p0).norm_squared().powf(ALPHA * 0.5);
        let mut dt1 = (p2 - p1).norm_squared().powf(ALPHA * 0.5);
        let mut dt2 = (p3 - p2).norm_squared().powf(ALPHA * 0.5);

        if dt1 < MIN_KNOT { dt1 = 1.0; }
        if dt0 < MIN_KNOT { dt0 = dt1; }
        if dt2 < MIN_KNOT { dt2 = dt1; }

        Point3::from(CubicPoly::nonuniform(p0, p1, p2, p3, dt0, dt1, dt2).eval(weight))
    }

    /// Sample `divisions + 1` points evenly spaced by arc length, starting at
    /// the first control point and ending at the last.
    pub fn spaced_points(&self, divisions: usize) -> Vec<Point3<f32>> {
        let divisions = divisions.max(1);
        let lengths = self.arc_lengths(divisions * 8);
        (0..=divisions)
            .map(|i| {
                let u = i as f32 / divisions as f32;
                self.point_at(Self::u_to_t(&lengths, u))
            })
            .collect()
    }

    /// Cumulative chord lengths over `samples` uniform parameter steps.
    fn arc_lengths(&self, samples: usize) -> Vec<f32> {
        let mut lengths = Vec::with_capacity(samples + 1);
        lengths.push(0.0);
        let mut prev = self.point_at(0.0);
        let mut total = 0.0;
        for i in 1..=samples {
            let cur = self.point_at(i as f32 / samples as f32);
            total += (cur - prev).norm();
            lengths.push(total);
            prev = cur;
        }
        lengths
    }

    /// Map a normalized arc length `u` to curve parameter `t`.
    fn u_to_t(lengths: &[f32], u: f32) -> f32 {
        let samples = lengths.len() - 1;
        let total = lengths[samples];
        if total <= f32::EPSILON {
            return u;
        }
        let target = u * total;
        // First index whose length is >= target.
        let hi = lengths.partition_point(|&l| l < target).min(samples);
        if hi == 0 {
            return 0.0;
        }
        let lo = hi - 1;
        let span = lengths[hi] - lengths[lo];
        let frac = if span > 0.0 { (target - lengths[lo]) / span } else { 0.0 };
        (lo as f32 + frac) / samples as f32
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn controls() -> Vec<Point3<f32>> {
        vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 2.0, 0.0),
            Point3::new(3.0, 2.5, 0.5),
            Point3::new(4.0, 0.0, 0.2),
            Point3::new(6.0, -1.0, 0.0),
        ]
    }

    #[test]
    fn needs_two_points() {
        assert!(CatmullRom::new(vec![Point3::origin()]).is_none());
        assert!(CatmullRom::new(vec![Point3::origin(), Point3::new(1.0, 0.0, 0.0)]).is_some());
    }

    #[test]
    fn passes_through_control_points() {
        let pts = controls();
        let spline = CatmullRom::new(pts.clone()).unwrap();
        let n = pts.len();
        for (k, p) in pts.iter().enumerate() {
            let q = spline.point_at(k as f32 / (n - 1) as f32);
            assert_relative_eq!(q, *p, epsilon = 1e-4);
        }
    }

    #[test]
    fn two_points_is_a_straight_segment() {
        let a = Point3::new(0.0, 0.0, 0.0);
        let b = Point3::new(2.0, 0.0, 0.0);
        let spline = CatmullRom::new(vec![a, b]).unwrap();
        let mid = spline.point_at(0.5);
        assert_relative_eq!(mid, Point3::new(1.0, 0.0, 0.0), epsilon = 1e-5);
    }

    #[test]
    fn duplicate_points_stay_finite() {
        let p = Point3::new(1.0, 1.0, 1.0);
        let spline = CatmullRom::new(vec![p, p, Point3::new(2.0, 1.0, 1.0)]).unwrap();
        for i in 0..=10 {
            let q = spline.point_at(i as f32 / 10.0);
            assert!(q.coords.iter().all(|c| c.is_finite()));
        }
    }

    #[test]
    fn spaced_points_span_curve() {
        let pts = controls();
        let spline = CatmullRom::new(pts.clone()).unwrap();
        let samples = spline.spaced_points(20);
        assert_eq!(samples.len(), 21);
        assert_relative_eq!(samples[0], pts[0], epsilon = 1e-4);
        assert_relative_eq!(samples[20], pts[4], epsilon = 1e-4);
    }

    #[test]
    fn spaced_points_roughly_even() {
        let spline = CatmullRom::new(controls()).unwrap();
        let samples = spline.spaced_points(32);
        let gaps: Vec<f32> = samples.windows(2).map(|w| (w[1] - w[0]).norm()).collect();
        let mean = gaps.iter().sum::<f32>() / gaps.len() as f32;
        for g in gaps {
            assert!((g - mean).abs() < mean * 0.25, "gap {} vs mean {}", g, mean);
        }
    }
}
