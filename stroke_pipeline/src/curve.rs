//! Curve synthesis: downsample a finished stroke, then round its corners.
//!
//! Both stages are pure.  Chaikin corner cutting keeps the first and last
//! point fixed on every pass, so the smoothed curve always ends exactly where
//! the (downsampled) stroke does.

use crate::config::CurveConfig;
use crate::landmark::Point;
use crate::recorder::Stroke;

/// Smoothed, resampled point list derived from one stroke.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SmoothedCurve {
    pub points: Vec<Point>,
}

impl SmoothedCurve {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Pick `cap` evenly spaced points when there are more than `cap`.
///
/// Index `i` maps to `round(i · (n−1)/(cap−1))`, clamped to the last point,
/// so both endpoints survive.  `cap < 2` is treated as 2.
pub fn downsample(points: &[Point], cap: usize) -> Vec<Point> {
    let n = points.len();
    let cap = cap.max(2);
    if n <= cap {
        return points.to_vec();
    }
    let step = (n - 1) as f32 / (cap - 1) as f32;
    (0..cap)
        .map(|i| {
            let idx = ((i as f32 * step).round() as usize).min(n - 1);
            points[idx]
        })
        .collect()
}

/// One Chaikin pass: keep the endpoints, replace each segment with its
/// quarter and three-quarter points.
fn chaikin_pass(points: &[Point]) -> Vec<Point> {
    let (Some(&first), Some(&last)) = (points.first(), points.last()) else {
        return Vec::new();
    };
    let mut out = Vec::with_capacity(points.len() * 2);
    out.push(first);
    for pair in points.windows(2) {
        let (p0, p1) = (pair[0], pair[1]);
        out.push(p0.lerp(p1, 0.25));
        out.push(p0.lerp(p1, 0.75));
    }
    out.push(last);
    out
}

/// Run `iterations` Chaikin passes.  Fewer than 3 points are returned as is.
pub fn chaikin(points: &[Point], iterations: usize) -> Vec<Point> {
    if points.len() < 3 {
        return points.to_vec();
    }
    let mut current = points.to_vec();
    for _ in 0..iterations {
        current = chaikin_pass(&current);
    }
    current
}

/// Downsample, then smooth.
pub fn synthesize_points(points: &[Point], config: &CurveConfig) -> SmoothedCurve {
    let sampled = downsample(points, config.downsample_cap);
    SmoothedCurve { points: chaikin(&sampled, config.chaikin_iterations) }
}

/// [`synthesize_points`] over a completed stroke.
pub fn synthesize(stroke: &Stroke, config: &CurveConfig) -> SmoothedCurve {
    synthesize_points(stroke.points(), config)
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
