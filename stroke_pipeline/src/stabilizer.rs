//! Point stabilizer: exponential moving average over the fingertip.
//!
//! Tuned for latency: with the default α = 0.8 the output covers 80 % of the
//! remaining gap every frame.  The two axes are filtered independently.

use crate::config::StabilizerConfig;
use crate::landmark::Point;

/// Single-axis EMA accumulator.
#[derive(Debug, Clone, Copy, Default)]
struct Ema {
    value:       f32,
    initialized: bool,
}

impl Ema {
    fn filter(&mut self, x: f32, alpha: f32) -> f32 {
        if !self.initialized {
            self.value = x;
            self.initialized = true;
            return x;
        }
        self.value += alpha * (x - self.value);
        self.value
    }
}

/// Fingertip smoother.  The first sample after construction or
/// [`reset`](Self::reset) passes through unchanged.
#[derive(Debug, Clone)]
pub struct PointStabilizer {
    alpha: f32,
    x:     Ema,
    y:     Ema,
}

impl PointStabilizer {
    pub fn new(config: &StabilizerConfig) -> Self {
        PointStabilizer {
            alpha: config.smoothing_factor,
            x:     Ema::default(),
            y:     Ema::default(),
        }
    }

    pub fn smooth(&mut self, raw: Point) -> Point {
        Point::new(self.x.filter(raw.x, self.alpha), self.y.filter(raw.y, self.alpha))
    }

    /// Forget accumulated state so the next stroke starts fresh.
    pub fn reset(&mut self) {
        self.x = Ema::default();
        self.y = Ema::default();
    }

    /// True once a sample has seeded the accumulators.
    pub fn is_primed(&self) -> bool {
        self.x.initialized
    }
}

impl Default for PointStabilizer {
    fn default() -> Self {
        Self::new(&StabilizerConfig::default())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn first_call_passes_through() {
        let mut s = PointStabilizer::default();
        assert!(!s.is_primed());
        assert_eq!(s.smooth(Point::new(12.5, -3.0)), Point::new(12.5, -3.0));
        assert!(s.is_primed());
    }

    #[test]
    fn second_call_moves_alpha_of_gap() {
        let mut s = PointStabilizer::default();
        s.smooth(Point::new(0.0, 0.0));
        let p = s.smooth(Point::new(10.0, 20.0));
        assert_abs_diff_eq!(p.x, 8.0, epsilon = 1e-5);
        assert_abs_diff_eq!(p.y, 16.0, epsilon = 1e-5);
    }

    #[test]
    fn converges_to_constant_input() {
        let mut s = PointStabilizer::default();
        s.smooth(Point::new(0.0, 0.0));
        let target = Point::new(300.0, 150.0);
        let mut p = Point::default();
        for _ in 0..50 { p = s.smooth(target); }
        assert_abs_diff_eq!(p.x, target.x, epsilon = 1e-3);
        assert_abs_diff_eq!(p.y, target.y, epsilon = 1e-3);
    }

    #[test]
    fn reset_reseeds() {
        let mut s = PointStabilizer::default();
        s.smooth(Point::new(0.0, 0.0));
        s.smooth(Point::new(50.0, 50.0));
        s.reset();
        assert_eq!(s.smooth(Point::new(7.0, 9.0)), Point::new(7.0, 9.0));
    }

    #[test]
    fn axes_independent() {
        let mut s = PointStabilizer::default();
        s.smooth(Point::new(0.0, 5.0));
        let p = s.smooth(Point::new(10.0, 5.0));
        assert_eq!(p.y, 5.0);
    }

    #[test]
    fn alpha_one_tracks_exactly() {
        let mut s = PointStabilizer::new(&StabilizerConfig { smoothing_factor: 1.0 });
        s.smooth(Point::new(0.0, 0.0));
        assert_eq!(s.smooth(Point::new(4.0, 2.0)), Point::new(4.0, 2.0));
    }
}
