//! Live 2D preview of the stroke being drawn.
//!
//! The preview is an ARGB overlay the size of the canvas.  Every accepted
//! point is joined to its predecessor with a thick line; when the gesture
//! ends the overlay is wiped, since the finished stroke's tube takes over.
//! A pixel value of `0` means transparent.

use tracing::debug;

use stroke_pipeline::{DrawingEvents, DrawingPoint, Point, Stroke};

pub const PREVIEW_COLOR: u32 = 0xFF00E5FF;
pub const PREVIEW_RADIUS: f32 = 3.0;

/// Counters shown in the status line.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PreviewStats {
    pub points:    usize,
    pub ends:      usize,
    pub committed: usize,
}

pub struct PreviewCanvas {
    width:   usize,
    height:  usize,
    overlay: Vec<u32>,
    color:   u32,
    radius:  f32,
    dirty:   bool,
    pub stats: PreviewStats,
}

impl PreviewCanvas {
    pub fn new(width: usize, height: usize) -> Self {
        PreviewCanvas {
            width,
            height,
            overlay: vec![0; width * height],
            color:   PREVIEW_COLOR,
            radius:  PREVIEW_RADIUS,
            dirty:   false,
            stats:   PreviewStats::default(),
        }
    }

    /// Overlay pixels, row-major.  `0` is transparent.
    pub fn pixels(&self) -> &[u32] {
        &self.overlay
    }

    /// True while the overlay holds any ink.
    pub fn has_ink(&self) -> bool {
        self.dirty
    }

    pub fn clear(&mut self) {
        if self.dirty {
            self.overlay.fill(0);
            self.dirty = false;
        }
    }

    /// Copy opaque overlay pixels onto `target` (same dimensions).
    pub fn composite_onto(&self, target: &mut [u32]) {
        if !self.dirty {
            return;
        }
        for (dst, &src) in target.iter_mut().zip(&self.overlay) {
            if src != 0 {
                *dst = src;
            }
        }
    }

    fn stamp(&mut self, c: Point) {
        let r = self.radius;
        let r2 = r * r;
        let x0 = (c.x - r).floor().max(0.0) as usize;
        let y0 = (c.y - r).floor().max(0.0) as usize;
        let x1 = ((c.x + r).ceil().max(0.0) as usize).min(self.width);
        let y1 = ((c.y + r).ceil().max(0.0) as usize).min(self.height);
        for y in y0..y1 {
            for x in x0..x1 {
                let dx = x as f32 + 0.5 - c.x;
                let dy = y as f32 + 0.5 - c.y;
                if dx * dx + dy * dy <= r2 {
                    self.overlay[y * self.width + x] = self.color;
                    self.dirty = true;
                }
            }
        }
    }

    /// Thick line from `a` to `b`, stamped at sub-radius spacing.
    pub fn draw_segment(&mut self, a: Point, b: Point) {
        let len = a.distance_sq(b).sqrt();
        let steps = (len / (self.radius * 0.5).max(0.5)).ceil().max(1.0) as usize;
        for i in 0..=steps {
            self.stamp(a.lerp(b, i as f32 / steps as f32));
        }
    }
}

impl DrawingEvents for PreviewCanvas {
    fn on_drawing_point(&mut self, event: DrawingPoint) {
        self.stats.points += 1;
        match event.previous {
            Some(prev) => self.draw_segment(prev, event.point),
            None       => self.stamp(event.point),
        }
    }

    fn on_drawing_end(&mut self) {
        self.stats.ends += 1;
        self.clear();
    }

    fn on_stroke_committed(&mut self, index: usize, stroke: &Stroke) {
        self.stats.committed += 1;
        debug!(index, points = stroke.len(), "preview handed stroke to mesh");
    }
}
