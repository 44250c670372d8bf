//! Stroke colors: stroke index → RGB.
//!
//! Colors come from a fixed hue palette indexed by `stroke_index mod len`, so
//! a stroke keeps its color for the whole session no matter when or in what
//! order meshes are rendered.

use crate::config::MeshConfig;

/// Linear RGB in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Rgb { r, g, b }
    }

    /// Multiply every channel by `k` (clamped to `[0, 1]`).
    pub fn scale(self, k: f32) -> Rgb {
        let k = k.max(0.0);
        Rgb::new((self.r * k).min(1.0), (self.g * k).min(1.0), (self.b * k).min(1.0))
    }

    /// Pack as `0xAARRGGBB` with opaque alpha.
    pub fn to_argb(self) -> u32 {
        let ch = |c: f32| (c.clamp(0.0, 1.0) * 255.0) as u32;
        0xFF00_0000 | (ch(self.r) << 16) | (ch(self.g) << 8) | ch(self.b)
    }
}

/// HSV → RGB.  `h` in degrees (any range), `s`, `v` in `[0, 1]`.
pub fn hsv_to_rgb(h: f32, s: f32, v: f32) -> Rgb {
    let h  = h.rem_euclid(360.0);
    let hi = (h / 60.0) as u32;
    let f  = h / 60.0 - hi as f32;
    let p  = v * (1.0 - s);
    let q  = v * (1.0 - s * f);
    let t  = v * (1.0 - s * (1.0 - f));
    let (r, g, b) = match hi {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    };
    Rgb::new(r, g, b)
}

/// Hue (degrees) assigned to `stroke_index`.
pub fn stroke_hue(stroke_index: usize, config: &MeshConfig) -> f32 {
    if config.palette.is_empty() {
        return 0.0;
    }
    config.palette[stroke_index % config.palette.len()]
}

/// Color assigned to `stroke_index`.
pub fn stroke_color(stroke_index: usize, config: &MeshConfig) -> Rgb {
    hsv_to_rgb(stroke_hue(stroke_index, config), config.saturation, config.value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primary_hues() {
        assert_eq!(hsv_to_rgb(0.0, 1.0, 1.0), Rgb::new(1.0, 0.0, 0.0));
        assert_eq!(hsv_to_rgb(120.0, 1.0, 1.0), Rgb::new(0.0, 1.0, 0.0));
        assert_eq!(hsv_to_rgb(240.0, 1.0, 1.0), Rgb::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn argb_opaque() {
        let c = hsv_to_rgb(200.0, 0.5, 0.5).to_argb();
        assert_eq!(c >> 24, 0xFF);
        assert_eq!(Rgb::new(1.0, 0.0, 0.0).to_argb(), 0xFFFF0000);
    }

    #[test]
    fn colors_wrap_by_palette_length() {
        let cfg = MeshConfig::default();
        let n = cfg.palette.len();
        assert_eq!(stroke_color(3, &cfg), stroke_color(3 + n, &cfg));
        assert_eq!(stroke_color(0, &cfg), stroke_color(5 * n, &cfg));
        assert_ne!(stroke_color(0, &cfg), stroke_color(1, &cfg));
    }
}
