//! Pipeline tunables.
//!
//! Every constant the pipeline uses lives here, grouped by stage.  All
//! structs deserialize with `#[serde(default)]`, so a config file only has to
//! name the values it overrides.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Upper bound on Chaikin passes.  Each pass doubles the point count.
pub const MAX_CHAIKIN_ITERATIONS: usize = 8;

// ════════════════════════════════════════════════════════════════════════════
// Stage parameters
// ════════════════════════════════════════════════════════════════════════════

/// Point stabilizer parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StabilizerConfig {
    /// EMA responsiveness α in `(0, 1]`.  High values favour latency over
    /// smoothness.  Default: 0.8
    pub smoothing_factor: f32,
}

impl Default for StabilizerConfig {
    fn default() -> Self {
        Self { smoothing_factor: 0.8 }
    }
}

/// Stroke recorder parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecorderConfig {
    /// Squared pixel distance a point must move from the last accepted point
    /// to be recorded.  Default: 4.0 (2 px)
    pub min_distance_sq: f32,
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self { min_distance_sq: 4.0 }
    }
}

/// Curve synthesizer parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurveConfig {
    /// Maximum number of points kept before smoothing.  Default: 30
    pub downsample_cap: usize,
    /// Chaikin corner-cutting passes, at most [`MAX_CHAIKIN_ITERATIONS`].
    /// Default: 3
    pub chaikin_iterations: usize,
}

impl Default for CurveConfig {
    fn default() -> Self {
        Self {
            downsample_cap:     30,
            chaikin_iterations: 3,
        }
    }
}

/// Mesh builder parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeshConfig {
    /// Tube radius in model units.
    pub tube_radius: f32,
    /// Segments around the tube circumference.
    pub radial_segments: usize,
    /// Rings along the tube per smoothed control point.
    pub tubular_per_point: usize,
    /// Upper bound on rings along the tube.
    pub max_tubular_segments: usize,
    /// Width of the model-space working volume the canvas maps onto.
    pub volume_width: f32,
    /// Height of the model-space working volume.
    pub volume_height: f32,
    /// Per-point phase step of the Z undulation (radians).
    pub wave_frequency: f32,
    /// Amplitude of the Z undulation.
    pub wave_amplitude: f32,
    /// Z offset between consecutive depth layers.
    pub depth_step: f32,
    /// Number of depth layers before stroke depth wraps back to the front.
    pub depth_layers: usize,
    /// Hues (degrees) assigned round-robin by stroke index.
    pub palette: Vec<f32>,
    /// HSV saturation applied to every palette hue.
    pub saturation: f32,
    /// HSV value applied to every palette hue.
    pub value: f32,
}

impl Default for MeshConfig {
    fn default() -> Self {
        Self {
            tube_radius:          0.06,
            radial_segments:      8,
            tubular_per_point:    3,
            max_tubular_segments: 64,
            volume_width:         8.0,
            volume_height:        6.0,
            wave_frequency:       0.3,
            wave_amplitude:       0.15,
            depth_step:           0.05,
            depth_layers:         24,
            palette:              vec![0.0, 30.0, 55.0, 120.0, 180.0, 210.0, 270.0, 310.0],
            saturation:           0.75,
            value:                0.95,
        }
    }
}

impl MeshConfig {
    /// Set the tube radius.
    #[must_use]
    pub fn with_radius(mut self, radius: f32) -> Self {
        self.tube_radius = radius;
        self
    }

    /// Set the number of segments around the circumference.
    #[must_use]
    pub fn with_radial_segments(mut self, segments: usize) -> Self {
        self.radial_segments = segments;
        self
    }

    /// Replace the hue palette.
    #[must_use]
    pub fn with_palette(mut self, hues: Vec<f32>) -> Self {
        self.palette = hues;
        self
    }

    /// Rings for a centerline with `point_count` control points:
    /// `min(tubular_per_point · point_count, max_tubular_segments)`.
    pub fn tubular_segments(&self, point_count: usize) -> usize {
        (self.tubular_per_point * point_count).min(self.max_tubular_segments)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// PipelineConfig
// ════════════════════════════════════════════════════════════════════════════

/// All tunables for one drawing session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub stabilizer: StabilizerConfig,
    pub recorder:   RecorderConfig,
    pub curve:      CurveConfig,
    pub mesh:       MeshConfig,
}

impl PipelineConfig {
    /// Check every field against its documented range.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let alpha = self.stabilizer.smoothing_factor;
        if !(alpha > 0.0 && alpha <= 1.0) {
            return Err(ConfigError::SmoothingFactor(alpha));
        }

        let min_d = self.recorder.min_distance_sq;
        if !min_d.is_finite() || min_d < 0.0 {
            return Err(ConfigError::MinDistance(min_d));
        }

        at_least("curve.downsample_cap", self.curve.downsample_cap, 2)?;
        at_most("curve.chaikin_iterations", self.curve.chaikin_iterations, MAX_CHAIKIN_ITERATIONS)?;

        let m = &self.mesh;
        positive("mesh.tube_radius",   m.tube_radius)?;
        positive("mesh.volume_width",  m.volume_width)?;
        positive("mesh.volume_height", m.volume_height)?;
        at_least("mesh.radial_segments",      m.radial_segments, 3)?;
        at_least("mesh.tubular_per_point",    m.tubular_per_point, 1)?;
        at_least("mesh.max_tubular_segments", m.max_tubular_segments, 1)?;
        at_least("mesh.depth_layers",         m.depth_layers, 1)?;
        if m.palette.is_empty() {
            return Err(ConfigError::EmptyPalette);
        }
        Ok(())
    }
}

fn positive(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { name, value })
    }
}

fn at_least(name: &'static str, actual: usize, min: usize) -> Result<(), ConfigError> {
    if actual >= min {
        Ok(())
    } else {
        Err(ConfigError::TooSmall { name, min, actual })
    }
}

fn at_most(name: &'static str, actual: usize, max: usize) -> Result<(), ConfigError> {
    if actual <= max {
        Ok(())
    } else {
        Err(ConfigError::TooLarge { name, max, actual })
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(PipelineConfig::default().validate(), Ok(()));
    }

    #[test]
    fn rejects_zero_alpha() {
        let mut cfg = PipelineConfig::default();
        cfg.stabilizer.smoothing_factor = 0.0;
        assert_eq!(cfg.validate(), Err(ConfigError::SmoothingFactor(0.0)));
    }

    #[test]
    fn rejects_nan_alpha() {
        let mut cfg = PipelineConfig::default();
        cfg.stabilizer.smoothing_factor = f32::NAN;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn rejects_two_radial_segments() {
        let mut cfg = PipelineConfig::default();
        cfg.mesh.radial_segments = 2;
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::TooSmall { name: "mesh.radial_segments", min: 3, actual: 2 })
        ));
    }

    #[test]
    fn rejects_runaway_chaikin_iterations() {
        let mut cfg = PipelineConfig::default();
        cfg.curve.chaikin_iterations = 40;
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::TooLarge { name: "curve.chaikin_iterations", max: 8, actual: 40 })
        );

        cfg.curve.chaikin_iterations = MAX_CHAIKIN_ITERATIONS;
        assert_eq!(cfg.validate(), Ok(()));
    }

    #[test]
    fn runaway_chaikin_rejected_from_toml() {
        let cfg: PipelineConfig = toml::from_str("[curve]\nchaikin_iterations = 40\n").unwrap();
        assert!(matches!(cfg.validate(), Err(ConfigError::TooLarge { .. })));
    }

    #[test]
    fn rejects_empty_palette() {
        let mut cfg = PipelineConfig::default();
        cfg.mesh = cfg.mesh.with_palette(vec![]);
        assert_eq!(cfg.validate(), Err(ConfigError::EmptyPalette));
    }

    #[test]
    fn tubular_segments_capped() {
        let m = MeshConfig::default();
        assert_eq!(m.tubular_segments(4), 12);
        assert_eq!(m.tubular_segments(21), 63);
        assert_eq!(m.tubular_segments(22), 64);
        assert_eq!(m.tubular_segments(240), 64);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let cfg: PipelineConfig = toml::from_str("[curve]\nchaikin_iterations = 5\n").unwrap();
        assert_eq!(cfg.curve.chaikin_iterations, 5);
        assert_eq!(cfg.curve.downsample_cap, 30);
        assert_eq!(cfg.stabilizer, StabilizerConfig::default());
    }

    #[test]
    fn toml_round_trip() {
        let cfg = PipelineConfig::default();
        let text = toml::to_string_pretty(&cfg).unwrap();
        let back: PipelineConfig = toml::from_str(&text).unwrap();
        assert_eq!(back, cfg);
    }
}
