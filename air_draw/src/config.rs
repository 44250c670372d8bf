//! Application configuration: window geometry, frame rate and the pipeline
//! tunables, loaded from TOML.
//!
//! ```toml
//! width  = 1280
//! height = 720
//!
//! [pipeline.stabilizer]
//! smoothing_factor = 0.6
//! ```

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use stroke_pipeline::{PipelineConfig, Viewport};

pub const DEFAULT_WIDTH:  usize = 1024;
pub const DEFAULT_HEIGHT: usize = 640;

/// Configuration for the full application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Window (and canvas) width in pixels.
    pub width:    usize,
    pub height:   usize,
    /// Render loop cap.
    pub target_fps: u32,
    /// Poll rate of the landmark source in Hz.
    pub source_hz: u32,
    pub pipeline: PipelineConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            width:      DEFAULT_WIDTH,
            height:     DEFAULT_HEIGHT,
            target_fps: 60,
            source_hz:  60,
            pipeline:   PipelineConfig::default(),
        }
    }
}

impl AppConfig {
    /// Read and validate a config file.  Missing keys take their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_toml(&content)
            .with_context(|| format!("Invalid config file: {}", path.display()))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).context("Failed to parse configuration")?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize configuration")
    }

    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(self.width >= 64 && self.height >= 64, "window must be at least 64×64, got {}×{}", self.width, self.height);
        anyhow::ensure!(self.target_fps > 0, "target_fps must be positive");
        anyhow::ensure!(self.source_hz > 0, "source_hz must be positive");
        self.pipeline.validate().context("Invalid pipeline settings")?;
        Ok(())
    }

    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.width as f32, self.height as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_round_trips_through_toml() {
        let cfg = AppConfig::default();
        let text = cfg.to_toml().unwrap();
        assert_eq!(AppConfig::from_toml(&text).unwrap(), cfg);
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let cfg = AppConfig::from_toml(
            "width = 800\n[pipeline.recorder]\nmin_distance_sq = 9.0\n",
        )
        .unwrap();
        assert_eq!(cfg.width, 800);
        assert_eq!(cfg.height, DEFAULT_HEIGHT);
        assert_eq!(cfg.pipeline.recorder.min_distance_sq, 9.0);
        assert_eq!(cfg.pipeline.stabilizer, PipelineConfig::default().stabilizer);
    }

    #[test]
    fn invalid_pipeline_is_rejected() {
        let err = AppConfig::from_toml("[pipeline.stabilizer]\nsmoothing_factor = 0.0\n").unwrap_err();
        assert!(format!("{err:#}").contains("smoothing factor"));
    }

    #[test]
    fn tiny_window_is_rejected() {
        assert!(AppConfig::from_toml("width = 10").is_err());
    }

    #[test]
    fn missing_file_mentions_path() {
        let err = AppConfig::load(Path::new("/nonexistent/air_draw.toml")).unwrap_err();
        assert!(format!("{err}").contains("/nonexistent/air_draw.toml"));
    }

    #[test]
    fn viewport_matches_window() {
        let cfg = AppConfig { width: 320, height: 200, ..AppConfig::default() };
        assert_eq!(cfg.viewport(), Viewport::new(320.0, 200.0));
    }
}
