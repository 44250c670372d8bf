//! Error types for the pipeline.
//!
//! Nothing on the per-frame path returns these: degenerate strokes resolve to
//! "no mesh" rather than an error.  They surface only when validating
//! tunables and inside the tube sweep, where the mesh builder maps them to
//! `None`.

use thiserror::Error;

/// Result type for tube sweeping.
pub type MeshResult<T> = Result<T, MeshError>;

/// Errors raised by [`PipelineConfig::validate`](crate::PipelineConfig::validate).
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    /// Stabilizer factor outside `(0, 1]`.
    #[error("smoothing factor must be in (0, 1], got {0}")]
    SmoothingFactor(f32),

    /// Negative or non-finite minimum distance.
    #[error("minimum point distance² must be finite and >= 0, got {0}")]
    MinDistance(f32),

    /// A strictly positive geometric quantity was not.
    #[error("{name} must be finite and > 0, got {value}")]
    NonPositive {
        /// Field name.
        name: &'static str,
        /// Offending value.
        value: f32,
    },

    /// A count fell below its lower bound.
    #[error("{name} must be at least {min}, got {actual}")]
    TooSmall {
        /// Field name.
        name: &'static str,
        /// Minimum allowed.
        min: usize,
        /// Value supplied.
        actual: usize,
    },

    /// A count exceeded its upper bound.
    #[error("{name} must be at most {max}, got {actual}")]
    TooLarge {
        /// Field name.
        name: &'static str,
        /// Maximum allowed.
        max: usize,
        /// Value supplied.
        actual: usize,
    },

    /// Hue palette has no entries.
    #[error("hue palette must not be empty")]
    EmptyPalette,
}

/// Errors that can occur while sweeping a tube along a centerline.
#[derive(Debug, Error, PartialEq)]
pub enum MeshError {
    /// Centerline has too few points.
    #[error("centerline needs at least {min} points, got {actual}")]
    TooFewPoints {
        /// Minimum required points.
        min: usize,
        /// Actual point count.
        actual: usize,
    },

    /// Radius is zero, negative or not finite.
    #[error("invalid tube radius: {0}")]
    InvalidRadius(f32),

    /// Too few segments around or along the tube.
    #[error("tube needs at least {min} {axis} segments, got {actual}")]
    TooFewSegments {
        /// "radial" or "tubular".
        axis: &'static str,
        /// Minimum required segments.
        min: usize,
        /// Actual segment count.
        actual: usize,
    },
}
