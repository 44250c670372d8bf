//! Tube mesh generation for finished strokes.
//!
//! A smoothed curve in canvas pixels is mapped into a fixed model-space
//! working volume, threaded with a centripetal Catmull-Rom spline, and swept
//! with a circular cross-section:
//!
//! ```text
//! canvas (px)           model space                      surface
//!   (x, y)  ──map──▶  (x', y', z')  ──spline──▶  rings  ──sweep──▶  TubeMesh
//!                     z' = sin(i·k)·A + layer·Δz
//! ```
//!
//! Building never fails loudly: too-short strokes and degenerate parameters
//! produce `None` so one bad stroke cannot take down the session.

use nalgebra::{Point3, Vector3};
use tracing::debug;

use crate::config::{CurveConfig, MeshConfig};
use crate::curve::synthesize;
use crate::error::{MeshError, MeshResult};
use crate::frame::parallel_transport_frames;
use crate::landmark::{Point, Viewport};
use crate::palette::{stroke_color, Rgb};
use crate::recorder::Stroke;
use crate::spline::CatmullRom;

/// Raw strokes shorter than this never get a mesh.
pub const MIN_RAW_POINTS: usize = 3;

/// Smoothed curves shorter than this never get a mesh.
pub const MIN_CURVE_POINTS: usize = 2;

// ════════════════════════════════════════════════════════════════════════════
// TubeMesh
// ════════════════════════════════════════════════════════════════════════════

/// Indexed triangle surface of one stroke.
///
/// Vertices are laid out ring by ring: `tubular_segments + 1` rings of
/// `radial_segments + 1` vertices (the seam vertex is duplicated so each ring
/// closes).  Faces wind counter-clockwise seen from outside.
#[derive(Debug, Clone, PartialEq)]
pub struct TubeMesh {
    pub stroke_index:     usize,
    pub positions:        Vec<Point3<f32>>,
    pub normals:          Vec<Vector3<f32>>,
    pub faces:            Vec<[u32; 3]>,
    /// Ring centers sampled along the spline.
    pub centerline:       Vec<Point3<f32>>,
    pub radial_segments:  usize,
    pub tubular_segments: usize,
    pub color:            Rgb,
}

impl TubeMesh {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Coordinate mapping
// ════════════════════════════════════════════════════════════════════════════

/// Depth layer for a stroke.  Wraps so long sessions stay inside the volume.
pub fn depth_layer(stroke_index: usize, config: &MeshConfig) -> usize {
    stroke_index % config.depth_layers.max(1)
}

/// Map canvas-pixel curve points into the model-space working volume.
pub fn map_to_model(
    points: &[Point],
    stroke_index: usize,
    viewport: Viewport,
    config: &MeshConfig,
) -> Vec<Point3<f32>> {
    let base_z = depth_layer(stroke_index, config) as f32 * config.depth_step;
    points
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let x = (p.x / viewport.width - 0.5) * config.volume_width;
            let y = -(p.y / viewport.height - 0.5) * config.volume_height;
            let z = (i as f32 * config.wave_frequency).sin() * config.wave_amplitude + base_z;
            Point3::new(x, y, z)
        })
        .collect()
}

// ════════════════════════════════════════════════════════════════════════════
// Sweep
// ════════════════════════════════════════════════════════════════════════════

/// Geometry of a swept tube before it is tagged with a stroke.
#[derive(Debug, Clone, PartialEq)]
pub struct TubeSurface {
    pub positions:  Vec<Point3<f32>>,
    pub normals:    Vec<Vector3<f32>>,
    pub faces:      Vec<[u32; 3]>,
    pub centerline: Vec<Point3<f32>>,
}

/// Sweep a circle of `radius` along `spline`, sampled at
/// `tubular_segments + 1` arc-length-spaced rings.
///
/// # Errors
///
/// Returns an error if the radius is not positive or either segment count is
/// too small.
pub fn sweep_tube(
    spline: &CatmullRom,
    radius: f32,
    radial_segments: usize,
    tubular_segments: usize,
) -> MeshResult<TubeSurface> {
    if !(radius.is_finite() && radius > 0.0) {
        return Err(MeshError::InvalidRadius(radius));
    }
    if radial_segments < 3 {
        return Err(MeshError::TooFewSegments { axis: "radial", min: 3, actual: radial_segments });
    }
    if tubular_segments < 1 {
        return Err(MeshError::TooFewSegments { axis: "tubular", min: 1, actual: tubular_segments });
    }

    let centerline = spline.spaced_points(tubular_segments);
    let frames = parallel_transport_frames(&centerline);
    if frames.len() != centerline.len() {
        return Err(MeshError::TooFewPoints { min: 2, actual: centerline.len() });
    }

    let ring = radial_segments + 1;
    let mut positions = Vec::with_capacity(centerline.len() * ring);
    let mut normals = Vec::with_capacity(centerline.len() * ring);

    for (center, frame) in centerline.iter().zip(&frames) {
        for j in 0..=radial_segments {
            let v = j as f32 / radial_segments as f32 * std::f32::consts::TAU;
            let (sin_v, cos_v) = v.sin_cos();
            let normal = (frame.normal * -cos_v + frame.binormal * sin_v)
                .try_normalize(f32::EPSILON)
                .unwrap_or(frame.normal);
            positions.push(*center + normal * radius);
            normals.push(normal);
        }
    }

    let mut faces = Vec::with_capacity(tubular_segments * radial_segments * 2);
    for i in 1..=tubular_segments {
        for j in 1..=radial_segments {
            let a = (ring * (i - 1) + (j - 1)) as u32;
            let b = (ring * i + (j - 1)) as u32;
            let c = (ring * i + j) as u32;
            let d = (ring * (i - 1) + j) as u32;
            faces.push([a, b, d]);
            faces.push([b, c, d]);
        }
    }

    Ok(TubeSurface { positions, normals, faces, centerline })
}

// ════════════════════════════════════════════════════════════════════════════
// Builders
// ════════════════════════════════════════════════════════════════════════════

/// Build the tube for an already-smoothed curve.
///
/// Returns `None` when the curve has fewer than two points or the sweep
/// rejects the configuration.
pub fn build(
    curve_points: &[Point],
    stroke_index: usize,
    viewport: Viewport,
    config: &MeshConfig,
) -> Option<TubeMesh> {
    if curve_points.len() < MIN_CURVE_POINTS {
        debug!(stroke_index, points = curve_points.len(), "curve too short for a tube");
        return None;
    }

    let control = map_to_model(curve_points, stroke_index, viewport, config);
    let spline = CatmullRom::new(control)?;
    let tubular = config.tubular_segments(curve_points.len());

    let surface = match sweep_tube(&spline, config.tube_radius, config.radial_segments, tubular) {
        Ok(s) => s,
        Err(e) => {
            debug!(stroke_index, error = %e, "tube sweep rejected");
            return None;
        }
    };

    Some(TubeMesh {
        stroke_index,
        positions:        surface.positions,
        normals:          surface.normals,
        faces:            surface.faces,
        centerline:       surface.centerline,
        radial_segments:  config.radial_segments,
        tubular_segments: tubular,
        color:            stroke_color(stroke_index, config),
    })
}

/// Synthesize and build in one step, applying the raw-length gate first.
pub fn build_stroke_mesh(
    stroke: &Stroke,
    stroke_index: usize,
    viewport: Viewport,
    curve: &CurveConfig,
    mesh: &MeshConfig,
) -> Option<TubeMesh> {
    if stroke.len() < MIN_RAW_POINTS {
        debug!(stroke_index, points = stroke.len(), "stroke too short for a tube");
        return None;
    }
    let smoothed = synthesize(stroke, curve);
    build(&smoothed.points, stroke_index, viewport, mesh)
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
