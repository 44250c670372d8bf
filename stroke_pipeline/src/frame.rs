//! Rotation-minimizing frames along a sampled centerline.
//!
//! Each frame is transported from its predecessor by the smallest rotation
//! that carries the old tangent onto the new one, so the tube's cross-section
//! does not twist as the stroke bends.

use nalgebra::{Point3, UnitVector3, Vector3};

/// Orthonormal frame at one centerline sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub tangent:  Vector3<f32>,
    pub normal:   Vector3<f32>,
    pub binormal: Vector3<f32>,
}

impl Frame {
    /// Initial frame for `tangent`, with the normal chosen against the axis
    /// the tangent is least aligned with.
    pub fn from_tangent(tangent: Vector3<f32>) -> Self {
        let tangent = tangent.try_normalize(f32::EPSILON).unwrap_or(Vector3::z());
        let normal = perpendicular(tangent);
        let binormal = tangent.cross(&normal);
        Frame { tangent, normal, binormal }
    }

    /// Carry this frame onto `new_tangent` with the minimal rotation.
    fn transport(&self, new_tangent: Vector3<f32>) -> Frame {
        let new_tangent = new_tangent.try_normalize(f32::EPSILON).unwrap_or(self.tangent);
        let axis = self.tangent.cross(&new_tangent);

        if axis.norm() < f32::EPSILON {
            let sign = if self.tangent.dot(&new_tangent) >= 0.0 { 1.0 } else { -1.0 };
            return Frame {
                tangent:  new_tangent,
                normal:   self.normal * sign,
                binormal: self.binormal * sign,
            };
        }

        let k = UnitVector3::new_normalize(axis).into_inner();
        let angle = self.tangent.dot(&new_tangent).clamp(-1.0, 1.0).acos();
        let (sin_a, cos_a) = angle.sin_cos();
        // Rodrigues
        let rotate = |v: Vector3<f32>| v * cos_a + k.cross(&v) * sin_a + k * k.dot(&v) * (1.0 - cos_a);

        Frame {
            tangent:  new_tangent,
            normal:   rotate(self.normal),
            binormal: rotate(self.binormal),
        }
    }
}

fn perpendicular(v: Vector3<f32>) -> Vector3<f32> {
    let (ax, ay, az) = (v.x.abs(), v.y.abs(), v.z.abs());
    let axis = if ax <= ay && ax <= az {
        Vector3::x()
    } else if ay <= az {
        Vector3::y()
    } else {
        Vector3::z()
    };
    v.cross(&axis).try_normalize(f32::EPSILON).unwrap_or(Vector3::y())
}

/// One frame per point; empty for fewer than two points.
pub fn parallel_transport_frames(points: &[Point3<f32>]) -> Vec<Frame> {
    if points.len() < 2 {
        return Vec::new();
    }

    let last = points.len() - 1;
    let mut frames = Vec::with_capacity(points.len());
    frames.push(Frame::from_tangent(points[1] - points[0]));

    for i in 1..points.len() {
        let prev = frames[i - 1];
        let tangent = if i < last {
            (points[i] - points[i - 1]) + (points[i + 1] - points[i])
        } else {
            points[i] - points[i - 1]
        };
        let tangent = tangent.try_normalize(f32::EPSILON).unwrap_or(prev.tangent);
        frames.push(prev.transport(tangent));
    }

    frames
}
