//! Software rasterizer for stroke tubes.
//!
//! Meshes are projected with a pinhole camera placed so that the model-space
//! plane `z = 0` lines up pixel-for-pixel with the drawing canvas: a tube
//! appears where it was drawn, with its depth offset giving slight
//! parallax.  Triangles are filled with edge functions, depth-tested, and
//! flat-shaded with a two-sided Lambert term.

use nalgebra::{Point3, Rotation3, Vector3};

use stroke_pipeline::{MeshConfig, Point, TubeMesh};

pub const BG_COLOR:     u32 = 0xFF10_1420;
pub const CURSOR_DRAW:  u32 = 0xFFFF_D700;
pub const CURSOR_HOVER: u32 = 0xFF88_8888;

const AMBIENT: f32 = 0.25;

// ════════════════════════════════════════════════════════════════════════════
// Camera
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    /// Distance from the eye to the `z = 0` plane, model units.
    pub distance: f32,
    /// Focal lengths in pixels per model unit at `z = 0` times `distance`.
    pub fx: f32,
    pub fy: f32,
    pub cx: f32,
    pub cy: f32,
}

impl Camera {
    /// Camera for a `width`×`height` canvas showing a volume of
    /// `volume_width`×`volume_height` model units at `z = 0`.
    pub fn fit(width: usize, height: usize, mesh: &MeshConfig, distance: f32) -> Self {
        Camera {
            distance,
            fx: width as f32 * distance / mesh.volume_width,
            fy: height as f32 * distance / mesh.volume_height,
            cx: width as f32 * 0.5,
            cy: height as f32 * 0.5,
        }
    }

    /// Screen position and view depth, or `None` behind the eye.
    pub fn project(&self, p: &Point3<f32>) -> Option<(f32, f32, f32)> {
        let depth = self.distance - p.z;
        if depth <= 1e-3 {
            return None;
        }
        Some((self.cx + self.fx * p.x / depth, self.cy - self.fy * p.y / depth, depth))
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Presentation animation
// ════════════════════════════════════════════════════════════════════════════

/// Gentle bob and yaw applied to every mesh at draw time.  Geometry in the
/// cache is never touched.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Presentation {
    pub bob:   f32,
    pub yaw:   f32,
}

impl Presentation {
    pub const STILL: Presentation = Presentation { bob: 0.0, yaw: 0.0 };

    /// Animation state `t` seconds after start.
    pub fn at(t: f32) -> Self {
        Presentation {
            bob: (t * 1.4).sin() * 0.06,
            yaw: (t * 0.45).sin() * 0.12,
        }
    }

    fn rotation(&self) -> Rotation3<f32> {
        Rotation3::from_axis_angle(&Vector3::y_axis(), self.yaw)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Renderer
// ════════════════════════════════════════════════════════════════════════════

pub struct Renderer {
    width:  usize,
    height: usize,
    color:  Vec<u32>,
    depth:  Vec<f32>,
    light:  Vector3<f32>,
    /// Triangles drawn in the current frame.
    pub triangles: usize,
}

impl Renderer {
    pub fn new(width: usize, height: usize) -> Self {
        Renderer {
            width,
            height,
            color:  vec![BG_COLOR; width * height],
            depth:  vec![f32::INFINITY; width * height],
            light:  Vector3::new(0.3, 0.6, 1.0).normalize(),
            triangles: 0,
        }
    }

    pub fn pixels(&self) -> &[u32] {
        &self.color
    }

    pub fn pixels_mut(&mut self) -> &mut [u32] {
        &mut self.color
    }

    pub fn clear(&mut self) {
        self.color.fill(BG_COLOR);
        self.depth.fill(f32::INFINITY);
        self.triangles = 0;
    }

    pub fn draw_mesh(&mut self, mesh: &TubeMesh, camera: &Camera, pose: Presentation) {
        let rot = pose.rotation();
        let lift = Vector3::new(0.0, pose.bob, 0.0);

        let projected: Vec<Option<(f32, f32, f32)>> = mesh
            .positions
            .iter()
            .map(|p| camera.project(&(rot.transform_point(p) + lift)))
            .collect();

        for face in &mesh.faces {
            let [a, b, c] = (*face).map(|i| i as usize);
            let (Some(pa), Some(pb), Some(pc)) = (projected[a], projected[b], projected[c]) else {
                continue;
            };
            let n = rot * (mesh.normals[a] + mesh.normals[b] + mesh.normals[c]);
            let lambert = n.try_normalize(f32::EPSILON).map_or(0.0, |n| n.dot(&self.light).abs());
            let shade = mesh.color.scale(AMBIENT + (1.0 - AMBIENT) * lambert).to_argb();
            self.fill_triangle(pa, pb, pc, shade);
        }
    }

    fn fill_triangle(&mut self, a: (f32, f32, f32), b: (f32, f32, f32), c: (f32, f32, f32), color: u32) {
        let area = edge(a, b, c.0, c.1);
        if area.abs() < 1e-6 {
            return;
        }
        let min_x = a.0.min(b.0).min(c.0).floor().max(0.0) as usize;
        let min_y = a.1.min(b.1).min(c.1).floor().max(0.0) as usize;
        let max_x = (a.0.max(b.0).max(c.0).ceil().max(0.0) as usize).min(self.width);
        let max_y = (a.1.max(b.1).max(c.1).ceil().max(0.0) as usize).min(self.height);
        if min_x >= max_x || min_y >= max_y {
            return;
        }
        self.triangles += 1;

        for y in min_y..max_y {
            let py = y as f32 + 0.5;
            for x in min_x..max_x {
                let px = x as f32 + 0.5;
                let w0 = edge(b, c, px, py) / area;
                let w1 = edge(c, a, px, py) / area;
                let w2 = edge(a, b, px, py) / area;
                if w0 < 0.0 || w1 < 0.0 || w2 < 0.0 {
                    continue;
                }
                let z = w0 * a.2 + w1 * b.2 + w2 * c.2;
                let i = y * self.width + x;
                if z < self.depth[i] {
                    self.depth[i] = z;
                    self.color[i] = color;
                }
            }
        }
    }

    /// Ring cursor at the fingertip.
    pub fn draw_cursor(&mut self, at: Point, drawing: bool) {
        let color = if drawing { CURSOR_DRAW } else { CURSOR_HOVER };
        let (r_in, r_out) = (5.0f32, 7.0f32);
        let x0 = (at.x - r_out).floor().max(0.0) as usize;
        let y0 = (at.y - r_out).floor().max(0.0) as usize;
        let x1 = ((at.x + r_out).ceil().max(0.0) as usize).min(self.width);
        let y1 = ((at.y + r_out).ceil().max(0.0) as usize).min(self.height);
        for y in y0..y1 {
            for x in x0..x1 {
                let dx = x as f32 + 0.5 - at.x;
                let dy = y as f32 + 0.5 - at.y;
                let d = (dx * dx + dy * dy).sqrt();
                if (r_in..=r_out).contains(&d) {
                    self.color[y * self.width + x] = color;
                }
            }
        }
    }
}

/// Twice the signed area of `(a, b, p)`.
fn edge(a: (f32, f32, f32), b: (f32, f32, f32), px: f32, py: f32) -> f32 {
    (b.0 - a.0) * (py - a.1) - (b.1 - a.1) * (px - a.0)
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
