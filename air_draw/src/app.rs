//! Top-level application state.
//!
//! `AppState` owns the `DrawingSession`, the `PreviewCanvas`, the
//! `MeshWorker` and the renderer.  Each frame it runs one pipeline tick on
//! the newest hand frame, picks up any finished meshes, and composes the
//! picture the visualizer shows.

use std::sync::mpsc;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{info, warn};

use stroke_pipeline::{DrawingSession, FrameSlot, GestureEdge, HandFrame, HandPose, Point, Viewport};

use crate::config::AppConfig;
use crate::mesher::{MeshUpdate, MeshWorker};
use crate::preview::PreviewCanvas;
use crate::render::{Camera, Presentation, Renderer};
use crate::source::{spawn_landmark_source, SimInput};
use crate::visualizer::{UiAction, Visualizer};

/// Eye distance from the drawing plane, model units.
const CAMERA_DISTANCE: f32 = 12.0;

// ════════════════════════════════════════════════════════════════════════════
// AppState
// ════════════════════════════════════════════════════════════════════════════

pub struct AppState {
    // ── pipeline ─────────────────────────────────────────────────────────
    session:  DrawingSession,
    viewport: Viewport,

    // ── presentation ─────────────────────────────────────────────────────
    preview:  PreviewCanvas,
    worker:   MeshWorker,
    meshes:   MeshUpdate,
    renderer: Renderer,
    camera:   Camera,

    // ── cursor ───────────────────────────────────────────────────────────
    fingertip: Option<Point>,
    drawing:   bool,
    hand_seen: bool,

    // ── status message ───────────────────────────────────────────────────
    pub status: String,
    ticks:      u64,
}

impl AppState {
    pub fn new(cfg: &AppConfig) -> Result<Self> {
        let worker = MeshWorker::spawn(cfg.pipeline.clone()).context("Failed to start mesh worker")?;
        Ok(AppState {
            session:   DrawingSession::new(cfg.pipeline.clone()),
            viewport:  cfg.viewport(),
            preview:   PreviewCanvas::new(cfg.width, cfg.height),
            worker,
            meshes:    MeshUpdate::default(),
            renderer:  Renderer::new(cfg.width, cfg.height),
            camera:    Camera::fit(cfg.width, cfg.height, &cfg.pipeline.mesh, CAMERA_DISTANCE),
            fingertip: None,
            drawing:   false,
            hand_seen: false,
            status:    "Ready: hold the left mouse button to draw".to_string(),
            ticks:     0,
        })
    }

    // ── per-frame pipeline tick ──────────────────────────────────────────

    /// Run one tick on `pose` (`None` = no hand in view).
    pub fn tick(&mut self, pose: Option<&HandPose>) -> GestureEdge {
        self.ticks += 1;
        let committed_before = self.preview.stats.committed;

        let edge = self.session.tick(pose, self.viewport, &mut self.preview);

        self.fingertip = self.session.last_classification().fingertip;
        self.drawing = edge.is_drawing();
        if self.hand_seen != pose.is_some() {
            self.hand_seen = pose.is_some();
            info!(hand = self.hand_seen, "hand visibility changed");
        }

        if self.preview.stats.committed != committed_before {
            self.worker.sync(self.session.strokes().as_slice(), self.viewport);
        }

        self.refresh_status(edge);
        edge
    }

    /// Adopt the newest mesh snapshot from the worker, if any.
    pub fn poll_meshes(&mut self) -> bool {
        match self.worker.drain_latest() {
            Some(update) => {
                self.meshes = update;
                true
            }
            None => false,
        }
    }

    /// Drop every stroke, mesh and bit of preview ink.  A stroke in progress
    /// ends without being meshed.
    pub fn clear(&mut self) {
        self.session.clear(&mut self.preview);
        self.worker.clear();
        self.drawing = false;
        self.meshes = MeshUpdate::default();
        self.status = "Cleared".to_string();
    }

    /// Finish any active stroke; used on shutdown.
    pub fn finish(&mut self) {
        self.session.reset(&mut self.preview);
    }

    fn refresh_status(&mut self, edge: GestureEdge) {
        let strokes = self.session.strokes().len();
        let meshed = self.meshes.visible().count();
        self.status = match edge {
            GestureEdge::Start | GestureEdge::Continue => format!(
                "Drawing: {} pts | strokes {} | tubes {}",
                self.session.current_stroke().len(),
                strokes,
                meshed
            ),
            _ if !self.hand_seen => format!("No hand | strokes {} | tubes {}", strokes, meshed),
            _ => format!("Hovering | strokes {} | tubes {}", strokes, meshed),
        };
    }

    // ── rendering ────────────────────────────────────────────────────────

    /// Compose one picture at animation time `t` seconds.
    pub fn render(&mut self, t: f32) -> &[u32] {
        self.renderer.clear();
        let pose = Presentation::at(t);
        for mesh in self.meshes.visible() {
            self.renderer.draw_mesh(mesh, &self.camera, pose);
        }
        self.preview.composite_onto(self.renderer.pixels_mut());
        if let Some(tip) = self.fingertip {
            self.renderer.draw_cursor(tip, self.drawing);
        }
        self.renderer.pixels()
    }

    // ── accessors ────────────────────────────────────────────────────────

    pub fn session(&self) -> &DrawingSession {
        &self.session
    }

    pub fn preview(&self) -> &PreviewCanvas {
        &self.preview
    }

    pub fn meshes(&self) -> &MeshUpdate {
        &self.meshes
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    #[cfg(test)]
    fn wait_for_meshes(&mut self) {
        if let Some(update) = self.worker.recv() {
            self.meshes = update;
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// run(): the main application loop
// ════════════════════════════════════════════════════════════════════════════

/// Run the full application.
///
/// This is the entry point called from `main.rs`.  It creates the viewer,
/// the landmark source (simulation by default, hardware with `--features
/// leap`), and drives the tick/render loop at the configured frame rate.
pub fn run(cfg: AppConfig) -> Result<()> {
    let slot: Arc<FrameSlot<HandFrame>> = Arc::new(FrameSlot::new());

    // ── Sim input channel (the window doubles as the camera) ─────────────
    let (sim_tx, sim_rx) = mpsc::channel::<SimInput>();

    #[cfg(not(feature = "leap"))]
    let source = {
        let src = crate::source::SimLandmarkSource::new(sim_rx, cfg.viewport(), cfg.source_hz);
        spawn_landmark_source(src, Arc::clone(&slot)).context("Failed to start landmark source")?
    };
    #[cfg(feature = "leap")]
    let source = {
        drop(sim_rx);
        let src = crate::source::LeapLandmarkSource::default();
        spawn_landmark_source(src, Arc::clone(&slot)).context("Failed to start landmark source")?
    };

    let mut vis = Visualizer::new(cfg.width, cfg.height, cfg.target_fps, sim_tx)?;
    let mut app = AppState::new(&cfg)?;
    let start = Instant::now();

    info!(width = cfg.width, height = cfg.height, "viewer open");

    // ── Main loop ─────────────────────────────────────────────────────────
    while vis.is_open() {
        match vis.poll_input() {
            UiAction::Quit  => break,
            UiAction::Clear => app.clear(),
            UiAction::None  => {}
        }

        match slot.take() {
            Some(frame) => {
                app.tick(frame.as_ref());
            }
            None if slot.is_closed() => {
                warn!("landmark source stopped");
                break;
            }
            None => {}
        }

        app.poll_meshes();

        let t = start.elapsed().as_secs_f32();
        let status = app.status.clone();
        vis.present(app.render(t), &status)?;
    }

    app.finish();
    slot.close();
    if source.join().is_err() {
        warn!("landmark source panicked");
    }
    info!(
        ticks = app.ticks(),
        strokes = app.session().strokes().len(),
        coalesced = slot.coalesced(),
        "session ended"
    );
    Ok(())
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
