//! One drawing session: classifier, stabilizer and recorder run together
//! once per tick.
//!
//! ```text
//! tick(pose)
//!   classify ──▶ tracker.advance ──┬─ Start/Continue ─▶ smooth ─▶ add_point ─▶ on_drawing_point
//!                                  ├─ End ───────────▶ end_stroke ─▶ reset stabilizer
//!                                  │                    ─▶ on_drawing_end (+ on_stroke_committed)
//!                                  └─ StayIdle ───────▶ nothing
//! ```
//!
//! Geometry is not built here.  Consumers pull [`DrawingSession::strokes`]
//! (or react to `on_stroke_committed`) and hand strokes to a
//! [`MeshCache`](crate::MeshCache).

use tracing::{debug, info};

use crate::config::PipelineConfig;
use crate::gesture::{classify, Classification, GestureEdge, GestureState, GestureTracker};
use crate::landmark::{HandPose, Point, Viewport};
use crate::recorder::{AddOutcome, Stroke, StrokeCollection, StrokeRecorder};
use crate::stabilizer::PointStabilizer;

/// An accepted, stabilized point and the point it continues from.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrawingPoint {
    pub point:    Point,
    /// `None` for the first point of a stroke.
    pub previous: Option<Point>,
}

/// Receiver for drawing lifecycle notifications.
pub trait DrawingEvents {
    fn on_drawing_point(&mut self, event: DrawingPoint);

    /// Called exactly once per Drawing → Idle edge, including hand loss.
    fn on_drawing_end(&mut self);

    /// Called after a stroke is stored, just before `on_drawing_end`.
    fn on_stroke_committed(&mut self, _index: usize, _stroke: &Stroke) {}
}

/// Sink that ignores everything.
impl DrawingEvents for () {
    fn on_drawing_point(&mut self, _event: DrawingPoint) {}
    fn on_drawing_end(&mut self) {}
}

pub struct DrawingSession {
    tracker:    GestureTracker,
    stabilizer: PointStabilizer,
    recorder:   StrokeRecorder,
    last_class: Classification,
}

impl DrawingSession {
    pub fn new(config: PipelineConfig) -> Self {
        DrawingSession {
            tracker:    GestureTracker::new(),
            stabilizer: PointStabilizer::new(&config.stabilizer),
            recorder:   StrokeRecorder::new(&config.recorder),
            last_class: Classification::NONE,
        }
    }

    /// Run one frame through the pipeline.  `pose` is `None` when no hand
    /// was detected.
    pub fn tick<E>(&mut self, pose: Option<&HandPose>, viewport: Viewport, events: &mut E) -> GestureEdge
    where
        E: DrawingEvents + ?Sized,
    {
        let class = classify(pose, viewport);
        self.last_class = class;
        let edge = self.tracker.advance(class.drawing);

        match edge {
            GestureEdge::Start | GestureEdge::Continue => {
                if let Some(tip) = class.fingertip {
                    let smoothed = self.stabilizer.smooth(tip);
                    if let AddOutcome::Accepted { point, previous } = self.recorder.add_point(smoothed) {
                        events.on_drawing_point(DrawingPoint { point, previous });
                    }
                }
            }
            GestureEdge::End => self.finish_stroke(events),
            GestureEdge::StayIdle => {}
        }

        edge
    }

    fn finish_stroke<E>(&mut self, events: &mut E)
    where
        E: DrawingEvents + ?Sized,
    {
        let committed = self.recorder.end_stroke();
        self.stabilizer.reset();
        if let Some(index) = committed {
            if let Some(stroke) = self.recorder.strokes().get(index) {
                events.on_stroke_committed(index, stroke);
            }
        }
        events.on_drawing_end();
    }

    /// End the session.  An active stroke is finished through the normal
    /// end path; all per-stroke state is released.  Completed strokes stay.
    pub fn reset<E>(&mut self, events: &mut E)
    where
        E: DrawingEvents + ?Sized,
    {
        if self.tracker.state() == GestureState::Drawing {
            self.finish_stroke(events);
        }
        self.tracker.reset();
        self.stabilizer.reset();
        self.recorder.abandon_stroke();
        debug!(strokes = self.recorder.strokes().len(), "session reset");
    }

    /// Discard all strokes, finished and in progress.  An active stroke is
    /// dropped without a commit, but still gets its `on_drawing_end`.
    pub fn clear<E>(&mut self, events: &mut E)
    where
        E: DrawingEvents + ?Sized,
    {
        info!(strokes = self.recorder.strokes().len(), "clearing strokes");
        if self.tracker.state() == GestureState::Drawing {
            events.on_drawing_end();
        }
        self.tracker.reset();
        self.stabilizer.reset();
        self.recorder.clear();
    }

    pub fn strokes(&self) -> &StrokeCollection {
        self.recorder.strokes()
    }

    /// Points of the stroke being drawn right now.
    pub fn current_stroke(&self) -> &[Point] {
        self.recorder.current()
    }

    pub fn state(&self) -> GestureState {
        self.tracker.state()
    }

    /// Classification of the most recent tick.
    pub fn last_classification(&self) -> Classification {
        self.last_class
    }
}

impl Default for DrawingSession {
    fn default() -> Self {
        Self::new(PipelineConfig::default())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
