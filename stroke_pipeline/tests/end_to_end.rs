//! Whole-pipeline scenarios: landmarks in, strokes and tubes out.

use approx::assert_relative_eq;
use stroke_pipeline::landmark::{Finger, LANDMARK_COUNT};
use stroke_pipeline::{
    DrawingEvents, DrawingPoint, DrawingSession, FrameSlot, GestureEdge, HandFrame, HandPose,
    Landmark, MeshCache, PipelineConfig, Point, Stroke, Viewport,
};

const VIEW: Viewport = Viewport::new(640.0, 480.0);

#[derive(Default)]
struct Recorded {
    points:    Vec<DrawingPoint>,
    ends:      usize,
    committed: Vec<(usize, usize)>,
}

impl DrawingEvents for Recorded {
    fn on_drawing_point(&mut self, event: DrawingPoint) {
        self.points.push(event);
    }

    fn on_drawing_end(&mut self) {
        self.ends += 1;
    }

    fn on_stroke_committed(&mut self, index: usize, stroke: &Stroke) {
        self.committed.push((index, stroke.len()));
    }
}

/// Index finger extended with its tip at pixel `(px, py)`; the other three
/// fingers curled below their knuckles.
fn index_only(px: f32, py: f32) -> HandPose {
    let mut lm = [Landmark::new(0.5, 0.95); LANDMARK_COUNT];
    for (k, finger) in Finger::ALL.iter().enumerate() {
        let (tip, pip, mcp) = finger.joints();
        let x = 0.45 + 0.05 * k as f32;
        lm[mcp] = Landmark::new(x, 0.80);
        lm[pip] = Landmark::new(x, 0.85);
        lm[tip] = Landmark::new(x, 0.88);
    }
    let (tip, pip, mcp) = Finger::Index.joints();
    let (x, y) = (px / VIEW.width, py / VIEW.height);
    lm[tip] = Landmark::new(x, y);
    lm[pip] = Landmark::new(x, y + 0.1);
    lm[mcp] = Landmark::new(x, y + 0.2);
    HandPose::new(lm)
}

fn draw_line(session: &mut DrawingSession, sink: &mut Recorded, from: Point, step: Point, n: usize) {
    for i in 0..n {
        let p = Point::new(from.x + step.x * i as f32, from.y + step.y * i as f32);
        session.tick(Some(&index_only(p.x, p.y)), VIEW, sink);
    }
}

#[test]
fn five_ticks_then_hand_lost() {
    let mut session = DrawingSession::default();
    let mut sink = Recorded::default();

    draw_line(&mut session, &mut sink, Point::new(100.0, 100.0), Point::new(10.0, 0.0), 5);
    assert_eq!(session.tick(None, VIEW, &mut sink), GestureEdge::End);

    assert_eq!(sink.points.len(), 5);
    assert_eq!(sink.ends, 1);
    assert_eq!(sink.committed, vec![(0, 5)]);

    let strokes = session.strokes();
    assert_eq!(strokes.len(), 1);
    let stroke = &strokes[0];
    let first = stroke.first().unwrap();
    let last = stroke.last().unwrap();
    assert_relative_eq!(first.x, 100.0, epsilon = 1e-3);
    assert_relative_eq!(first.y, 100.0, epsilon = 1e-3);
    // The EMA lags the raw 140 slightly.
    assert_relative_eq!(last.x, 137.504, epsilon = 1e-2);
    assert_relative_eq!(last.y, 100.0, epsilon = 1e-3);

    // Events and the stored stroke agree point for point.
    let emitted: Vec<Point> = sink.points.iter().map(|e| e.point).collect();
    assert_eq!(emitted.as_slice(), stroke.points());
    assert_eq!(sink.points[0].previous, None);
    assert_eq!(sink.points[3].previous, Some(emitted[2]));
}

#[test]
fn second_stroke_starts_from_raw_input() {
    let mut session = DrawingSession::default();
    let mut sink = Recorded::default();

    draw_line(&mut session, &mut sink, Point::new(100.0, 100.0), Point::new(10.0, 0.0), 5);
    session.tick(None, VIEW, &mut sink);
    draw_line(&mut session, &mut sink, Point::new(400.0, 300.0), Point::new(0.0, 12.0), 4);
    session.tick(None, VIEW, &mut sink);

    assert_eq!(sink.ends, 2);
    assert_eq!(session.strokes().len(), 2);
    let start = session.strokes()[1].first().unwrap();
    assert_relative_eq!(start.x, 400.0, epsilon = 1e-3);
    assert_relative_eq!(start.y, 300.0, epsilon = 1e-3);
    assert_eq!(session.strokes()[0].len(), 5);
}

#[test]
fn finished_strokes_become_tubes() {
    let config = PipelineConfig::default();
    let mut session = DrawingSession::new(config.clone());
    let mut sink = Recorded::default();
    let mut cache = MeshCache::new(config);

    // Two-point stroke: stored but never meshed.
    draw_line(&mut session, &mut sink, Point::new(50.0, 50.0), Point::new(30.0, 0.0), 2);
    session.tick(None, VIEW, &mut sink);
    // Ten-point arc.
    for i in 0..10 {
        let a = i as f32 * 0.3;
        session.tick(Some(&index_only(320.0 + 120.0 * a.cos(), 240.0 + 120.0 * a.sin())), VIEW, &mut sink);
    }
    session.tick(None, VIEW, &mut sink);

    let meshes = cache.sync(session.strokes().as_slice(), VIEW);
    assert_eq!(meshes.len(), 2);
    assert!(meshes[0].is_none());
    let tube = meshes[1].as_ref().unwrap();
    assert_eq!(tube.stroke_index, 1);
    assert!(tube.face_count() > 0);
    assert!(tube.positions.iter().all(|p| p.coords.iter().all(|c| c.is_finite())));

    // Nothing new to build on an unchanged collection.
    let builds = cache.build_count();
    cache.sync(session.strokes().as_slice(), VIEW);
    assert_eq!(cache.build_count(), builds);
}

#[test]
fn slot_feeds_one_frame_per_tick() {
    let slot: FrameSlot<HandFrame> = FrameSlot::new();
    let mut session = DrawingSession::default();
    let mut sink = Recorded::default();

    // Three frames arrive before the tick: only the newest is processed.
    slot.offer(Some(index_only(100.0, 100.0)));
    slot.offer(Some(index_only(200.0, 100.0)));
    slot.offer(Some(index_only(300.0, 100.0)));
    if let Some(frame) = slot.take() {
        session.tick(frame.as_ref(), VIEW, &mut sink);
    }
    assert_eq!(slot.coalesced(), 2);
    assert_eq!(sink.points.len(), 1);
    assert_relative_eq!(sink.points[0].point.x, 300.0, epsilon = 1e-3);
    assert!(slot.take().is_none());
}
