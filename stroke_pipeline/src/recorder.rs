//! Stroke recorder: accumulates stabilized points into strokes.
//!
//! The recorder is the only writer of stroke state.  It owns the in-progress
//! point list, the pen bookkeeping used for the distance filter and for
//! drawing joins, and the ordered collection of completed strokes.

use std::ops::Index;
use std::sync::Arc;

use tracing::debug;

use crate::config::RecorderConfig;
use crate::landmark::Point;

/// Minimum points a stroke needs to be kept.
pub const MIN_STROKE_POINTS: usize = 2;

// ════════════════════════════════════════════════════════════════════════════
// Stroke / StrokeCollection
// ════════════════════════════════════════════════════════════════════════════

/// A completed stroke.  Immutable; clones share the same point storage, so
/// handing a stroke to another thread is cheap.
#[derive(Clone, Debug, PartialEq)]
pub struct Stroke {
    points: Arc<[Point]>,
}

impl Stroke {
    pub fn new(points: Vec<Point>) -> Self {
        Stroke { points: points.into() }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<Point> {
        self.points.first().copied()
    }

    pub fn last(&self) -> Option<Point> {
        self.points.last().copied()
    }
}

/// Completed strokes in insertion order.  Only the recorder appends; nothing
/// reorders.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StrokeCollection {
    strokes: Vec<Stroke>,
}

impl StrokeCollection {
    pub fn len(&self) -> usize {
        self.strokes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Stroke> {
        self.strokes.get(index)
    }

    pub fn last(&self) -> Option<&Stroke> {
        self.strokes.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Stroke> {
        self.strokes.iter()
    }

    pub fn as_slice(&self) -> &[Stroke] {
        &self.strokes
    }

    fn push(&mut self, stroke: Stroke) -> usize {
        self.strokes.push(stroke);
        self.strokes.len() - 1
    }

    fn clear(&mut self) {
        self.strokes.clear();
    }
}

impl Index<usize> for StrokeCollection {
    type Output = Stroke;
    fn index(&self, index: usize) -> &Stroke {
        &self.strokes[index]
    }
}

impl<'a> IntoIterator for &'a StrokeCollection {
    type Item = &'a Stroke;
    type IntoIter = std::slice::Iter<'a, Stroke>;
    fn into_iter(self) -> Self::IntoIter {
        self.strokes.iter()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Pen bookkeeping
// ════════════════════════════════════════════════════════════════════════════

/// Last accepted point of the in-progress stroke.  Drives both the distance
/// filter and the preview's segment joins.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PenState {
    pub last: Option<Point>,
}

/// Result of [`StrokeRecorder::add_point`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AddOutcome {
    /// Point stored.  `previous` is the point it joins from; `None` for the
    /// first point of a stroke.
    Accepted { point: Point, previous: Option<Point> },
    /// Too close to the last accepted point.
    Rejected,
}

impl AddOutcome {
    pub fn is_accepted(self) -> bool {
        matches!(self, AddOutcome::Accepted { .. })
    }
}

// ════════════════════════════════════════════════════════════════════════════
// StrokeRecorder
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Default)]
pub struct StrokeRecorder {
    min_distance_sq: f32,
    current:         Vec<Point>,
    pen:             PenState,
    completed:       StrokeCollection,
}

impl StrokeRecorder {
    pub fn new(config: &RecorderConfig) -> Self {
        StrokeRecorder {
            min_distance_sq: config.min_distance_sq,
            ..Self::default()
        }
    }

    /// Append `p` to the in-progress stroke unless it sits within the
    /// minimum distance of the last accepted point.
    pub fn add_point(&mut self, p: Point) -> AddOutcome {
        let previous = self.pen.last;
        if let Some(last) = previous {
            if p.distance_sq(last) < self.min_distance_sq {
                return AddOutcome::Rejected;
            }
        }
        self.current.push(p);
        self.pen.last = Some(p);
        AddOutcome::Accepted { point: p, previous }
    }

    /// Finish the in-progress stroke.  Returns the index it was stored at,
    /// or `None` when it had too few points and was dropped.  Pen state is
    /// cleared either way.
    pub fn end_stroke(&mut self) -> Option<usize> {
        let points = std::mem::take(&mut self.current);
        self.pen = PenState::default();

        if points.len() < MIN_STROKE_POINTS {
            debug!(points = points.len(), "dropping short stroke");
            return None;
        }
        let len = points.len();
        let index = self.completed.push(Stroke::new(points));
        debug!(index, points = len, "stroke committed");
        Some(index)
    }

    /// Discard the in-progress stroke without committing it.
    pub fn abandon_stroke(&mut self) {
        self.current.clear();
        self.pen = PenState::default();
    }

    /// Discard everything.
    pub fn clear(&mut self) {
        self.abandon_stroke();
        self.completed.clear();
    }

    pub fn strokes(&self) -> &StrokeCollection {
        &self.completed
    }

    /// Points of the stroke being drawn.
    pub fn current(&self) -> &[Point] {
        &self.current
    }

    pub fn pen(&self) -> PenState {
        self.pen
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    fn recorder() -> StrokeRecorder {
        StrokeRecorder::new(&RecorderConfig::default())
    }

    #[test]
    fn first_point_always_accepted() {
        let mut r = recorder();
        let out = r.add_point(Point::new(1.0, 1.0));
        assert_eq!(out, AddOutcome::Accepted { point: Point::new(1.0, 1.0), previous: None });
    }

    #[test]
    fn identical_points_stored_once() {
        let mut r = recorder();
        r.add_point(Point::new(5.0, 5.0));
        assert_eq!(r.add_point(Point::new(5.0, 5.0)), AddOutcome::Rejected);
        assert_eq!(r.current().len(), 1);
    }

    #[test]
    fn threshold_is_inclusive_at_min_distance() {
        let mut r = recorder();
        r.add_point(Point::new(0.0, 0.0));
        // 1.9² < 4 → rejected; 2² == 4 → accepted
        assert!(!r.add_point(Point::new(1.9, 0.0)).is_accepted());
        assert!(r.add_point(Point::new(2.0, 0.0)).is_accepted());
    }

    #[test]
    fn accepted_reports_previous() {
        let mut r = recorder();
        r.add_point(Point::new(0.0, 0.0));
        let out = r.add_point(Point::new(10.0, 0.0));
        assert_eq!(
            out,
            AddOutcome::Accepted { point: Point::new(10.0, 0.0), previous: Some(Point::new(0.0, 0.0)) }
        );
    }

    #[test]
    fn single_point_stroke_dropped() {
        let mut r = recorder();
        r.add_point(Point::new(0.0, 0.0));
        assert_eq!(r.end_stroke(), None);
        assert!(r.strokes().is_empty());
        assert!(r.current().is_empty());
        assert_eq!(r.pen(), PenState::default());
    }

    #[test]
    fn two_point_stroke_kept() {
        let mut r = recorder();
        r.add_point(Point::new(0.0, 0.0));
        r.add_point(Point::new(10.0, 0.0));
        assert_eq!(r.end_stroke(), Some(0));
        assert_eq!(r.strokes().len(), 1);
        assert_eq!(r.strokes()[0].points(), &[Point::new(0.0, 0.0), Point::new(10.0, 0.0)]);
    }

    #[test]
    fn pen_resets_between_strokes() {
        let mut r = recorder();
        r.add_point(Point::new(0.0, 0.0));
        r.add_point(Point::new(10.0, 0.0));
        r.end_stroke();
        // Same spot as the old last point: still accepted as a new first point.
        assert_eq!(
            r.add_point(Point::new(10.0, 0.0)),
            AddOutcome::Accepted { point: Point::new(10.0, 0.0), previous: None }
        );
    }

    #[test]
    fn insertion_order_kept() {
        let mut r = recorder();
        for k in 0..3 {
            let y = k as f32 * 100.0;
            r.add_point(Point::new(0.0, y));
            r.add_point(Point::new(10.0, y));
            r.end_stroke();
        }
        let ys: Vec<f32> = r.strokes().iter().map(|s| s.first().unwrap().y).collect();
        assert_eq!(ys, vec![0.0, 100.0, 200.0]);
    }

    #[test]
    fn clear_discards_everything() {
        let mut r = recorder();
        r.add_point(Point::new(0.0, 0.0));
        r.add_point(Point::new(10.0, 0.0));
        r.end_stroke();
        r.add_point(Point::new(50.0, 50.0));
        r.clear();
        assert!(r.strokes().is_empty());
        assert!(r.current().is_empty());
    }

    #[test]
    fn committed_stroke_is_snapshot() {
        let mut r = recorder();
        r.add_point(Point::new(0.0, 0.0));
        r.add_point(Point::new(10.0, 0.0));
        r.end_stroke();
        let snapshot = r.strokes()[0].clone();
        r.add_point(Point::new(99.0, 99.0));
        assert_eq!(snapshot.len(), 2);
    }
}
