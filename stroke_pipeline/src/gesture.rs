//! Gesture classification: hand pose → drawing signal.
//!
//! A finger counts as extended when its joints rise monotonically along the
//! image's vertical axis (`tip.y < pip.y < mcp.y`).  No angles are computed.
//! The user draws while the index finger alone is extended; the thumb is
//! ignored.
//!
//! [`classify`] is a pure per-frame function.  [`GestureTracker`] stores the
//! previous frame's [`GestureState`] and turns the level signal into edges.

use tracing::debug;

use crate::landmark::{Finger, HandPose, Viewport, Point, INDEX_TIP};

// ════════════════════════════════════════════════════════════════════════════
// Classification
// ════════════════════════════════════════════════════════════════════════════

/// Result of classifying one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Classification {
    /// True while the pose means "draw now".
    pub drawing:   bool,
    /// Index fingertip in canvas pixels, when a hand is present.
    pub fingertip: Option<Point>,
}

impl Classification {
    /// The no-hand result.
    pub const NONE: Classification = Classification { drawing: false, fingertip: None };
}

/// True iff `tip.y < pip.y < mcp.y` for `finger`.
pub fn finger_extended(pose: &HandPose, finger: Finger) -> bool {
    let (tip, pip, mcp) = finger.joints();
    let (tip, pip, mcp) = (pose.landmark(tip), pose.landmark(pip), pose.landmark(mcp));
    tip.y < pip.y && pip.y < mcp.y
}

/// Classify one frame.  `None` means no hand was seen.
pub fn classify(pose: Option<&HandPose>, viewport: Viewport) -> Classification {
    let Some(pose) = pose else {
        return Classification::NONE;
    };

    let drawing = finger_extended(pose, Finger::Index)
        && !finger_extended(pose, Finger::Middle)
        && !finger_extended(pose, Finger::Ring)
        && !finger_extended(pose, Finger::Pinky);

    Classification {
        drawing,
        fingertip: Some(pose.landmark(INDEX_TIP).to_canvas(viewport)),
    }
}

// ════════════════════════════════════════════════════════════════════════════
// GestureState / GestureTracker
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GestureState {
    #[default]
    Idle,
    Drawing,
}

/// Edge produced by comparing this frame's signal with the stored state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GestureEdge {
    /// Idle → Idle.
    StayIdle,
    /// Idle → Drawing.
    Start,
    /// Drawing → Drawing.
    Continue,
    /// Drawing → Idle (gesture released or hand lost).
    End,
}

impl GestureEdge {
    pub fn is_drawing(self) -> bool {
        matches!(self, GestureEdge::Start | GestureEdge::Continue)
    }
}

/// Holds the previous frame's state.
#[derive(Debug, Default)]
pub struct GestureTracker {
    state: GestureState,
}

impl GestureTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> GestureState {
        self.state
    }

    /// Feed this frame's drawing signal; returns the edge and stores the
    /// new state.
    pub fn advance(&mut self, drawing: bool) -> GestureEdge {
        let edge = match (self.state, drawing) {
            (GestureState::Idle,    false) => GestureEdge::StayIdle,
            (GestureState::Idle,    true)  => GestureEdge::Start,
            (GestureState::Drawing, true)  => GestureEdge::Continue,
            (GestureState::Drawing, false) => GestureEdge::End,
        };
        self.state = if drawing { GestureState::Drawing } else { GestureState::Idle };
        if matches!(edge, GestureEdge::Start | GestureEdge::End) {
            debug!(?edge, "gesture edge");
        }
        edge
    }

    pub fn reset(&mut self) {
        self.state = GestureState::Idle;
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmark::{Landmark, LANDMARK_COUNT};

    const VIEW: Viewport = Viewport::new(640.0, 480.0);

    /// Hand with wrist at the bottom; each finger either rising (extended)
    /// or folded back down past its MCP.
    fn pose(extended: [bool; 4]) -> HandPose {
        let mut lm = [Landmark::new(0.5, 0.9); LANDMARK_COUNT];
        for (i, finger) in Finger::ALL.iter().enumerate() {
            let (tip, pip, mcp) = finger.joints();
            let x = 0.4 + 0.05 * i as f32;
            lm[mcp] = Landmark::new(x, 0.6);
            if extended[i] {
                lm[pip] = Landmark::new(x, 0.5);
                lm[tip] = Landmark::new(x, 0.3);
            } else {
                lm[pip] = Landmark::new(x, 0.55);
                lm[tip] = Landmark::new(x, 0.65);
            }
        }
        HandPose::new(lm)
    }

    #[test]
    fn truth_table_all_sixteen() {
        for bits in 0u8..16 {
            let ext = [bits & 1 != 0, bits & 2 != 0, bits & 4 != 0, bits & 8 != 0];
            let c = classify(Some(&pose(ext)), VIEW);
            let expected = ext[0] && !ext[1] && !ext[2] && !ext[3];
            assert_eq!(c.drawing, expected, "combination {:?}", ext);
            assert!(c.fingertip.is_some());
        }
    }

    #[test]
    fn no_hand_is_not_drawing() {
        assert_eq!(classify(None, VIEW), Classification::NONE);
    }

    #[test]
    fn equal_y_is_not_extended() {
        let mut p = pose([true, false, false, false]);
        let (tip, pip, _) = Finger::Index.joints();
        p.landmarks[tip].y = p.landmarks[pip].y;
        assert!(!finger_extended(&p, Finger::Index));
    }

    #[test]
    fn fingertip_scaled_to_canvas() {
        let c = classify(Some(&pose([true, false, false, false])), VIEW);
        let tip = c.fingertip.unwrap();
        assert!((tip.x - 0.4 * 640.0).abs() < 1e-3);
        assert!((tip.y - 0.3 * 480.0).abs() < 1e-3);
    }

    #[test]
    fn tracker_edges() {
        let mut t = GestureTracker::new();
        assert_eq!(t.advance(false), GestureEdge::StayIdle);
        assert_eq!(t.advance(true),  GestureEdge::Start);
        assert_eq!(t.advance(true),  GestureEdge::Continue);
        assert_eq!(t.advance(false), GestureEdge::End);
        assert_eq!(t.state(), GestureState::Idle);
    }
}
