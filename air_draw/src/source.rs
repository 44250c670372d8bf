//! Landmark sources: LeapMotion hardware or mouse simulation.
//!
//! Every source runs on its own thread and deposits one [`HandFrame`] per
//! poll into a shared [`FrameSlot`].  The render loop takes at most one frame
//! per tick, so a slow tick never builds a backlog.  Consumers don't need to
//! know whether frames came from real hardware or the simulator.

use std::sync::mpsc::{Receiver, TryRecvError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::{debug, info};

use stroke_pipeline::landmark::{Finger, LANDMARK_COUNT, THUMB_CMC, THUMB_TIP, WRIST};
use stroke_pipeline::{FrameSlot, HandFrame, HandPose, Landmark, Point, Viewport};

// ════════════════════════════════════════════════════════════════════════════
// LandmarkSource trait
// ════════════════════════════════════════════════════════════════════════════

/// Anything that can produce hand frames.
pub trait LandmarkSource: Send + 'static {
    /// Produce frames until the slot is closed or the input ends.
    fn run(self: Box<Self>, slot: Arc<FrameSlot<HandFrame>>);
}

/// Spawn a landmark source on its own thread.
pub fn spawn_landmark_source<S: LandmarkSource>(
    source: S,
    slot: Arc<FrameSlot<HandFrame>>,
) -> std::io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("landmark-source".into())
        .spawn(move || Box::new(source).run(slot))
}

// ════════════════════════════════════════════════════════════════════════════
// Simulated hand
// ════════════════════════════════════════════════════════════════════════════

/// Vertical spacing between successive joints of a simulated finger, in
/// normalized image units.
const JOINT_STEP: f32 = 0.04;

/// Horizontal spacing between simulated fingers.
const FINGER_SPREAD: f32 = 0.025;

/// Build a right hand whose index fingertip sits at `pointer` (canvas
/// pixels).  With `pen_down` only the index finger is extended; otherwise
/// the hand is an open palm with all four fingers extended.
pub fn pose_for_pointer(pointer: Point, viewport: Viewport, pen_down: bool) -> HandPose {
    let tip_x = pointer.x / viewport.width;
    let tip_y = pointer.y / viewport.height;
    let mut lm = [Landmark::default(); LANDMARK_COUNT];

    // Index knuckle sits three joints below the tip.
    let knuckle_y = tip_y + 3.0 * JOINT_STEP;
    lm[WRIST] = Landmark::new(tip_x + FINGER_SPREAD, knuckle_y + 3.0 * JOINT_STEP);

    // Thumb off to the side; never classified.
    for (k, joint) in lm[THUMB_CMC..=THUMB_TIP].iter_mut().enumerate() {
        let k = (k + 1) as f32;
        *joint = Landmark::new(tip_x - FINGER_SPREAD * k, knuckle_y + JOINT_STEP * (2.0 - k * 0.5));
    }

    for (i, finger) in Finger::ALL.iter().enumerate() {
        let (tip, pip, mcp) = finger.joints();
        let dip = tip - 1;
        let x = tip_x + FINGER_SPREAD * i as f32;
        let extended = !pen_down || *finger == Finger::Index;
        lm[mcp] = Landmark::new(x, knuckle_y);
        if extended {
            lm[pip] = Landmark::new(x, knuckle_y - JOINT_STEP);
            lm[dip] = Landmark::new(x, knuckle_y - 2.0 * JOINT_STEP);
            lm[tip] = Landmark::new(x, knuckle_y - 3.0 * JOINT_STEP);
        } else {
            // Curled: the tip folds back below the middle joint.
            lm[pip] = Landmark::new(x, knuckle_y - JOINT_STEP * 0.5);
            lm[dip] = Landmark::new(x, knuckle_y);
            lm[tip] = Landmark::new(x, knuckle_y + JOINT_STEP * 0.5);
        }
    }

    HandPose::new(lm)
}

/// Raw input event from the viewer window.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SimInput {
    /// Pointer moved to canvas pixel position.
    Pointer(Point),
    PenDown,
    PenUp,
    /// Toggle whether a hand is in view at all.
    ToggleHand,
    Quit,
}

/// Simulated hand state driven by [`SimInput`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimHand {
    pub pointer:  Point,
    pub pen_down: bool,
    pub visible:  bool,
}

impl SimHand {
    pub fn new(viewport: Viewport) -> Self {
        SimHand {
            pointer:  Point::new(viewport.width * 0.5, viewport.height * 0.5),
            pen_down: false,
            visible:  true,
        }
    }

    /// Apply one input.  Returns `false` on [`SimInput::Quit`].
    pub fn apply(&mut self, input: SimInput) -> bool {
        match input {
            SimInput::Pointer(p) => self.pointer = p,
            SimInput::PenDown    => self.pen_down = true,
            SimInput::PenUp      => self.pen_down = false,
            SimInput::ToggleHand => {
                self.visible = !self.visible;
                debug!(visible = self.visible, "simulated hand toggled");
            }
            SimInput::Quit => return false,
        }
        true
    }

    pub fn frame(&self, viewport: Viewport) -> HandFrame {
        self.visible.then(|| pose_for_pointer(self.pointer, viewport, self.pen_down))
    }
}

/// Landmark source driven by [`SimInput`] events from the viewer window.
///
/// The window sends pointer and key events here; this thread turns them into
/// hand frames at a fixed rate, the way a camera would.  This decouples the
/// window event loop from landmark generation.
pub struct SimLandmarkSource {
    pub rx:       Receiver<SimInput>,
    pub viewport: Viewport,
    pub period:   Duration,
}

impl SimLandmarkSource {
    pub fn new(rx: Receiver<SimInput>, viewport: Viewport, hz: u32) -> Self {
        SimLandmarkSource {
            rx,
            viewport,
            period: Duration::from_secs_f64(1.0 / f64::from(hz.max(1))),
        }
    }
}

impl LandmarkSource for SimLandmarkSource {
    fn run(self: Box<Self>, slot: Arc<FrameSlot<HandFrame>>) {
        info!(period_ms = self.period.as_millis() as u64, "simulated landmark source started");
        let mut hand = SimHand::new(self.viewport);
        let mut next = Instant::now();

        'frames: while !slot.is_closed() {
            loop {
                match self.rx.try_recv() {
                    Ok(input) => {
                        if !hand.apply(input) {
                            break 'frames;
                        }
                    }
                    Err(TryRecvError::Empty)        => break,
                    Err(TryRecvError::Disconnected) => break 'frames,
                }
            }

            slot.offer(hand.frame(self.viewport));

            next += self.period;
            let now = Instant::now();
            if next > now {
                thread::sleep(next - now);
            } else {
                next = now;
            }
        }

        slot.close();
        info!(coalesced = slot.coalesced(), "simulated landmark source stopped");
    }
}

// ════════════════════════════════════════════════════════════════════════════
// LeapLandmarkSource: real hardware (feature = "leap")
// ════════════════════════════════════════════════════════════════════════════

/// Landmark source backed by a LeapMotion controller.
///
/// Requires the `leap` feature flag and the LeapC shared library installed.
///
/// The first tracked hand's bones are mapped into the 21-point layout: for
/// each digit (thumb first) the metacarpal end, proximal end, intermediate
/// end and distal end become the four landmarks of that finger.  Positions
/// in millimetres are projected onto the controller's x/y plane and
/// normalized into a box above the device, with y flipped so "up" is
/// smaller, matching image space.
#[cfg(feature = "leap")]
pub struct LeapLandmarkSource {
    /// Half-width of the tracked box, mm.
    pub half_width: f32,
    /// Lower and upper height of the tracked box above the device, mm.
    pub floor:      f32,
    pub ceiling:    f32,
}

#[cfg(feature = "leap")]
impl Default for LeapLandmarkSource {
    fn default() -> Self {
        LeapLandmarkSource { half_width: 200.0, floor: 80.0, ceiling: 480.0 }
    }
}

#[cfg(feature = "leap")]
impl LeapLandmarkSource {
    fn normalize(&self, x: f32, y: f32) -> Landmark {
        let nx = (x + self.half_width) / (2.0 * self.half_width);
        let ny = 1.0 - (y - self.floor) / (self.ceiling - self.floor);
        Landmark::new(nx, ny)
    }

    fn pose(&self, hand: &leaprs::Hand) -> Option<HandPose> {
        let digits: Vec<_> = hand.digits().collect();
        if digits.len() < 5 {
            return None;
        }
        let palm = hand.palm().position();
        let mut lm = [Landmark::default(); LANDMARK_COUNT];
        lm[WRIST] = self.normalize(palm.x, palm.y - 60.0);
        for (d, digit) in digits.iter().take(5).enumerate() {
            let base = 1 + 4 * d;
            let joints = [
                digit.metacarpal().next_joint(),
                digit.proximal().next_joint(),
                digit.intermediate().next_joint(),
                digit.distal().next_joint(),
            ];
            for (k, j) in joints.iter().enumerate() {
                let mut l = self.normalize(j.x, j.y);
                l.z = Some(j.z);
                lm[base + k] = l;
            }
        }
        Some(HandPose::new(lm))
    }
}

#[cfg(feature = "leap")]
impl LandmarkSource for LeapLandmarkSource {
    fn run(self: Box<Self>, slot: Arc<FrameSlot<HandFrame>>) {
        use leaprs::*;

        let mut connection = match Connection::create(ConnectionConfig::default()) {
            Ok(c)  => c,
            Err(e) => {
                tracing::error!(error = ?e, "failed to create LeapC connection");
                slot.close();
                return;
            }
        };
        if let Err(e) = connection.open() {
            tracing::error!(error = ?e, "failed to open LeapMotion device");
            slot.close();
            return;
        }
        info!("LeapMotion landmark source started");

        while !slot.is_closed() {
            let msg = match connection.poll(100) {
                Ok(m)  => m,
                Err(_) => continue,
            };
            if let Event::Tracking(frame) = msg.event() {
                let pose = frame.hands().find_map(|h| self.pose(&h));
                slot.offer(pose);
            }
        }
        info!(coalesced = slot.coalesced(), "LeapMotion landmark source stopped");
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::sync::mpsc;
    use stroke_pipeline::gesture::{classify, finger_extended};

    const VIEW: Viewport = Viewport::new(800.0, 600.0);

    #[test]
    fn pen_down_pose_draws_at_pointer() {
        let pose = pose_for_pointer(Point::new(200.0, 150.0), VIEW, true);
        let class = classify(Some(&pose), VIEW);
        assert!(class.drawing);
        let tip = class.fingertip.unwrap();
        assert_relative_eq!(tip.x, 200.0, epsilon = 1e-3);
        assert_relative_eq!(tip.y, 150.0, epsilon = 1e-3);
    }

    #[test]
    fn pen_up_pose_is_open_palm() {
        let pose = pose_for_pointer(Point::new(400.0, 300.0), VIEW, false);
        for f in Finger::ALL {
            assert!(finger_extended(&pose, f), "{:?}", f);
        }
        assert!(!classify(Some(&pose), VIEW).drawing);
    }

    #[test]
    fn hidden_hand_yields_no_frame() {
        let mut hand = SimHand::new(VIEW);
        assert!(hand.frame(VIEW).is_some());
        hand.apply(SimInput::ToggleHand);
        assert!(hand.frame(VIEW).is_none());
        assert!(!hand.apply(SimInput::Quit));
    }

    #[test]
    fn sim_source_stops_on_quit() {
        let (tx, rx) = mpsc::channel();
        let slot = Arc::new(FrameSlot::new());
        let source = SimLandmarkSource::new(rx, VIEW, 500);
        let handle = spawn_landmark_source(source, Arc::clone(&slot)).unwrap();

        tx.send(SimInput::Pointer(Point::new(100.0, 100.0))).unwrap();
        tx.send(SimInput::PenDown).unwrap();
        tx.send(SimInput::Quit).unwrap();
        handle.join().unwrap();

        assert!(slot.is_closed());
    }

    #[test]
    fn sim_source_stops_when_slot_closed() {
        let (_tx, rx) = mpsc::channel();
        let slot = Arc::new(FrameSlot::new());
        let handle = spawn_landmark_source(SimLandmarkSource::new(rx, VIEW, 500), Arc::clone(&slot)).unwrap();
        while slot.offered() == 0 {
            thread::yield_now();
        }
        slot.close();
        handle.join().unwrap();
        assert!(matches!(slot.take(), Some(Some(_))));
    }
}
