//! Input geometry: hand landmarks in normalized image space and points in
//! canvas pixel space.

// ════════════════════════════════════════════════════════════════════════════
// Landmark indices (21-point hand model)
// ════════════════════════════════════════════════════════════════════════════

pub const WRIST:      usize = 0;
pub const THUMB_CMC:  usize = 1;
pub const THUMB_MCP:  usize = 2;
pub const THUMB_IP:   usize = 3;
pub const THUMB_TIP:  usize = 4;
pub const INDEX_MCP:  usize = 5;
pub const INDEX_PIP:  usize = 6;
pub const INDEX_DIP:  usize = 7;
pub const INDEX_TIP:  usize = 8;
pub const MIDDLE_MCP: usize = 9;
pub const MIDDLE_PIP: usize = 10;
pub const MIDDLE_DIP: usize = 11;
pub const MIDDLE_TIP: usize = 12;
pub const RING_MCP:   usize = 13;
pub const RING_PIP:   usize = 14;
pub const RING_DIP:   usize = 15;
pub const RING_TIP:   usize = 16;
pub const PINKY_MCP:  usize = 17;
pub const PINKY_PIP:  usize = 18;
pub const PINKY_DIP:  usize = 19;
pub const PINKY_TIP:  usize = 20;

/// Number of landmarks in a [`HandPose`].
pub const LANDMARK_COUNT: usize = 21;

// ════════════════════════════════════════════════════════════════════════════
// Point / Viewport
// ════════════════════════════════════════════════════════════════════════════

/// A 2D coordinate in canvas pixel space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Point { x, y }
    }

    /// Squared Euclidean distance to `other`.
    pub fn distance_sq(self, other: Point) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    /// `self + t·(other − self)`.
    pub fn lerp(self, other: Point, t: f32) -> Point {
        Point {
            x: self.x + t * (other.x - self.x),
            y: self.y + t * (other.y - self.y),
        }
    }
}

/// Canvas pixel dimensions supplied with every tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width:  f32,
    pub height: f32,
}

impl Viewport {
    pub const fn new(width: f32, height: f32) -> Self {
        Viewport { width, height }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Landmark / HandPose
// ════════════════════════════════════════════════════════════════════════════

/// One tracked point on the hand, in normalized image coordinates
/// (`x`, `y` in `[0, 1]`, y growing downward).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    /// Relative depth, when the source provides one.
    pub z: Option<f32>,
}

impl Landmark {
    pub const fn new(x: f32, y: f32) -> Self {
        Landmark { x, y, z: None }
    }

    /// Scale into canvas pixel space.
    pub fn to_canvas(self, viewport: Viewport) -> Point {
        Point::new(self.x * viewport.width, self.y * viewport.height)
    }
}

/// The four non-thumb fingers considered by the gesture classifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Finger {
    Index,
    Middle,
    Ring,
    Pinky,
}

impl Finger {
    pub const ALL: [Finger; 4] = [Finger::Index, Finger::Middle, Finger::Ring, Finger::Pinky];

    /// `(tip, pip, mcp)` landmark indices.
    pub const fn joints(self) -> (usize, usize, usize) {
        match self {
            Finger::Index  => (INDEX_TIP,  INDEX_PIP,  INDEX_MCP),
            Finger::Middle => (MIDDLE_TIP, MIDDLE_PIP, MIDDLE_MCP),
            Finger::Ring   => (RING_TIP,   RING_PIP,   RING_MCP),
            Finger::Pinky  => (PINKY_TIP,  PINKY_PIP,  PINKY_MCP),
        }
    }
}

/// A single hand: 21 landmarks indexed by anatomical role.
#[derive(Clone, Debug, PartialEq)]
pub struct HandPose {
    pub landmarks: [Landmark; LANDMARK_COUNT],
}

impl HandPose {
    pub fn new(landmarks: [Landmark; LANDMARK_COUNT]) -> Self {
        HandPose { landmarks }
    }

    pub fn landmark(&self, index: usize) -> Landmark {
        self.landmarks[index]
    }
}

/// What the landmark source delivers each tick: zero or one hand.
pub type HandFrame = Option<HandPose>;

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
