//! # air_draw
//!
//! Draw in the air with an extended index finger: hand landmarks go through
//! [`stroke_pipeline`], the stroke in progress shows as a live 2D trace, and
//! every finished stroke becomes a shaded 3D tube.
//!
//! ## Gesture → Action mapping
//!
//! | Pose | Action |
//! |---|---|
//! | Index finger alone extended | Draw at the fingertip |
//! | Any other pose | Hover (cursor only) |
//! | Hand leaves view | End the stroke |
//!
//! ## Feature flags
//!
//! * default: **Simulation mode**, the mouse stands in for the hand.
//! * `leap`: **Hardware mode**, polls a real LeapMotion controller via LeapC.
//!
//! ### Simulation controls
//!
//! | Input | Effect |
//! |---|---|
//! | Left mouse button held | Index-only pose (draw) |
//! | Left mouse button released | Open palm (hover) |
//! | `H` | Hide / show the hand |
//! | `C` | Clear all strokes |
//! | `Q` / `Escape` | Quit |

pub mod app;
pub mod config;
pub mod mesher;
pub mod preview;
pub mod render;
pub mod source;
pub mod visualizer;
