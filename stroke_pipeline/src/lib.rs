//! # stroke_pipeline
//!
//! Turns a live stream of hand landmarks into 3D stroke tubes.  The user
//! "draws" by holding up the index finger alone; lowering it, opening the
//! hand or leaving the frame ends the stroke.
//!
//! ## Stages
//!
//! | Stage | Module | Kind |
//! |---|---|---|
//! | Gesture classifier | [`gesture`] | pure per frame, plus an edge tracker |
//! | Point stabilizer | [`stabilizer`] | stateful EMA, reset per stroke |
//! | Stroke recorder | [`recorder`] | stateful, min-distance filter |
//! | Curve synthesizer | [`curve`] | pure: downsample, Chaikin |
//! | Mesh builder | [`mesh`] | pure: Catmull-Rom, parallel-transport tube |
//!
//! [`DrawingSession`] runs the first three once per tick and reports to a
//! [`DrawingEvents`] sink.  [`MeshCache`] runs the last two for finished
//! strokes, keyed by `(stroke index, point count)`.  [`FrameSlot`] hands
//! frames from a producer thread to the tick loop, dropping stale ones.
//!
//! No window, device or file I/O lives in this crate.

pub mod cache;
pub mod config;
pub mod curve;
pub mod error;
pub mod frame;
pub mod gesture;
pub mod landmark;
pub mod mesh;
pub mod palette;
pub mod recorder;
pub mod schedule;
pub mod session;
pub mod spline;
pub mod stabilizer;

pub use cache::{MeshCache, MeshKey};
pub use config::{CurveConfig, MeshConfig, PipelineConfig, RecorderConfig, StabilizerConfig};
pub use curve::{synthesize, SmoothedCurve};
pub use error::{ConfigError, MeshError, MeshResult};
pub use gesture::{classify, Classification, GestureEdge, GestureState, GestureTracker};
pub use landmark::{HandFrame, HandPose, Landmark, Point, Viewport};
pub use mesh::{build, build_stroke_mesh, TubeMesh};
pub use palette::Rgb;
pub use recorder::{Stroke, StrokeCollection, StrokeRecorder};
pub use schedule::FrameSlot;
pub use session::{DrawingEvents, DrawingPoint, DrawingSession};
pub use stabilizer::PointStabilizer;
