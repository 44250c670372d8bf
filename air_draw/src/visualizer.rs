//! Viewer window using `minifb`.
//!
//! Layout (one canvas, back to front):
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │  committed stroke tubes (z-buffered, Lambert, bob + yaw)   │
//! │  live preview of the stroke in progress                    │
//! │  fingertip cursor                                          │
//! └───────────────────────────────────────────────────────────┘
//!   status → window title
//! ```
//!
//! The window also stands in for the camera in simulation mode: mouse and
//! key events are forwarded to the simulated landmark source as [`SimInput`].

use std::sync::mpsc::Sender;

use anyhow::{Context, Result};
use minifb::{Key, KeyRepeat, MouseButton, MouseMode, Window, WindowOptions};

use stroke_pipeline::Point;

use crate::source::SimInput;

pub const WINDOW_TITLE: &str = "Air Draw";

/// Shell-level request raised from the keyboard.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UiAction {
    None,
    Clear,
    Quit,
}

pub struct Visualizer {
    window:   Window,
    width:    usize,
    height:   usize,
    sim_tx:   Sender<SimInput>,
    pointer:  Option<Point>,
    pen_down: bool,
    title:    String,
}

impl Visualizer {
    pub fn new(width: usize, height: usize, target_fps: u32, sim_tx: Sender<SimInput>) -> Result<Self> {
        let mut window = Window::new(
            WINDOW_TITLE,
            width,
            height,
            WindowOptions { resize: false, ..WindowOptions::default() },
        )
        .context("Failed to open viewer window")?;

        window.set_target_fps(target_fps.max(1) as usize);

        Ok(Visualizer {
            window,
            width,
            height,
            sim_tx,
            pointer:  None,
            pen_down: false,
            title:    String::new(),
        })
    }

    /// Returns false when the window should close.
    pub fn is_open(&self) -> bool {
        self.window.is_open()
    }

    /// Forward mouse state to the simulated hand and read shell keys.
    ///
    /// Mouse left = pen down, H = toggle hand, C = clear, Q / Escape = quit.
    pub fn poll_input(&mut self) -> UiAction {
        if !self.window.is_open() {
            return UiAction::Quit;
        }

        let one_shot = |w: &Window, k: Key| w.is_key_pressed(k, KeyRepeat::No);

        if one_shot(&self.window, Key::Q) || one_shot(&self.window, Key::Escape) {
            let _ = self.sim_tx.send(SimInput::Quit);
            return UiAction::Quit;
        }
        if one_shot(&self.window, Key::H) {
            let _ = self.sim_tx.send(SimInput::ToggleHand);
        }

        if let Some((x, y)) = self.window.get_mouse_pos(MouseMode::Clamp) {
            let p = Point::new(x, y);
            if self.pointer != Some(p) {
                self.pointer = Some(p);
                let _ = self.sim_tx.send(SimInput::Pointer(p));
            }
        }

        let down = self.window.get_mouse_down(MouseButton::Left);
        if down != self.pen_down {
            self.pen_down = down;
            let _ = self.sim_tx.send(if down { SimInput::PenDown } else { SimInput::PenUp });
        }

        if one_shot(&self.window, Key::C) {
            return UiAction::Clear;
        }
        UiAction::None
    }

    /// Show `frame` (ARGB, `width × height`) and update the title.
    pub fn present(&mut self, frame: &[u32], status: &str) -> Result<()> {
        if status != self.title {
            self.title = status.to_owned();
            self.window.set_title(&format!("{WINDOW_TITLE} | {status}"));
        }
        self.window
            .update_with_buffer(frame, self.width, self.height)
            .context("Failed to present frame")
    }
}
