//! Deterministic headless surface for tests and CI
//!
//! Behaves like a window that closes itself after a fixed frame budget.
//! No GPU, no OS events; every observable (event pumps, presents) is a
//! counter the test can assert on.

use crate::surface::PresentSurface;
use crate::{PlatformError, Result};

/// In-process presentation surface with a fixed frame budget.
pub struct HeadlessSurface {
    width: u32,
    height: u32,
    frame_budget: u32,
    polled: u32,
    presented: u32,
    close_requested: bool,
}

impl HeadlessSurface {
    /// Create a surface that reports closing once `frame_budget` frames
    /// have pumped events.
    pub fn new(width: u32, height: u32, frame_budget: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(PlatformError::InvalidConfig(format!(
                "headless dimensions must be non-zero, got {width}x{height}"
            )));
        }
        Ok(Self {
            width,
            height,
            frame_budget,
            polled: 0,
            presented: 0,
            close_requested: false,
        })
    }

    /// Ask the surface to close, as a user closing the window would.
    pub fn request_close(&mut self) {
        self.close_requested = true;
    }

    /// Number of frames presented so far.
    pub fn presented(&self) -> u32 {
        self.presented
    }

    /// Number of event pumps so far.
    pub fn polled(&self) -> u32 {
        self.polled
    }
}

impl PresentSurface for HeadlessSurface {
    fn poll_events(&mut self) {
        self.polled += 1;
        if self.polled > self.frame_budget {
            self.close_requested = true;
        }
    }

    fn is_closing(&self) -> bool {
        self.close_requested
    }

    fn present(&mut self) {
        self.presented += 1;
    }

    fn viewport_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}
