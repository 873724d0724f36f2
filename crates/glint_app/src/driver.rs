//! Frame driver
//!
//! The per-frame loop over an opaque presentation surface:
//!
//! ```text
//! begin_frame: poll events -> drain command queue -> closing?
//! draw:        caller's callback, synchronous, owning thread
//! end_frame:   present
//! ```
//!
//! Every command accepted before a frame's drain executes before that
//! frame's draw callback, which is the happens-before edge worker threads
//! rely on. Surface closure is the sole termination path; once observed,
//! the driver is terminal and performs no further side effects.

use glint_core::{CommandQueue, CommandSender};
use glint_platform::PresentSurface;
use glint_text::AtlasConfig;

use crate::context::RenderContext;
use crate::Result;

/// Driver lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameState {
    Running,
    /// Terminal: the surface reported closing. No further frames.
    Exiting,
}

/// What the caller should do after `begin_frame`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use = "an Exit result means the loop must stop"]
pub enum FrameControl {
    Continue,
    Exit,
}

/// Owns the presentation surface, the command queue, and the render
/// context. Constructed - and driven - on the owning thread.
pub struct FrameDriver<S: PresentSurface> {
    surface: S,
    queue: CommandQueue<RenderContext>,
    ctx: RenderContext,
    state: FrameState,
}

impl<S: PresentSurface> FrameDriver<S> {
    /// Build a driver over `surface`. Configuration errors are fatal here;
    /// nothing is recovered at frame time.
    pub fn new(surface: S, atlas_config: AtlasConfig) -> Result<Self> {
        let queue = CommandQueue::new();
        let ctx = RenderContext::new(atlas_config, queue.sender())?;
        Ok(Self {
            surface,
            queue,
            ctx,
            state: FrameState::Running,
        })
    }

    /// Producer handle for worker threads.
    pub fn sender(&self) -> CommandSender<RenderContext> {
        self.queue.sender()
    }

    pub fn state(&self) -> FrameState {
        self.state
    }

    pub fn context(&self) -> &RenderContext {
        &self.ctx
    }

    pub fn context_mut(&mut self) -> &mut RenderContext {
        &mut self.ctx
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Start a frame: pump surface events, drain the command queue, then
    /// check for shutdown.
    ///
    /// Returns [`FrameControl::Exit`] once the surface reports closing;
    /// from then on every call returns `Exit` immediately with no side
    /// effects.
    pub fn begin_frame(&mut self) -> FrameControl {
        if self.state == FrameState::Exiting {
            return FrameControl::Exit;
        }

        self.surface.poll_events();
        self.ctx.set_viewport(self.surface.viewport_size());
        self.queue.drain(&mut self.ctx);

        if self.surface.is_closing() {
            tracing::debug!("surface closing; frame driver exiting");
            self.state = FrameState::Exiting;
            return FrameControl::Exit;
        }
        FrameControl::Continue
    }

    /// Finish a frame: present. No queue draining happens here.
    pub fn end_frame(&mut self) {
        if self.state == FrameState::Exiting {
            return;
        }
        self.surface.present();
    }

    /// Drive frames until the surface closes. The draw callback runs
    /// synchronously on the owning thread between `begin_frame` and
    /// `end_frame`.
    pub fn run<F>(&mut self, mut draw: F)
    where
        F: FnMut(&mut RenderContext),
    {
        loop {
            match self.begin_frame() {
                FrameControl::Continue => {}
                FrameControl::Exit => break,
            }
            draw(&mut self.ctx);
            self.end_frame();
        }
    }
}
