//! Presentation surface capability
//!
//! The frame driver owns exactly one surface and calls it only from the
//! owning thread. Everything behind this trait - window, swapchain, event
//! queue - is an external collaborator.

/// An opaque presentation surface.
pub trait PresentSurface {
    /// Pump pending OS/window events. Called at the top of every frame.
    fn poll_events(&mut self);

    /// Whether the surface has requested shutdown (window close or
    /// equivalent). Once true, stays true.
    fn is_closing(&self) -> bool;

    /// Present the rendered frame (swap-buffers equivalent).
    fn present(&mut self);

    /// Current drawable size in pixels.
    fn viewport_size(&self) -> (u32, u32);
}
