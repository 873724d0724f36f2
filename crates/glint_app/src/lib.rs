//! Glint Application Kernel
//!
//! Ties the pieces together into a per-frame loop:
//!
//! - [`FrameDriver`]: pumps surface events, drains the command queue, runs
//!   the draw callback, presents
//! - [`RenderContext`]: the explicit context object owned by the driver -
//!   glyph atlas, installed font faces, viewport - mutated only on the
//!   owning thread
//! - [`loader`]: worker threads that read resources through a
//!   [`ContentSource`](glint_platform::ContentSource) and post install
//!   continuations back to the owning thread
//!
//! # Example
//!
//! ```rust
//! use glint_app::prelude::*;
//!
//! # fn main() -> glint_app::Result<()> {
//! let surface = HeadlessSurface::new(640, 480, 3)?;
//! let mut driver = FrameDriver::new(surface, AtlasConfig::default())?;
//!
//! let sender = driver.sender();
//! std::thread::spawn(move || {
//!     // Loaded results reach the context through the queue, never
//!     // directly from this thread.
//!     sender.post(|ctx| {
//!         let _ = ctx.viewport_size();
//!     });
//! });
//!
//! driver.run(|ctx| {
//!     // Draw with ctx.load_glyph(..) / ctx.atlas() here.
//!     let _ = ctx;
//! });
//! # Ok(())
//! # }
//! ```

mod context;
mod driver;
mod error;
pub mod loader;


pub use context::RenderContext;
pub use driver::{FrameControl, FrameDriver, FrameState};
pub use error::{GlintError, Result};

/// Install a `tracing` subscriber reading `RUST_LOG`-style filters from the
/// environment. Safe to call more than once; later calls are no-ops.
pub fn init_logging() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();
}

/// Prelude module - import everything commonly needed
pub mod prelude {
    pub use crate::context::RenderContext;
    pub use crate::driver::{FrameControl, FrameDriver, FrameState};
    pub use crate::error::{GlintError, Result};
    pub use crate::loader;

    pub use glint_core::{CommandQueue, CommandSender};
    pub use glint_platform::{ContentSource, DirContentSource, HeadlessSurface, PresentSurface};
    pub use glint_text::{AtlasConfig, FontSource, GlyphAtlas, LoadedGlyph, SwashFace};
}
