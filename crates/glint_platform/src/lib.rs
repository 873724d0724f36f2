//! Platform abstraction for Glint
//!
//! The rendering kernel never talks to a windowing system, GPU swapchain,
//! or filesystem directly; it consumes the capabilities declared here:
//!
//! - [`PresentSurface`]: pump events, detect close, present a frame
//! - [`ContentSource`]: open a byte stream for a named resource
//!
//! Concrete windowing backends live outside this repository and implement
//! [`PresentSurface`] for their swapchain. [`HeadlessSurface`] is the
//! in-process implementation used by tests and CI.

pub mod content;
pub mod error;
pub mod headless;
pub mod surface;

pub use content::{ContentSource, DirContentSource};
pub use error::{PlatformError, Result};
pub use headless::HeadlessSurface;
pub use surface::PresentSurface;
