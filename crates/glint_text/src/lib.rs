//! Glyph atlas management for the Glint rendering kernel
//!
//! This crate provides:
//! - Online rectangle bin packing (guillotine free-list allocator)
//! - Glyph atlas pages with replacement-on-exhaustion
//! - A font rasterization seam (`FontSource`) with a swash-backed
//!   implementation
//!
//! The atlas is mutated exclusively on the thread that owns the rendering
//! context; worker threads deliver work to that thread through
//! `glint_core::CommandQueue`.

pub mod atlas;
pub mod font;
pub mod packer;

pub use atlas::{AtlasConfig, AtlasRegion, GlyphAtlas, GlyphEntry, LoadedGlyph, PageId};
pub use font::{FontSource, GlyphBitmap, GlyphFormat, GlyphMetrics, SwashFace};
pub use packer::RectPacker;

use thiserror::Error;

/// Text rendering errors
#[derive(Error, Debug)]
pub enum TextError {
    /// Construction parameters violate a size relationship. Fatal; never
    /// recovered at runtime.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to load font: {0}")]
    FontLoad(String),

    #[error("invalid font data")]
    InvalidFontData,

    /// `render_bitmap` was called before `load_glyph` selected a glyph.
    #[error("no glyph loaded")]
    GlyphNotLoaded,

    /// A single glyph exceeds the atlas page even after replacement. The
    /// page side must be configured larger than the largest expected glyph.
    #[error("glyph {width}x{height} cannot fit a {page_size}x{page_size} atlas page")]
    GlyphTooLarge {
        width: u32,
        height: u32,
        page_size: u32,
    },
}

pub type Result<T> = std::result::Result<T, TextError>;
