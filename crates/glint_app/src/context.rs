//! Render context
//!
//! The explicit context object owned by the frame driver. Everything a
//! drained command or a draw callback may touch lives here: the glyph
//! atlas, the installed font faces, and the current viewport. The context
//! is mutated exclusively on the owning thread - queue discipline, not a
//! lock, guarantees single-writer access.

use rustc_hash::FxHashMap;

use glint_core::CommandSender;
use glint_text::{AtlasConfig, FontSource, GlyphAtlas, LoadedGlyph};

use crate::Result;

struct RegisteredFace {
    id: u32,
    face: Box<dyn FontSource + Send>,
}

/// Per-driver rendering state, passed to queue commands and the draw
/// callback.
pub struct RenderContext {
    atlas: GlyphAtlas,
    faces: FxHashMap<String, RegisteredFace>,
    next_font_id: u32,
    viewport: (u32, u32),
    sender: CommandSender<RenderContext>,
}

impl RenderContext {
    pub(crate) fn new(atlas_config: AtlasConfig, sender: CommandSender<RenderContext>) -> Result<Self> {
        Ok(Self {
            atlas: GlyphAtlas::new(atlas_config)?,
            faces: FxHashMap::default(),
            next_font_id: 0,
            viewport: (0, 0),
            sender,
        })
    }

    /// Install a loaded font face under a name, returning its stable id.
    /// Installing over an existing name replaces the face and mints a new
    /// id, so stale cached placements never alias the new face.
    pub fn install_face(&mut self, name: impl Into<String>, face: Box<dyn FontSource + Send>) -> u32 {
        let id = self.next_font_id;
        self.next_font_id += 1;
        let name = name.into();
        tracing::debug!(name = %name, id, "font face installed");
        self.faces.insert(name, RegisteredFace { id, face });
        id
    }

    /// Whether a face is installed under `name`.
    pub fn has_face(&self, name: &str) -> bool {
        self.faces.contains_key(name)
    }

    /// Load a glyph from a named face into the atlas.
    ///
    /// Returns `Ok(None)` when the face is not installed (it may still be
    /// loading) or has no mapping for `ch`; both are normal outcomes the
    /// renderer handles by drawing nothing.
    pub fn load_glyph(&mut self, face_name: &str, ch: char) -> Result<Option<LoadedGlyph>> {
        let Some(registered) = self.faces.get_mut(face_name) else {
            return Ok(None);
        };
        let loaded = self
            .atlas
            .load_glyph(registered.face.as_mut(), registered.id, ch)?;
        Ok(loaded)
    }

    pub fn atlas(&self) -> &GlyphAtlas {
        &self.atlas
    }

    pub fn atlas_mut(&mut self) -> &mut GlyphAtlas {
        &mut self.atlas
    }

    /// Handle for posting further cross-thread work; hand this to any
    /// component that needs it instead of reaching for global state.
    pub fn sender(&self) -> CommandSender<RenderContext> {
        self.sender.clone()
    }

    /// Drawable size as of the current frame's `begin_frame`.
    pub fn viewport_size(&self) -> (u32, u32) {
        self.viewport
    }

    pub(crate) fn set_viewport(&mut self, size: (u32, u32)) {
        self.viewport = size;
    }
}
