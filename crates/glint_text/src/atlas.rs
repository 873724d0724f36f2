//! Glyph atlas pages with replacement on exhaustion
//!
//! The atlas owns one single-channel pixel page and the packer that fills
//! it. When a glyph no longer fits, the page and packer are discarded
//! wholesale and replaced by fresh ones; every cached entry for the old
//! page becomes stale at that instant and the caller is told through the
//! `new_page` flag that any GPU-side texture must be re-uploaded.
//!
//! The atlas must only be touched from the thread that owns the rendering
//! context. That discipline is established by draining the command queue on
//! that thread, not by a lock here.

use lru::LruCache;
use std::num::NonZeroUsize;

use crate::font::{FontSource, GlyphBitmap, GlyphFormat};
use crate::packer::RectPacker;
use crate::{Result, TextError};

/// Maximum number of glyph entries kept in the placement cache.
const GLYPH_CACHE_CAPACITY: usize = 2048;

/// Identifier of an atlas page. Replacing the page mints a new identifier;
/// entries carrying an old identifier are stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageId(u32);

impl PageId {
    pub fn raw(self) -> u32 {
        self.0
    }
}

/// Location of a packed bitmap within a page's coordinate space.
///
/// Never mutated after allocation; consumed as texture coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AtlasRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl AtlasRegion {
    /// Normalized UV bounds `[u_min, v_min, u_max, v_max]` for sampling.
    pub fn uv_bounds(&self, atlas_width: u32, atlas_height: u32) -> [f32; 4] {
        let w = atlas_width as f32;
        let h = atlas_height as f32;
        [
            self.x as f32 / w,
            self.y as f32 / h,
            (self.x + self.width) as f32 / w,
            (self.y + self.height) as f32 / h,
        ]
    }
}

/// The mapping a renderer needs to draw a character: where its bitmap lives
/// and how to place it relative to the pen position.
///
/// Created on first successful load, immutable afterward, and invalidated
/// en masse when its page is replaced.
#[derive(Debug, Clone, Copy)]
pub struct GlyphEntry {
    pub ch: char,
    pub region: AtlasRegion,
    pub page: PageId,
    pub bearing_x: i16,
    pub bearing_y: i16,
    pub advance: u16,
}

/// Result of a successful glyph load.
#[derive(Debug, Clone, Copy)]
pub struct LoadedGlyph {
    pub entry: GlyphEntry,
    /// True exactly on the request that created or replaced the page.
    /// Cached entries referencing the previous page are stale and the
    /// GPU-side texture must be recreated wholesale.
    pub new_page: bool,
}

/// Atlas configuration, fixed at construction.
#[derive(Debug, Clone, Copy)]
pub struct AtlasConfig {
    /// Side length of the square page. Must exceed the largest expected
    /// glyph dimension (plus padding).
    pub page_size: u32,
    /// Clear border kept around every packed bitmap.
    pub padding: u32,
    /// Rasterization pixel size handed to the font source.
    pub base_px: u32,
}

impl Default for AtlasConfig {
    fn default() -> Self {
        Self {
            page_size: 1024,
            padding: 1,
            base_px: 16,
        }
    }
}

impl AtlasConfig {
    fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            return Err(TextError::InvalidConfig("page_size must be non-zero".into()));
        }
        if self.base_px == 0 {
            return Err(TextError::InvalidConfig("base_px must be non-zero".into()));
        }
        if self.padding >= self.page_size / 2 {
            return Err(TextError::InvalidConfig(format!(
                "padding {} leaves no usable area on a {} page",
                self.padding, self.page_size
            )));
        }
        Ok(())
    }
}

/// One atlas page: a zero-initialized single-channel buffer plus the packer
/// that allocates out of it.
struct Page {
    id: PageId,
    size: u32,
    pixels: Vec<u8>,
    packer: RectPacker,
    dirty: bool,
}

/// Glyph atlas manager.
///
/// Page lifecycle: `Empty` (no page allocated) until the first load, then
/// `Active`; a failed pack marks the page `Exhausted` and it is replaced,
/// never grown. Replaced pages are discarded entirely - their packed
/// regions are not salvaged.
pub struct GlyphAtlas {
    config: AtlasConfig,
    page: Option<Page>,
    next_page: u32,
    cache: LruCache<(u32, char), GlyphEntry>,
}

impl GlyphAtlas {
    pub fn new(config: AtlasConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            page: None,
            next_page: 0,
            cache: LruCache::new(
                NonZeroUsize::new(GLYPH_CACHE_CAPACITY).expect("capacity constant is non-zero"),
            ),
        })
    }

    pub fn config(&self) -> &AtlasConfig {
        &self.config
    }

    /// Identifier of the current page, or `None` before the first load.
    pub fn page_id(&self) -> Option<PageId> {
        self.page.as_ref().map(|page| page.id)
    }

    /// Pixel data of the current page for GPU upload.
    pub fn pixels(&self) -> Option<&[u8]> {
        self.page.as_ref().map(|page| page.pixels.as_slice())
    }

    /// Whether the current page has pixel data not yet uploaded.
    pub fn is_dirty(&self) -> bool {
        self.page.as_ref().is_some_and(|page| page.dirty)
    }

    /// Mark the current page clean after a GPU upload.
    pub fn mark_clean(&mut self) {
        if let Some(page) = &mut self.page {
            page.dirty = false;
        }
    }

    /// Load a glyph, rasterizing and packing it on first use.
    ///
    /// Returns `Ok(None)` when the face has no mapping for `ch` - an
    /// absent glyph is a normal outcome, not an error. `font_id` is the
    /// caller's stable identifier for the face and keys the entry cache.
    ///
    /// On pack failure the page is replaced and the pack retried exactly
    /// once; a second failure means the glyph itself exceeds the page and
    /// is reported as [`TextError::GlyphTooLarge`].
    pub fn load_glyph(
        &mut self,
        face: &mut dyn FontSource,
        font_id: u32,
        ch: char,
    ) -> Result<Option<LoadedGlyph>> {
        if let Some(entry) = self.cache.get(&(font_id, ch)) {
            return Ok(Some(LoadedGlyph {
                entry: *entry,
                new_page: false,
            }));
        }

        let Some(index) = face.glyph_index(ch) else {
            return Ok(None);
        };

        face.set_pixel_size(self.config.base_px)?;
        let metrics = face.load_glyph(index)?;
        let bitmap = face.render_bitmap()?;

        // Lazy page construction: the first request allocates.
        let mut new_page = false;
        if self.page.is_none() {
            self.allocate_page()?;
            new_page = true;
        }

        let region = if bitmap.is_empty() {
            // Whitespace and other ink-less glyphs occupy no atlas area.
            AtlasRegion {
                x: 0,
                y: 0,
                width: 0,
                height: 0,
            }
        } else {
            let offset = self.try_place(&bitmap);
            let (x, y) = match offset {
                Some(at) => at,
                None => {
                    // Exhausted: full replacement, then exactly one retry.
                    self.replace_page()?;
                    new_page = true;
                    self.try_place(&bitmap).ok_or(TextError::GlyphTooLarge {
                        width: bitmap.width,
                        height: bitmap.height,
                        page_size: self.config.page_size,
                    })?
                }
            };
            self.blit(&bitmap, x, y);
            AtlasRegion {
                x,
                y,
                width: bitmap.width,
                height: bitmap.height,
            }
        };

        let page = self
            .page
            .as_ref()
            .ok_or_else(|| TextError::InvalidConfig("page vanished during load".into()))?;
        let entry = GlyphEntry {
            ch,
            region,
            page: page.id,
            bearing_x: metrics.bearing_x,
            bearing_y: metrics.bearing_y,
            advance: metrics.advance,
        };
        self.cache.put((font_id, ch), entry);

        Ok(Some(LoadedGlyph { entry, new_page }))
    }

    fn try_place(&mut self, bitmap: &GlyphBitmap) -> Option<(u32, u32)> {
        let page = self.page.as_mut()?;
        page.packer
            .try_pack(bitmap.width, bitmap.height, self.config.padding)
    }

    fn allocate_page(&mut self) -> Result<()> {
        let size = self.config.page_size;
        let page = Page {
            id: PageId(self.next_page),
            size,
            pixels: vec![0; size as usize * size as usize],
            packer: RectPacker::new(size, size)?,
            dirty: false,
        };
        self.next_page += 1;
        self.page = Some(page);
        Ok(())
    }

    /// Discard the current page and packer and start over. Every cached
    /// entry references the dead page, so the cache is cleared en masse.
    fn replace_page(&mut self) -> Result<()> {
        let old = self.page_id();
        self.cache.clear();
        self.allocate_page()?;
        tracing::debug!(?old, new = ?self.page_id(), "atlas page exhausted; replaced");
        Ok(())
    }

    /// Copy a rasterized bitmap into the page at the packed offset.
    ///
    /// Mono bitmaps are 1-bit-per-pixel row-packed and are unpacked to
    /// full-byte intensity (0 or 255) on the way in; alpha bitmaps are
    /// copied row by row.
    fn blit(&mut self, bitmap: &GlyphBitmap, x: u32, y: u32) {
        let Some(page) = self.page.as_mut() else {
            return;
        };
        let stride = page.size as usize;
        for row in 0..bitmap.height as usize {
            let dst_start = (y as usize + row) * stride + x as usize;
            match bitmap.format {
                GlyphFormat::Mono => {
                    let src_row = &bitmap.data[row * bitmap.pitch..];
                    for col in 0..bitmap.width as usize {
                        let bits = src_row[col / 8];
                        let on = bits & (0x80 >> (col % 8)) != 0;
                        page.pixels[dst_start + col] = if on { 255 } else { 0 };
                    }
                }
                GlyphFormat::Alpha => {
                    let src_start = row * bitmap.pitch;
                    page.pixels[dst_start..dst_start + bitmap.width as usize]
                        .copy_from_slice(&bitmap.data[src_start..src_start + bitmap.width as usize]);
                }
            }
        }
        page.dirty = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::{GlyphMetrics, SyntheticFace};

    fn atlas(page_size: u32) -> GlyphAtlas {
        GlyphAtlas::new(AtlasConfig {
            page_size,
            padding: 1,
            base_px: 16,
        })
        .unwrap()
    }

    #[test]
    fn invalid_configs_are_fatal_at_construction() {
        assert!(GlyphAtlas::new(AtlasConfig {
            page_size: 0,
            ..Default::default()
        })
        .is_err());
        assert!(GlyphAtlas::new(AtlasConfig {
            base_px: 0,
            ..Default::default()
        })
        .is_err());
        assert!(GlyphAtlas::new(AtlasConfig {
            page_size: 64,
            padding: 32,
            base_px: 16,
        })
        .is_err());
    }

    #[test]
    fn page_is_lazy_until_first_load() {
        let mut atlas = atlas(512);
        assert_eq!(atlas.page_id(), None);
        assert!(atlas.pixels().is_none());

        let mut face = SyntheticFace::new(&[('a', 10, 10)]);
        let loaded = atlas.load_glyph(&mut face, 0, 'a').unwrap().unwrap();
        assert!(loaded.new_page, "first load allocates the page");
        assert_eq!(atlas.page_id(), Some(loaded.entry.page));
    }

    #[test]
    fn absent_mapping_is_a_normal_none() {
        let mut atlas = atlas(512);
        let mut face = SyntheticFace::new(&[('a', 10, 10)]);
        assert!(atlas.load_glyph(&mut face, 0, 'z').unwrap().is_none());
        // The miss did not allocate a page.
        assert_eq!(atlas.page_id(), None);
    }

    #[test]
    fn second_load_hits_the_cache() {
        let mut atlas = atlas(512);
        let mut face = SyntheticFace::new(&[('a', 10, 10)]);

        let first = atlas.load_glyph(&mut face, 0, 'a').unwrap().unwrap();
        let second = atlas.load_glyph(&mut face, 0, 'a').unwrap().unwrap();

        assert!(first.new_page);
        assert!(!second.new_page);
        assert_eq!(first.entry.region, second.entry.region);
        assert_eq!(face.rasterize_calls(), 1, "placements are cached, bitmaps not re-rendered");
    }

    #[test]
    fn exhaustion_replaces_the_page_and_retries_once() {
        let mut atlas = atlas(512);
        let mut face = SyntheticFace::new(&[('a', 10, 10), ('B', 500, 500)]);

        let small = atlas.load_glyph(&mut face, 0, 'a').unwrap().unwrap();
        assert!(small.new_page);
        assert_eq!((small.entry.region.x, small.entry.region.y), (1, 1));

        // 500x500 plus padding cannot fit next to the first glyph, so the
        // page is replaced and the pack retried on the fresh one.
        let big = atlas.load_glyph(&mut face, 0, 'B').unwrap().unwrap();
        assert!(big.new_page);
        assert_ne!(big.entry.page, small.entry.page);
        assert_eq!((big.entry.region.x, big.entry.region.y), (1, 1));

        // Replacement invalidated the old entries en masse: reloading 'a'
        // re-rasterizes instead of returning the stale placement.
        let calls_before = face.rasterize_calls();
        let again = atlas.load_glyph(&mut face, 0, 'a').unwrap().unwrap();
        assert_eq!(face.rasterize_calls(), calls_before + 1);
        assert_ne!(again.entry.page, small.entry.page);
    }

    #[test]
    fn oversized_glyph_is_a_fatal_sizing_error() {
        let mut atlas = atlas(64);
        let mut face = SyntheticFace::new(&[('X', 100, 100)]);
        let err = atlas.load_glyph(&mut face, 0, 'X').unwrap_err();
        assert!(matches!(err, TextError::GlyphTooLarge { .. }));
    }

    #[test]
    fn mono_bitmaps_unpack_to_byte_intensity() {
        let mut atlas = atlas(64);
        // 0b1010_0000 -> on, off, on for a 3x1 glyph.
        let mut face = SyntheticFace::with_mono_pattern('m', 3, 1, vec![0b1010_0000]);

        let loaded = atlas.load_glyph(&mut face, 0, 'm').unwrap().unwrap();
        let region = loaded.entry.region;
        let pixels = atlas.pixels().unwrap();

        let base = region.y as usize * 64 + region.x as usize;
        assert_eq!(&pixels[base..base + 3], &[255, 0, 255]);
    }

    #[test]
    fn ink_less_glyphs_occupy_no_area() {
        let mut atlas = atlas(512);
        let mut face = SyntheticFace::new(&[(' ', 0, 0)]);
        let loaded = atlas.load_glyph(&mut face, 0, ' ').unwrap().unwrap();
        assert_eq!(loaded.entry.region.width, 0);
        assert!(!atlas.is_dirty(), "nothing was blitted");
    }

    #[test]
    fn dirty_tracks_uploads() {
        let mut atlas = atlas(512);
        let mut face = SyntheticFace::new(&[('a', 10, 10)]);
        assert!(!atlas.is_dirty());
        atlas.load_glyph(&mut face, 0, 'a').unwrap();
        assert!(atlas.is_dirty());
        atlas.mark_clean();
        assert!(!atlas.is_dirty());
    }

    #[test]
    fn uv_bounds_normalize_the_region() {
        let region = AtlasRegion {
            x: 64,
            y: 128,
            width: 64,
            height: 64,
        };
        assert_eq!(region.uv_bounds(256, 256), [0.25, 0.5, 0.5, 0.75]);
    }

    #[test]
    fn metrics_flow_through_to_the_entry() {
        let mut atlas = atlas(512);
        let mut face = SyntheticFace::new(&[('a', 10, 10)]);
        face.set_metrics('a', GlyphMetrics {
            bearing_x: 2,
            bearing_y: 9,
            advance: 11,
        });
        let loaded = atlas.load_glyph(&mut face, 0, 'a').unwrap().unwrap();
        assert_eq!(loaded.entry.bearing_x, 2);
        assert_eq!(loaded.entry.bearing_y, 9);
        assert_eq!(loaded.entry.advance, 11);
    }
}
