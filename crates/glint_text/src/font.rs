//! Font rasterization seam
//!
//! The atlas consumes rasterization through the [`FontSource`] capability
//! rather than a concrete font library. The protocol is stateful in the
//! way font engines are: set a pixel size, load a glyph by index, then
//! render the loaded glyph to a bitmap.
//!
//! [`SwashFace`] is the production implementation, rasterizing with swash.
//! Rasterization is a pure function of `(face, glyph, pixel size)`; no
//! bitmap is cached here - placement caching belongs to the atlas.

use swash::scale::{Render, ScaleContext, Source, StrikeWith};
use swash::zeno::Format;

use crate::{Result, TextError};

/// Pixel format of a rasterized glyph bitmap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlyphFormat {
    /// 1-bit-per-pixel, row-packed MSB-first; `pitch` bytes per row. The
    /// atlas unpacks this to full-byte intensity when blitting.
    Mono,
    /// 8-bit alpha, one byte per pixel.
    Alpha,
}

/// Placement metrics for a loaded glyph
#[derive(Debug, Clone, Copy, Default)]
pub struct GlyphMetrics {
    /// Offset from the pen position to the bitmap's left edge.
    pub bearing_x: i16,
    /// Offset from the baseline to the bitmap's top edge.
    pub bearing_y: i16,
    /// Horizontal advance to the next pen position.
    pub advance: u16,
}

/// A rasterized glyph bitmap
#[derive(Debug, Clone)]
pub struct GlyphBitmap {
    pub width: u32,
    pub height: u32,
    /// Bytes per row of `data`.
    pub pitch: usize,
    pub data: Vec<u8>,
    pub format: GlyphFormat,
}

impl GlyphBitmap {
    /// Empty bitmaps (whitespace) carry metrics but no ink.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Opaque rasterization capability consumed by the atlas.
///
/// Implementations are free to back this with any font engine; the atlas
/// only relies on the load-then-render protocol and on
/// [`glyph_index`](Self::glyph_index) returning `None` for characters the
/// face has no mapping for.
pub trait FontSource {
    /// Set the rasterization pixel size for subsequent loads.
    fn set_pixel_size(&mut self, px: u32) -> Result<()>;

    /// Glyph index for a character, or `None` when the face has no mapping.
    fn glyph_index(&self, ch: char) -> Option<u16>;

    /// Load the glyph with the given index, making it current.
    fn load_glyph(&mut self, index: u16) -> Result<GlyphMetrics>;

    /// Render the current glyph at the current pixel size.
    fn render_bitmap(&mut self) -> Result<GlyphBitmap>;
}

/// Font face rasterizing through swash.
pub struct SwashFace {
    data: Vec<u8>,
    face_index: u32,
    scale_context: ScaleContext,
    pixel_size: u32,
    current: Option<GlyphBitmap>,
}

impl SwashFace {
    /// Create a face from raw font bytes (TTF/OTF), using the first face
    /// in a collection.
    pub fn from_data(data: Vec<u8>) -> Result<Self> {
        // Validate up front so later calls cannot fail on bad data.
        swash::FontRef::from_index(&data, 0).ok_or(TextError::InvalidFontData)?;
        Ok(Self {
            data,
            face_index: 0,
            scale_context: ScaleContext::new(),
            pixel_size: 16,
            current: None,
        })
    }
}

impl FontSource for SwashFace {
    fn set_pixel_size(&mut self, px: u32) -> Result<()> {
        if px == 0 {
            return Err(TextError::InvalidConfig(
                "pixel size must be non-zero".into(),
            ));
        }
        if px != self.pixel_size {
            self.pixel_size = px;
            self.current = None;
        }
        Ok(())
    }

    fn glyph_index(&self, ch: char) -> Option<u16> {
        let font = swash::FontRef::from_index(&self.data, self.face_index as usize)?;
        let index = font.charmap().map(ch);
        // Index 0 is .notdef: the face has no mapping for this character.
        (index != 0).then_some(index)
    }

    fn load_glyph(&mut self, index: u16) -> Result<GlyphMetrics> {
        let font = swash::FontRef::from_index(&self.data, self.face_index as usize)
            .ok_or(TextError::InvalidFontData)?;

        let font_metrics = font.metrics(&[]);
        let glyph_metrics = font.glyph_metrics(&[]);
        let scale = self.pixel_size as f32 / font_metrics.units_per_em as f32;
        let advance = glyph_metrics.advance_width(index) * scale;

        let mut scaler = self
            .scale_context
            .builder(font)
            .size(self.pixel_size as f32)
            .build();
        let mut render = Render::new(&[
            Source::ColorOutline(0),
            Source::ColorBitmap(StrikeWith::BestFit),
            Source::Outline,
        ]);
        render.format(Format::Alpha);

        let (bitmap, bearing_x, bearing_y) = match render.render(&mut scaler, index) {
            Some(image) => {
                let width = image.placement.width;
                let height = image.placement.height;
                let bitmap = GlyphBitmap {
                    width,
                    height,
                    pitch: width as usize,
                    data: image.data,
                    format: GlyphFormat::Alpha,
                };
                (
                    bitmap,
                    image.placement.left as i16,
                    image.placement.top as i16,
                )
            }
            // No outline (e.g. space): metrics only.
            None => (
                GlyphBitmap {
                    width: 0,
                    height: 0,
                    pitch: 0,
                    data: Vec::new(),
                    format: GlyphFormat::Alpha,
                },
                0,
                0,
            ),
        };

        self.current = Some(bitmap);
        Ok(GlyphMetrics {
            bearing_x,
            bearing_y,
            advance: advance.round() as u16,
        })
    }

    fn render_bitmap(&mut self) -> Result<GlyphBitmap> {
        self.current.take().ok_or(TextError::GlyphNotLoaded)
    }
}

/// Deterministic in-memory face for tests: characters map to fixed-size
/// bitmaps, optionally with an exact mono bit pattern.
#[cfg(test)]
pub struct SyntheticFace {
    glyphs: Vec<SyntheticGlyph>,
    current: Option<usize>,
    rasterize_calls: usize,
}

#[cfg(test)]
struct SyntheticGlyph {
    ch: char,
    width: u32,
    height: u32,
    metrics: GlyphMetrics,
    mono_bits: Option<Vec<u8>>,
}

#[cfg(test)]
impl SyntheticFace {
    pub fn new(glyphs: &[(char, u32, u32)]) -> Self {
        Self {
            glyphs: glyphs
                .iter()
                .map(|&(ch, width, height)| SyntheticGlyph {
                    ch,
                    width,
                    height,
                    metrics: GlyphMetrics::default(),
                    mono_bits: None,
                })
                .collect(),
            current: None,
            rasterize_calls: 0,
        }
    }

    pub fn with_mono_pattern(ch: char, width: u32, height: u32, bits: Vec<u8>) -> Self {
        Self {
            glyphs: vec![SyntheticGlyph {
                ch,
                width,
                height,
                metrics: GlyphMetrics::default(),
                mono_bits: Some(bits),
            }],
            current: None,
            rasterize_calls: 0,
        }
    }

    pub fn set_metrics(&mut self, ch: char, metrics: GlyphMetrics) {
        if let Some(glyph) = self.glyphs.iter_mut().find(|glyph| glyph.ch == ch) {
            glyph.metrics = metrics;
        }
    }

    pub fn rasterize_calls(&self) -> usize {
        self.rasterize_calls
    }
}

#[cfg(test)]
impl FontSource for SyntheticFace {
    fn set_pixel_size(&mut self, px: u32) -> Result<()> {
        if px == 0 {
            return Err(TextError::InvalidConfig(
                "pixel size must be non-zero".into(),
            ));
        }
        Ok(())
    }

    fn glyph_index(&self, ch: char) -> Option<u16> {
        self.glyphs
            .iter()
            .position(|glyph| glyph.ch == ch)
            .map(|position| position as u16)
    }

    fn load_glyph(&mut self, index: u16) -> Result<GlyphMetrics> {
        let glyph = self
            .glyphs
            .get(index as usize)
            .ok_or(TextError::GlyphNotLoaded)?;
        self.current = Some(index as usize);
        Ok(glyph.metrics)
    }

    fn render_bitmap(&mut self) -> Result<GlyphBitmap> {
        let index = self.current.take().ok_or(TextError::GlyphNotLoaded)?;
        let glyph = &self.glyphs[index];
        self.rasterize_calls += 1;
        Ok(match &glyph.mono_bits {
            Some(bits) => GlyphBitmap {
                width: glyph.width,
                height: glyph.height,
                pitch: (glyph.width as usize).div_ceil(8),
                data: bits.clone(),
                format: GlyphFormat::Mono,
            },
            None => GlyphBitmap {
                width: glyph.width,
                height: glyph.height,
                pitch: glyph.width as usize,
                data: vec![255; (glyph.width * glyph.height) as usize],
                format: GlyphFormat::Alpha,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn garbage_font_data_is_rejected() {
        assert!(matches!(
            SwashFace::from_data(vec![0, 1, 2, 3]),
            Err(TextError::InvalidFontData)
        ));
    }

    #[test]
    fn empty_bitmap_reports_empty() {
        let bitmap = GlyphBitmap {
            width: 0,
            height: 0,
            pitch: 0,
            data: Vec::new(),
            format: GlyphFormat::Alpha,
        };
        assert!(bitmap.is_empty());
    }

    #[test]
    fn synthetic_face_requires_load_before_render() {
        let mut face = SyntheticFace::new(&[('a', 4, 4)]);
        assert!(matches!(
            face.render_bitmap(),
            Err(TextError::GlyphNotLoaded)
        ));
    }

    #[test]
    fn synthetic_face_maps_only_known_characters() {
        let face = SyntheticFace::new(&[('a', 4, 4), ('b', 2, 2)]);
        assert_eq!(face.glyph_index('a'), Some(0));
        assert_eq!(face.glyph_index('b'), Some(1));
        assert_eq!(face.glyph_index('c'), None);
    }
}
