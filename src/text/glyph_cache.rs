use std::path::{Path, PathBuf};

use crate::foundation::{
    core::{Rect, Rgba8},
    error::{SlideError, SlideResult},
};

/// Single-channel coverage bitmap plus metrics, as produced by a rasterizer.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RasterGlyph {
    pub width: u32,
    pub height: u32,
    /// Row-major 8-bit coverage, `width * height` bytes.
    pub coverage: Vec<u8>,
    /// Offset from the pen position to the bitmap's left edge.
    pub bearing_x: i32,
    /// Offset from the baseline to the bitmap's top edge (y grows downward).
    pub bearing_y: i32,
    pub advance: i32,
}

/// Vertical font metrics at one pixel size. `descent` is negative below the baseline.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LineMetrics {
    pub ascent: f32,
    pub descent: f32,
    pub line_gap: f32,
}

impl LineMetrics {
    /// Baseline-to-baseline distance: `ascent - descent + line_gap`.
    pub fn vertical_advance(&self) -> i32 {
        (self.ascent - self.descent + self.line_gap).round() as i32
    }
}

/// A parsed font face that can rasterize codepoints.
pub trait FontFace {
    fn rasterize(&self, codepoint: char, px: f32) -> SlideResult<RasterGlyph>;

    fn line_metrics(&self, px: f32) -> SlideResult<LineMetrics>;
}

/// Turns raw font-file bytes into a [`FontFace`].
pub trait FontBackend {
    fn parse(&self, bytes: &[u8]) -> SlideResult<Box<dyn FontFace>>;
}

/// TrueType/OpenType rasterization via `fontdue`.
#[derive(Clone, Copy, Debug, Default)]
pub struct FontdueBackend;

impl FontBackend for FontdueBackend {
    fn parse(&self, bytes: &[u8]) -> SlideResult<Box<dyn FontFace>> {
        let font = fontdue::Font::from_bytes(bytes, fontdue::FontSettings::default())
            .map_err(|e| SlideError::asset(format!("parse font: {e}")))?;
        Ok(Box::new(FontdueFace(font)))
    }
}

struct FontdueFace(fontdue::Font);

impl FontFace for FontdueFace {
    fn rasterize(&self, codepoint: char, px: f32) -> SlideResult<RasterGlyph> {
        let (m, coverage) = self.0.rasterize(codepoint, px);
        let width = u32::try_from(m.width)
            .map_err(|_| SlideError::asset(format!("glyph {codepoint:?} too wide")))?;
        let height = u32::try_from(m.height)
            .map_err(|_| SlideError::asset(format!("glyph {codepoint:?} too tall")))?;

        Ok(RasterGlyph {
            width,
            height,
            coverage,
            bearing_x: m.xmin,
            bearing_y: -(height as i32 + m.ymin),
            advance: m.advance_width.round() as i32,
        })
    }

    fn line_metrics(&self, px: f32) -> SlideResult<LineMetrics> {
        let lm = self
            .0
            .horizontal_line_metrics(px)
            .ok_or_else(|| SlideError::asset("font has no horizontal line metrics"))?;
        Ok(LineMetrics {
            ascent: lm.ascent,
            descent: lm.descent,
            line_gap: lm.line_gap,
        })
    }
}

/// Cached rasterization of one (codepoint, pixel size) pair.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Glyph {
    pub codepoint: char,
    pub size: u32,
    pub width: u32,
    pub height: u32,
    pub bearing_x: i32,
    pub bearing_y: i32,
    pub advance: i32,
    /// White RGB with alpha = coverage.
    pub bitmap: Vec<Rgba8>,
}

impl Glyph {
    fn from_raster(codepoint: char, size: u32, r: RasterGlyph) -> SlideResult<Self> {
        let expected = (r.width as usize).saturating_mul(r.height as usize);
        if r.coverage.len() != expected {
            return Err(SlideError::asset(format!(
                "glyph {codepoint:?}@{size}px: bitmap has {} bytes, expected {expected}",
                r.coverage.len()
            )));
        }

        Ok(Self {
            codepoint,
            size,
            width: r.width,
            height: r.height,
            bearing_x: r.bearing_x,
            bearing_y: r.bearing_y,
            advance: r.advance,
            bitmap: r
                .coverage
                .into_iter()
                .map(|c| Rgba8::new(255, 255, 255, c))
                .collect(),
        })
    }

    pub fn extent(&self) -> Rect {
        Rect::extent(self.width, self.height)
    }
}

/// A loaded font: its bytes, parsed face and lazily grown glyph cache.
pub struct Font {
    name: String,
    path: PathBuf,
    bytes: Vec<u8>,
    face: Box<dyn FontFace>,
    glyphs: Vec<Glyph>,
    metrics: Vec<(u32, LineMetrics)>,
}

impl std::fmt::Debug for Font {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Font")
            .field("name", &self.name)
            .field("path", &self.path)
            .field("bytes_len", &self.bytes.len())
            .field("glyphs", &self.glyphs.len())
            .finish()
    }
}

impl Font {
    /// Read `path` and parse it with `backend`.
    pub fn load(name: &str, path: &Path, backend: &dyn FontBackend) -> SlideResult<Self> {
        let bytes = std::fs::read(path)
            .map_err(|e| SlideError::asset(format!("read font '{}': {e}", path.display())))?;
        Self::from_bytes(name, path, bytes, backend)
    }

    pub fn from_bytes(
        name: &str,
        path: &Path,
        bytes: Vec<u8>,
        backend: &dyn FontBackend,
    ) -> SlideResult<Self> {
        let face = backend
            .parse(&bytes)
            .map_err(|e| SlideError::asset(format!("font '{name}' ({}): {e}", path.display())))?;
        Ok(Self {
            name: name.to_owned(),
            path: path.to_owned(),
            bytes,
            face,
            glyphs: Vec::new(),
            metrics: Vec::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn glyph_count(&self) -> usize {
        self.glyphs.len()
    }

    /// Cached glyph for `(codepoint, size)`, rasterizing it on first use.
    pub fn get_glyph(&mut self, codepoint: char, size: u32) -> SlideResult<&Glyph> {
        if let Some(idx) = self
            .glyphs
            .iter()
            .position(|g| g.codepoint == codepoint && g.size == size)
        {
            return Ok(&self.glyphs[idx]);
        }

        let raster = self.face.rasterize(codepoint, size as f32)?;
        let glyph = Glyph::from_raster(codepoint, size, raster)?;
        // metrics travel with the first glyph of each size
        self.line_metrics(size)?;

        tracing::debug!(font = %self.name, ?codepoint, size, "rasterized glyph");
        self.glyphs.push(glyph);
        Ok(&self.glyphs[self.glyphs.len() - 1])
    }

    /// Vertical metrics at `size`, computed once per size.
    pub fn line_metrics(&mut self, size: u32) -> SlideResult<LineMetrics> {
        if let Some((_, m)) = self.metrics.iter().find(|(s, _)| *s == size) {
            return Ok(*m);
        }
        let m = self.face.line_metrics(size as f32)?;
        self.metrics.push((size, m));
        Ok(m)
    }

    /// Baseline-to-baseline distance at `size`.
    pub fn vertical_advance(&mut self, size: u32) -> SlideResult<i32> {
        Ok(self.line_metrics(size)?.vertical_advance())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/glyph_cache.rs"]
mod tests;
