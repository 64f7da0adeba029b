//! Real-face glyph backend (ttf-parser + tiny-skia)

use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::Arc;

use tiny_skia::{Color, FillRule, Paint, Pixmap, Transform};
use ttf_parser::{Face, OutlineBuilder};

use crate::font::GlyphBackend;
use crate::{Result, TextError};

type FaceData = Arc<dyn AsRef<[u8]> + Send + Sync>;

/// Glyph backend over a single parsed font face.
///
/// The face is re-parsed from the shared data on each glyph operation;
/// parsing only scans the table directory, and advances are memoized, so
/// steady-state layout does no repeated table walks.
pub struct FaceGlyphs {
    data: FaceData,
    index: u32,
    /// Pixels per font unit at the raster size
    scale: f32,
    ascent: f32,
    descent: f32,
    fallback_advance: f32,
    advances: RefCell<HashMap<char, f32>>,
}

impl std::fmt::Debug for FaceGlyphs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FaceGlyphs")
            .field("index", &self.index)
            .field("scale", &self.scale)
            .field("ascent", &self.ascent)
            .field("descent", &self.descent)
            .field("fallback_advance", &self.fallback_advance)
            .finish_non_exhaustive()
    }
}

impl FaceGlyphs {
    /// Wrap shared face data, sized so one em spans `size` raster pixels
    pub fn new(data: FaceData, index: u32, size: f32) -> Result<Self> {
        let bytes: &[u8] = (*data).as_ref();
        let face = Face::parse(bytes, index).map_err(|e| TextError::FontParsing(e.to_string()))?;
        let upem = face.units_per_em() as f32;
        let scale = size / upem;
        let ascent = face.ascender() as f32 * scale;
        let descent = -(face.descender() as f32) * scale;
        drop(face);
        Ok(Self {
            data,
            index,
            scale,
            ascent,
            descent,
            fallback_advance: size * 0.5,
            advances: RefCell::new(HashMap::new()),
        })
    }

    fn with_face<T>(&self, f: impl FnOnce(&Face) -> T) -> Option<T> {
        let bytes: &[u8] = (*self.data).as_ref();
        Face::parse(bytes, self.index).ok().map(|face| f(&face))
    }
}

impl GlyphBackend for FaceGlyphs {
    fn ascent(&self) -> f32 {
        self.ascent
    }

    fn descent(&self) -> f32 {
        self.descent
    }

    fn advance(&self, c: char) -> f32 {
        if let Some(&cached) = self.advances.borrow().get(&c) {
            return cached;
        }
        let advance = self
            .with_face(|face| {
                face.glyph_index(c)
                    .and_then(|glyph| face.glyph_hor_advance(glyph))
                    .map(|units| units as f32 * self.scale)
                    .unwrap_or(self.fallback_advance)
            })
            .unwrap_or(self.fallback_advance);
        self.advances.borrow_mut().insert(c, advance);
        advance
    }

    fn draw_glyph(&self, c: char, pen_x: f32, baseline: f32, fill: Color, canvas: &mut Pixmap) {
        self.with_face(|face| {
            let Some(glyph) = face.glyph_index(c) else {
                return;
            };
            let mut sink = OutlineSink::new(self.scale, pen_x, baseline);
            if face.outline_glyph(glyph, &mut sink).is_none() {
                return;
            }
            let Some(path) = sink.finish() else {
                return;
            };
            let mut paint = Paint::default();
            paint.set_color(fill);
            paint.anti_alias = true;
            canvas.fill_path(&path, &paint, FillRule::Winding, Transform::identity(), None);
        });
    }
}

/// Converts ttf-parser outlines to a tiny-skia path in canvas coordinates.
/// Font-unit y grows upward; canvas y grows downward, hence the flip
/// around the baseline.
struct OutlineSink {
    builder: tiny_skia::PathBuilder,
    scale: f32,
    pen_x: f32,
    baseline: f32,
}

impl OutlineSink {
    fn new(scale: f32, pen_x: f32, baseline: f32) -> Self {
        Self {
            builder: tiny_skia::PathBuilder::new(),
            scale,
            pen_x,
            baseline,
        }
    }

    fn tx(&self, x: f32) -> f32 {
        self.pen_x + x * self.scale
    }

    fn ty(&self, y: f32) -> f32 {
        self.baseline - y * self.scale
    }

    fn finish(self) -> Option<tiny_skia::Path> {
        self.builder.finish()
    }
}

impl OutlineBuilder for OutlineSink {
    fn move_to(&mut self, x: f32, y: f32) {
        self.builder.move_to(self.tx(x), self.ty(y));
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.builder.line_to(self.tx(x), self.ty(y));
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        self.builder
            .quad_to(self.tx(x1), self.ty(y1), self.tx(x), self.ty(y));
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        self.builder.cubic_to(
            self.tx(x1),
            self.ty(y1),
            self.tx(x2),
            self.ty(y2),
            self.tx(x),
            self.ty(y),
        );
    }

    fn close(&mut self) {
        self.builder.close();
    }
}
