//! Synthetic fixed-advance glyph backend

use tiny_skia::{Color, FillRule, Paint, PathBuilder, Pixmap, Rect, Transform};

use crate::font::GlyphBackend;

/// Draws every visible codepoint as a solid box of fixed advance.
///
/// Stands in for a real face in tests and headless tools: layout, masking,
/// and compositing behave exactly as with [`FaceGlyphs`](crate::FaceGlyphs)
/// but need no font files and produce deterministic pixels.
#[derive(Debug, Clone, Copy)]
pub struct BoxGlyphs {
    advance: f32,
    ascent: f32,
    descent: f32,
}

impl BoxGlyphs {
    /// Metrics derived from a raster size, roughly matching a sans face
    pub fn new(size: f32) -> Self {
        Self {
            advance: size * 0.6,
            ascent: size * 0.8,
            descent: size * 0.2,
        }
    }

    /// Exact metrics, all in raster pixels
    pub fn with_metrics(advance: f32, ascent: f32, descent: f32) -> Self {
        Self {
            advance,
            ascent,
            descent,
        }
    }
}

impl GlyphBackend for BoxGlyphs {
    fn ascent(&self) -> f32 {
        self.ascent
    }

    fn descent(&self) -> f32 {
        self.descent
    }

    fn advance(&self, _c: char) -> f32 {
        self.advance
    }

    fn draw_glyph(&self, _c: char, pen_x: f32, baseline: f32, fill: Color, canvas: &mut Pixmap) {
        let width = (self.advance * 0.8).max(1.0);
        let Some(rect) = Rect::from_xywh(pen_x, baseline - self.ascent, width, self.ascent) else {
            return;
        };
        let path = PathBuilder::from_rect(rect);
        let mut paint = Paint::default();
        paint.set_color(fill);
        canvas.fill_path(&path, &paint, FillRule::Winding, Transform::identity(), None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_height_is_ascent_plus_descent() {
        let glyphs = BoxGlyphs::with_metrics(10.0, 16.0, 4.0);
        assert_eq!(glyphs.line_height(), 20.0);
    }

    #[test]
    fn test_draw_fills_pixels() {
        let glyphs = BoxGlyphs::with_metrics(10.0, 16.0, 4.0);
        let mut canvas = Pixmap::new(20, 20).unwrap();
        glyphs.draw_glyph('A', 0.0, 16.0, Color::WHITE, &mut canvas);
        assert!(canvas.pixels().iter().any(|p| p.alpha() > 0));
    }
}
