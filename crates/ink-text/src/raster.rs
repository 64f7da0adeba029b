//! Per-line bitmap rasterization

use tiny_skia::{Color, Pixmap};

use crate::font::GlyphBackend;
use crate::layout::LineSpan;
use crate::{Result, TextError};

/// Rasterized pixels for one wrapped line.
pub enum LineBitmap {
    /// Blank line: occupies vertical space but owns no pixels
    Empty,
    /// Oversampled glyph pixels for the line
    Glyphs(Pixmap),
}

impl LineBitmap {
    pub fn is_empty(&self) -> bool {
        matches!(self, LineBitmap::Empty)
    }

    /// Bitmap width in raster pixels (0 for the empty sentinel)
    pub fn width(&self) -> u32 {
        match self {
            LineBitmap::Empty => 0,
            LineBitmap::Glyphs(pixmap) => pixmap.width(),
        }
    }

    pub fn height(&self) -> u32 {
        match self {
            LineBitmap::Empty => 0,
            LineBitmap::Glyphs(pixmap) => pixmap.height(),
        }
    }
}

/// Rasterize one line span at oversampled resolution.
///
/// `visible_index` counts non-whitespace codepoints drawn so far in the
/// block; it indexes `mask` and is returned updated so masking carries
/// across lines. Whitespace draws nothing and consumes no mask slot. A
/// masked-out codepoint is skipped but still consumes its slot. Indices
/// past the end of a short mask default to revealed.
pub fn rasterize_line(
    text: &[char],
    span: &LineSpan,
    backend: &dyn GlyphBackend,
    oversample: f32,
    fill: Color,
    mask: Option<&[bool]>,
    mut visible_index: usize,
) -> Result<(LineBitmap, usize)> {
    if span.width <= 0.0 {
        return Ok((LineBitmap::Empty, visible_index));
    }

    let width_px = (span.width * oversample).ceil() as u32;
    let height_px = backend.line_height().ceil() as u32;
    let mut pixmap = Pixmap::new(width_px.max(1), height_px.max(1))
        .ok_or_else(|| TextError::Raster(format!("pixmap {width_px}x{height_px}")))?;

    let baseline = height_px as f32 - backend.descent();

    for (i, &c) in text[span.start..span.end].iter().enumerate() {
        if c.is_whitespace() {
            continue;
        }
        let revealed = match mask {
            None => true,
            Some(mask) => {
                if visible_index >= mask.len() {
                    tracing::warn!(
                        visible_index,
                        mask_len = mask.len(),
                        "mask shorter than visible characters, revealing the rest"
                    );
                    true
                } else {
                    mask[visible_index]
                }
            }
        };
        if revealed {
            backend.draw_glyph(c, span.x_offsets[i] * oversample, baseline, fill, &mut pixmap);
        }
        visible_index += 1;
    }

    Ok((LineBitmap::Glyphs(pixmap), visible_index))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::BoxGlyphs;
    use crate::layout::fill_line;

    const OVERSAMPLE: f32 = 2.0;

    fn backend() -> BoxGlyphs {
        // 10px advance, 20px line height at raster resolution
        BoxGlyphs::with_metrics(10.0, 16.0, 4.0)
    }

    fn layout(text: &[char]) -> LineSpan {
        let glyphs = backend();
        fill_line(text, 0, None, |c| glyphs.advance(c) / OVERSAMPLE)
    }

    fn raster(text: &str, mask: Option<&[bool]>) -> (LineBitmap, usize) {
        let chars: Vec<char> = text.chars().collect();
        let span = layout(&chars);
        rasterize_line(
            &chars,
            &span,
            &backend(),
            OVERSAMPLE,
            Color::WHITE,
            mask,
            0,
        )
        .unwrap()
    }

    fn ink(bitmap: &LineBitmap) -> usize {
        match bitmap {
            LineBitmap::Empty => 0,
            LineBitmap::Glyphs(pixmap) => pixmap.pixels().iter().filter(|p| p.alpha() > 0).count(),
        }
    }

    #[test]
    fn test_dimensions_follow_span_and_metrics() {
        let (bitmap, _) = raster("abc", None);
        // 3 glyphs * 5 logical px * oversample, 20px raster line height
        assert_eq!(bitmap.width(), 30);
        assert_eq!(bitmap.height(), 20);
    }

    #[test]
    fn test_empty_sentinel_for_zero_width() {
        let (bitmap, index) = raster("", None);
        assert!(bitmap.is_empty());
        assert_eq!(index, 0);
    }

    #[test]
    fn test_whitespace_consumes_no_mask_slot() {
        let (_, index) = raster("a b c", None);
        assert_eq!(index, 3);
    }

    #[test]
    fn test_all_false_mask_draws_nothing() {
        let (masked, index) = raster("abc", Some(&[false, false, false]));
        let (unmasked, _) = raster("abc", None);

        assert_eq!(ink(&masked), 0);
        assert_eq!(index, 3, "masked-out glyphs still consume slots");
        // Layout is unaffected: same dimensions either way
        assert_eq!(masked.width(), unmasked.width());
        assert_eq!(masked.height(), unmasked.height());
    }

    #[test]
    fn test_partial_mask_reveals_prefix() {
        let (partial, _) = raster("abc", Some(&[true, false, false]));
        let (full, _) = raster("abc", None);

        let partial_ink = ink(&partial);
        assert!(partial_ink > 0);
        assert!(partial_ink < ink(&full));
    }

    #[test]
    fn test_short_mask_reveals_rest() {
        let (bitmap, index) = raster("abc", Some(&[false]));
        assert_eq!(index, 3);
        assert!(ink(&bitmap) > 0);
    }

    #[test]
    fn test_mask_index_carries_across_lines() {
        let chars: Vec<char> = "ab".chars().collect();
        let span = layout(&chars);
        let mask = [false, false, true, true];

        let (first, index) = rasterize_line(
            &chars,
            &span,
            &backend(),
            OVERSAMPLE,
            Color::WHITE,
            Some(&mask),
            0,
        )
        .unwrap();
        assert_eq!(ink(&first), 0);

        // Second line of the same block starts where the first left off
        let (second, index) = rasterize_line(
            &chars,
            &span,
            &backend(),
            OVERSAMPLE,
            Color::WHITE,
            Some(&mask),
            index,
        )
        .unwrap();
        assert_eq!(index, 4);
        assert!(ink(&second) > 0);
    }
}
