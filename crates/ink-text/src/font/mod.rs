//! Glyph metrics and rasterization backends
//!
//! Layout and rasterization only ever talk to [`GlyphBackend`], so the
//! engine runs identically on a real font face ([`FaceGlyphs`]) or on the
//! synthetic fixed-advance [`BoxGlyphs`].

mod boxes;
mod face;

pub use boxes::BoxGlyphs;
pub use face::FaceGlyphs;

use std::cell::Cell;
use std::rc::Rc;

use tiny_skia::{Color, Pixmap};

use crate::style::TextStyle;
use crate::{Result, TextError};

/// Glyph source sized at raster resolution (base size × oversample).
///
/// All returned distances are in raster pixels. `baseline` in
/// [`draw_glyph`](GlyphBackend::draw_glyph) is the y of the text baseline
/// inside `canvas`; glyphs extend `ascent` above it and `descent` below.
pub trait GlyphBackend {
    /// Distance from the baseline up to the top of the tallest glyph
    fn ascent(&self) -> f32;

    /// Distance from the baseline down to the bottom of the lowest glyph
    fn descent(&self) -> f32;

    /// Horizontal advance of one codepoint
    fn advance(&self, c: char) -> f32;

    /// Draw one codepoint with its left edge at `pen_x`
    fn draw_glyph(&self, c: char, pen_x: f32, baseline: f32, fill: Color, canvas: &mut Pixmap);

    /// Vertical space one line occupies
    fn line_height(&self) -> f32 {
        self.ascent() + self.descent()
    }
}

/// Generation counter broadcast to every live text block.
///
/// The font configuration owner keeps one of these and hands clones to the
/// blocks it creates. [`bump`](FontEpoch::bump) makes every block observe a
/// stale generation on its next measure, rebuilding its cached line
/// bitmaps. This replaces a process-wide registry of block references.
#[derive(Clone, Default)]
pub struct FontEpoch(Rc<Cell<u64>>);

impl FontEpoch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Invalidate every block sharing this epoch
    pub fn bump(&self) {
        self.0.set(self.0.get() + 1);
    }

    pub fn current(&self) -> u64 {
        self.0.get()
    }
}

/// Font lookup backed by fontdb.
///
/// Owns the face database and the invalidation epoch; call
/// [`invalidate`](FontLibrary::invalidate) after swapping faces so existing
/// blocks re-rasterize.
pub struct FontLibrary {
    db: fontdb::Database,
    epoch: FontEpoch,
}

impl FontLibrary {
    /// Library over the system's installed fonts
    pub fn system() -> Self {
        let mut db = fontdb::Database::new();
        db.load_system_fonts();
        tracing::debug!(faces = db.len(), "loaded system fonts");
        Self {
            db,
            epoch: FontEpoch::new(),
        }
    }

    /// Library with no faces; populate with [`load_font_data`](Self::load_font_data)
    pub fn empty() -> Self {
        Self {
            db: fontdb::Database::new(),
            epoch: FontEpoch::new(),
        }
    }

    /// Register an in-memory font file (TTF/OTF)
    pub fn load_font_data(&mut self, data: Vec<u8>) {
        self.db.load_font_data(data);
    }

    pub fn is_empty(&self) -> bool {
        self.db.len() == 0
    }

    /// Epoch handle for blocks built from this library
    pub fn epoch(&self) -> FontEpoch {
        self.epoch.clone()
    }

    /// Mark every block built from this library for rebuild
    pub fn invalidate(&self) {
        self.epoch.bump();
        tracing::debug!(epoch = self.epoch.current(), "font configuration invalidated");
    }

    /// Build the bold glyph backend for `style`, sized at raster resolution
    pub fn bold_glyphs(&mut self, style: &TextStyle) -> Result<FaceGlyphs> {
        let query = fontdb::Query {
            families: &[fontdb::Family::SansSerif],
            weight: fontdb::Weight::BOLD,
            stretch: fontdb::Stretch::Normal,
            style: fontdb::Style::Normal,
        };
        let id = self
            .db
            .query(&query)
            .ok_or_else(|| TextError::FontNotFound("bold sans-serif".into()))?;
        let (data, index) = unsafe { self.db.make_shared_face_data(id) }
            .ok_or_else(|| TextError::FontParsing("face data unavailable".into()))?;
        FaceGlyphs::new(data, index, style.raster_size())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_epoch_clones_share_state() {
        let epoch = FontEpoch::new();
        let handle = epoch.clone();
        assert_eq!(handle.current(), 0);

        epoch.bump();
        assert_eq!(handle.current(), 1);
    }

    #[test]
    fn test_empty_library_reports_missing_font() {
        let mut lib = FontLibrary::empty();
        let err = lib.bold_glyphs(&TextStyle::default()).unwrap_err();
        assert!(matches!(err, TextError::FontNotFound(_)));
    }
}
