//! Inkline Text - Bitmap Text Engine
//!
//! This crate renders text for 2D scenes the way retro-styled games do it:
//! - Greedy word-wrap layout with per-codepoint x-offsets
//! - Per-line bitmaps rasterized at an oversampled resolution (tiny-skia)
//! - Dirty-state caching: layout and rasterization rerun only when text,
//!   width constraint, scale, or the font configuration changes
//! - Compositor glue driving `ink-scene` nodes, one per line
//!
//! Glyph metrics go through the [`GlyphBackend`] trait; production code
//! uses [`FaceGlyphs`] (fontdb + ttf-parser), tests use the synthetic
//! [`BoxGlyphs`].

pub mod font;
pub mod layout;
pub mod raster;
pub mod state;
pub mod style;

mod block;

pub use block::TextBlock;
pub use font::{BoxGlyphs, FaceGlyphs, FontEpoch, FontLibrary, GlyphBackend};
pub use layout::{LineSpan, fill_line};
pub use raster::{LineBitmap, rasterize_line};
pub use state::DirtyState;
pub use style::TextStyle;

/// Text engine error types
#[derive(Debug, thiserror::Error)]
pub enum TextError {
    #[error("zero sized font")]
    ZeroFontSize,

    #[error("font not found: {0}")]
    FontNotFound(String),

    #[error("failed to parse font: {0}")]
    FontParsing(String),

    #[error("rasterization failed: {0}")]
    Raster(String),
}

pub type Result<T> = std::result::Result<T, TextError>;
