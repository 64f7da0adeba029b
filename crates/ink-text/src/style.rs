//! Text styling configuration

use serde::{Deserialize, Serialize};

/// Styling for a [`TextBlock`](crate::TextBlock).
///
/// `size` is the base font size in scene units; glyphs are rasterized at
/// `size * oversample` and scaled back down at draw time so bitmaps stay
/// crisp under non-integer final scales.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    /// Base font size; must be positive
    pub size: f32,
    /// Wrap into multiple lines against an externally supplied width
    pub multiline: bool,
    /// Rasterization oversampling factor
    pub oversample: f32,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            size: 10.0,
            multiline: false,
            oversample: 2.0,
        }
    }
}

impl TextStyle {
    pub fn new(size: f32) -> Self {
        Self {
            size,
            ..Self::default()
        }
    }

    /// Set the base font size
    pub fn size(mut self, size: f32) -> Self {
        self.size = size;
        self
    }

    /// Enable word wrapping against a width supplied later
    pub fn multiline(mut self, multiline: bool) -> Self {
        self.multiline = multiline;
        self
    }

    /// Set the oversampling factor
    pub fn oversample(mut self, oversample: f32) -> Self {
        self.oversample = oversample;
        self
    }

    /// Size the glyph backend should be built at
    pub fn raster_size(&self) -> f32 {
        self.size * self.oversample
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_chain() {
        let style = TextStyle::new(9.0).multiline(true).oversample(4.0);
        assert_eq!(style.size, 9.0);
        assert!(style.multiline);
        assert_eq!(style.raster_size(), 36.0);
    }

    #[test]
    fn test_default_oversample() {
        assert_eq!(TextStyle::default().oversample, 2.0);
    }
}
