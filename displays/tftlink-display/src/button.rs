//! Soft buttons
//!
//! A soft button is a fixed screen rectangle in its own colors with a glyph
//! bitmap centered in it. Buttons never change after the first paint.

use alloc::vec::Vec;

use tftlink_core::{DisplayGeometry, FlushStats, Link, Palette, PixelGrid, Rect, Transmit};

use crate::backend::DisplayError;

/// Packed monochrome bitmap, rows MSB first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlyphBitmap {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl GlyphBitmap {
    /// Wrap `height` rows of `ceil(width / 8)` bytes each
    pub fn new(width: usize, height: usize, data: Vec<u8>) -> Result<Self, DisplayError> {
        if width == 0 || height == 0 || data.len() != width.div_ceil(8) * height {
            return Err(DisplayError::InvalidGlyph);
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Packed rows, top first
    pub fn rows(&self) -> core::slice::ChunksExact<'_, u8> {
        self.data.chunks_exact(self.width.div_ceil(8))
    }
}

/// Button placement and look
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonConfig {
    pub rect: Rect,
    pub palette: Palette,
    pub glyph: GlyphBitmap,
}

/// A painted soft button
#[derive(Debug, Clone)]
pub struct SoftButton {
    rect: Rect,
    grid: PixelGrid,
}

impl SoftButton {
    /// Lay out the button; its rectangle must lie on the display
    pub fn new(geometry: &DisplayGeometry, config: &ButtonConfig) -> Result<Self, DisplayError> {
        let mut grid = PixelGrid::from_rect(geometry, config.rect, config.palette)?;

        let glyph = &config.glyph;
        let x = grid.width().saturating_sub(glyph.width()) / 2;
        let y = grid.height().saturating_sub(glyph.height()) / 2;
        grid.write_bitmap(x, y, glyph.rows());

        Ok(Self {
            rect: config.rect,
            grid,
        })
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn grid(&self) -> &PixelGrid {
        &self.grid
    }

    /// Paint the whole button
    pub fn paint<T: Transmit>(&mut self, link: &mut Link<T>) -> FlushStats {
        self.grid.full_flush(link)
    }
}
