//! Display backend trait
//!
//! Defines the text-mode interface the menu UI renders through.

use tftlink_core::{ConfigError, FlushStats};

/// Display setup errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// Invalid link, grid or button configuration
    Config(ConfigError),
    /// No room left in the icon table
    IconTableFull,
    /// Glyph bitmap rows do not match its declared size
    InvalidGlyph,
}

impl From<ConfigError> for DisplayError {
    fn from(err: ConfigError) -> Self {
        DisplayError::Config(err)
    }
}

/// Display backend trait
///
/// Positions are in text cells: `col` counts 8-pixel columns, `line` counts
/// 16-pixel text lines. Drawing outside the display is clipped.
pub trait DisplayBackend {
    /// Clear the drawing area to background
    ///
    /// Takes effect on the next flush.
    fn clear(&mut self);

    /// Draw text starting at the given cell
    fn write_text(&mut self, col: usize, line: usize, text: &[u8]);

    /// Draw one 8-pixel wide graphics column (one byte per pixel row)
    fn write_graphics(&mut self, col: usize, line: usize, data: &[u8]);

    /// Draw a named glyph
    ///
    /// Returns the number of cells used: 2 for an icon, 1 for a glyph drawn
    /// from the font, 0 if the name is unknown.
    fn write_glyph(&mut self, col: usize, line: usize, name: &str) -> usize;

    /// Send the changes since the last flush to the panel
    fn flush(&mut self) -> FlushStats;

    /// Get the display dimensions
    ///
    /// Returns (columns, lines) in text cells
    fn dimensions(&self) -> (usize, usize);
}
