//! Named glyphs
//!
//! A glyph name resolves to a 16x16 icon registered on the display, or
//! failing that to a character of the text font.

use heapless::String;

/// Icon table capacity
pub const MAX_ICONS: usize = 32;

/// Longest icon name kept
pub const MAX_NAME_LEN: usize = 24;

/// 16x16 icon drawn as two graphics columns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Icon {
    name: String<MAX_NAME_LEN>,
    columns: [[u8; 16]; 2],
}

impl Icon {
    /// Build an icon from its left and right 8-pixel columns
    ///
    /// Returns `None` if the name is longer than [`MAX_NAME_LEN`].
    pub fn new(name: &str, columns: [[u8; 16]; 2]) -> Option<Self> {
        let mut owned = String::new();
        owned.push_str(name).ok()?;
        Some(Self {
            name: owned,
            columns,
        })
    }

    /// Build an icon from 16 rows of 16 pixels, MSB leftmost
    pub fn from_rows(name: &str, rows: [u16; 16]) -> Option<Self> {
        let mut columns = [[0u8; 16]; 2];
        for (y, row) in rows.iter().enumerate() {
            let [left, right] = row.to_be_bytes();
            columns[0][y] = left;
            columns[1][y] = right;
        }
        Self::new(name, columns)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Left and right graphics columns
    pub fn columns(&self) -> &[[u8; 16]; 2] {
        &self.columns
    }
}

/// Font character standing in for a glyph name without an icon
pub fn text_glyph(name: &str) -> Option<u8> {
    match name {
        "right_arrow" => Some(0x1a),
        "left_arrow" => Some(0x1b),
        "degrees" => Some(0xf8),
        _ => None,
    }
}
