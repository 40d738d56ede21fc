//! Display geometry and screen rectangles

use super::types::ConfigError;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Full panel size in pixels
///
/// Passed explicitly to everything that addresses the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DisplayGeometry {
    /// Columns
    pub width: u16,
    /// Rows
    pub height: u16,
}

impl DisplayGeometry {
    /// 480x320 ST7796S in landscape orientation
    pub const ST7796S: Self = Self::new(480, 320);

    /// Create a geometry
    pub const fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }

    /// Rectangle covering the whole panel
    pub const fn bounds(&self) -> Rect {
        Rect::new(0, 0, self.width, self.height)
    }
}

impl Default for DisplayGeometry {
    fn default() -> Self {
        Self::ST7796S
    }
}

/// A screen position in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Point {
    pub x: u16,
    pub y: u16,
}

impl Point {
    pub const fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }
}

/// Screen rectangle; `right` and `bottom` are exclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Rect {
    pub left: u16,
    pub top: u16,
    pub right: u16,
    pub bottom: u16,
}

impl Rect {
    /// Create a rectangle from its edges
    pub const fn new(left: u16, top: u16, right: u16, bottom: u16) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Top-left corner
    pub const fn origin(&self) -> Point {
        Point::new(self.left, self.top)
    }

    /// Width in pixels (0 for an inverted rectangle)
    pub const fn width(&self) -> u16 {
        self.right.saturating_sub(self.left)
    }

    /// Height in pixels (0 for an inverted rectangle)
    pub const fn height(&self) -> u16 {
        self.bottom.saturating_sub(self.top)
    }

    /// Check that the rectangle has area and lies on the display
    pub fn validate(&self, geometry: &DisplayGeometry) -> Result<(), ConfigError> {
        if self.width() == 0 || self.height() == 0 {
            return Err(ConfigError::EmptyRect);
        }
        if self.right > geometry.width || self.bottom > geometry.height {
            return Err(ConfigError::RectOutsideDisplay);
        }
        Ok(())
    }
}
