//! Link, diff and color configuration

use tftlink_protocol::MAX_REQUEST_SIZE;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Smallest usable request: one repeat frame (header + 2 bytes)
pub const MIN_REQUEST_SIZE: usize = 3;

/// Errors reported while validating configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Maximum request size outside `MIN_REQUEST_SIZE..=MAX_REQUEST_SIZE`
    RequestSizeOutOfRange,
    /// Keep-pending threshold is zero or above the maximum request size
    PendingThresholdOutOfRange,
    /// Rectangle has no area
    EmptyRect,
    /// Rectangle extends past the display edge
    RectOutsideDisplay,
    /// Display width or height is zero
    EmptyDisplay,
}

/// 16-bit packed color (5 bits red, 6 bits green, 5 bits blue)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Rgb565(pub u16);

impl Rgb565 {
    pub const BLACK: Self = Self(0x0000);
    pub const WHITE: Self = Self(0xFFFF);

    /// Pack 8-bit channels, dropping the low bits of each channel
    pub const fn from_rgb888(r: u8, g: u8, b: u8) -> Self {
        let r = (r as u16) >> 3;
        let g = (g as u16) >> 2;
        let b = (b as u16) >> 3;
        Self((r << 11) | (g << 5) | b)
    }

    /// Raw packed value
    pub const fn raw(self) -> u16 {
        self.0
    }

    /// Wire order: high byte first
    pub const fn to_be_bytes(self) -> [u8; 2] {
        self.0.to_be_bytes()
    }
}

/// Foreground/background color pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Palette {
    /// Color of set pixels
    pub foreground: Rgb565,
    /// Color of clear pixels
    pub background: Rgb565,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            foreground: Rgb565::WHITE,
            background: Rgb565::BLACK,
        }
    }
}

impl Palette {
    /// Create a palette
    pub const fn new(foreground: Rgb565, background: Rgb565) -> Self {
        Self {
            foreground,
            background,
        }
    }

    /// Color for a pixel value
    pub const fn color(&self, set: bool) -> Rgb565 {
        if set {
            self.foreground
        } else {
            self.background
        }
    }
}

/// Request size limits of the display link
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LinkConfig {
    /// Hard limit for one request, headers included
    pub max_request: usize,
    /// Pending bytes at which a request is sent without waiting for flush
    pub keep_pending: usize,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            max_request: 48,
            keep_pending: 45,
        }
    }
}

impl LinkConfig {
    /// Check the limits against what the request format allows
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_REQUEST_SIZE..=MAX_REQUEST_SIZE).contains(&self.max_request) {
            return Err(ConfigError::RequestSizeOutOfRange);
        }
        if self.keep_pending == 0 || self.keep_pending > self.max_request {
            return Err(ConfigError::PendingThresholdOutOfRange);
        }
        Ok(())
    }
}

/// Diff tuning
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DiffConfig {
    /// Longest run of unchanged pixels folded into the surrounding change
    /// range instead of re-addressing the window
    pub max_gap: u16,
}

impl Default for DiffConfig {
    fn default() -> Self {
        Self { max_gap: 3 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb565_packing() {
        assert_eq!(Rgb565::from_rgb888(255, 255, 255), Rgb565::WHITE);
        assert_eq!(Rgb565::from_rgb888(0, 0, 0), Rgb565::BLACK);
        assert_eq!(Rgb565::from_rgb888(255, 0, 0).raw(), 0xF800);
        assert_eq!(Rgb565::from_rgb888(0, 255, 0).raw(), 0x07E0);
        assert_eq!(Rgb565::from_rgb888(0, 0, 255).raw(), 0x001F);
        assert_eq!(Rgb565(0xF81F).to_be_bytes(), [0xF8, 0x1F]);
    }

    #[test]
    fn test_palette_color() {
        let palette = Palette::new(Rgb565(0x1234), Rgb565(0x5678));
        assert_eq!(palette.color(true), Rgb565(0x1234));
        assert_eq!(palette.color(false), Rgb565(0x5678));
    }

    #[test]
    fn test_link_config_default_is_valid() {
        assert_eq!(LinkConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_link_config_limits() {
        let too_small = LinkConfig {
            max_request: 2,
            keep_pending: 1,
        };
        assert_eq!(too_small.validate(), Err(ConfigError::RequestSizeOutOfRange));

        let too_large = LinkConfig {
            max_request: 256,
            keep_pending: 200,
        };
        assert_eq!(too_large.validate(), Err(ConfigError::RequestSizeOutOfRange));

        let bad_threshold = LinkConfig {
            max_request: 48,
            keep_pending: 49,
        };
        assert_eq!(
            bad_threshold.validate(),
            Err(ConfigError::PendingThresholdOutOfRange)
        );
    }
}
