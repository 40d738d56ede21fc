//! Display surface for TFTLink panels
//!
//! This crate provides:
//! - `DisplayBackend` trait: the text-mode interface a menu UI draws through
//! - `TftDisplay`: a menu grid plus soft buttons on one panel
//! - `SoftButton` and `Icon` building blocks
//!
//! # Architecture
//!
//! The UI writes text, graphics columns and named glyphs into the menu grid
//! and calls `flush`; only changed pixels travel over the link. Soft buttons
//! are static: they are painted once by `TftDisplay::init`.
//!
//! Panel bring-up (reset timing, power and gamma registers) is board
//! specific; the board code sends it through `TftDisplay::send_commands`
//! before calling `init`.

#![no_std]
#![deny(unsafe_code)]

extern crate alloc;

pub mod backend;
pub mod button;
pub mod icon;
pub mod tft;

// Re-export key types
pub use backend::{DisplayBackend, DisplayError};
pub use button::{ButtonConfig, GlyphBitmap, SoftButton};
pub use icon::{text_glyph, Icon, MAX_ICONS};
pub use tft::TftDisplay;
