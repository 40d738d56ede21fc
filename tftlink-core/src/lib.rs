//! Board-agnostic display update encoder
//!
//! This crate turns changes to a monochrome framebuffer into the request
//! stream understood by the display MCU (see `tftlink-protocol`):
//!
//! - Bit-run decomposition of packed pixel rows
//! - Request packing under a maximum request size
//! - Row diff to window/write command translation
//! - Double-buffered pixel grids with gap-coalescing diff
//! - A host-side panel model for verifying what the panel ends up showing
//!   (`sim` feature)
//!
//! Everything runs synchronously on the caller's thread. A [`link::Link`]
//! carries the display geometry and the transmit sink; flushing a grid needs
//! `&mut Link`, so flushes of grids sharing one link are serialized by the
//! borrow checker.

#![no_std]
#![deny(unsafe_code)]

extern crate alloc;

pub mod config;
pub mod encode;
pub mod grid;
pub mod link;
#[cfg(any(test, feature = "sim"))]
pub mod sim;
pub mod traits;

pub use config::{ConfigError, DiffConfig, DisplayGeometry, LinkConfig, Palette, Point, Rect, Rgb565};
pub use encode::{BitRun, BitRuns, FlushStats, PackerStats, RowEncoder, StreamPacker};
pub use grid::{ChangeRange, GlyphSource, PixelGrid, RowChange, RowDiffer};
pub use link::Link;
pub use traits::Transmit;
