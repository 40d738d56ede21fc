//! Configuration types
//!
//! Values here are produced by the configuration collaborator (string
//! parsing of colors and rectangles happens there) and validated once at
//! setup. Nothing in this module is consulted as mutable global state.

pub mod geometry;
pub mod types;

pub use geometry::{DisplayGeometry, Point, Rect};
pub use types::{ConfigError, DiffConfig, LinkConfig, Palette, Rgb565};
