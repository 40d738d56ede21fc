//! Pixel stream encoding
//!
//! - [`bitrun`]: runs of equal bits in packed rows
//! - [`packer`]: frames and requests under the link size limit
//! - [`row`]: change ranges to window commands and color runs

pub mod bitrun;
pub mod packer;
pub mod row;

pub use bitrun::{BitRun, BitRuns};
pub use packer::{PackerStats, StreamPacker};
pub use row::{FlushStats, RowEncoder};
