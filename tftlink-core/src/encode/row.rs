//! Row diff to panel command translation
//!
//! The panel is addressed with a column window and a row window; after a
//! memory write command the controller advances its cursor through the
//! column window and wraps to the next row by itself. Setting a window costs
//! far more than the pixels it saves, so windows are only re-issued when the
//! next change range cannot continue where the controller's cursor already
//! is: same columns on the next row.

use heapless::Vec;
use tftlink_protocol::{PanelCommand, MAX_CHUNK_LEN};

use super::bitrun::BitRuns;
use super::packer::StreamPacker;
use crate::config::{DisplayGeometry, Palette, Point};
use crate::traits::Transmit;

/// Summary of one flush
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FlushStats {
    /// Rows with at least one change range
    pub rows: usize,
    /// Change ranges written
    pub ranges: usize,
    /// Window (re)addressing sequences sent
    pub window_updates: usize,
    /// Requests transmitted
    pub requests: usize,
    /// Request bytes transmitted
    pub bytes: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct LastWrite {
    row: usize,
    begin: usize,
    end: usize,
}

/// Translates per-row change ranges into window commands and color runs
pub struct RowEncoder<T> {
    packer: StreamPacker<T>,
    geometry: DisplayGeometry,
    origin: Point,
    width: usize,
    foreground: [u8; 2],
    background: [u8; 2],
    literal: Vec<u8, MAX_CHUNK_LEN>,
    last: Option<LastWrite>,
    stats: FlushStats,
}

impl<T: Transmit> RowEncoder<T> {
    /// Create an encoder for a grid `width` pixels wide placed at `origin`
    pub fn new(
        packer: StreamPacker<T>,
        geometry: DisplayGeometry,
        origin: Point,
        width: usize,
        palette: Palette,
    ) -> Self {
        Self {
            packer,
            geometry,
            origin,
            width,
            foreground: palette.foreground.to_be_bytes(),
            background: palette.background.to_be_bytes(),
            literal: Vec::new(),
            last: None,
            stats: FlushStats::default(),
        }
    }

    /// Write pixels `begin..end` of grid row `row`
    ///
    /// Calls must arrive in row-then-column order.
    ///
    /// # Panics
    ///
    /// Panics if the range is empty, extends past `data` or the grid width,
    /// or addresses a pixel outside the display.
    pub fn write(&mut self, row: usize, data: &[u8], begin: usize, end: usize) {
        assert!(
            begin < end && end <= self.width && end <= data.len() * 8,
            "change range outside row"
        );

        let (column_update, row_update) = match self.last {
            None => (true, true),
            Some(last) => {
                let columns_changed = last.begin != begin || last.end != end;
                (columns_changed, columns_changed || last.row + 1 != row)
            }
        };

        if self.last.map_or(true, |last| last.row != row) {
            self.stats.rows += 1;
        }
        self.stats.ranges += 1;
        self.last = Some(LastWrite { row, begin, end });

        if column_update || row_update {
            // Pixels already buffered belong to the old window
            self.flush_literal();
            self.stats.window_updates += 1;

            if column_update {
                let first = panel_coord(self.origin.x, begin, self.geometry.width);
                let last = panel_coord(self.origin.x, end - 1, self.geometry.width);
                self.packer
                    .command(&PanelCommand::ColumnWindow { first, last }.encode());
            }
            if row_update {
                let first = panel_coord(self.origin.y, row, self.geometry.height);
                let last = self.geometry.height - 1;
                self.packer
                    .command(&PanelCommand::RowWindow { first, last }.encode());
            }
            self.packer.command(&PanelCommand::MemoryWrite.encode());
        }

        for run in BitRuns::new(data, begin, end) {
            let color = if run.value {
                self.foreground
            } else {
                self.background
            };

            if run.len < 2 {
                self.push_literal(color);
            } else {
                self.flush_literal();
                self.packer.repeat(run.len, color);
            }
        }
    }

    /// Send everything written so far
    ///
    /// Does nothing if no row was written.
    pub fn flush(&mut self) {
        if self.last.is_some() {
            self.flush_literal();
            self.packer.flush();
        }
    }

    /// Flush and return the summary
    pub fn finish(mut self) -> FlushStats {
        self.flush();
        self.stats()
    }

    /// Summary so far
    pub fn stats(&self) -> FlushStats {
        let packer = self.packer.stats();
        FlushStats {
            requests: packer.requests,
            bytes: packer.bytes,
            ..self.stats
        }
    }

    fn push_literal(&mut self, color: [u8; 2]) {
        if self.literal.len() + color.len() > MAX_CHUNK_LEN {
            self.flush_literal();
        }
        let _ = self.literal.extend_from_slice(&color);
    }

    fn flush_literal(&mut self) {
        if !self.literal.is_empty() {
            self.packer.literal(&self.literal);
            self.literal.clear();
        }
    }
}

/// Grid position to panel coordinate
fn panel_coord(offset: u16, pos: usize, limit: u16) -> u16 {
    let coord = usize::from(offset) + pos;
    assert!(coord < usize::from(limit), "window outside display");
    coord as u16
}
