//! Panel controller model
//!
//! Tracks the column and row windows, the memory write cursor and the frame
//! memory of an RGB565 panel. Pixel bytes are paired high byte first; a pair
//! may span frames and requests, as it does on the real bus.

use alloc::vec;
use alloc::vec::Vec;

use heapless::Vec as ParamBuf;
use tftlink_protocol::{reg, replay, BusWrite, FrameError};

use super::recorder::RecordingSink;
use crate::config::{DisplayGeometry, Rgb565};
use crate::grid::PixelGrid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Window {
    first: u16,
    last: u16,
}

/// Simulated panel fed with replayed requests
#[derive(Debug, Clone)]
pub struct PanelModel {
    geometry: DisplayGeometry,
    /// Frame memory, `None` where nothing was ever written
    memory: Vec<Option<Rgb565>>,
    columns: Window,
    rows: Window,
    cursor: (u16, u16),
    command: Option<u8>,
    params: ParamBuf<u8, 4>,
    writing: bool,
    high: Option<u8>,
    display_on: bool,
    window_commands: usize,
}

impl PanelModel {
    /// Blank panel with full-screen windows, display off
    pub fn new(geometry: DisplayGeometry) -> Self {
        Self {
            geometry,
            memory: vec![None; usize::from(geometry.width) * usize::from(geometry.height)],
            columns: full(geometry.width),
            rows: full(geometry.height),
            cursor: (0, 0),
            command: None,
            params: ParamBuf::new(),
            writing: false,
            high: None,
            display_on: false,
            window_commands: 0,
        }
    }

    /// Replay one request
    ///
    /// Bus writes of frames before a truncated frame are kept.
    pub fn apply(&mut self, request: &[u8]) -> Result<(), FrameError> {
        replay(request, |write| self.write(write))
    }

    /// Replay and drain every request recorded by `sink`
    pub fn apply_sink(&mut self, sink: &mut RecordingSink) -> Result<(), FrameError> {
        for request in sink.take() {
            self.apply(&request.bytes)?;
        }
        Ok(())
    }

    /// Feed a single bus write
    pub fn write(&mut self, write: BusWrite) {
        match write {
            BusWrite::Command(opcode) => self.start_command(opcode),
            BusWrite::Data(byte) if self.writing => self.pixel_byte(byte),
            BusWrite::Data(byte) => self.parameter(byte),
        }
    }

    /// Color at (`x`, `y`), `None` if never written or off the panel
    pub fn pixel(&self, x: u16, y: u16) -> Option<Rgb565> {
        if x >= self.geometry.width || y >= self.geometry.height {
            return None;
        }
        self.memory[self.index(x, y)]
    }

    /// Column and row window commands received so far
    pub fn window_commands(&self) -> usize {
        self.window_commands
    }

    pub fn is_display_on(&self) -> bool {
        self.display_on
    }

    /// Whether the panel shows the current snapshot of `grid`
    pub fn shows(&self, grid: &PixelGrid) -> bool {
        let origin = grid.origin();
        let palette = grid.palette();

        (0..grid.height()).all(|y| {
            (0..grid.width()).all(|x| {
                let panel_x = usize::from(origin.x) + x;
                let panel_y = usize::from(origin.y) + y;
                match (u16::try_from(panel_x), u16::try_from(panel_y)) {
                    (Ok(px), Ok(py)) => self.pixel(px, py) == Some(palette.color(grid.pixel(x, y))),
                    _ => false,
                }
            })
        })
    }

    fn start_command(&mut self, opcode: u8) {
        self.command = Some(opcode);
        self.params.clear();
        self.high = None;
        self.writing = false;

        match opcode {
            reg::RAMWR => {
                self.writing = true;
                self.cursor = (self.columns.first, self.rows.first);
            }
            reg::DISPON => self.display_on = true,
            reg::DISPOFF => self.display_on = false,
            reg::SWRESET => {
                self.columns = full(self.geometry.width);
                self.rows = full(self.geometry.height);
                self.display_on = false;
            }
            _ => {}
        }
    }

    fn parameter(&mut self, byte: u8) {
        let Some(opcode @ (reg::CASET | reg::RASET)) = self.command else {
            return;
        };
        if self.params.push(byte).is_err() {
            return;
        }

        if let [f0, f1, l0, l1] = self.params[..] {
            let window = Window {
                first: u16::from_be_bytes([f0, f1]),
                last: u16::from_be_bytes([l0, l1]),
            };
            if opcode == reg::CASET {
                self.columns = window;
            } else {
                self.rows = window;
            }
            self.window_commands += 1;
        }
    }

    fn pixel_byte(&mut self, byte: u8) {
        let Some(high) = self.high.take() else {
            self.high = Some(byte);
            return;
        };

        let (x, y) = self.cursor;
        if x < self.geometry.width && y < self.geometry.height {
            let index = self.index(x, y);
            self.memory[index] = Some(Rgb565(u16::from_be_bytes([high, byte])));
        }
        self.advance();
    }

    fn advance(&mut self) {
        let (mut x, mut y) = self.cursor;
        if x >= self.columns.last {
            x = self.columns.first;
            y = if y >= self.rows.last {
                self.rows.first
            } else {
                y + 1
            };
        } else {
            x += 1;
        }
        self.cursor = (x, y);
    }

    fn index(&self, x: u16, y: u16) -> usize {
        usize::from(y) * usize::from(self.geometry.width) + usize::from(x)
    }
}

fn full(extent: u16) -> Window {
    Window {
        first: 0,
        last: extent.saturating_sub(1),
    }
}
