//! Panel command set
//!
//! Commands understood by ST7796S / ST7789V controllers. Only the commands
//! sent by the encoder and the display surface are modelled; bring-up
//! register tables (gamma, power, VCOM) belong to the board configuration
//! and are sent as raw byte lists.

use heapless::Vec;

/// Controller register opcodes
pub mod reg {
    pub const SWRESET: u8 = 0x01;
    pub const SLPOUT: u8 = 0x11;
    pub const INVOFF: u8 = 0x20;
    pub const INVON: u8 = 0x21;
    pub const DISPOFF: u8 = 0x28;
    pub const DISPON: u8 = 0x29;
    pub const CASET: u8 = 0x2A;
    pub const RASET: u8 = 0x2B;
    pub const RAMWR: u8 = 0x2C;
    pub const MADCTL: u8 = 0x36;
    pub const COLMOD: u8 = 0x3A;
}

/// Longest encoded command (window commands: opcode + 4 parameter bytes)
pub const MAX_COMMAND_LEN: usize = 5;

/// Commands sent to the panel controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PanelCommand {
    /// Software reset
    SoftwareReset,
    /// Leave sleep mode
    SleepOut,
    /// Display inversion off
    InversionOff,
    /// Display inversion on
    InversionOn,
    /// Blank the panel
    DisplayOff,
    /// Show frame memory on the panel
    DisplayOn,
    /// Column address window, both ends inclusive
    ColumnWindow { first: u16, last: u16 },
    /// Row address window, both ends inclusive
    RowWindow { first: u16, last: u16 },
    /// Start writing pixel data at the window origin
    MemoryWrite,
}

impl PanelCommand {
    /// Register opcode of this command
    pub const fn opcode(&self) -> u8 {
        match self {
            PanelCommand::SoftwareReset => reg::SWRESET,
            PanelCommand::SleepOut => reg::SLPOUT,
            PanelCommand::InversionOff => reg::INVOFF,
            PanelCommand::InversionOn => reg::INVON,
            PanelCommand::DisplayOff => reg::DISPOFF,
            PanelCommand::DisplayOn => reg::DISPON,
            PanelCommand::ColumnWindow { .. } => reg::CASET,
            PanelCommand::RowWindow { .. } => reg::RASET,
            PanelCommand::MemoryWrite => reg::RAMWR,
        }
    }

    /// Encode opcode and parameters
    ///
    /// Window coordinates are sent big-endian.
    pub fn encode(&self) -> Vec<u8, MAX_COMMAND_LEN> {
        let mut bytes = Vec::new();
        let _ = bytes.push(self.opcode());

        if let PanelCommand::ColumnWindow { first, last } | PanelCommand::RowWindow { first, last } =
            *self
        {
            let _ = bytes.extend_from_slice(&first.to_be_bytes());
            let _ = bytes.extend_from_slice(&last.to_be_bytes());
        }

        bytes
    }

    /// Parse a command from its encoded bytes
    pub fn parse(bytes: &[u8]) -> Option<Self> {
        let (&opcode, params) = bytes.split_first()?;
        let window = || -> Option<(u16, u16)> {
            match params {
                [f0, f1, l0, l1] => Some((
                    u16::from_be_bytes([*f0, *f1]),
                    u16::from_be_bytes([*l0, *l1]),
                )),
                _ => None,
            }
        };

        match opcode {
            reg::SWRESET => Some(PanelCommand::SoftwareReset),
            reg::SLPOUT => Some(PanelCommand::SleepOut),
            reg::INVOFF => Some(PanelCommand::InversionOff),
            reg::INVON => Some(PanelCommand::InversionOn),
            reg::DISPOFF => Some(PanelCommand::DisplayOff),
            reg::DISPON => Some(PanelCommand::DisplayOn),
            reg::CASET => window().map(|(first, last)| PanelCommand::ColumnWindow { first, last }),
            reg::RASET => window().map(|(first, last)| PanelCommand::RowWindow { first, last }),
            reg::RAMWR => Some(PanelCommand::MemoryWrite),
            _ => None,
        }
    }
}
