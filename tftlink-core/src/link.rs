//! Display link
//!
//! A [`Link`] owns the transmit sink for one display and the settings every
//! flush needs: the MCU channel, the request limits and the panel geometry.
//! Packers and row encoders borrow the sink for the length of one flush.

use tftlink_protocol::PanelCommand;

use crate::config::{ConfigError, DisplayGeometry, LinkConfig, Palette, Point};
use crate::encode::{PackerStats, RowEncoder, StreamPacker};
use crate::traits::Transmit;

/// Connection to one display
pub struct Link<T> {
    sink: T,
    channel: u8,
    config: LinkConfig,
    geometry: DisplayGeometry,
}

impl<T: Transmit> Link<T> {
    /// Create a link after checking its configuration
    pub fn new(
        sink: T,
        channel: u8,
        config: LinkConfig,
        geometry: DisplayGeometry,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        if geometry.width == 0 || geometry.height == 0 {
            return Err(ConfigError::EmptyDisplay);
        }

        Ok(Self {
            sink,
            channel,
            config,
            geometry,
        })
    }

    pub fn geometry(&self) -> DisplayGeometry {
        self.geometry
    }

    pub fn config(&self) -> LinkConfig {
        self.config
    }

    /// MCU object id requests are sent to
    pub fn channel(&self) -> u8 {
        self.channel
    }

    /// Packer writing to this link's sink
    pub fn packer(&mut self) -> StreamPacker<&mut T> {
        StreamPacker::new(&mut self.sink, self.channel, self.config)
    }

    /// Row encoder for a grid `width` pixels wide placed at `origin`
    pub fn row_encoder(
        &mut self,
        origin: Point,
        width: usize,
        palette: Palette,
    ) -> RowEncoder<&mut T> {
        let geometry = self.geometry;
        RowEncoder::new(self.packer(), geometry, origin, width, palette)
    }

    /// Send raw commands, each an opcode followed by its parameters
    ///
    /// Commands are packed like any other frame and flushed at the end.
    pub fn send_commands<'a, I>(&mut self, commands: I) -> PackerStats
    where
        I: IntoIterator<Item = &'a [u8]>,
    {
        let mut packer = self.packer();
        for command in commands {
            packer.command(command);
        }
        packer.flush();

        #[cfg(feature = "defmt")]
        defmt::debug!("sent commands in {} requests", packer.stats().requests);

        packer.stats()
    }

    /// Send typed panel commands
    pub fn send(&mut self, commands: &[PanelCommand]) -> PackerStats {
        let mut packer = self.packer();
        for command in commands {
            packer.command(&command.encode());
        }
        packer.flush();
        packer.stats()
    }

    pub fn sink(&self) -> &T {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut T {
        &mut self.sink
    }

    pub fn into_sink(self) -> T {
        self.sink
    }
}
