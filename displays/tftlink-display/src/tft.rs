//! Menu display on a TFT panel
//!
//! The panel shows one menu grid and any number of soft buttons. Only the
//! menu is redrawn after [`TftDisplay::init`].

use alloc::vec::Vec;

use tftlink_core::{
    FlushStats, GlyphSource, Link, PackerStats, Palette, PixelGrid, Point, Rect, Transmit,
};
use tftlink_protocol::PanelCommand;

use crate::backend::{DisplayBackend, DisplayError};
use crate::button::{ButtonConfig, SoftButton};
use crate::icon::{text_glyph, Icon, MAX_ICONS};

/// TFT display with a menu area and soft buttons
pub struct TftDisplay<T, F> {
    link: Link<T>,
    menu: PixelGrid,
    buttons: Vec<SoftButton>,
    icons: heapless::Vec<Icon, MAX_ICONS>,
    font: F,
}

impl<T: Transmit, F: GlyphSource> TftDisplay<T, F> {
    /// Lay out the menu and buttons; nothing is sent until [`Self::init`]
    pub fn new<I>(
        link: Link<T>,
        menu: Rect,
        palette: Palette,
        font: F,
        buttons: I,
    ) -> Result<Self, DisplayError>
    where
        I: IntoIterator<Item = ButtonConfig>,
    {
        let geometry = link.geometry();
        let menu = PixelGrid::from_rect(&geometry, menu, palette)?;
        let buttons = buttons
            .into_iter()
            .map(|config| SoftButton::new(&geometry, &config))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            link,
            menu,
            buttons,
            icons: heapless::Vec::new(),
            font,
        })
    }

    /// First paint: blank the screen, draw buttons and menu, display on
    ///
    /// Expects the panel to be out of reset and configured.
    pub fn init(&mut self) {
        self.clear_screen();

        for button in &mut self.buttons {
            button.paint(&mut self.link);
        }
        self.menu.full_flush(&mut self.link);

        self.link.send(&[PanelCommand::DisplayOn]);

        #[cfg(feature = "defmt")]
        defmt::info!("display init done, {} soft buttons", self.buttons.len());
    }

    /// Fill the whole panel with the menu background
    pub fn clear_screen(&mut self) -> FlushStats {
        let geometry = self.link.geometry();
        let mut screen = PixelGrid::new(
            Point::new(0, 0),
            geometry.width,
            geometry.height,
            self.menu.palette(),
        );
        screen.full_flush(&mut self.link)
    }

    /// Send raw panel commands (bring-up sequences)
    pub fn send_commands<'a, I>(&mut self, commands: I) -> PackerStats
    where
        I: IntoIterator<Item = &'a [u8]>,
    {
        self.link.send_commands(commands)
    }

    /// Register an icon, replacing one with the same name
    pub fn set_icon(&mut self, icon: Icon) -> Result<(), DisplayError> {
        if let Some(existing) = self.icons.iter_mut().find(|i| i.name() == icon.name()) {
            *existing = icon;
            return Ok(());
        }
        self.icons.push(icon).map_err(|_| DisplayError::IconTableFull)
    }

    pub fn icon(&self, name: &str) -> Option<&Icon> {
        self.icons.iter().find(|i| i.name() == name)
    }

    pub fn menu(&self) -> &PixelGrid {
        &self.menu
    }

    pub fn buttons(&self) -> &[SoftButton] {
        &self.buttons
    }

    pub fn link(&self) -> &Link<T> {
        &self.link
    }

    pub fn link_mut(&mut self) -> &mut Link<T> {
        &mut self.link
    }

    pub fn into_link(self) -> Link<T> {
        self.link
    }
}

impl<T: Transmit, F: GlyphSource> DisplayBackend for TftDisplay<T, F> {
    fn clear(&mut self) {
        self.menu.clear();
    }

    fn write_text(&mut self, col: usize, line: usize, text: &[u8]) {
        self.menu.write_text(col, line, text, &self.font);
    }

    fn write_graphics(&mut self, col: usize, line: usize, data: &[u8]) {
        self.menu.write_column(col, line, data);
    }

    fn write_glyph(&mut self, col: usize, line: usize, name: &str) -> usize {
        let (columns, _) = self.menu.text_dimensions();

        // An icon needs two cells
        if col + 1 < columns {
            if let Some(icon) = self.icons.iter().find(|i| i.name() == name) {
                for (dx, column) in icon.columns().iter().enumerate() {
                    self.menu.write_column(col + dx, line, column);
                }
                return 2;
            }
        }

        match text_glyph(name) {
            Some(code) => {
                self.menu.write_text(col, line, &[code], &self.font);
                1
            }
            None => 0,
        }
    }

    fn flush(&mut self) -> FlushStats {
        self.menu.flush(&mut self.link)
    }

    fn dimensions(&self) -> (usize, usize) {
        self.menu.text_dimensions()
    }
}
