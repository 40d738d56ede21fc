//! Double-buffered pixel grids
//!
//! A [`PixelGrid`] is a rectangular region of the panel. Draw calls change
//! the current snapshot; [`PixelGrid::flush`] sends only what differs from
//! the snapshot taken at the previous flush.
//!
//! Rows are packed eight pixels per byte, most significant bit first. Every
//! draw primitive clips to the grid and leaves the padding bits of the last
//! byte of each row clear.

pub mod blit;
pub mod diff;

pub use blit::{GlyphSource, CELL_WIDTH, LINE_HEIGHT};
pub use diff::{ChangeRange, RowDiffer};

use alloc::vec;
use alloc::vec::Vec;

use self::blit::copy_bits;
use crate::config::{ConfigError, DiffConfig, DisplayGeometry, Palette, Point, Rect};
use crate::encode::FlushStats;
use crate::link::Link;
use crate::traits::Transmit;

/// A change range together with its row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RowChange {
    pub row: usize,
    pub range: ChangeRange,
}

/// Monochrome framebuffer for one panel region
#[derive(Debug, Clone)]
pub struct PixelGrid {
    origin: Point,
    width: usize,
    height: usize,
    stride: usize,
    palette: Palette,
    diff: DiffConfig,
    current: Vec<u8>,
    /// Snapshot of the last flush, `None` until the first one
    previous: Option<Vec<u8>>,
}

impl PixelGrid {
    /// Create an all-background grid at `origin`
    ///
    /// # Panics
    ///
    /// Panics if `width` or `height` is zero.
    pub fn new(origin: Point, width: u16, height: u16, palette: Palette) -> Self {
        assert!(width > 0 && height > 0, "empty pixel grid");

        let width = usize::from(width);
        let height = usize::from(height);
        let stride = width.div_ceil(8);

        Self {
            origin,
            width,
            height,
            stride,
            palette,
            diff: DiffConfig::default(),
            current: vec![0; stride * height],
            previous: None,
        }
    }

    /// Create a grid covering `rect`, which must lie on the display
    pub fn from_rect(
        geometry: &DisplayGeometry,
        rect: Rect,
        palette: Palette,
    ) -> Result<Self, ConfigError> {
        rect.validate(geometry)?;
        Ok(Self::new(rect.origin(), rect.width(), rect.height(), palette))
    }

    /// Replace the diff tuning
    pub fn with_diff_config(mut self, diff: DiffConfig) -> Self {
        self.diff = diff;
        self
    }

    pub fn origin(&self) -> Point {
        self.origin
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Bytes per row
    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn palette(&self) -> Palette {
        self.palette
    }

    /// Size in text cells: (columns, lines)
    pub fn text_dimensions(&self) -> (usize, usize) {
        (self.width / CELL_WIDTH, self.height / LINE_HEIGHT)
    }

    /// Whether a flush has happened since creation or [`Self::invalidate`]
    pub fn has_previous(&self) -> bool {
        self.previous.is_some()
    }

    /// Packed bytes of row `y` of the current snapshot
    pub fn row(&self, y: usize) -> Option<&[u8]> {
        if y >= self.height {
            return None;
        }
        let start = y * self.stride;
        self.current.get(start..start + self.stride)
    }

    /// Pixel value; `false` outside the grid
    pub fn pixel(&self, x: usize, y: usize) -> bool {
        if x >= self.width {
            return false;
        }
        self.row(y)
            .and_then(|row| row.get(x / 8))
            .map_or(false, |byte| byte & (0x80 >> (x % 8)) != 0)
    }

    /// Set or clear one pixel; ignored outside the grid
    pub fn set_pixel(&mut self, x: usize, y: usize, value: bool) {
        if x >= self.width {
            return;
        }
        if let Some(row) = self.row_mut(y) {
            let mask = 0x80 >> (x % 8);
            if value {
                row[x / 8] |= mask;
            } else {
                row[x / 8] &= !mask;
            }
        }
    }

    /// Reset the current snapshot to background
    ///
    /// The previous snapshot is kept, so the next flush sends only what the
    /// panel actually needs to change.
    pub fn clear(&mut self) {
        self.current.fill(0);
    }

    /// Forget the previous snapshot; the next flush repaints everything
    pub fn invalidate(&mut self) {
        self.previous = None;
    }

    /// Draw text into text line `line` starting at cell `col`
    ///
    /// A cell straddling the right edge is clipped; cells past it are
    /// dropped.
    pub fn write_text<F: GlyphSource + ?Sized>(
        &mut self,
        col: usize,
        line: usize,
        text: &[u8],
        font: &F,
    ) {
        let columns = self.width.div_ceil(CELL_WIDTH);
        let Some(top) = self.line_top(line) else {
            return;
        };

        for (cell, &code) in (col..columns).zip(text) {
            for (dy, glyph_row) in font.glyph(code).iter().take(LINE_HEIGHT).enumerate() {
                self.blit_row(top + dy, cell * CELL_WIDTH, core::slice::from_ref(glyph_row), 8);
            }
        }
    }

    /// Draw one 8-pixel wide graphics column into text line `line`
    pub fn write_column(&mut self, col: usize, line: usize, data: &[u8]) {
        let (Some(top), Some(x)) = (self.line_top(line), col.checked_mul(CELL_WIDTH)) else {
            return;
        };
        if x >= self.width {
            return;
        }

        for (dy, byte) in data.iter().take(self.height - top).enumerate() {
            self.blit_row(top + dy, x, core::slice::from_ref(byte), 8);
        }
    }

    /// Draw a packed bitmap with its top-left corner at pixel (`x`, `y`)
    ///
    /// Each row is copied opaquely (clear bits overwrite the grid) and
    /// clipped to the grid.
    pub fn write_bitmap<I>(&mut self, x: usize, y: usize, rows: I)
    where
        I: IntoIterator,
        I::Item: AsRef<[u8]>,
    {
        if y >= self.height {
            return;
        }

        // Rows past the bottom edge are dropped without touching the grid
        for (dy, row) in rows.into_iter().take(self.height - y).enumerate() {
            let row = row.as_ref();
            self.blit_row(y + dy, x, row, row.len().saturating_mul(8));
        }
    }

    /// Copy a child grid's current pixels into this grid
    ///
    /// The child is placed by its origin relative to this grid's origin;
    /// pixels of the child outside this grid are dropped and pixels of this
    /// grid outside the child are kept.
    pub fn compose(&mut self, child: &PixelGrid) {
        let dx = i32::from(child.origin.x) - i32::from(self.origin.x);
        let dy = i32::from(child.origin.y) - i32::from(self.origin.y);

        let skip_x = usize::try_from(-dx).unwrap_or(0);
        let x = usize::try_from(dx).unwrap_or(0);
        if skip_x >= child.width {
            return;
        }

        for child_y in 0..child.height {
            let Ok(y) = usize::try_from(dy + child_y as i32) else {
                continue;
            };
            if y >= self.height {
                break;
            }

            let start = child_y * child.stride;
            let src = &child.current[start..start + child.stride];
            let width = self.width;
            if let Some(row) = self.row_mut(y) {
                copy_bits(row, width, x, src, skip_x, child.width - skip_x);
            }
        }
    }

    /// Change ranges the next [`Self::flush`] would send
    pub fn changes(&self) -> Vec<RowChange> {
        let mut differ = RowDiffer::new(self.width, self.diff.max_gap);
        let mut out = Vec::new();

        for (row, current) in self.current.chunks_exact(self.stride).enumerate() {
            let previous = self.previous_row(row);
            for range in differ.diff(previous, current) {
                out.push(RowChange { row, range: *range });
            }
        }
        out
    }

    /// Send the pixels that changed since the last flush
    ///
    /// # Panics
    ///
    /// Panics if the grid does not fit on the link's display.
    pub fn flush<T: Transmit>(&mut self, link: &mut Link<T>) -> FlushStats {
        self.assert_fits(&link.geometry());

        let mut encoder = link.row_encoder(self.origin, self.width, self.palette);
        let mut differ = RowDiffer::new(self.width, self.diff.max_gap);

        for (row, current) in self.current.chunks_exact(self.stride).enumerate() {
            let previous = self.previous_row(row);
            for range in differ.diff(previous, current) {
                encoder.write(row, current, range.begin, range.end);
            }
        }

        let stats = encoder.finish();
        self.commit();

        #[cfg(feature = "defmt")]
        defmt::debug!(
            "flush at ({}, {}): {} ranges, {} windows, {} bytes",
            self.origin.x,
            self.origin.y,
            stats.ranges,
            stats.window_updates,
            stats.bytes
        );

        stats
    }

    /// Send every pixel of the grid
    ///
    /// # Panics
    ///
    /// Panics if the grid does not fit on the link's display.
    pub fn full_flush<T: Transmit>(&mut self, link: &mut Link<T>) -> FlushStats {
        self.assert_fits(&link.geometry());

        let mut encoder = link.row_encoder(self.origin, self.width, self.palette);
        for (row, current) in self.current.chunks_exact(self.stride).enumerate() {
            encoder.write(row, current, 0, self.width);
        }

        let stats = encoder.finish();
        self.commit();

        #[cfg(feature = "defmt")]
        defmt::debug!(
            "full flush at ({}, {}): {} bytes",
            self.origin.x,
            self.origin.y,
            stats.bytes
        );

        stats
    }

    /// First pixel row of text line `line`, `None` below the grid
    fn line_top(&self, line: usize) -> Option<usize> {
        line.checked_mul(LINE_HEIGHT).filter(|&top| top < self.height)
    }

    fn row_mut(&mut self, y: usize) -> Option<&mut [u8]> {
        if y >= self.height {
            return None;
        }
        let start = y * self.stride;
        self.current.get_mut(start..start + self.stride)
    }

    fn previous_row(&self, y: usize) -> Option<&[u8]> {
        let previous = self.previous.as_deref()?;
        assert_eq!(previous.len(), self.current.len(), "snapshot size mismatch");
        let start = y * self.stride;
        previous.get(start..start + self.stride)
    }

    fn blit_row(&mut self, y: usize, x: usize, src: &[u8], bits: usize) {
        let width = self.width;
        if let Some(row) = self.row_mut(y) {
            copy_bits(row, width, x, src, 0, bits);
        }
    }

    fn commit(&mut self) {
        match self.previous.as_mut() {
            Some(previous) => previous.copy_from_slice(&self.current),
            None => self.previous = Some(self.current.clone()),
        }
    }

    fn assert_fits(&self, geometry: &DisplayGeometry) {
        assert!(
            usize::from(self.origin.x) + self.width <= usize::from(geometry.width)
                && usize::from(self.origin.y) + self.height <= usize::from(geometry.height),
            "pixel grid outside display"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{LinkConfig, Rgb565};
    use crate::sim::{PanelModel, RecordingSink};

    struct BlockFont;

    impl GlyphSource for BlockFont {
        fn glyph(&self, code: u8) -> &[u8] {
            match code {
                b'#' => &[0xFF; 14],
                b'|' => &[0x18; 14],
                _ => &[0x00; 14],
            }
        }
    }

    fn link() -> Link<RecordingSink> {
        Link::new(
            RecordingSink::new(),
            0,
            LinkConfig::default(),
            DisplayGeometry::new(480, 320),
        )
        .unwrap()
    }

    fn grid(width: u16, height: u16) -> PixelGrid {
        PixelGrid::new(Point::new(0, 0), width, height, Palette::default())
    }

    #[test]
    fn test_rows_have_equal_stride() {
        let g = grid(13, 4);
        assert_eq!(g.stride(), 2);
        assert!((0..4).all(|y| g.row(y).map(<[u8]>::len) == Some(2)));
        assert_eq!(g.row(4), None);
    }

    #[test]
    fn test_set_and_get_pixel() {
        let mut g = grid(10, 3);
        g.set_pixel(9, 2, true);
        g.set_pixel(10, 2, true);
        assert!(g.pixel(9, 2));
        assert!(!g.pixel(10, 2));
        assert_eq!(g.row(2), Some(&[0x00, 0x40][..]));
        g.set_pixel(9, 2, false);
        assert!(!g.pixel(9, 2));
    }

    #[test]
    fn test_first_flush_sends_full_rows() {
        let g = grid(16, 3);
        let changes = g.changes();
        assert_eq!(changes.len(), 3);
        assert!(changes.iter().all(|c| c.range == ChangeRange::new(0, 16)));
    }

    #[test]
    fn test_diff_scenario_single_range() {
        let mut link = link();
        let mut g = grid(16, 1);
        g.flush(&mut link);

        for x in 5..10 {
            g.set_pixel(x, 0, true);
        }
        assert_eq!(
            g.changes(),
            [RowChange {
                row: 0,
                range: ChangeRange::new(5, 10)
            }]
        );
    }

    #[test]
    fn test_second_flush_is_empty() {
        let mut link = link();
        let mut g = grid(40, 20);
        g.write_bitmap(3, 2, [[0xF0, 0x0F], [0xAA, 0x55]]);
        g.flush(&mut link);
        let sent = link.sink().len();

        let stats = g.flush(&mut link);
        assert_eq!(stats.ranges, 0);
        assert_eq!(stats.requests, 0);
        assert_eq!(link.sink().len(), sent);
        assert!(g.changes().is_empty());
    }

    #[test]
    fn test_clear_keeps_previous() {
        let mut link = link();
        let mut g = grid(16, 2);
        g.set_pixel(3, 1, true);
        g.flush(&mut link);

        g.clear();
        assert_eq!(
            g.changes(),
            [RowChange {
                row: 1,
                range: ChangeRange::new(3, 4)
            }]
        );
    }

    #[test]
    fn test_invalidate_forces_full_repaint() {
        let mut link = link();
        let mut g = grid(16, 2);
        g.flush(&mut link);
        g.invalidate();
        assert_eq!(g.changes().len(), 2);
    }

    #[test]
    fn test_write_text_clips_at_right_edge() {
        let mut g = grid(20, 16);
        // the third cell is clipped at column 20
        g.write_text(0, 0, b"###", &BlockFont);

        assert!(g.pixel(0, 0));
        assert!(g.pixel(19, 13));
        assert!(!g.pixel(0, 14));
        assert_eq!(g.row(0), Some(&[0xFF, 0xFF, 0xF0][..]));
    }

    #[test]
    fn test_write_text_at_cell() {
        let mut g = grid(32, 32);
        g.write_text(2, 1, b"|", &BlockFont);
        assert_eq!(g.row(16), Some(&[0x00, 0x00, 0x18, 0x00][..]));
        assert_eq!(g.row(15), Some(&[0x00; 4][..]));
    }

    #[test]
    fn test_write_column() {
        let mut g = grid(16, 16);
        g.write_column(1, 0, &[0x81; 16]);
        assert!((0..16).all(|y| g.row(y) == Some(&[0x00, 0x81][..])));
    }

    #[test]
    fn test_write_bitmap_unaligned() {
        let mut g = grid(24, 2);
        g.set_pixel(0, 0, true);
        g.set_pixel(23, 0, true);
        g.write_bitmap(4, 0, [[0xFF, 0x00]]);

        // opaque copy of 16 bits at x = 4, neighbours kept
        assert_eq!(g.row(0), Some(&[0b1000_1111, 0b1111_0000, 0b0000_0001][..]));
    }

    #[test]
    fn test_write_bitmap_clipped() {
        let mut g = grid(12, 2);
        g.write_bitmap(8, 1, [[0xFF, 0xFF], [0xFF, 0xFF]]);
        assert_eq!(g.row(1), Some(&[0x00, 0xF0][..]));
    }

    #[test]
    fn test_draws_far_off_grid_are_dropped() {
        let mut g = grid(16, 16);
        g.write_text(0, usize::MAX / 8, b"#", &BlockFont);
        g.write_text(0, 1, b"#", &BlockFont);
        g.write_column(usize::MAX / 4, 0, &[0xFF; 16]);
        g.write_column(0, usize::MAX, &[0xFF; 16]);
        g.write_bitmap(0, usize::MAX, [[0xFF, 0xFF], [0xFF, 0xFF]]);
        g.write_bitmap(usize::MAX, 0, [[0xFF, 0xFF], [0xFF, 0xFF]]);

        assert!((0..16).all(|y| g.row(y) == Some(&[0x00, 0x00][..])));
    }

    #[test]
    fn test_write_bitmap_stops_at_bottom_edge() {
        let mut g = grid(16, 4);
        g.write_bitmap(0, 3, [[0xFF, 0xFF]; 8]);

        assert_eq!(g.row(3), Some(&[0xFF, 0xFF][..]));
        assert!((0..3).all(|y| g.row(y) == Some(&[0x00, 0x00][..])));
    }

    #[test]
    fn test_write_column_on_partial_last_line() {
        let mut g = grid(16, 20);
        g.write_column(1, 1, &[0x3C; 16]);

        assert!((16..20).all(|y| g.row(y) == Some(&[0x00, 0x3C][..])));
        assert_eq!(g.row(15), Some(&[0x00, 0x00][..]));
    }

    #[test]
    fn test_compose_child_grid() {
        let mut parent = grid(32, 8);
        parent.write_bitmap(0, 0, [[0xFF; 4]; 8]);

        let mut child = PixelGrid::new(Point::new(3, 2), 6, 2, Palette::default());
        child.set_pixel(0, 0, true);
        child.set_pixel(5, 1, true);
        parent.compose(&child);

        assert_eq!(parent.row(2), Some(&[0b1111_0000, 0b0111_1111, 0xFF, 0xFF][..]));
        assert_eq!(parent.row(3), Some(&[0b1110_0000, 0xFF, 0xFF, 0xFF][..]));
        assert_eq!(parent.row(4), Some(&[0xFF; 4][..]));
    }

    #[test]
    fn test_compose_child_partly_outside() {
        let mut parent = PixelGrid::new(Point::new(10, 10), 8, 2, Palette::default());
        let mut child = PixelGrid::new(Point::new(6, 9), 8, 4, Palette::default());
        for y in 0..4 {
            for x in 0..8 {
                child.set_pixel(x, y, true);
            }
        }
        parent.compose(&child);

        // child covers parent columns 0..4 on both rows
        assert_eq!(parent.row(0), Some(&[0xF0][..]));
        assert_eq!(parent.row(1), Some(&[0xF0][..]));
    }

    #[test]
    fn test_flush_reconstructs_on_panel() {
        let geometry = DisplayGeometry::new(64, 40);
        let mut link = Link::new(RecordingSink::new(), 0, LinkConfig::default(), geometry).unwrap();
        let palette = Palette::new(Rgb565(0xFFE0), Rgb565(0x0010));
        let mut g = PixelGrid::new(Point::new(5, 7), 30, 12, palette);
        let mut panel = PanelModel::new(geometry);

        g.write_bitmap(0, 0, [[0xAA, 0x55, 0xAA, 0x55]; 12]);
        g.flush(&mut link);
        panel.apply_sink(link.sink_mut()).unwrap();
        assert!(panel.shows(&g));

        g.write_bitmap(7, 3, [[0xFF, 0x00, 0xFF], [0x0F, 0xF0, 0x3C]]);
        g.set_pixel(29, 11, true);
        g.flush(&mut link);
        panel.apply_sink(link.sink_mut()).unwrap();
        assert!(panel.shows(&g));
    }

    #[test]
    fn test_from_rect_validates() {
        let geometry = DisplayGeometry::new(100, 50);
        assert!(PixelGrid::from_rect(&geometry, Rect::new(0, 0, 100, 50), Palette::default()).is_ok());
        assert_eq!(
            PixelGrid::from_rect(&geometry, Rect::new(0, 0, 101, 50), Palette::default()).err(),
            Some(ConfigError::RectOutsideDisplay)
        );
    }

    #[test]
    #[should_panic(expected = "pixel grid outside display")]
    fn test_flush_outside_display_panics() {
        let mut link = link();
        let mut g = PixelGrid::new(Point::new(470, 0), 20, 4, Palette::default());
        g.flush(&mut link);
    }
}
