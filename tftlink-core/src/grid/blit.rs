//! Bit-exact copies into packed rows

/// Height of a text line in pixels
pub const LINE_HEIGHT: usize = 16;

/// Width of a text cell in pixels
pub const CELL_WIDTH: usize = 8;

/// Source of 8-pixel wide glyph bitmaps (the font table)
pub trait GlyphSource {
    /// Glyph rows for a character code, top first, one byte per row
    fn glyph(&self, code: u8) -> &[u8];
}

/// Copy `len` bits starting at bit `src_start` of `src` into `dst` at bit
/// `x`, touching no destination bit at or past `dst_bits`
pub(crate) fn copy_bits(
    dst: &mut [u8],
    dst_bits: usize,
    x: usize,
    src: &[u8],
    src_start: usize,
    len: usize,
) {
    let dst_bits = dst_bits.min(dst.len() * 8);
    let src_bits = (src.len() * 8).saturating_sub(src_start);
    let count = len.min(src_bits).min(dst_bits.saturating_sub(x));

    let mut done = 0;
    while done < count {
        let pos = x + done;
        let offset = pos % 8;
        let take = (8 - offset).min(count - done);

        let bits = read_bits(src, src_start + done, take);
        let shift = 8 - offset - take;
        let mask = low_mask(take) << shift;

        if let Some(byte) = dst.get_mut(pos / 8) {
            *byte = (*byte & !mask) | ((bits << shift) & mask);
        }
        done += take;
    }
}

/// Read `n` (1..=8) bits at bit position `pos`, right-aligned
fn read_bits(src: &[u8], pos: usize, n: usize) -> u8 {
    let index = pos / 8;
    let offset = pos % 8;
    let high = u16::from(src.get(index).copied().unwrap_or(0));
    let low = u16::from(src.get(index + 1).copied().unwrap_or(0));
    let word = (high << 8) | low;

    ((word >> (16 - offset - n)) as u8) & low_mask(n)
}

fn low_mask(n: usize) -> u8 {
    if n >= 8 {
        0xFF
    } else {
        (1u8 << n) - 1
    }
}
