//! Bit-run decomposition of packed pixel rows
//!
//! Rows are stored eight pixels per byte, most significant bit first. The
//! encoder and the diff both need the row as runs of equal bits rather than
//! as individual pixels.

use core::iter::FusedIterator;

/// A maximal run of equal bits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BitRun {
    /// Bit value shared by the run
    pub value: bool,
    /// Number of bits, at least 1
    pub len: usize,
}

/// Iterator over the runs of equal bits in a packed byte slice
///
/// Covers bits `begin..end` (end clamped to the slice) in order; the run
/// lengths add up to exactly `end - begin`.
#[derive(Debug, Clone)]
pub struct BitRuns<'a> {
    data: &'a [u8],
    next_index: usize,
    current_byte: u8,
    mask: u8,
    remaining: usize,
}

impl<'a> BitRuns<'a> {
    /// Runs of bits `begin..end`
    ///
    /// An empty or out-of-range `begin` yields no runs.
    pub fn new(data: &'a [u8], begin: usize, end: usize) -> Self {
        let end = end.min(data.len().saturating_mul(8));
        let index = begin / 8;

        let (current_byte, remaining) = match data.get(index) {
            Some(&byte) if begin < end => (byte, end - begin),
            _ => (0, 0),
        };

        Self {
            data,
            next_index: index + 1,
            current_byte,
            mask: 0x80 >> (begin % 8),
            remaining,
        }
    }

    /// Runs over every bit of `data`
    pub fn whole(data: &'a [u8]) -> Self {
        Self::new(data, 0, data.len().saturating_mul(8))
    }

    /// Bits not yet covered by a returned run
    pub fn remaining(&self) -> usize {
        self.remaining
    }

    fn bit(&self) -> bool {
        self.current_byte & self.mask != 0
    }

    fn load_next_byte(&mut self) {
        self.current_byte = self.data.get(self.next_index).copied().unwrap_or(0);
        self.next_index += 1;
    }
}

impl Iterator for BitRuns<'_> {
    type Item = BitRun;

    fn next(&mut self) -> Option<BitRun> {
        if self.remaining == 0 {
            return None;
        }

        let value = self.bit();
        let fill = if value { 0xFF } else { 0x00 };
        let mut len = 0;

        loop {
            len += 1;
            self.remaining -= 1;
            if self.remaining == 0 {
                break;
            }

            self.mask >>= 1;
            if self.mask == 0 {
                self.mask = 0x80;
                self.load_next_byte();

                // Whole bytes continuing the run are taken 8 bits at a time
                while self.remaining >= 8 && self.current_byte == fill {
                    len += 8;
                    self.remaining -= 8;
                    self.load_next_byte();
                }
                if self.remaining == 0 {
                    break;
                }
            }

            if self.bit() != value {
                break;
            }
        }

        Some(BitRun { value, len })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining.min(1), Some(self.remaining))
    }
}

impl FusedIterator for BitRuns<'_> {}
