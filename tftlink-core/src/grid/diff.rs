//! Per-row change detection
//!
//! Rows are compared by XOR; the runs of the difference bitmap give the
//! changed column ranges. Short unchanged gaps between two changed ranges
//! are folded into a single range: resending a few unchanged pixels is
//! cheaper than re-addressing the window.

use alloc::vec::Vec;

use crate::encode::BitRuns;

/// Half-open column interval `[begin, end)` to retransmit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChangeRange {
    pub begin: usize,
    pub end: usize,
}

impl ChangeRange {
    pub const fn new(begin: usize, end: usize) -> Self {
        Self { begin, end }
    }

    /// Number of pixels covered
    pub const fn len(&self) -> usize {
        self.end - self.begin
    }

    pub const fn is_empty(&self) -> bool {
        self.end <= self.begin
    }
}

/// Computes change ranges for rows of one grid
///
/// Keeps its scratch buffers between rows.
#[derive(Debug, Clone)]
pub struct RowDiffer {
    width: usize,
    max_gap: usize,
    xor: Vec<u8>,
    ranges: Vec<ChangeRange>,
}

impl RowDiffer {
    /// Differ for rows `width` pixels wide, folding gaps up to `max_gap`
    pub fn new(width: usize, max_gap: u16) -> Self {
        Self {
            width,
            max_gap: usize::from(max_gap),
            xor: Vec::new(),
            ranges: Vec::new(),
        }
    }

    /// Change ranges turning `previous` into `current`
    ///
    /// Without a previous row the whole row is one range.
    ///
    /// # Panics
    ///
    /// Panics if the rows differ in length.
    pub fn diff(&mut self, previous: Option<&[u8]>, current: &[u8]) -> &[ChangeRange] {
        self.ranges.clear();

        let Some(previous) = previous else {
            self.ranges.push(ChangeRange::new(0, self.width));
            return &self.ranges;
        };

        assert_eq!(previous.len(), current.len(), "row length mismatch");
        if previous == current {
            return &self.ranges;
        }

        self.xor.clear();
        self.xor
            .extend(previous.iter().zip(current).map(|(old, new)| old ^ new));

        let mut pos = 0;
        let mut merge = false;
        for run in BitRuns::new(&self.xor, 0, self.width) {
            let begin = pos;
            pos += run.len;

            if run.value {
                match self.ranges.last_mut() {
                    Some(last) if merge => last.end = pos,
                    _ => self.ranges.push(ChangeRange::new(begin, pos)),
                }
                merge = false;
            } else {
                // Only bridge to a range already started in this row
                merge = run.len <= self.max_gap && !self.ranges.is_empty();
            }
        }

        &self.ranges
    }
}
