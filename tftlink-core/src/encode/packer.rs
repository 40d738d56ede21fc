//! Request packing
//!
//! Panel commands, pixel data and repeated colors are turned into frames,
//! and frames are collected into a pending request. The pending request is
//! sent when the next frame would not fit, when it reaches the
//! keep-pending threshold, or on [`StreamPacker::flush`].

use heapless::Vec;
use tftlink_protocol::{Frame, FrameKind, MAX_CHUNK_LEN, MAX_REPEAT, MAX_REQUEST_SIZE};

use crate::config::LinkConfig;
use crate::traits::Transmit;

/// Counters for requests handed to the sink
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PackerStats {
    /// Requests transmitted
    pub requests: usize,
    /// Request bytes transmitted, headers included
    pub bytes: usize,
}

/// Packs frames into size-limited requests
pub struct StreamPacker<T> {
    sink: T,
    channel: u8,
    config: LinkConfig,
    pending: Vec<u8, MAX_REQUEST_SIZE>,
    stats: PackerStats,
}

impl<T: Transmit> StreamPacker<T> {
    /// Create a packer sending on `channel`
    ///
    /// # Panics
    ///
    /// Panics if `config` does not pass [`LinkConfig::validate`].
    pub fn new(sink: T, channel: u8, config: LinkConfig) -> Self {
        assert!(config.validate().is_ok(), "invalid link config");

        Self {
            sink,
            channel,
            config,
            pending: Vec::new(),
            stats: PackerStats::default(),
        }
    }

    /// Queue a panel command (opcode followed by parameters)
    ///
    /// A command too long for one frame is split: only the first chunk is
    /// sent as a command, the rest follows as literal data.
    pub fn command(&mut self, bytes: &[u8]) {
        self.push_bytes(FrameKind::Command, bytes);
    }

    /// Queue literal data
    pub fn literal(&mut self, bytes: &[u8]) {
        for chunk in bytes.chunks(MAX_CHUNK_LEN) {
            self.push_bytes(FrameKind::Literal, chunk);
        }
    }

    /// Queue `count` copies of a 2-byte value
    pub fn repeat(&mut self, count: usize, value: [u8; 2]) {
        if count == 1 {
            // A single repeat has no header of its own
            self.literal(&value);
            return;
        }

        let mut remaining = count;
        while remaining > 0 {
            let mut section = remaining.min(MAX_REPEAT);
            if remaining - section == 1 {
                section -= 1;
            }
            remaining -= section;

            let frame = Frame::Repeat {
                count: section,
                value,
            };
            if self.free() < frame.encoded_len() {
                self.flush();
            }
            self.append(frame);
        }
    }

    /// Send the pending request, if any
    pub fn flush(&mut self) {
        if self.pending.is_empty() {
            return;
        }

        #[cfg(feature = "defmt")]
        defmt::trace!(
            "tx channel {} request {} bytes",
            self.channel,
            self.pending.len()
        );

        self.sink.transmit(self.channel, &self.pending);
        self.stats.requests += 1;
        self.stats.bytes += self.pending.len();
        self.pending.clear();
    }

    /// Bytes waiting for the next request
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Counters since creation
    pub fn stats(&self) -> PackerStats {
        self.stats
    }

    /// Unused bytes in the pending request
    fn free(&self) -> usize {
        self.config.max_request.saturating_sub(self.pending.len())
    }

    /// Largest payload a command or literal frame can carry right now
    fn room(&self) -> usize {
        self.free().saturating_sub(1).min(MAX_CHUNK_LEN)
    }

    fn push_bytes(&mut self, kind: FrameKind, bytes: &[u8]) {
        let mut kind = kind;
        let mut rest = bytes;

        while !rest.is_empty() {
            let room = self.room();
            if rest.len() <= room {
                self.append(frame_of(kind, rest));
                break;
            }

            if !self.pending.is_empty() {
                self.flush();
                continue;
            }

            // Does not fit even an empty request
            let (head, tail) = rest.split_at(room);
            self.append(frame_of(kind, head));
            rest = tail;
            kind = FrameKind::Literal;
        }
    }

    fn append(&mut self, frame: Frame<'_>) {
        let encoded = frame.encode_into(&mut self.pending);
        assert!(encoded.is_ok(), "frame does not fit the pending request");

        if self.pending.len() >= self.config.keep_pending {
            self.flush();
        }
    }
}

fn frame_of(kind: FrameKind, bytes: &[u8]) -> Frame<'_> {
    match kind {
        FrameKind::Command => Frame::Command(bytes),
        FrameKind::Literal | FrameKind::Repeat => Frame::Literal(bytes),
    }
}
