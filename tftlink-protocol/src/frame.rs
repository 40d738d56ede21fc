//! Frame encoding and decoding for TFTLink requests.
//!
//! Frame format:
//! - HEADER (1 byte): frame kind and count
//! - PAYLOAD: 1-64 bytes for command and literal frames, 2 bytes for
//!   repeat frames
//!
//! The MCU walks a request frame by frame and turns it into bus writes.
//! [`replay`] does the same on the host so that encoders can be checked
//! against what the panel actually receives.

use heapless::Vec;

/// Maximum request size in bytes (the request length travels as one byte)
pub const MAX_REQUEST_SIZE: usize = 255;

/// Maximum payload of a command or literal frame
pub const MAX_CHUNK_LEN: usize = 64;

/// Maximum repeat count of a repeat frame
pub const MAX_REPEAT: usize = 129;

/// Minimum repeat count of a repeat frame (header 127 is a literal)
pub const MIN_REPEAT: usize = 2;

/// Literal headers encode `len + LITERAL_BASE`
const LITERAL_BASE: u8 = 63;

/// Repeat headers encode `count + REPEAT_BASE`
const REPEAT_BASE: u8 = 126;

/// Errors that can occur during frame encoding or decoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// Count outside the range the header can express
    InvalidCount,
    /// Header announces more payload than the request holds
    Truncated,
    /// Buffer too small for encoding
    BufferTooSmall,
}

/// Frame kind, selected by the header range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameKind {
    /// Panel command: first byte with DCX asserted, rest as parameters
    Command,
    /// Pixel or parameter data
    Literal,
    /// One 2-byte value sent repeatedly
    Repeat,
}

impl FrameKind {
    /// Smallest count a single frame of this kind can carry
    pub const fn min_count(self) -> usize {
        match self {
            FrameKind::Repeat => MIN_REPEAT,
            FrameKind::Command | FrameKind::Literal => 1,
        }
    }

    /// Largest count a single frame of this kind can carry
    pub const fn max_count(self) -> usize {
        match self {
            FrameKind::Repeat => MAX_REPEAT,
            FrameKind::Command | FrameKind::Literal => MAX_CHUNK_LEN,
        }
    }

    /// Encode the header byte for a frame carrying `count` bytes (or repeats)
    pub fn header(self, count: usize) -> Result<u8, FrameError> {
        if count < self.min_count() || count > self.max_count() {
            return Err(FrameError::InvalidCount);
        }
        let count = u8::try_from(count).map_err(|_| FrameError::InvalidCount)?;

        Ok(match self {
            FrameKind::Command => count - 1,
            FrameKind::Literal => count + LITERAL_BASE,
            FrameKind::Repeat => count + REPEAT_BASE,
        })
    }

    /// Decode a header byte into its kind and count
    pub fn from_header(header: u8) -> (Self, usize) {
        match header {
            0..=63 => (FrameKind::Command, usize::from(header) + 1),
            64..=127 => (FrameKind::Literal, usize::from(header - LITERAL_BASE)),
            _ => (FrameKind::Repeat, usize::from(header - REPEAT_BASE)),
        }
    }

    /// Payload bytes following a header with the given count
    pub const fn payload_len(self, count: usize) -> usize {
        match self {
            FrameKind::Repeat => 2,
            FrameKind::Command | FrameKind::Literal => count,
        }
    }
}

/// A single bus write produced by replaying a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusWrite {
    /// Byte written with DCX asserted
    Command(u8),
    /// Byte written as data
    Data(u8),
}

/// A borrowed view of one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frame<'a> {
    /// Command byte followed by its parameters
    Command(&'a [u8]),
    /// Data bytes
    Literal(&'a [u8]),
    /// `value` sent `count` times
    Repeat { count: usize, value: [u8; 2] },
}

impl<'a> Frame<'a> {
    /// Kind of this frame
    pub fn kind(&self) -> FrameKind {
        match self {
            Frame::Command(_) => FrameKind::Command,
            Frame::Literal(_) => FrameKind::Literal,
            Frame::Repeat { .. } => FrameKind::Repeat,
        }
    }

    /// Count encoded in the header (payload length or repeat count)
    pub fn count(&self) -> usize {
        match self {
            Frame::Command(bytes) | Frame::Literal(bytes) => bytes.len(),
            Frame::Repeat { count, .. } => *count,
        }
    }

    /// Encoded size including the header
    pub fn encoded_len(&self) -> usize {
        1 + self.kind().payload_len(self.count())
    }

    /// Append this frame to a buffer
    ///
    /// Nothing is written if the frame does not fit.
    pub fn encode_into<const N: usize>(&self, buffer: &mut Vec<u8, N>) -> Result<(), FrameError> {
        let header = self.kind().header(self.count())?;
        if buffer.capacity() - buffer.len() < self.encoded_len() {
            return Err(FrameError::BufferTooSmall);
        }

        buffer
            .push(header)
            .map_err(|_| FrameError::BufferTooSmall)?;
        let payload: &[u8] = match self {
            Frame::Command(bytes) | Frame::Literal(bytes) => bytes,
            Frame::Repeat { value, .. } => value,
        };
        buffer
            .extend_from_slice(payload)
            .map_err(|_| FrameError::BufferTooSmall)
    }

    /// Expand this frame into the bus writes the MCU performs
    pub fn for_each_write(&self, mut write: impl FnMut(BusWrite)) {
        match *self {
            Frame::Command(bytes) => {
                if let Some((&command, params)) = bytes.split_first() {
                    write(BusWrite::Command(command));
                    for &byte in params {
                        write(BusWrite::Data(byte));
                    }
                }
            }
            Frame::Literal(bytes) => {
                for &byte in bytes {
                    write(BusWrite::Data(byte));
                }
            }
            Frame::Repeat { count, value } => {
                for _ in 0..count {
                    write(BusWrite::Data(value[0]));
                    write(BusWrite::Data(value[1]));
                }
            }
        }
    }
}

/// Iterator over the frames of a request
#[derive(Debug, Clone)]
pub struct Frames<'a> {
    remaining: &'a [u8],
}

/// Iterate over the frames of a request
///
/// Yields `Err(FrameError::Truncated)` once and stops if the last header
/// announces more payload than is left.
pub fn frames(request: &[u8]) -> Frames<'_> {
    Frames { remaining: request }
}

impl<'a> Iterator for Frames<'a> {
    type Item = Result<Frame<'a>, FrameError>;

    fn next(&mut self) -> Option<Self::Item> {
        let (&header, rest) = self.remaining.split_first()?;
        let (kind, count) = FrameKind::from_header(header);
        let len = kind.payload_len(count);

        if rest.len() < len {
            self.remaining = &[];
            return Some(Err(FrameError::Truncated));
        }

        let (payload, tail) = rest.split_at(len);
        self.remaining = tail;

        Some(Ok(match kind {
            FrameKind::Command => Frame::Command(payload),
            FrameKind::Literal => Frame::Literal(payload),
            FrameKind::Repeat => Frame::Repeat {
                count,
                value: [payload[0], payload[1]],
            },
        }))
    }
}

/// Replay a whole request into bus writes, as the MCU does
///
/// Writes belonging to frames before a truncated frame are still delivered.
pub fn replay(request: &[u8], mut write: impl FnMut(BusWrite)) -> Result<(), FrameError> {
    for frame in frames(request) {
        frame?.for_each_write(&mut write);
    }
    Ok(())
}
