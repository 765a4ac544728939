//! Serial framing between the host and the tx node.
//!
//! Frame format:
//! - MAGIC (4 bytes): `U A R T`
//! - LENGTH (2 bytes): payload length, little endian
//! - CRC (1 byte): validation byte, checked by a [`CrcCheck`] hook
//! - PAYLOAD (LENGTH bytes)
//!
//! Bytes arrive one at a time from the UART. They are
//! appended to a ring buffer and the decoder pulls from the front of it:
//! header bytes one by one, the payload only once it is fully buffered.

use heapless::Deque;

use crate::crc::{AcceptDeclared, CrcCheck};

/// Frame synchronization sequence
pub const MAGIC: [u8; 4] = *b"UART";

/// Header size in bytes (magic + length + crc)
pub const HEADER_LEN: usize = 7;

/// Largest payload the length field can describe
pub const MAX_PAYLOAD_LEN: usize = u16::MAX as usize;

/// Ring buffer size used by the tx node
pub const DEFAULT_RING_SIZE: usize = 512;

/// Errors that can occur during frame encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// Payload does not fit in the 16-bit length field
    PayloadTooLarge,
    /// Buffer too small for encoding
    BufferTooSmall,
}

impl core::fmt::Display for FrameError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            FrameError::PayloadTooLarge => write!(f, "payload exceeds {} bytes", MAX_PAYLOAD_LEN),
            FrameError::BufferTooSmall => write!(f, "buffer too small for frame"),
        }
    }
}

impl core::error::Error for FrameError {}

/// Header parse state of the frame currently being received
///
/// `idx` is the parse cursor: 0..=3 magic, 4..=5 length, 6 crc, 7 complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FrameHeader {
    len: u16,
    crc: u8,
    idx: u8,
}

/// Outcome of feeding one byte to the header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HeaderStep {
    Accepted,
    /// Byte did not continue the magic sequence
    Desync,
}

impl FrameHeader {
    /// Declared payload length
    pub fn len(&self) -> u16 {
        self.len
    }

    /// Declared CRC byte
    pub fn crc(&self) -> u8 {
        self.crc
    }

    /// Parse cursor
    pub fn idx(&self) -> u8 {
        self.idx
    }

    /// All header bytes received
    pub fn is_complete(&self) -> bool {
        self.idx as usize >= HEADER_LEN
    }

    fn clear(&mut self) {
        *self = Self::default();
    }

    fn push(&mut self, byte: u8) -> HeaderStep {
        match self.idx {
            0..=3 => {
                if byte != MAGIC[self.idx as usize] {
                    self.clear();
                    // A broken magic may be followed directly by a real one
                    if byte == MAGIC[0] {
                        self.idx = 1;
                    }
                    return HeaderStep::Desync;
                }
            }
            4 => self.len = byte as u16,
            5 => self.len |= (byte as u16) << 8,
            6 => self.crc = byte,
            _ => return HeaderStep::Accepted,
        }
        self.idx += 1;
        HeaderStep::Accepted
    }
}

/// Decoder counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DecoderStats {
    /// Frames delivered to the packet buffer
    pub frames: u32,
    /// Frames dropped by the CRC hook
    pub crc_errors: u32,
    /// Bytes that broke a magic sequence
    pub desync_bytes: u32,
    /// Bytes lost because the ring buffer was full
    pub overflow_bytes: u32,
}

/// View of a buffered payload
///
/// The payload may wrap around the end of the ring buffer, so it is exposed
/// as two contiguous slices.
#[derive(Debug, Clone, Copy)]
pub struct Payload<'a> {
    head: &'a [u8],
    tail: &'a [u8],
}

impl<'a> Payload<'a> {
    /// Payload backed by one contiguous slice
    pub fn from_slice(data: &'a [u8]) -> Self {
        Self {
            head: data,
            tail: &[],
        }
    }

    fn from_ring<const N: usize>(ring: &'a Deque<u8, N>, len: usize) -> Self {
        let (head, tail) = ring.as_slices();
        if head.len() >= len {
            Self {
                head: &head[..len],
                tail: &[],
            }
        } else {
            Self {
                head,
                tail: &tail[..len - head.len()],
            }
        }
    }

    /// Number of payload bytes
    pub fn len(&self) -> usize {
        self.head.len() + self.tail.len()
    }

    /// Check if the payload is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate over the payload bytes in order
    pub fn iter(&self) -> impl Iterator<Item = u8> + 'a {
        self.head.iter().chain(self.tail.iter()).copied()
    }
}

/// Byte-stream frame decoder
///
/// Owns the receive ring buffer. The producer side ([`push`](Self::push))
/// and the parser ([`process`](Self::process)) run in the same context on
/// the tx node, so no locking is involved.
pub struct FrameDecoder<const RING: usize = DEFAULT_RING_SIZE, C: CrcCheck = AcceptDeclared> {
    ring: Deque<u8, RING>,
    header: FrameHeader,
    crc: C,
    stats: DecoderStats,
}

impl<const RING: usize> Default for FrameDecoder<RING, AcceptDeclared> {
    fn default() -> Self {
        Self::new(AcceptDeclared)
    }
}

impl<const RING: usize, C: CrcCheck> FrameDecoder<RING, C> {
    /// Create a decoder validating frames with `crc`
    pub fn new(crc: C) -> Self {
        Self {
            ring: Deque::new(),
            header: FrameHeader::default(),
            crc,
            stats: DecoderStats::default(),
        }
    }

    /// Header state of the frame in progress
    pub fn header(&self) -> &FrameHeader {
        &self.header
    }

    /// Counters since creation
    pub fn stats(&self) -> DecoderStats {
        self.stats
    }

    /// Bytes waiting in the ring buffer
    pub fn buffered(&self) -> usize {
        self.ring.len()
    }

    /// Drop all buffered bytes and the partial header
    ///
    /// For consumers that give up on a stalled frame (e.g. a declared
    /// length larger than the ring can ever hold).
    pub fn reset(&mut self) {
        self.ring.clear();
        self.header.clear();
    }

    /// Append one received byte to the ring buffer
    ///
    /// Returns `false` if the ring is full; the byte is dropped.
    pub fn push(&mut self, byte: u8) -> bool {
        if self.ring.push_back(byte).is_err() {
            self.stats.overflow_bytes = self.stats.overflow_bytes.wrapping_add(1);
            return false;
        }
        true
    }

    /// Push one byte and run the parser
    pub fn feed(&mut self, byte: u8, packet: &mut [u8]) -> usize {
        self.push(byte);
        self.process(packet)
    }

    /// Extract every complete frame currently buffered
    ///
    /// Each frame's payload is copied into `packet`, truncated to its length
    /// and zero-padded; later frames overwrite earlier ones. Returns the
    /// number of frames delivered. A partially received frame is kept for
    /// the next call.
    pub fn process(&mut self, packet: &mut [u8]) -> usize {
        let mut delivered = 0;

        loop {
            while !self.header.is_complete() {
                let Some(byte) = self.ring.pop_front() else {
                    return delivered;
                };
                if self.header.push(byte) == HeaderStep::Desync {
                    self.stats.desync_bytes = self.stats.desync_bytes.wrapping_add(1);
                }
            }

            let len = self.header.len() as usize;
            if self.ring.len() < len {
                return delivered;
            }

            let valid = self
                .crc
                .check(&self.header, Payload::from_ring(&self.ring, len));
            if !valid {
                // Rescan the payload bytes: the header may have been noise
                self.stats.crc_errors = self.stats.crc_errors.wrapping_add(1);
                self.header.clear();
                continue;
            }

            let copy = len.min(packet.len());
            packet.fill(0);
            for i in 0..len {
                // Cannot fail: `len` bytes are buffered
                let byte = self.ring.pop_front().unwrap_or_default();
                if i < copy {
                    packet[i] = byte;
                }
            }

            self.header.clear();
            self.stats.frames = self.stats.frames.wrapping_add(1);
            delivered += 1;
        }
    }
}

/// Size of the encoded frame for a payload of `payload_len` bytes
pub const fn encoded_len(payload_len: usize) -> usize {
    HEADER_LEN + payload_len
}

/// Encode `payload` into `buffer`
///
/// Returns the number of bytes written.
pub fn encode_frame<C: CrcCheck>(
    payload: &[u8],
    crc: &C,
    buffer: &mut [u8],
) -> Result<usize, FrameError> {
    if payload.len() > MAX_PAYLOAD_LEN {
        return Err(FrameError::PayloadTooLarge);
    }
    let frame_len = encoded_len(payload.len());
    if buffer.len() < frame_len {
        return Err(FrameError::BufferTooSmall);
    }

    let len = (payload.len() as u16).to_le_bytes();
    buffer[..4].copy_from_slice(&MAGIC);
    buffer[4] = len[0];
    buffer[5] = len[1];
    buffer[6] = crc.compute(Payload::from_slice(payload));
    buffer[HEADER_LEN..frame_len].copy_from_slice(payload);

    Ok(frame_len)
}
