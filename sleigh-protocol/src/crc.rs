//! Frame validation hooks
//!
//! The header carries a single CRC byte. Which algorithm (if any) covers
//! the payload is a deployment choice, so the decoder only talks to the
//! [`CrcCheck`] trait.

use crate::frame::{FrameHeader, Payload};

/// Frame validation hook
pub trait CrcCheck {
    /// CRC byte to put in the header for `payload`
    fn compute(&self, payload: Payload<'_>) -> u8;

    /// Check a fully buffered frame
    fn check(&self, header: &FrameHeader, payload: Payload<'_>) -> bool {
        self.compute(payload) == header.crc()
    }
}

/// Accepts every frame whatever its CRC byte
///
/// This is what the deployed tx node runs: the host sends a zero CRC byte
/// and nothing is verified. Corrupted payloads are delivered as-is.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptDeclared;

impl CrcCheck for AcceptDeclared {
    fn compute(&self, _payload: Payload<'_>) -> u8 {
        0
    }

    fn check(&self, _header: &FrameHeader, _payload: Payload<'_>) -> bool {
        true
    }
}

/// CRC-8/CCITT over the payload (poly 0x07, init 0x00, no reflection)
#[derive(Debug, Clone, Copy, Default)]
pub struct Crc8Ccitt;

impl Crc8Ccitt {
    const POLY: u8 = 0x07;

    fn update(mut crc: u8, byte: u8) -> u8 {
        crc ^= byte;
        for _ in 0..8 {
            crc = if crc & 0x80 != 0 {
                (crc << 1) ^ Self::POLY
            } else {
                crc << 1
            };
        }
        crc
    }
}

impl CrcCheck for Crc8Ccitt {
    fn compute(&self, payload: Payload<'_>) -> u8 {
        payload.iter().fold(0, Self::update)
    }
}
