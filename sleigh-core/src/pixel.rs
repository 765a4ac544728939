//! Pixel data as carried over the serial and radio links

use crate::config::ColorId;

/// Bytes per pixel on the wire (r, g, b, fx)
pub const BYTES_PER_PIXEL: usize = 4;

/// Effect tag carried with every pixel
///
/// The host assigns one per pixel. The renderer does not animate yet, so
/// the tag is only decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LedFx {
    Solid,
    SlowBlink,
    FastBlink,
    Breathe,
    /// Tag this firmware does not know about
    Other(u8),
}

impl From<u8> for LedFx {
    fn from(value: u8) -> Self {
        match value {
            0 => LedFx::Solid,
            1 => LedFx::SlowBlink,
            2 => LedFx::FastBlink,
            3 => LedFx::Breathe,
            other => LedFx::Other(other),
        }
    }
}

impl From<LedFx> for u8 {
    fn from(fx: LedFx) -> Self {
        match fx {
            LedFx::Solid => 0,
            LedFx::SlowBlink => 1,
            LedFx::FastBlink => 2,
            LedFx::Breathe => 3,
            LedFx::Other(value) => value,
        }
    }
}

/// One pixel: three color channels and an effect tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(C)]
pub struct Pixel {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub fx: u8,
}

impl Pixel {
    /// All channels off
    pub const OFF: Self = Self::new(0, 0, 0);

    /// Solid color
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, fx: 0 }
    }

    /// Same color with an effect tag
    pub fn with_fx(self, fx: LedFx) -> Self {
        Self {
            fx: fx.into(),
            ..self
        }
    }

    /// Decode from wire order
    pub const fn from_bytes(bytes: [u8; BYTES_PER_PIXEL]) -> Self {
        Self {
            r: bytes[0],
            g: bytes[1],
            b: bytes[2],
            fx: bytes[3],
        }
    }

    /// Encode in wire order
    pub const fn to_bytes(self) -> [u8; BYTES_PER_PIXEL] {
        [self.r, self.g, self.b, self.fx]
    }

    /// Effect tag
    pub fn effect(&self) -> LedFx {
        LedFx::from(self.fx)
    }

    /// Channel value; white reads as 0 since pixels carry no white channel
    pub fn channel(&self, color: ColorId) -> u8 {
        match color {
            ColorId::White => 0,
            ColorId::Red => self.r,
            ColorId::Green => self.g,
            ColorId::Blue => self.b,
        }
    }
}
