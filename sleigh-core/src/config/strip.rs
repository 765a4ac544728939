//! LED strip configuration
//!
//! Board-defined and immutable. A board declares one [`StripConfig`] as a
//! `const`, the strip driver validates it once at bring-up and keeps a
//! reference to it.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Reset words sent before the pixel data, so the first pixel isn't skipped
pub const PRE_DELAY_WORDS: usize = 1;

/// Duration of one I2S word on the wire, in microseconds
pub const RESET_QUANTUM_US: u32 = 20;

/// Bytes per encoded word
pub const WORD_SIZE: usize = 4;

/// Upper bound on channels per pixel (RGBW)
pub const MAX_COLORS: usize = 4;

/// Logical color channel (devicetree `LED_COLOR_ID_*` values)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u8)]
pub enum ColorId {
    White = 0,
    Red = 1,
    Green = 2,
    Blue = 3,
}

impl TryFrom<u8> for ColorId {
    type Error = ConfigError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(ColorId::White),
            1 => Ok(ColorId::Red),
            2 => Ok(ColorId::Green),
            3 => Ok(ColorId::Blue),
            other => Err(ConfigError::InvalidColorMapping(other)),
        }
    }
}

/// Output polarity of the data line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Polarity {
    /// Idle low, pulses high
    #[default]
    ActiveHigh,
    /// Idle high, pulses low (inverting level shifter)
    ActiveLow,
}

/// 4-bit pulse symbols and idle word for one polarity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Symbols {
    /// Symbol for a set bit
    pub one: u8,
    /// Symbol for a cleared bit
    pub zero: u8,
    /// Word holding the line at its idle level
    pub reset_word: u32,
}

impl Polarity {
    /// Symbols to encode with
    pub const fn symbols(self) -> Symbols {
        match self {
            Polarity::ActiveHigh => Symbols {
                one: 0xE,
                zero: 0x8,
                reset_word: 0x0000_0000,
            },
            Polarity::ActiveLow => Symbols {
                one: 0x1,
                zero: 0x7,
                reset_word: 0xFFFF_FFFF,
            },
        }
    }
}

/// Configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Channel mapping entry outside white/red/green/blue
    InvalidColorMapping(u8),
    /// No channels mapped
    EmptyColorMapping,
    /// More channels than [`MAX_COLORS`]
    TooManyColors,
    /// Strip without pixels
    NoPixels,
    /// Encoded frame does not fit the transmit block
    FrameTooLarge,
}

/// Number of trailing reset words for a reset delay, rounded up to 20 µs
pub const fn reset_words(reset_delay_us: u32) -> usize {
    reset_delay_us.div_ceil(RESET_QUANTUM_US) as usize
}

/// LED strip hardware configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StripConfig {
    num_pixels: u16,
    color_mapping: &'static [u8],
    polarity: Polarity,
    reset_delay_us: u32,
}

impl StripConfig {
    /// Describe a strip
    ///
    /// `color_mapping` lists the on-wire channel order as `ColorId` values,
    /// e.g. `[2, 1, 3]` for GRB. It is checked by [`validate`](Self::validate).
    pub const fn new(
        num_pixels: u16,
        color_mapping: &'static [u8],
        polarity: Polarity,
        reset_delay_us: u32,
    ) -> Self {
        Self {
            num_pixels,
            color_mapping,
            polarity,
            reset_delay_us,
        }
    }

    /// Check the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.num_pixels == 0 {
            return Err(ConfigError::NoPixels);
        }
        if self.color_mapping.is_empty() {
            return Err(ConfigError::EmptyColorMapping);
        }
        if self.color_mapping.len() > MAX_COLORS {
            return Err(ConfigError::TooManyColors);
        }
        for &entry in self.color_mapping {
            ColorId::try_from(entry)?;
        }
        Ok(())
    }

    /// Pixels on the strip
    pub const fn num_pixels(&self) -> usize {
        self.num_pixels as usize
    }

    /// Raw on-wire channel order
    pub const fn color_mapping(&self) -> &'static [u8] {
        self.color_mapping
    }

    /// Channels per pixel
    pub const fn num_colors(&self) -> usize {
        self.color_mapping.len()
    }

    /// Output polarity
    pub const fn polarity(&self) -> Polarity {
        self.polarity
    }

    /// Minimum quiet time after the data, in microseconds
    pub const fn reset_delay_us(&self) -> u32 {
        self.reset_delay_us
    }

    /// Trailing reset words
    pub const fn reset_words(&self) -> usize {
        reset_words(self.reset_delay_us)
    }

    /// Words in one full strip frame
    pub const fn frame_words(&self) -> usize {
        PRE_DELAY_WORDS + self.num_colors() * self.num_pixels() + self.reset_words()
    }

    /// Bytes in one full strip frame
    pub const fn frame_bytes(&self) -> usize {
        self.frame_words() * WORD_SIZE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GRB: &[u8] = &[ColorId::Green as u8, ColorId::Red as u8, ColorId::Blue as u8];

    #[test]
    fn test_reset_words_round_up() {
        assert_eq!(reset_words(0), 0);
        assert_eq!(reset_words(1), 1);
        assert_eq!(reset_words(20), 1);
        assert_eq!(reset_words(50), 3);
        assert_eq!(reset_words(280), 14);
    }

    #[test]
    fn test_frame_size() {
        let config = StripConfig::new(68, GRB, Polarity::ActiveHigh, 50);
        assert_eq!(config.frame_words(), 1 + 3 * 68 + 3);
        assert_eq!(config.frame_bytes(), (1 + 3 * 68 + 3) * 4);
    }

    #[test]
    fn test_validate_rejects_unknown_channel() {
        let config = StripConfig::new(8, &[2, 1, 7], Polarity::ActiveHigh, 50);
        assert_eq!(config.validate(), Err(ConfigError::InvalidColorMapping(7)));
    }

    #[test]
    fn test_validate_limits() {
        assert_eq!(
            StripConfig::new(0, GRB, Polarity::ActiveHigh, 50).validate(),
            Err(ConfigError::NoPixels)
        );
        assert_eq!(
            StripConfig::new(8, &[], Polarity::ActiveHigh, 50).validate(),
            Err(ConfigError::EmptyColorMapping)
        );
        assert_eq!(
            StripConfig::new(8, &[0, 1, 2, 3, 0], Polarity::ActiveHigh, 50).validate(),
            Err(ConfigError::TooManyColors)
        );
        assert_eq!(StripConfig::new(8, &[0, 1, 2, 3], Polarity::ActiveLow, 50).validate(), Ok(()));
    }

    #[test]
    fn test_polarity_symbols() {
        let high = Polarity::ActiveHigh.symbols();
        assert_eq!((high.one, high.zero, high.reset_word), (0xE, 0x8, 0));

        let low = Polarity::ActiveLow.symbols();
        assert_eq!((low.one, low.zero, low.reset_word), (0x1, 0x7, 0xFFFF_FFFF));
    }
}
