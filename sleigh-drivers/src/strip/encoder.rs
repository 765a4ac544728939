//! WS2812 bit-serial encoding for an I2S data line
//!
//! With a 100 kHz frame clock and 16-bit stereo words the bit clock runs at
//! 3.2 MHz, so every strip bit is four I2S bits (1.25 µs). A set bit is sent
//! as `1110` (long high pulse), a cleared bit as `1000` (short high pulse).
//! One color byte therefore fills one 32-bit word:
//!
//! ```text
//!  bit:     7    6    5    4    3    2    1    0
//!  nibble: [31:28]                         [3:0]
//!  then the 16-bit halves swap, because the peripheral sends the
//!  left-channel half-word first
//! ```
//!
//! Inverting level shifters flip every symbol and the idle level.

use sleigh_core::config::{ColorId, ConfigError, StripConfig, PRE_DELAY_WORDS};
use sleigh_core::pixel::Pixel;
use sleigh_core::traits::StripError;

/// Encode one color byte into a 32-bit I2S word
pub const fn encode_byte(color: u8, one: u8, zero: u8) -> u32 {
    let mut word = 0u32;
    let mut bit: u32 = 0;
    while bit < 8 {
        let symbol = if color & (1u8 << bit) != 0 { one } else { zero };
        word |= ((symbol & 0xF) as u32) << (bit * 4);
        bit += 1;
    }
    word.rotate_left(16)
}

/// Build a complete strip frame in `out`
///
/// Writes the pre-delay reset word, one word per configured channel for
/// each of the strip's pixels, then the trailing reset words. Pixels past
/// the end of `pixels` are sent as off, extra pixels are ignored. Returns
/// the number of words written.
pub fn encode_frame_words(
    config: &StripConfig,
    pixels: &[Pixel],
    out: &mut [u32],
) -> Result<usize, StripError> {
    let frame_words = config.frame_words();
    if out.len() < frame_words {
        return Err(StripError::Config(ConfigError::FrameTooLarge));
    }

    let symbols = config.polarity().symbols();
    let (pre, rest) = out.split_at_mut(PRE_DELAY_WORDS);
    pre.fill(symbols.reset_word);

    let mut words = rest.iter_mut();
    for i in 0..config.num_pixels() {
        let pixel = pixels.get(i).copied().unwrap_or(Pixel::OFF);
        for &entry in config.color_mapping() {
            let color = ColorId::try_from(entry)
                .map_err(|_| StripError::InvalidColorMapping(entry))?;
            if let Some(word) = words.next() {
                *word = encode_byte(pixel.channel(color), symbols.one, symbols.zero);
            }
        }
    }

    for word in words.take(config.reset_words()) {
        *word = symbols.reset_word;
    }

    Ok(frame_words)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use sleigh_core::config::Polarity;

    const GRB: &[u8] = &[ColorId::Green as u8, ColorId::Red as u8, ColorId::Blue as u8];

    fn high(color: u8) -> u32 {
        let s = Polarity::ActiveHigh.symbols();
        encode_byte(color, s.one, s.zero)
    }

    #[test]
    fn test_known_words() {
        assert_eq!(high(0x00), 0x8888_8888);
        assert_eq!(high(0xFF), 0xEEEE_EEEE);
        assert_eq!(high(0x01), 0x888E_8888);
        assert_eq!(high(0x80), 0x8888_E888);
    }

    #[test]
    fn test_active_low_words() {
        let s = Polarity::ActiveLow.symbols();
        assert_eq!(encode_byte(0x00, s.one, s.zero), 0x7777_7777);
        assert_eq!(encode_byte(0xFF, s.one, s.zero), 0x1111_1111);
    }

    #[test]
    fn test_frame_layout() {
        let config = StripConfig::new(2, GRB, Polarity::ActiveHigh, 50);
        let pixels = [Pixel::new(0xFF, 0x00, 0x01), Pixel::new(0, 0xFF, 0)];
        let mut out = [0xDEAD_BEEFu32; 16];

        let words = encode_frame_words(&config, &pixels, &mut out).unwrap();
        assert_eq!(words, 1 + 3 * 2 + 3);
        assert_eq!(
            &out[..words],
            &[
                0,
                // pixel 0: G R B
                high(0x00),
                high(0xFF),
                high(0x01),
                // pixel 1
                high(0xFF),
                high(0x00),
                high(0x00),
                0,
                0,
                0,
            ]
        );
        // Untouched beyond the frame
        assert_eq!(out[words], 0xDEAD_BEEF);
    }

    #[test]
    fn test_white_channel_reads_zero() {
        let config = StripConfig::new(1, &[1, 2, 3, 0], Polarity::ActiveHigh, 0);
        let mut out = [0u32; 5];
        encode_frame_words(&config, &[Pixel::new(0xFF, 0xFF, 0xFF)], &mut out).unwrap();
        assert_eq!(out[4], high(0x00));
    }

    #[test]
    fn test_missing_pixels_are_off() {
        let config = StripConfig::new(3, GRB, Polarity::ActiveLow, 20);
        let mut out = [0u32; 11];
        let words = encode_frame_words(&config, &[Pixel::new(1, 2, 3)], &mut out).unwrap();

        assert_eq!(words, 11);
        let s = Polarity::ActiveLow.symbols();
        assert_eq!(out[0], 0xFFFF_FFFF);
        assert!(out[4..10]
            .iter()
            .all(|&w| w == encode_byte(0, s.one, s.zero)));
        assert_eq!(out[10], 0xFFFF_FFFF);
    }

    #[test]
    fn test_invalid_mapping_aborts() {
        let config = StripConfig::new(1, &[2, 9, 3], Polarity::ActiveHigh, 50);
        let mut out = [0u32; 8];
        assert_eq!(
            encode_frame_words(&config, &[Pixel::OFF], &mut out),
            Err(StripError::InvalidColorMapping(9))
        );
    }

    #[test]
    fn test_block_too_small() {
        let config = StripConfig::new(4, GRB, Polarity::ActiveHigh, 50);
        let mut out = [0u32; 8];
        assert_eq!(
            encode_frame_words(&config, &[], &mut out),
            Err(StripError::Config(ConfigError::FrameTooLarge))
        );
    }

    proptest! {
        #[test]
        fn prop_nibbles_follow_bits(color in any::<u8>()) {
            let word = high(color).rotate_left(16);
            for bit in 0..8 {
                let nibble = (word >> (bit * 4)) & 0xF;
                let expected = if color & (1 << bit) != 0 { 0xE } else { 0x8 };
                prop_assert_eq!(nibble, expected);
            }
        }

        #[test]
        fn prop_polarities_are_complementary(color in any::<u8>()) {
            let low = Polarity::ActiveLow.symbols();
            prop_assert_eq!(encode_byte(color, low.one, low.zero), !high(color));
        }
    }
}
