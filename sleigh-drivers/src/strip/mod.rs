//! LED strip drivers

pub mod encoder;
pub mod ws2812_i2s;

pub use encoder::{encode_byte, encode_frame_words};
pub use ws2812_i2s::I2sStrip;
