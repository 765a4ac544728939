//! Board configuration
//!
//! Both nodes are built for the same strip and must agree on these values.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use sleigh_core::config::{ColorId, Polarity, StripConfig};
use sleigh_core::pixel::BYTES_PER_PIXEL;
use sleigh_drivers::pool::SlabPool;
use sleigh_protocol::frame::DEFAULT_RING_SIZE;

/// Pixels on the strip
pub const NUM_PIXELS: usize = 68;

/// Pixel buffer size carried over both links
pub const DATA_LEN: usize = NUM_PIXELS * BYTES_PER_PIXEL;

/// UART receive ring buffer
pub const UART_RING_SIZE: usize = DEFAULT_RING_SIZE;

/// Name advertised by the tx node
pub const DEVICE_NAME: &str = "santa-tx";

/// Name prefix the rx node accepts
pub const PEER_NAME_PREFIX: &str = "santa";

/// Strip channel order on the wire
pub const COLOR_MAPPING: &[u8] = &[
    ColorId::Green as u8,
    ColorId::Red as u8,
    ColorId::Blue as u8,
];

/// The rx node's strip
pub const STRIP: StripConfig =
    StripConfig::new(NUM_PIXELS as u16, COLOR_MAPPING, Polarity::ActiveHigh, 280);

/// Words in one encoded strip frame, for sizing the transmit pool
pub const STRIP_FRAME_WORDS: usize = STRIP.frame_words();

/// Transmit blocks in the pool
pub const STRIP_POOL_BLOCKS: usize = 2;

/// Transmit block pool shared by the strip driver and the I2S peripheral
pub type StripPool = SlabPool<CriticalSectionRawMutex, STRIP_FRAME_WORDS, STRIP_POOL_BLOCKS>;
