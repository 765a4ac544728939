//! I2S transmit abstractions
//!
//! The strip driver does not play audio: it abuses the word clock and the
//! serial data line as a programmable pulse generator. These traits only
//! cover the transmit direction it needs.

/// Peripheral status codes
///
/// Implementations report the underlying driver status so it can be logged
/// and propagated unchanged (negative errno values on most RTOS HALs).
pub trait I2sError: core::fmt::Debug {
    /// Raw status code reported by the peripheral driver
    fn code(&self) -> i32;
}

impl I2sError for i32 {
    fn code(&self) -> i32 {
        *self
    }
}

/// Failed write
///
/// The block is handed back so the caller can return it to its pool.
#[derive(Debug)]
pub struct WriteError<B, E> {
    /// The block that was not queued
    pub block: B,
    /// Driver status
    pub error: E,
}

/// I2S transmitter
///
/// On a successful [`write`](I2sTx::write) the peripheral takes ownership of
/// the block and releases it back to its pool once the data has left the
/// wire.
#[allow(async_fn_in_trait)]
pub trait I2sTx {
    /// Error type for transmit operations
    type Error: I2sError;

    /// Memory block accepted by [`write`](I2sTx::write)
    type Block;

    /// Apply a stream configuration
    fn configure(&mut self, config: &I2sConfig) -> Result<(), Self::Error>;

    /// Queue one block of `size` bytes for transmission
    ///
    /// Blocks the calling task until the block is queued.
    async fn write(
        &mut self,
        block: Self::Block,
        size: usize,
    ) -> Result<(), WriteError<Self::Block, Self::Error>>;

    /// Send a stream command
    fn trigger(&mut self, cmd: Trigger) -> Result<(), Self::Error>;
}

/// Stream commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Trigger {
    /// Start transmitting queued blocks
    Start,
    /// Stop after the current block
    Stop,
    /// Stop once every queued block has been sent
    Drain,
    /// Stop immediately and discard queued blocks
    Drop,
    /// Recover from an error state
    Prepare,
}

/// Serial data framing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DataFormat {
    /// Philips I2S
    I2s,
    /// Left-justified
    LeftJustified,
    /// Right-justified
    RightJustified,
}

/// Clock ownership options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ClockOptions {
    /// Peripheral drives the bit clock
    pub bit_clk_master: bool,
    /// Peripheral drives the word (frame) clock
    pub frame_clk_master: bool,
}

impl ClockOptions {
    /// Both clocks generated locally
    pub const MASTER: Self = Self {
        bit_clk_master: true,
        frame_clk_master: true,
    };
}

/// I2S stream configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct I2sConfig {
    /// Bits per word
    pub word_size: u8,
    /// Words per frame
    pub channels: u8,
    /// Data framing
    pub format: DataFormat,
    /// Clock ownership
    pub options: ClockOptions,
    /// Frame (word select) clock in Hz
    pub frame_clk_freq: u32,
    /// Size in bytes of every block handed to the peripheral
    pub block_size: usize,
    /// Driver-side timeout for queueing a block
    pub timeout_ms: u32,
}

impl Default for I2sConfig {
    fn default() -> Self {
        Self {
            word_size: 16,
            channels: 2,
            format: DataFormat::I2s,
            options: ClockOptions::MASTER,
            frame_clk_freq: 44_100,
            block_size: 0,
            timeout_ms: 1000,
        }
    }
}
