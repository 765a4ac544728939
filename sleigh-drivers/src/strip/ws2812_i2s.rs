//! WS2812 strip driver over I2S
//!
//! The data line is the I2S serial output running at 3.2 Mbit/s. Every
//! update allocates one transmit block from the pool, encodes the whole
//! frame into it and hands it to the peripheral, which returns the block to
//! the pool once it has been clocked out.
//!
//! # Usage
//!
//! ```ignore
//! let mut strip = I2sStrip::new(&STRIP, i2s, &POOL, Delay)?;
//! strip.update_rgb(&pixels).await?;
//! ```

use embedded_hal_async::delay::DelayNs;
use sleigh_core::config::{ConfigError, StripConfig};
use sleigh_core::pixel::Pixel;
use sleigh_core::traits::{LedStrip, StripError};
use sleigh_hal::i2s::{ClockOptions, DataFormat, I2sConfig, I2sError, I2sTx, Trigger, WriteError};
use sleigh_hal::pool::BlockPool;

use super::encoder::encode_frame_words;

/// How long to wait for a free transmit block
pub const ALLOC_TIMEOUT_MS: u32 = 10_000;

/// Wait after draining before the next frame may start
///
/// Well above the few milliseconds a 68-pixel frame actually takes.
pub const SETTLE_MS: u32 = 500;

/// I2S word clock (LRCK); 2 x 16 bits per period gives a 3.2 MHz bit clock
pub const FRAME_CLOCK_HZ: u32 = 100_000;

/// Peripheral-side timeout for queueing a block
pub const WRITE_TIMEOUT_MS: u32 = 1000;

/// WS2812 strip on an I2S transmitter
pub struct I2sStrip<'a, T, P, D> {
    config: &'a StripConfig,
    i2s: T,
    pool: &'a P,
    delay: D,
}

impl<'a, T, P, D> I2sStrip<'a, T, P, D>
where
    P: BlockPool,
    T: I2sTx<Block = P::Block>,
    D: DelayNs,
{
    /// Bring up the strip
    ///
    /// Configures the peripheral for the frame size of `config`, then
    /// validates the channel mapping. Either failure leaves the strip
    /// unusable.
    pub fn new(
        config: &'a StripConfig,
        mut i2s: T,
        pool: &'a P,
        delay: D,
    ) -> Result<Self, StripError> {
        let i2s_config = I2sConfig {
            word_size: 16,
            channels: 2,
            format: DataFormat::I2s,
            options: ClockOptions::MASTER,
            frame_clk_freq: FRAME_CLOCK_HZ,
            block_size: config.frame_bytes(),
            timeout_ms: WRITE_TIMEOUT_MS,
        };

        i2s.configure(&i2s_config).map_err(|e| {
            error!("Failed to configure I2S device: {}", e.code());
            StripError::Peripheral(e.code())
        })?;

        config.validate().map_err(|e| {
            error!("Invalid strip configuration: {:?}", e);
            StripError::Config(e)
        })?;

        if config.frame_words() > pool.block_len() {
            error!(
                "Frame of {} words does not fit {}-word blocks",
                config.frame_words(),
                pool.block_len()
            );
            return Err(StripError::Config(ConfigError::FrameTooLarge));
        }

        info!(
            "WS2812 strip: {} pixels, {} bytes per frame",
            config.num_pixels(),
            config.frame_bytes()
        );

        Ok(Self {
            config,
            i2s,
            pool,
            delay,
        })
    }

    /// Strip configuration
    pub fn config(&self) -> &StripConfig {
        self.config
    }

    /// The underlying transmitter
    pub fn i2s(&self) -> &T {
        &self.i2s
    }

    fn trigger(&mut self, cmd: Trigger) -> Result<(), StripError> {
        self.i2s.trigger(cmd).map_err(|e| {
            error!("Failed to trigger {:?} on TX: {}", cmd, e.code());
            StripError::Peripheral(e.code())
        })
    }
}

impl<'a, T, P, D> LedStrip for I2sStrip<'a, T, P, D>
where
    P: BlockPool,
    T: I2sTx<Block = P::Block>,
    D: DelayNs,
{
    fn num_pixels(&self) -> usize {
        self.config.num_pixels()
    }

    async fn update_rgb(&mut self, pixels: &[Pixel]) -> Result<(), StripError> {
        let mut block = self.pool.alloc(ALLOC_TIMEOUT_MS).await.map_err(|_| {
            error!("Unable to allocate a TX block");
            StripError::NoMemory
        })?;

        if let Err(e) = encode_frame_words(self.config, pixels, &mut block) {
            self.pool.free(block);
            return Err(e);
        }

        if let Err(WriteError { block, error }) =
            self.i2s.write(block, self.config.frame_bytes()).await
        {
            self.pool.free(block);
            error!("Failed to write data: {}", error.code());
            return Err(StripError::Peripheral(error.code()));
        }

        self.trigger(Trigger::Start)?;
        self.trigger(Trigger::Drain)?;

        self.delay.delay_ms(SETTLE_MS).await;
        Ok(())
    }

    async fn update_channels(&mut self, _channels: &[u8]) -> Result<(), StripError> {
        error!("update_channels not implemented");
        Err(StripError::NotSupported)
    }
}
