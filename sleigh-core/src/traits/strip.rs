//! LED strip driver trait

use crate::config::ConfigError;
use crate::pixel::Pixel;

/// Errors reported by a strip update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StripError {
    /// No transmit block became available in time
    NoMemory,
    /// Peripheral rejected an operation (driver status code)
    Peripheral(i32),
    /// Channel mapping entry the encoder does not know
    InvalidColorMapping(u8),
    /// Invalid strip configuration
    Config(ConfigError),
    /// Operation not implemented by this driver
    NotSupported,
}

impl From<ConfigError> for StripError {
    fn from(e: ConfigError) -> Self {
        StripError::Config(e)
    }
}

/// Trait for addressable LED strips
#[allow(async_fn_in_trait)]
pub trait LedStrip {
    /// Pixels on the strip
    fn num_pixels(&self) -> usize;

    /// Show `pixels` on the strip
    ///
    /// Returns once the frame is on the wire and the strip has latched it.
    async fn update_rgb(&mut self, pixels: &[Pixel]) -> Result<(), StripError>;

    /// Write raw channel values in on-wire order
    async fn update_channels(&mut self, channels: &[u8]) -> Result<(), StripError>;
}
