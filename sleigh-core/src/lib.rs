//! Board-agnostic core logic for the LED link firmware
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Pixel format and LED effect tags
//! - Strip configuration and frame sizing
//! - Lock-free shared pixel buffers
//! - The `LedStrip` driver trait
//! - The render coordinator task

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod config;
pub mod pixel;
pub mod render;
pub mod shared;
pub mod traits;

pub use pixel::{LedFx, Pixel};
pub use render::{RenderControl, RenderCoordinator, RenderMode};
pub use shared::{PixelSource, SharedBuffer};
