//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in sleigh-core on top of the sleigh-hal peripheral traits:
//!
//! - WS2812 strip driver clocked out through an I2S transmitter
//! - Bit-serial pulse encoder for that driver
//! - Fixed-slot transmit block pool

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

#[macro_use]
mod fmt;

pub mod pool;
pub mod strip;
