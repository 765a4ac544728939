//! Node firmware logic
//!
//! Two boards share this crate:
//!
//! - **tx**: reads pixel frames from the host over UART and advertises the
//!   latest one as BLE manufacturer data
//! - **rx**: scans for the tx node's advertisements and renders the pixels
//!   on a WS2812 strip
//!
//! Tasks are written against the sleigh-hal traits; a chip crate supplies
//! the UART, radio, I2S and GPIO implementations and spawns
//! [`tx::run`] or [`rx::run`].

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

#[macro_use]
mod fmt;

pub mod board;
pub mod channels;
pub mod rx;
pub mod tx;
