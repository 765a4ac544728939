//! Sleigh wire protocols
//!
//! Two links carry pixel data between the host and the LED strip:
//!
//! - **Serial** (host → tx node): length-delimited frames, see [`frame`]
//! ```text
//! ┌───────┬────────┬─────┬─────────────┐
//! │ MAGIC │ LENGTH │ CRC │ PAYLOAD     │
//! │ 4B    │ 2B LE  │ 1B  │ 0–65535B    │
//! └───────┴────────┴─────┴─────────────┘
//! ```
//! - **Radio** (tx node → rx node): the pixel buffer split over two
//!   manufacturer-data advertising structures, see [`adv`]
//!
//! The payload of both is the same fixed-size pixel buffer: `r g b fx` per
//! pixel.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod adv;
pub mod crc;
pub mod frame;

pub use adv::{AdIter, AdPayload, NameFilter};
pub use crc::{AcceptDeclared, Crc8Ccitt, CrcCheck};
pub use frame::{
    encode_frame, DecoderStats, FrameDecoder, FrameError, FrameHeader, Payload, HEADER_LEN, MAGIC,
};
