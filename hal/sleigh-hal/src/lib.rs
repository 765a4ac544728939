//! Sleigh Hardware Abstraction Layer
//!
//! This crate defines the collaborator interfaces the node logic is written
//! against. Chip-specific crates implement them on top of the vendor
//! peripheral drivers and radio stack.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Node logic (sleigh-node, drivers)      │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  sleigh-hal (this crate - traits)       │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │  I2S + slab   │       │  BLE stack    │
//! │  (chip HAL)   │       │  (adv / scan) │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`i2s::I2sTx`] - I2S transmitter used as a pulse generator
//! - [`pool::BlockPool`] - Bounded pool of transmit blocks
//! - [`radio::Advertiser`], [`radio::Scanner`], [`radio::ScanCallback`] -
//!   Connectionless BLE advertising and scanning
//!
//! The serial byte source is `embedded_io_async::Read` and is not
//! redefined here.

#![no_std]
#![deny(unsafe_code)]

pub mod i2s;
pub mod pool;
pub mod radio;

// Re-export key traits at crate root for convenience
pub use i2s::{I2sConfig, I2sError, I2sTx, Trigger, WriteError};
pub use pool::{BlockPool, PoolError};
pub use radio::{AdStructure, Advertiser, RadioError, ScanCallback, ScanReport, Scanner};
