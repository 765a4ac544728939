//! Transmit block pools

pub mod slab;

pub use slab::{SlabBlock, SlabPool};
