//! Configuration types
//!
//! Board-defined, immutable configuration passed by reference into each
//! component's constructor.

pub mod strip;

pub use strip::*;
