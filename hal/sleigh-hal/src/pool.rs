//! Bounded memory pool abstraction
//!
//! Transmit blocks for the strip driver come from a fixed number of
//! pre-sized slots. The pool is shared by reference between the task that
//! fills a block and the peripheral that drains it.

use core::ops::DerefMut;

/// Errors returned by [`BlockPool::alloc`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PoolError {
    /// No block became free before the timeout elapsed
    Timeout,
}

/// Pool of fixed-size word blocks
#[allow(async_fn_in_trait)]
pub trait BlockPool {
    /// A block on loan from the pool
    type Block: DerefMut<Target = [u32]>;

    /// Take a block, waiting up to `timeout_ms` for one to be freed
    async fn alloc(&self, timeout_ms: u32) -> Result<Self::Block, PoolError>;

    /// Return a block to the pool
    fn free(&self, block: Self::Block);

    /// Capacity of every block, in words
    fn block_len(&self) -> usize;

    /// Number of blocks currently available
    fn available(&self) -> usize;
}
