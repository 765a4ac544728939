//! Fixed-slot block pool
//!
//! `N` blocks of `WORDS` words each. The first `N` allocations create
//! fresh blocks; after that blocks only circulate through a bounded
//! channel. A task waiting in [`alloc`](SlabPool::alloc) is woken as soon
//! as the peripheral frees a block, or gives up after the timeout.
//!
//! The constructor is `const`, so a board declares its pool as a plain
//! `static`.

use core::ops::{Deref, DerefMut};

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::channel::Channel;
use embassy_time::{with_timeout, Duration};
use portable_atomic::{AtomicUsize, Ordering};
use sleigh_hal::pool::{BlockPool, PoolError};

/// One block on loan from a [`SlabPool`]
#[derive(Debug)]
pub struct SlabBlock<const WORDS: usize> {
    words: [u32; WORDS],
}

impl<const WORDS: usize> Deref for SlabBlock<WORDS> {
    type Target = [u32];

    fn deref(&self) -> &[u32] {
        &self.words
    }
}

impl<const WORDS: usize> DerefMut for SlabBlock<WORDS> {
    fn deref_mut(&mut self) -> &mut [u32] {
        &mut self.words
    }
}

impl<const WORDS: usize> SlabBlock<WORDS> {
    const fn zeroed() -> Self {
        Self { words: [0; WORDS] }
    }
}

/// Pool of `N` blocks of `WORDS` words
pub struct SlabPool<M: RawMutex, const WORDS: usize, const N: usize> {
    free: Channel<M, SlabBlock<WORDS>, N>,
    /// Blocks created so far, never more than `N`
    created: AtomicUsize,
}

impl<M: RawMutex, const WORDS: usize, const N: usize> Default for SlabPool<M, WORDS, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: RawMutex, const WORDS: usize, const N: usize> SlabPool<M, WORDS, N> {
    /// Create a pool with every block free
    pub const fn new() -> Self {
        Self {
            free: Channel::new(),
            created: AtomicUsize::new(0),
        }
    }

    fn create(&self) -> Option<SlabBlock<WORDS>> {
        self.created
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| (n < N).then_some(n + 1))
            .ok()
            .map(|_| SlabBlock::zeroed())
    }
}

impl<M: RawMutex, const WORDS: usize, const N: usize> BlockPool for SlabPool<M, WORDS, N> {
    type Block = SlabBlock<WORDS>;

    async fn alloc(&self, timeout_ms: u32) -> Result<SlabBlock<WORDS>, PoolError> {
        if let Ok(block) = self.free.try_receive() {
            return Ok(block);
        }
        if let Some(block) = self.create() {
            return Ok(block);
        }

        with_timeout(Duration::from_millis(timeout_ms as u64), self.free.receive())
            .await
            .map_err(|_| {
                warn!("No free block after {} ms", timeout_ms);
                PoolError::Timeout
            })
    }

    fn free(&self, block: SlabBlock<WORDS>) {
        if self.free.try_send(block).is_err() {
            // More frees than allocations: the block is not one of ours
            error!("Block freed into a full pool");
        }
    }

    fn block_len(&self) -> usize {
        WORDS
    }

    fn available(&self) -> usize {
        self.free.len() + N.saturating_sub(self.created.load(Ordering::Acquire))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embassy_futures::block_on;
    use embassy_sync::blocking_mutex::raw::{CriticalSectionRawMutex, NoopRawMutex};

    #[test]
    fn test_alloc_and_free() {
        let pool: SlabPool<NoopRawMutex, 8, 2> = SlabPool::new();
        assert_eq!(pool.available(), 2);
        assert_eq!(pool.block_len(), 8);

        let mut a = block_on(pool.alloc(10)).unwrap();
        let b = block_on(pool.alloc(10)).unwrap();
        assert_eq!(pool.available(), 0);
        assert_eq!(a.len(), 8);

        a[0] = 0xAA;
        pool.free(a);
        pool.free(b);
        assert_eq!(pool.available(), 2);
    }

    #[test]
    fn test_alloc_times_out_when_exhausted() {
        let pool: SlabPool<NoopRawMutex, 4, 1> = SlabPool::new();
        let _held = block_on(pool.alloc(10)).unwrap();
        assert_eq!(block_on(pool.alloc(20)).err(), Some(PoolError::Timeout));
    }

    #[test]
    fn test_free_into_full_pool_is_dropped() {
        let pool: SlabPool<NoopRawMutex, 4, 1> = SlabPool::new();
        let block = block_on(pool.alloc(10)).unwrap();
        pool.free(block);
        pool.free(SlabBlock::zeroed());
        assert_eq!(pool.available(), 1);
    }

    #[test]
    fn test_pool_in_static() {
        static POOL: SlabPool<CriticalSectionRawMutex, 4, 2> = SlabPool::new();
        assert_eq!(POOL.available(), 2);

        let block = block_on(POOL.alloc(10)).unwrap();
        assert_eq!(&block[..], &[0; 4]);
        assert_eq!(POOL.available(), 1);

        POOL.free(block);
        assert_eq!(POOL.available(), 2);
    }

    #[test]
    fn test_freed_block_is_reused() {
        let pool: SlabPool<NoopRawMutex, 4, 1> = SlabPool::new();
        let mut block = block_on(pool.alloc(10)).unwrap();
        block[0] = 0x1234;
        pool.free(block);

        let block = block_on(pool.alloc(10)).unwrap();
        assert_eq!(block[0], 0x1234);
    }
}
