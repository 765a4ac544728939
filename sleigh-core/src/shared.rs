//! Lock-free hand-off buffers
//!
//! The pixel and packet buffers are written from interrupt or radio
//! callback context and read from a task. Neither side may block the
//! other, so the buffer is an array of atomic bytes: every byte access is
//! whole, but a reader running concurrently with a writer can see a mix of
//! the old and the new frame. That tearing is accepted; the writer always
//! raises the "new data" signal after the copy, so the next read after a
//! completed write sees a consistent frame.

use portable_atomic::{AtomicU8, Ordering};

use crate::pixel::{Pixel, BYTES_PER_PIXEL};

/// Fixed-size byte buffer shared between one producer and one consumer
pub struct SharedBuffer<const N: usize> {
    bytes: [AtomicU8; N],
}

impl<const N: usize> Default for SharedBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> SharedBuffer<N> {
    /// All-zero buffer, usable in a `static`
    pub const fn new() -> Self {
        Self {
            bytes: [const { AtomicU8::new(0) }; N],
        }
    }

    /// Buffer size in bytes
    pub const fn len(&self) -> usize {
        N
    }

    /// Check if the buffer has zero capacity
    pub const fn is_empty(&self) -> bool {
        N == 0
    }

    /// Overwrite the buffer with `src`, truncating or zero-padding it
    pub fn store(&self, src: &[u8]) {
        let mut src = src.iter().copied();
        for byte in &self.bytes {
            byte.store(src.next().unwrap_or(0), Ordering::Relaxed);
        }
    }

    /// Copy the buffer into `dst`; bytes of `dst` past `N` are zeroed
    pub fn load(&self, dst: &mut [u8]) {
        for (i, out) in dst.iter_mut().enumerate() {
            *out = self.bytes.get(i).map_or(0, |b| b.load(Ordering::Relaxed));
        }
    }
}

/// Something the renderer can pull pixels from
pub trait PixelSource {
    /// Fill `out` with the current pixels, missing ones read as off
    fn load_pixels(&self, out: &mut [Pixel]);
}

impl<const N: usize> PixelSource for SharedBuffer<N> {
    fn load_pixels(&self, out: &mut [Pixel]) {
        for (i, pixel) in out.iter_mut().enumerate() {
            let mut bytes = [0u8; BYTES_PER_PIXEL];
            for (j, byte) in bytes.iter_mut().enumerate() {
                *byte = self
                    .bytes
                    .get(i * BYTES_PER_PIXEL + j)
                    .map_or(0, |b| b.load(Ordering::Relaxed));
            }
            *pixel = Pixel::from_bytes(bytes);
        }
    }
}
