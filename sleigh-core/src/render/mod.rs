//! Strip rendering
//!
//! The renderer runs as its own task. It either keeps the strip dark
//! (idle) or mirrors an externally owned pixel buffer (active), re-rendering
//! whenever the producer raises the "new data" signal.
//!
//! ```text
//!   producer ──store──▶ SharedBuffer ◀──load── RenderCoordinator ──▶ LedStrip
//!       │                                         ▲
//!       └──────────── RenderControl::notify ──────┘
//! ```

mod coordinator;

pub use coordinator::RenderCoordinator;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::signal::Signal;
use portable_atomic::{AtomicBool, Ordering};

/// Rendering mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RenderMode {
    /// Every pixel off, no waiting between frames
    Idle,
    /// Mirror the registered pixel source on every new-data signal
    Active,
}

/// Mode flag and "new data" signal shared with producers
///
/// The signal is binary: notifications raised while the renderer is busy
/// collapse into one, and the renderer always reads the latest buffer
/// contents.
pub struct RenderControl<M: RawMutex> {
    idle: AtomicBool,
    updated: Signal<M, ()>,
}

impl<M: RawMutex> Default for RenderControl<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: RawMutex> RenderControl<M> {
    /// Starts idle
    pub const fn new() -> Self {
        Self {
            idle: AtomicBool::new(true),
            updated: Signal::new(),
        }
    }

    /// Switch between idle and active rendering
    ///
    /// The signal is raised before the mode changes so a renderer blocked
    /// in an active wait is released.
    pub fn set_idle(&self, idle: bool) {
        self.updated.signal(());
        self.idle.store(idle, Ordering::Release);
    }

    /// Announce new pixel data
    pub fn notify(&self) {
        self.updated.signal(());
    }

    /// Check if the renderer is idle
    pub fn is_idle(&self) -> bool {
        self.idle.load(Ordering::Acquire)
    }

    /// Current mode
    pub fn mode(&self) -> RenderMode {
        if self.is_idle() {
            RenderMode::Idle
        } else {
            RenderMode::Active
        }
    }

    /// Wait for the next notification
    pub async fn wait(&self) {
        self.updated.wait().await;
    }

    /// Check for a pending notification without consuming it
    pub fn is_pending(&self) -> bool {
        self.updated.signaled()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embassy_futures::{block_on, poll_once};
    use embassy_sync::blocking_mutex::raw::NoopRawMutex;

    #[test]
    fn test_starts_idle() {
        let control: RenderControl<NoopRawMutex> = RenderControl::new();
        assert!(control.is_idle());
        assert_eq!(control.mode(), RenderMode::Idle);
        assert!(!control.is_pending());
    }

    #[test]
    fn test_set_idle_raises_signal() {
        let control: RenderControl<NoopRawMutex> = RenderControl::new();
        control.set_idle(false);
        assert_eq!(control.mode(), RenderMode::Active);
        assert!(control.is_pending());
        block_on(control.wait());
        assert!(!control.is_pending());
    }

    #[test]
    fn test_notifications_collapse() {
        let control: RenderControl<NoopRawMutex> = RenderControl::new();
        control.notify();
        control.notify();
        control.notify();

        block_on(control.wait());
        assert!(poll_once(control.wait()).is_pending());
    }
}
