//! Render loop

use embassy_sync::blocking_mutex::raw::RawMutex;

use super::{RenderControl, RenderMode};
use crate::pixel::Pixel;
use crate::shared::PixelSource;
use crate::traits::{LedStrip, StripError};

/// Owns the pixel buffer and drives one strip
pub struct RenderCoordinator<'a, M: RawMutex, S: LedStrip, const N: usize> {
    strip: S,
    control: &'a RenderControl<M>,
    source: Option<&'a dyn PixelSource>,
    pixels: [Pixel; N],
}

impl<'a, M: RawMutex, S: LedStrip, const N: usize> RenderCoordinator<'a, M, S, N> {
    /// Create a coordinator with every pixel off and no data source
    pub fn new(strip: S, control: &'a RenderControl<M>) -> Self {
        Self {
            strip,
            control,
            source: None,
            pixels: [Pixel::OFF; N],
        }
    }

    /// Register the external buffer mirrored in active mode
    pub fn register_data(&mut self, source: &'a dyn PixelSource) {
        self.source = Some(source);
    }

    /// Pixels of the last rendered frame
    pub fn pixels(&self) -> &[Pixel; N] {
        &self.pixels
    }

    /// The driven strip
    pub fn strip(&self) -> &S {
        &self.strip
    }

    /// Render one frame
    ///
    /// Active mode first waits for the new-data signal. The mode is read
    /// again once woken, since `set_idle` releases the wait too. Returns the
    /// mode the frame was rendered in.
    pub async fn run_once(&mut self) -> Result<RenderMode, StripError> {
        if self.control.mode() == RenderMode::Active {
            self.control.wait().await;
        }

        let mode = self.control.mode();
        match (mode, self.source) {
            (RenderMode::Active, Some(source)) => source.load_pixels(&mut self.pixels),
            _ => self.pixels.fill(Pixel::OFF),
        }

        self.strip.update_rgb(&self.pixels).await?;
        Ok(mode)
    }

    /// Render forever
    ///
    /// Strip failures go to `on_error` and the loop carries on.
    pub async fn run(&mut self, mut on_error: impl FnMut(StripError)) -> ! {
        loop {
            if let Err(e) = self.run_once().await {
                on_error(e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::SharedBuffer;
    use embassy_futures::{block_on, poll_once};
    use embassy_sync::blocking_mutex::raw::NoopRawMutex;

    /// Records frames; pends forever once `limit` updates have been made
    struct MockStrip {
        frames: Vec<Vec<Pixel>>,
        fail: bool,
        limit: usize,
    }

    impl MockStrip {
        fn new() -> Self {
            Self {
                frames: Vec::new(),
                fail: false,
                limit: usize::MAX,
            }
        }
    }

    impl LedStrip for MockStrip {
        fn num_pixels(&self) -> usize {
            4
        }

        async fn update_rgb(&mut self, pixels: &[Pixel]) -> Result<(), StripError> {
            if self.frames.len() >= self.limit {
                core::future::pending::<()>().await;
            }
            self.frames.push(pixels.to_vec());
            if self.fail {
                Err(StripError::NoMemory)
            } else {
                Ok(())
            }
        }

        async fn update_channels(&mut self, _channels: &[u8]) -> Result<(), StripError> {
            Err(StripError::NotSupported)
        }
    }

    #[test]
    fn test_idle_renders_off_without_waiting() {
        let control: RenderControl<NoopRawMutex> = RenderControl::new();
        let buffer: SharedBuffer<16> = SharedBuffer::new();
        buffer.store(&[0xFF; 16]);

        let mut coordinator: RenderCoordinator<_, _, 4> =
            RenderCoordinator::new(MockStrip::new(), &control);
        coordinator.register_data(&buffer);

        assert_eq!(block_on(coordinator.run_once()), Ok(RenderMode::Idle));
        assert_eq!(block_on(coordinator.run_once()), Ok(RenderMode::Idle));
        assert_eq!(coordinator.strip().frames.len(), 2);
        assert!(coordinator.pixels().iter().all(|p| *p == Pixel::OFF));
    }

    #[test]
    fn test_active_waits_for_signal() {
        let control: RenderControl<NoopRawMutex> = RenderControl::new();
        let buffer: SharedBuffer<16> = SharedBuffer::new();
        let mut coordinator: RenderCoordinator<_, _, 4> =
            RenderCoordinator::new(MockStrip::new(), &control);
        coordinator.register_data(&buffer);

        control.set_idle(false);
        // Consume the signal raised by set_idle
        block_on(coordinator.run_once()).ok();
        let rendered = coordinator.strip().frames.len();

        assert!(poll_once(coordinator.run_once()).is_pending());
        assert_eq!(coordinator.strip().frames.len(), rendered);

        buffer.store(&[1, 2, 3, 0, 4, 5, 6, 0]);
        control.notify();
        assert_eq!(block_on(coordinator.run_once()), Ok(RenderMode::Active));
        assert_eq!(coordinator.pixels()[0], Pixel::new(1, 2, 3));
        assert_eq!(coordinator.pixels()[1], Pixel::new(4, 5, 6));
        assert_eq!(coordinator.pixels()[2], Pixel::OFF);
    }

    #[test]
    fn test_latest_data_wins() {
        let control: RenderControl<NoopRawMutex> = RenderControl::new();
        let buffer: SharedBuffer<16> = SharedBuffer::new();
        let mut coordinator: RenderCoordinator<_, _, 4> =
            RenderCoordinator::new(MockStrip::new(), &control);
        coordinator.register_data(&buffer);
        control.set_idle(false);

        buffer.store(&[1; 16]);
        control.notify();
        buffer.store(&[2; 16]);
        control.notify();

        block_on(coordinator.run_once()).ok();
        assert_eq!(coordinator.strip().frames.len(), 1);
        assert_eq!(coordinator.pixels()[3], Pixel::from_bytes([2; 4]));
        assert!(poll_once(coordinator.run_once()).is_pending());
    }

    #[test]
    fn test_set_idle_releases_active_wait() {
        let control: RenderControl<NoopRawMutex> = RenderControl::new();
        let buffer: SharedBuffer<16> = SharedBuffer::new();
        buffer.store(&[7; 16]);
        let mut coordinator: RenderCoordinator<_, _, 4> =
            RenderCoordinator::new(MockStrip::new(), &control);
        coordinator.register_data(&buffer);

        control.set_idle(false);
        block_on(coordinator.run_once()).ok();
        assert_eq!(coordinator.pixels()[0], Pixel::from_bytes([7; 4]));

        control.set_idle(true);
        assert_eq!(block_on(coordinator.run_once()), Ok(RenderMode::Idle));
        assert!(coordinator.pixels().iter().all(|p| *p == Pixel::OFF));
    }

    #[test]
    fn test_active_without_source_renders_off() {
        let control: RenderControl<NoopRawMutex> = RenderControl::new();
        let mut coordinator: RenderCoordinator<_, _, 4> =
            RenderCoordinator::new(MockStrip::new(), &control);

        control.set_idle(false);
        assert_eq!(block_on(coordinator.run_once()), Ok(RenderMode::Active));
        assert!(coordinator.pixels().iter().all(|p| *p == Pixel::OFF));
    }

    #[test]
    fn test_run_reports_errors_and_continues() {
        let control: RenderControl<NoopRawMutex> = RenderControl::new();
        let mut strip = MockStrip::new();
        strip.fail = true;
        strip.limit = 3;
        let mut coordinator: RenderCoordinator<_, _, 4> = RenderCoordinator::new(strip, &control);

        let mut errors = Vec::new();
        let poll = poll_once(coordinator.run(|e| errors.push(e)));
        assert!(poll.is_pending());
        assert_eq!(errors, [StripError::NoMemory; 3]);
    }
}
