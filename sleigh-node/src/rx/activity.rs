//! Status LED
//!
//! Toggles the board LED a fixed time after an accepted advertisement.
//! Reports arriving while a toggle is pending collapse into it, so the LED
//! blinks at most once per period however fast the tx node advertises.

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::signal::Signal;
use embedded_hal::digital::{Error as _, OutputPin, PinState};
use embedded_hal_async::delay::DelayNs;

/// Delay between an accepted report and the LED toggle
pub const BLINK_MS: u32 = 500;

/// Status LED task
pub async fn activity_loop<P: OutputPin, M: RawMutex, D: DelayNs>(
    mut led: P,
    activity: &Signal<M, ()>,
    mut delay: D,
) -> ! {
    let mut on = true;
    if let Err(e) = led.set_high() {
        warn!("Status LED error: {:?}", e.kind());
    }

    loop {
        activity.wait().await;
        delay.delay_ms(BLINK_MS).await;
        activity.reset();

        on = !on;
        if let Err(e) = led.set_state(PinState::from(on)) {
            warn!("Status LED error: {:?}", e.kind());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::{Cell, RefCell};
    use core::convert::Infallible;
    use embassy_futures::poll_once;
    use embassy_sync::blocking_mutex::raw::NoopRawMutex;

    #[derive(Default)]
    struct MockLed {
        states: RefCell<Vec<bool>>,
    }

    impl embedded_hal::digital::ErrorType for &MockLed {
        type Error = Infallible;
    }

    impl OutputPin for &MockLed {
        fn set_low(&mut self) -> Result<(), Infallible> {
            self.states.borrow_mut().push(false);
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Infallible> {
            self.states.borrow_mut().push(true);
            Ok(())
        }
    }

    #[derive(Default)]
    struct MockDelay {
        total_ms: Cell<u32>,
    }

    impl DelayNs for &MockDelay {
        async fn delay_ns(&mut self, ns: u32) {
            self.total_ms.set(self.total_ms.get() + ns / 1_000_000);
        }
    }

    #[test]
    fn test_led_on_at_start() {
        let led = MockLed::default();
        let delay = MockDelay::default();
        let activity: Signal<NoopRawMutex, ()> = Signal::new();

        assert!(poll_once(activity_loop(&led, &activity, &delay)).is_pending());
        assert_eq!(*led.states.borrow(), [true]);
        assert_eq!(delay.total_ms.get(), 0);
    }

    #[test]
    fn test_toggle_after_report() {
        let led = MockLed::default();
        let delay = MockDelay::default();
        let activity: Signal<NoopRawMutex, ()> = Signal::new();

        activity.signal(());
        assert!(poll_once(activity_loop(&led, &activity, &delay)).is_pending());
        assert_eq!(*led.states.borrow(), [true, false]);
        assert_eq!(delay.total_ms.get(), BLINK_MS);
    }
}
