//! Scan report handling
//!
//! Runs in the radio stack's callback context: it only copies bytes and
//! raises signals, never blocks.

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::signal::Signal;

use sleigh_core::render::RenderControl;
use sleigh_core::shared::SharedBuffer;
use sleigh_hal::radio::{ScanCallback, ScanReport};
use sleigh_protocol::adv::{find_name, reassemble_manufacturer_data, NameFilter};

/// Accepts the tx node's advertisements and publishes their pixels
pub struct ScanHandler<'a, M: RawMutex, const N: usize> {
    filter: NameFilter,
    pixels: &'a SharedBuffer<N>,
    control: &'a RenderControl<M>,
    activity: &'a Signal<M, ()>,
}

impl<'a, M: RawMutex, const N: usize> ScanHandler<'a, M, N> {
    /// Create a handler
    pub const fn new(
        filter: NameFilter,
        pixels: &'a SharedBuffer<N>,
        control: &'a RenderControl<M>,
        activity: &'a Signal<M, ()>,
    ) -> Self {
        Self {
            filter,
            pixels,
            control,
            activity,
        }
    }
}

impl<M: RawMutex, const N: usize> ScanCallback for ScanHandler<'_, M, N> {
    fn on_report(&self, report: &ScanReport<'_>) {
        if !self.filter.accepts(report.data) {
            return;
        }

        debug!(
            "[DEVICE]: {:?}, AD evt type {}, Tx Pwr: {}, RSSI {} {:?} Interval: {} ({} ms) Len {}",
            report.addr,
            report.adv_type,
            report.tx_power,
            report.rssi,
            find_name(report.data),
            report.interval,
            report.interval as u32 * 5 / 4,
            report.data.len()
        );

        let mut scratch = [0u8; N];
        let received = reassemble_manufacturer_data(report.data, &mut scratch);
        if received > 0 {
            self.pixels.store(&scratch);
        } else {
            debug!("No manufacturer data, keeping previous pixels");
        }

        self.control.set_idle(false);
        self.activity.signal(());
    }
}
