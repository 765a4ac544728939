//! rx node: BLE scan reports in, WS2812 frames out
//!
//! ```text
//!  scanner ──▶ SCAN_HANDLER ──▶ PIXELS ──▶ render_loop ──▶ I2sStrip
//!                   │  └──── RENDER ──────────┘
//!                   └─────── ACTIVITY ──▶ activity_loop ──▶ status LED
//! ```

pub mod activity;
pub mod render;
pub mod scan;

use core::convert::Infallible;

use embassy_futures::join::join;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embedded_hal::digital::OutputPin;
use embedded_hal_async::delay::DelayNs;

use sleigh_core::render::RenderCoordinator;
use sleigh_core::traits::StripError;
use sleigh_drivers::pool::SlabBlock;
use sleigh_drivers::strip::I2sStrip;
use sleigh_hal::i2s::I2sTx;
use sleigh_hal::radio::{RadioError, Scanner};

use crate::board::{NUM_PIXELS, STRIP, STRIP_FRAME_WORDS};
use crate::channels::{ACTIVITY, PIXELS, RENDER, STRIP_POOL};

pub use activity::activity_loop;
pub use render::render_loop;
pub use scan::ScanHandler;

/// Run the rx node
///
/// The chip crate registers [`SCAN_HANDLER`](crate::channels::SCAN_HANDLER)
/// as the scan callback and hands [`STRIP_POOL`] to its I2S driver for
/// releasing sent blocks before calling this. The strip starts dark and
/// switches to received pixels on the first accepted advertisement.
///
/// Only returns if the strip cannot be brought up.
pub async fn run<T, D, C, P>(
    i2s: T,
    delay: D,
    mut scanner: C,
    led: P,
) -> Result<Infallible, StripError>
where
    T: I2sTx<Block = SlabBlock<STRIP_FRAME_WORDS>>,
    D: DelayNs + Clone,
    C: Scanner,
    P: OutputPin,
{
    let strip = I2sStrip::new(&STRIP, i2s, &STRIP_POOL, delay.clone())?;

    let mut coordinator: RenderCoordinator<'static, CriticalSectionRawMutex, _, NUM_PIXELS> =
        RenderCoordinator::new(strip, &RENDER);
    coordinator.register_data(&PIXELS);
    RENDER.set_idle(true);

    info!("Start scanning");
    if let Err(e) = scanner.start().await {
        error!("Scan start failed: {}", e.code());
    }

    let (never, _) = join(
        render_loop(&mut coordinator),
        activity_loop(led, &ACTIVITY, delay),
    )
    .await;
    never
}
