//! tx node: UART in, BLE advertisements out
//!
//! ```text
//!  UART ──▶ serial_rx ──▶ PACKET ──▶ refresh_loop ──▶ extended advertising
//!              │                          ▲
//!              └────── PACKET_READY ──────┘
//! ```

pub mod advertise;
pub mod serial;

use embassy_futures::join::join;
use embedded_io_async::Read;
use sleigh_hal::radio::Advertiser;
use sleigh_protocol::adv::AdPayload;
use sleigh_protocol::frame::FrameDecoder;

use crate::board::{DATA_LEN, DEVICE_NAME, UART_RING_SIZE};
use crate::channels::{PACKET, PACKET_READY};

pub use advertise::{refresh_loop, refresh_once};
pub use serial::{ingest, serial_rx};

/// Run the tx node
///
/// `advertiser` is an extended advertising set created with the device
/// name included; it is started on the first received frame.
pub async fn run<R: Read, A: Advertiser>(uart: R, advertiser: A) -> ! {
    info!("tx node starting as {}", DEVICE_NAME);

    let mut decoder: FrameDecoder<UART_RING_SIZE> = FrameDecoder::default();
    let mut payload: AdPayload<DATA_LEN> = AdPayload::new(DEVICE_NAME);

    let (never, _) = join(
        serial_rx(uart, &mut decoder, &PACKET, &PACKET_READY),
        refresh_loop(advertiser, &PACKET, &PACKET_READY, &mut payload),
    )
    .await;
    never
}
