//! Inter-task communication
//!
//! Statics shared by the tasks of one node. The byte buffers are lock-free
//! and may be observed mid-update; see [`SharedBuffer`].

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;

use sleigh_core::render::RenderControl;
use sleigh_core::shared::SharedBuffer;
use sleigh_protocol::adv::NameFilter;

use crate::board::{StripPool, DATA_LEN, PEER_NAME_PREFIX};
use crate::rx::scan::ScanHandler;

/// tx: latest payload decoded from the UART
pub static PACKET: SharedBuffer<DATA_LEN> = SharedBuffer::new();

/// tx: a new payload is in [`PACKET`]
pub static PACKET_READY: Signal<CriticalSectionRawMutex, ()> = Signal::new();

/// rx: latest pixels received over the air
pub static PIXELS: SharedBuffer<DATA_LEN> = SharedBuffer::new();

/// rx: render mode and new-data signal
pub static RENDER: RenderControl<CriticalSectionRawMutex> = RenderControl::new();

/// rx: transmit blocks for the strip; the I2S driver frees into it
pub static STRIP_POOL: StripPool = StripPool::new();

/// rx: an accepted advertisement arrived (status LED)
pub static ACTIVITY: Signal<CriticalSectionRawMutex, ()> = Signal::new();

/// rx: callback to register with the scanner
pub static SCAN_HANDLER: ScanHandler<'static, CriticalSectionRawMutex, DATA_LEN> =
    ScanHandler::new(NameFilter::new(PEER_NAME_PREFIX), &PIXELS, &RENDER, &ACTIVITY);
