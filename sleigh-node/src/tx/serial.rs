//! UART receive task
//!
//! Feeds every received byte to the frame decoder and publishes each
//! completed frame to the advertising task.

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::signal::Signal;
use embedded_io_async::{Error as _, Read};

use sleigh_core::shared::SharedBuffer;
use sleigh_protocol::crc::CrcCheck;
use sleigh_protocol::frame::{DecoderStats, FrameDecoder};

/// Bytes requested from the UART per read
const RX_BUF_SIZE: usize = 64;

/// Decode `bytes` and publish completed frames
///
/// `scratch` receives each frame's payload before it is copied to
/// `packet`, so the shared buffer only ever sees whole frames from this
/// side. A header declaring more payload than the ring can hold is dropped
/// as soon as it completes, otherwise the decoder would wait for it
/// forever. Returns the number of frames published.
pub fn ingest<M: RawMutex, C: CrcCheck, const RING: usize, const N: usize>(
    decoder: &mut FrameDecoder<RING, C>,
    bytes: &[u8],
    scratch: &mut [u8; N],
    packet: &SharedBuffer<N>,
    ready: &Signal<M, ()>,
) -> usize {
    let mut published = 0;
    for &byte in bytes {
        let frames = decoder.feed(byte, scratch);
        if frames > 0 {
            packet.store(scratch);
            ready.signal(());
            published += frames;
        }

        let header = decoder.header();
        if header.is_complete() && header.len() as usize > RING {
            warn!("Frame of {} bytes exceeds {}-byte ring, resyncing", header.len(), RING);
            decoder.reset();
        }
    }
    published
}

/// Serial RX task
pub async fn serial_rx<R, M, C, const RING: usize, const N: usize>(
    mut uart: R,
    decoder: &mut FrameDecoder<RING, C>,
    packet: &SharedBuffer<N>,
    ready: &Signal<M, ()>,
) -> !
where
    R: Read,
    M: RawMutex,
    C: CrcCheck,
{
    info!("Serial RX task started");

    let mut buf = [0u8; RX_BUF_SIZE];
    let mut scratch = [0u8; N];
    let mut last = decoder.stats();

    loop {
        match uart.read(&mut buf).await {
            Ok(n) if n > 0 => {
                trace!("RX: {} bytes", n);

                let frames = ingest(decoder, &buf[..n], &mut scratch, packet, ready);
                if frames > 0 {
                    debug!("{} frame(s) decoded, {} bytes buffered", frames, decoder.buffered());
                }

                let stats = decoder.stats();
                report(&last, &stats);
                last = stats;
            }
            Ok(_) => {
                // No bytes read, continue
            }
            Err(e) => {
                warn!("UART read error: {:?}", e.kind());
            }
        }
    }
}

fn report(last: &DecoderStats, now: &DecoderStats) {
    let dropped = now.crc_errors.wrapping_sub(last.crc_errors);
    if dropped > 0 {
        warn!("CRC mismatch, {} frame(s) dropped", dropped);
    }
    let skipped = now.desync_bytes.wrapping_sub(last.desync_bytes);
    if skipped > 0 {
        debug!("Resync: skipped {} byte(s)", skipped);
    }
    let lost = now.overflow_bytes.wrapping_sub(last.overflow_bytes);
    if lost > 0 {
        warn!("Ring buffer full, lost {} byte(s)", lost);
    }
}
