//! Advertising refresh task
//!
//! Long extended advertising data can only be replaced while the set is
//! stopped, so every refresh is stop, copy, set data, start.
//!
//! The copy from [`PACKET`](crate::channels::PACKET) is not synchronised
//! with the serial task. A frame decoded during the copy can leave a mix of
//! two frames on air until the next refresh, which follows right away since
//! that frame also raised the signal.

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::signal::Signal;

use sleigh_core::shared::SharedBuffer;
use sleigh_hal::radio::{Advertiser, RadioError};
use sleigh_protocol::adv::AdPayload;

/// Replace the advertised pixels with the latest packet
pub async fn refresh_once<A: Advertiser, const N: usize>(
    advertiser: &mut A,
    packet: &SharedBuffer<N>,
    payload: &mut AdPayload<N>,
) -> Result<(), A::Error> {
    advertiser.stop().await?;
    packet.load(payload.data_mut());
    advertiser.set_data(&payload.structures()).await?;
    advertiser.start().await
}

/// Advertising task: refresh on every new packet
pub async fn refresh_loop<A: Advertiser, M: RawMutex, const N: usize>(
    mut advertiser: A,
    packet: &SharedBuffer<N>,
    ready: &Signal<M, ()>,
    payload: &mut AdPayload<N>,
) -> ! {
    info!("Advertising task started, data split at {}", payload.boundary());

    loop {
        ready.wait().await;
        debug!("Refreshing advertising data");

        if let Err(e) = refresh_once(&mut advertiser, packet, payload).await {
            error!("Advertising refresh failed: {}", e.code());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embassy_futures::{block_on, poll_once};
    use embassy_sync::blocking_mutex::raw::NoopRawMutex;
    use sleigh_hal::radio::{ad_type, AdStructure};

    #[derive(Debug, PartialEq)]
    enum Call {
        Stop,
        SetData(Vec<(u8, Vec<u8>)>),
        Start,
    }

    #[derive(Default)]
    struct MockAdvertiser {
        calls: Vec<Call>,
        fail_stop: bool,
    }

    impl Advertiser for &mut MockAdvertiser {
        type Error = i32;

        async fn stop(&mut self) -> Result<(), i32> {
            if self.fail_stop {
                return Err(-120);
            }
            self.calls.push(Call::Stop);
            Ok(())
        }

        async fn set_data(&mut self, ad: &[AdStructure<'_>]) -> Result<(), i32> {
            self.calls.push(Call::SetData(
                ad.iter().map(|s| (s.ad_type, s.data.to_vec())).collect(),
            ));
            Ok(())
        }

        async fn start(&mut self) -> Result<(), i32> {
            self.calls.push(Call::Start);
            Ok(())
        }
    }

    #[test]
    fn test_refresh_sequence() {
        let mut advertiser = MockAdvertiser::default();
        let packet: SharedBuffer<8> = SharedBuffer::new();
        packet.store(&[1, 2, 3, 4, 5, 6, 7, 8]);
        // Name of 248 bytes leaves a 5-byte first chunk
        let mut payload: AdPayload<8> = AdPayload::new(core::str::from_utf8(&[b'a'; 248]).unwrap());

        block_on(refresh_once(&mut &mut advertiser, &packet, &mut payload)).unwrap();

        assert_eq!(
            advertiser.calls,
            [
                Call::Stop,
                Call::SetData(vec![
                    (ad_type::MANUFACTURER_DATA, vec![1, 2, 3, 4, 5]),
                    (ad_type::MANUFACTURER_DATA, vec![6, 7, 8]),
                ]),
                Call::Start,
            ]
        );
    }

    #[test]
    fn test_refresh_stops_on_error() {
        let mut advertiser = MockAdvertiser {
            fail_stop: true,
            ..Default::default()
        };
        let packet: SharedBuffer<4> = SharedBuffer::new();
        let mut payload: AdPayload<4> = AdPayload::new("santa-tx");

        assert_eq!(
            block_on(refresh_once(&mut &mut advertiser, &packet, &mut payload)),
            Err(-120)
        );
        assert!(advertiser.calls.is_empty());
    }

    #[test]
    fn test_loop_waits_for_packet() {
        let mut advertiser = MockAdvertiser::default();
        let packet: SharedBuffer<4> = SharedBuffer::new();
        let ready: Signal<NoopRawMutex, ()> = Signal::new();
        let mut payload: AdPayload<4> = AdPayload::new("santa-tx");

        let task = refresh_loop(&mut advertiser, &packet, &ready, &mut payload);
        assert!(poll_once(task).is_pending());
        assert!(advertiser.calls.is_empty());

        packet.store(&[0xAA; 4]);
        ready.signal(());
        let task = refresh_loop(&mut advertiser, &packet, &ready, &mut payload);
        assert!(poll_once(task).is_pending());
        assert_eq!(advertiser.calls.len(), 3);
        assert_eq!(payload.data(), &[0xAA; 4]);
    }

    #[test]
    fn test_loop_survives_errors() {
        let mut advertiser = MockAdvertiser {
            fail_stop: true,
            ..Default::default()
        };
        let packet: SharedBuffer<4> = SharedBuffer::new();
        let ready: Signal<NoopRawMutex, ()> = Signal::new();
        let mut payload: AdPayload<4> = AdPayload::new("santa-tx");

        ready.signal(());
        let task = refresh_loop(&mut advertiser, &packet, &ready, &mut payload);
        assert!(poll_once(task).is_pending());
        assert!(!ready.signaled());
    }
}
