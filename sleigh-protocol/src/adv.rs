//! Pixel payload transport over BLE advertising data.
//!
//! The tx node advertises the whole pixel buffer in one extended
//! advertising set. A single AD structure cannot hold it next to the device
//! name, so the buffer goes out as two manufacturer-data structures:
//!
//! ```text
//! ┌──────────────┬─────────────────────────┬──────────────────────┐
//! │ NAME         │ MANUFACTURER_DATA #1    │ MANUFACTURER_DATA #2 │
//! │ 2 + name_len │ data[..boundary]        │ data[boundary..]     │
//! └──────────────┴─────────────────────────┴──────────────────────┘
//!   boundary = 255 - (2 + name_len)
//! ```
//!
//! The rx node filters reports by name prefix and concatenates the
//! manufacturer-data structures back in receipt order.

use sleigh_hal::radio::{ad_type, AdStructure, AD_LEN_SIZE, AD_TYPE_SIZE};

/// Largest advertising payload a single structure group may use
pub const MAX_AD_PAYLOAD: usize = 255;

/// Overhead of the name AD structure besides the name itself
pub const NAME_AD_OVERHEAD: usize = AD_LEN_SIZE + AD_TYPE_SIZE;

/// Longest name kept when parsing reports
pub const MAX_NAME_LEN: usize = 29;

/// Split point of the pixel buffer for a given device name length
pub const fn split_boundary(device_name_len: usize) -> usize {
    MAX_AD_PAYLOAD.saturating_sub(NAME_AD_OVERHEAD + device_name_len)
}

/// AD-visible copy of the pixel buffer
///
/// Only touched by the advertising task. The radio stack reads it through
/// the structures returned by [`structures`](Self::structures).
#[derive(Debug, Clone)]
pub struct AdPayload<const N: usize> {
    data: [u8; N],
    boundary: usize,
}

impl<const N: usize> AdPayload<N> {
    /// Create an all-zero payload for a device advertising `device_name`
    pub const fn new(device_name: &str) -> Self {
        let boundary = split_boundary(device_name.len());
        Self {
            data: [0; N],
            boundary: if boundary < N { boundary } else { N },
        }
    }

    /// Where the buffer is split
    pub fn boundary(&self) -> usize {
        self.boundary
    }

    /// Replace the payload, truncating or zero-padding `src`
    pub fn load(&mut self, src: &[u8]) {
        let len = src.len().min(N);
        self.data[..len].copy_from_slice(&src[..len]);
        self.data[len..].fill(0);
    }

    /// Mutable access for in-place refresh
    pub fn data_mut(&mut self) -> &mut [u8; N] {
        &mut self.data
    }

    /// The payload bytes
    pub fn data(&self) -> &[u8; N] {
        &self.data
    }

    /// The two manufacturer-data structures to advertise
    pub fn structures(&self) -> [AdStructure<'_>; 2] {
        let (first, second) = self.data.split_at(self.boundary);
        [
            AdStructure::new(ad_type::MANUFACTURER_DATA, first),
            AdStructure::new(ad_type::MANUFACTURER_DATA, second),
        ]
    }
}

/// Iterator over the length-type-value elements of advertising data
///
/// Stops at a zero length (early termination padding) or at an element
/// running past the end of the data.
#[derive(Debug, Clone)]
pub struct AdIter<'a> {
    data: &'a [u8],
}

impl<'a> AdIter<'a> {
    /// Iterate over raw advertising data
    pub fn new(data: &'a [u8]) -> Self {
        Self { data }
    }
}

impl<'a> Iterator for AdIter<'a> {
    type Item = AdStructure<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let (&len, rest) = self.data.split_first()?;
        let len = len as usize;
        if len == 0 || len > rest.len() {
            self.data = &[];
            return None;
        }

        let (element, rest) = rest.split_at(len);
        self.data = rest;
        Some(AdStructure::new(element[0], &element[1..]))
    }
}

/// The first shortened or complete name in `data`, at most [`MAX_NAME_LEN`] bytes
pub fn find_name(data: &[u8]) -> Option<&[u8]> {
    AdIter::new(data)
        .find(|ad| matches!(ad.ad_type, ad_type::NAME_SHORTENED | ad_type::NAME_COMPLETE))
        .map(|ad| &ad.data[..ad.data.len().min(MAX_NAME_LEN)])
}

/// Case-sensitive prefix match; names shorter than the prefix never match
pub fn name_matches(name: &[u8], prefix: &[u8]) -> bool {
    name.len() >= prefix.len() && &name[..prefix.len()] == prefix
}

/// Accepts advertising data whose name starts with a fixed prefix
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct NameFilter {
    prefix: &'static str,
}

impl NameFilter {
    /// Create a filter for `prefix`
    pub const fn new(prefix: &'static str) -> Self {
        Self { prefix }
    }

    /// The prefix this filter accepts
    pub fn prefix(&self) -> &'static str {
        self.prefix
    }

    /// Check advertising data
    pub fn accepts(&self, data: &[u8]) -> bool {
        find_name(data).is_some_and(|name| name_matches(name, self.prefix.as_bytes()))
    }
}

/// Rebuild the pixel buffer from advertising data
///
/// `dst` is zeroed, then every manufacturer-data structure is appended in
/// order until `dst` is full. Returns the total manufacturer-data length
/// received, which may exceed `dst.len()`.
pub fn reassemble_manufacturer_data(data: &[u8], dst: &mut [u8]) -> usize {
    dst.fill(0);

    let mut received = 0;
    for ad in AdIter::new(data).filter(|ad| ad.ad_type == ad_type::MANUFACTURER_DATA) {
        if received < dst.len() {
            let len = ad.data.len().min(dst.len() - received);
            dst[received..received + len].copy_from_slice(&ad.data[..len]);
        }
        received += ad.data.len();
    }
    received
}
