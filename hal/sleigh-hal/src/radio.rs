//! BLE advertising and scanning abstractions
//!
//! Only the slice of the radio stack the LED link touches: replacing the
//! data of one extended advertising set, and receiving scan reports.

/// Advertising data types (Bluetooth assigned numbers)
pub mod ad_type {
    /// Flags
    pub const FLAGS: u8 = 0x01;
    /// Shortened local name
    pub const NAME_SHORTENED: u8 = 0x08;
    /// Complete local name
    pub const NAME_COMPLETE: u8 = 0x09;
    /// Manufacturer specific data
    pub const MANUFACTURER_DATA: u8 = 0xFF;
}

/// Size of the length field of one AD structure
pub const AD_LEN_SIZE: usize = 1;

/// Size of the type field of one AD structure
pub const AD_TYPE_SIZE: usize = 1;

/// Radio stack status codes
pub trait RadioError: core::fmt::Debug {
    /// Raw status code reported by the radio stack
    fn code(&self) -> i32;
}

impl RadioError for i32 {
    fn code(&self) -> i32 {
        *self
    }
}

/// One advertising data element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AdStructure<'a> {
    /// AD type, see [`ad_type`]
    pub ad_type: u8,
    /// Element payload, without length and type
    pub data: &'a [u8],
}

impl<'a> AdStructure<'a> {
    /// Create a new AD element
    pub const fn new(ad_type: u8, data: &'a [u8]) -> Self {
        Self { ad_type, data }
    }
}

/// Extended advertising set
#[allow(async_fn_in_trait)]
pub trait Advertiser {
    /// Error type for advertising operations
    type Error: RadioError;

    /// Stop advertising (required before replacing long data)
    async fn stop(&mut self) -> Result<(), Self::Error>;

    /// Replace the advertising data
    async fn set_data(&mut self, ad: &[AdStructure<'_>]) -> Result<(), Self::Error>;

    /// Start (or restart) advertising
    async fn start(&mut self) -> Result<(), Self::Error>;
}

/// Passive scanner
#[allow(async_fn_in_trait)]
pub trait Scanner {
    /// Error type for scan operations
    type Error: RadioError;

    /// Start scanning, delivering reports to the registered callback
    async fn start(&mut self) -> Result<(), Self::Error>;
}

/// One received advertising report
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ScanReport<'a> {
    /// Advertiser address
    pub addr: [u8; 6],
    /// Received signal strength (dBm)
    pub rssi: i8,
    /// Advertised TX power (dBm)
    pub tx_power: i8,
    /// Advertising PDU type
    pub adv_type: u8,
    /// Periodic advertising interval (1.25 ms units, 0 if none)
    pub interval: u16,
    /// Raw advertising data (length-type-value elements)
    pub data: &'a [u8],
}

/// Receiver of scan reports
///
/// Called from the radio stack's own context. Implementations must not
/// block.
pub trait ScanCallback {
    /// Handle one advertising report
    fn on_report(&self, report: &ScanReport<'_>);
}
