pub mod clock;

pub use clock::{Clock, MonotonicClock};

/// A single Bluetooth LE advertisement as delivered by a scanning backend.
///
/// `manufacturer_data` is the raw manufacturer-specific blob including the
/// 2-byte company-id prefix; decoding is the consumer's concern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawAdvertisement {
    pub local_name: Option<String>,
    pub manufacturer_data: Option<Vec<u8>>,
}

impl RawAdvertisement {
    pub fn new(local_name: Option<String>, manufacturer_data: Option<Vec<u8>>) -> Self {
        Self {
            local_name,
            manufacturer_data,
        }
    }
}

/// Source of discovered advertisements (Bluetooth scanner, capture replay, ...).
///
/// `recv` blocks for at most `timeout` and returns:
/// - `Ok(Some(adv))` when an advertisement arrived,
/// - `Ok(None)` when nothing arrived within the timeout (a quiet period is
///   normal around an advertising scale, not an error),
/// - `Err(..)` on a transport failure.
pub trait AdvertisementSource {
    fn recv(
        &mut self,
        timeout: std::time::Duration,
    ) -> Result<Option<RawAdvertisement>, Box<dyn std::error::Error + Send + Sync>>;
}
