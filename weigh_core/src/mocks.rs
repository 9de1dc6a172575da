//! Test doubles shared by unit tests, integration tests, and benches.

use std::collections::VecDeque;
use std::time::Duration;
use weigh_traits::{AdvertisementSource, RawAdvertisement};

use crate::decoder::MODEL_MARKER;

/// Source that replays a fixed queue of advertisements, then reports quiet.
pub struct VecSource {
    queue: VecDeque<RawAdvertisement>,
}

impl VecSource {
    pub fn new(adverts: impl IntoIterator<Item = RawAdvertisement>) -> Self {
        Self {
            queue: adverts.into_iter().collect(),
        }
    }
}

impl AdvertisementSource for VecSource {
    fn recv(
        &mut self,
        timeout: Duration,
    ) -> Result<Option<RawAdvertisement>, Box<dyn std::error::Error + Send + Sync>> {
        match self.queue.pop_front() {
            Some(adv) => Ok(Some(adv)),
            None => {
                // Simulate the blocking wait of a real scanner with nothing
                // on the air.
                std::thread::sleep(timeout);
                Ok(None)
            }
        }
    }
}

/// Source whose transport is broken; every receive fails.
pub struct FailingSource;

impl AdvertisementSource for FailingSource {
    fn recv(
        &mut self,
        _timeout: Duration,
    ) -> Result<Option<RawAdvertisement>, Box<dyn std::error::Error + Send + Sync>> {
        Err("bluetooth adapter unavailable".into())
    }
}

/// Build a well-formed scale advertisement carrying `weight_lbs`.
///
/// Encodes tenths of a pound across the company-id high byte and the first
/// payload byte, with the model marker in place.
pub fn scale_advertisement(weight_lbs: f64) -> RawAdvertisement {
    let raw = (weight_lbs * 10.0).round().clamp(0.0, f64::from(u16::MAX)) as u16;
    let company_id: u16 = ((raw >> 8) << 8) | 0x01;
    let mut blob = vec![company_id as u8, (company_id >> 8) as u8];
    blob.push(raw as u8);
    blob.extend_from_slice(&[0x00, 0x00, 0x00]);
    blob.extend_from_slice(MODEL_MARKER);
    RawAdvertisement::new(Some("UREVO".to_owned()), Some(blob))
}
