//! Session controller: advertisement in, at most one weigh-in record out.
//!
//! Glues the decoder and stabilizer together the way a live scan loop uses
//! them, and enforces the one-record-per-settlement rule: once a settlement
//! is emitted the stabilizer stays locked, so a person standing on the scale
//! cannot produce duplicate records. Stepping off long enough to trip the
//! idle timeout re-arms the machine for the next weigh-in.

use std::sync::Arc;
use std::time::{Instant, SystemTime};

use weigh_traits::{Clock, MonotonicClock, RawAdvertisement};

use crate::config::StabilizerCfg;
use crate::decoder;
use crate::error::Result;
use crate::event::StabilizerEvent;
use crate::stabilizer::WeightStabilizer;

/// A confirmed weigh-in, ready for the caller to persist.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeighIn {
    pub weight_lbs: f64,
    pub recorded_at: SystemTime,
}

/// Outcome of routing one advertisement through the session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SessionUpdate {
    /// Not from a supported scale, or carried no decodable weight.
    Skipped,
    /// Live stabilizer status for on-screen feedback.
    Status(StabilizerEvent),
    /// A settlement completed; persist this exactly once.
    Recorded(WeighIn),
}

/// Running totals over a session, exposed for diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionCounters {
    pub advertisements: u64,
    pub candidates: u64,
    pub decoded: u64,
    pub settled: u64,
}

pub struct WeighSession {
    stabilizer: WeightStabilizer,
    clock: Arc<dyn Clock + Send + Sync>,
    counters: SessionCounters,
}

impl WeighSession {
    pub fn new(cfg: StabilizerCfg) -> Result<Self> {
        Self::with_clock(cfg, Arc::new(MonotonicClock))
    }

    pub fn with_clock(cfg: StabilizerCfg, clock: Arc<dyn Clock + Send + Sync>) -> Result<Self> {
        Ok(Self {
            stabilizer: WeightStabilizer::with_clock(cfg, Arc::clone(&clock))?,
            clock,
            counters: SessionCounters::default(),
        })
    }

    /// Route one advertisement, stamped with the injected clock's "now".
    pub fn handle(&mut self, adv: &RawAdvertisement) -> SessionUpdate {
        let now = self.clock.now();
        self.handle_at(adv, now)
    }

    /// Route one advertisement observed at an explicit instant.
    pub fn handle_at(&mut self, adv: &RawAdvertisement, now: Instant) -> SessionUpdate {
        self.counters.advertisements += 1;

        let parsed = adv
            .manufacturer_data
            .as_deref()
            .and_then(decoder::parse_company_id_and_payload);
        let payload = parsed.map(|(_, payload)| payload);
        if !decoder::is_candidate(adv.local_name.as_deref(), payload) {
            return SessionUpdate::Skipped;
        }
        self.counters.candidates += 1;

        // A name-only frame identifies the device but carries no weight.
        let Some(weight) = parsed.and_then(|(cid, payload)| decoder::decode_weight(cid, payload))
        else {
            return SessionUpdate::Skipped;
        };
        self.counters.decoded += 1;

        match self.stabilizer.feed_at(weight, now) {
            StabilizerEvent::Settled { weight_lbs } => {
                self.counters.settled += 1;
                let weigh_in = WeighIn {
                    weight_lbs,
                    recorded_at: SystemTime::now(),
                };
                tracing::info!(weight_lbs, "weigh-in recorded");
                SessionUpdate::Recorded(weigh_in)
            }
            event => SessionUpdate::Status(event),
        }
    }

    /// Discard in-progress stabilizer state, e.g. when the user stops a
    /// weigh-in manually. Counters are kept.
    pub fn reset(&mut self) {
        self.stabilizer.reset();
    }

    pub fn counters(&self) -> SessionCounters {
        self.counters
    }

    pub fn stabilizer(&self) -> &WeightStabilizer {
        &self.stabilizer
    }
}
