//! Windowed settle-detection state machine for scale readings.
//!
//! The stabilizer consumes a stream of (weight, timestamp) pairs and decides
//! when the person on the scale is standing still. It moves through three
//! phases:
//!
//! * `Collecting` gathers a sliding window and watches its spread.
//! * `Confirming` holds a stable weight against a stricter tolerance for a
//!   configured duration and sample count.
//! * `Locked` keeps reporting live readings after a settlement but will not
//!   settle again until reset (explicitly, or by the idle timeout).
//!
//! All buffers are strict FIFO sliding windows. The machine never raises an
//! error; ignorable input degrades to [`StabilizerEvent::None`].

use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use weigh_traits::{Clock, MonotonicClock};

use crate::config::StabilizerCfg;
use crate::error::{BuildError, Result};
use crate::event::StabilizerEvent;
use crate::util::{mean, round_to_tenth, spread};

#[derive(Debug, Clone, Copy)]
enum Phase {
    Collecting,
    Confirming { started_at: Instant },
    Locked,
}

pub struct WeightStabilizer {
    cfg: StabilizerCfg,
    clock: Arc<dyn Clock + Send + Sync>,
    collecting_limit: usize,
    confirming_limit: usize,
    idle_timeout: Duration,
    confirm_duration: Duration,
    phase: Phase,
    collecting: VecDeque<f64>,
    confirming: VecDeque<f64>,
    last_reading_at: Option<Instant>,
}

impl WeightStabilizer {
    /// Build a stabilizer driven by the monotonic system clock.
    pub fn new(cfg: StabilizerCfg) -> Result<Self> {
        Self::with_clock(cfg, Arc::new(MonotonicClock))
    }

    /// Build a stabilizer with an injected clock, used by `feed` for "now".
    /// Tests and replay drive `feed_at` directly instead.
    pub fn with_clock(cfg: StabilizerCfg, clock: Arc<dyn Clock + Send + Sync>) -> Result<Self> {
        validate(&cfg)?;
        let collecting_limit = cfg.window_size;
        let confirming_limit = cfg.window_size.max(cfg.confirm_min_samples);
        Ok(Self {
            idle_timeout: Duration::from_millis(cfg.idle_timeout_ms),
            confirm_duration: Duration::from_millis(cfg.confirm_duration_ms),
            cfg,
            clock,
            collecting_limit,
            confirming_limit,
            phase: Phase::Collecting,
            collecting: VecDeque::with_capacity(collecting_limit),
            confirming: VecDeque::with_capacity(confirming_limit),
            last_reading_at: None,
        })
    }

    /// Feed a reading stamped with the injected clock's "now".
    pub fn feed(&mut self, weight: f64) -> StabilizerEvent {
        let now = self.clock.now();
        self.feed_at(weight, now)
    }

    /// Feed a reading observed at an explicit instant. Primary entry point;
    /// `feed` is the wall-clock convenience wrapper.
    pub fn feed_at(&mut self, weight: f64, now: Instant) -> StabilizerEvent {
        if let Some(last) = self.last_reading_at
            && now.saturating_duration_since(last) > self.idle_timeout
        {
            tracing::debug!(
                gap_ms = now.saturating_duration_since(last).as_millis() as u64,
                "reading gap exceeded idle timeout, resetting"
            );
            self.reset();
        }
        self.last_reading_at = Some(now);

        // NaN fails this comparison and is ignored like an underweight sample.
        if !(weight >= self.cfg.min_weight_lbs) {
            tracing::trace!(weight, "sample below minimum weight, ignored");
            return StabilizerEvent::None;
        }

        match self.phase {
            Phase::Collecting => self.feed_collecting(weight, now),
            Phase::Confirming { started_at } => self.feed_confirming(weight, now, started_at),
            Phase::Locked => {
                push_bounded(&mut self.collecting, weight, self.collecting_limit);
                StabilizerEvent::Measuring {
                    current: weight,
                    samples: self.collecting.len(),
                }
            }
        }
    }

    fn feed_collecting(&mut self, weight: f64, now: Instant) -> StabilizerEvent {
        push_bounded(&mut self.collecting, weight, self.collecting_limit);
        if self.collecting.len() == self.collecting_limit
            && spread(&self.collecting) <= self.cfg.tolerance_lbs
        {
            tracing::debug!(current = weight, "collection window stable, confirming");
            // The confirming buffer is a copy; the collecting window stays
            // intact and keeps serving Locked-phase reporting.
            self.confirming.clear();
            self.confirming.extend(self.collecting.iter().copied());
            self.phase = Phase::Confirming { started_at: now };
            return StabilizerEvent::Confirming {
                current: weight,
                progress: 0.0,
            };
        }
        StabilizerEvent::Measuring {
            current: weight,
            samples: self.collecting.len(),
        }
    }

    fn feed_confirming(&mut self, weight: f64, now: Instant, started_at: Instant) -> StabilizerEvent {
        push_bounded(&mut self.confirming, weight, self.confirming_limit);

        if spread(&self.confirming) > self.cfg.confirm_tolerance_lbs {
            // Drift: fall back to Collecting, but keep the most recent window
            // of confirming samples so progress is not thrown away entirely.
            tracing::debug!(current = weight, "drift during confirmation, back to collecting");
            let keep_from = self.confirming.len().saturating_sub(self.collecting_limit);
            self.collecting.clear();
            self.collecting
                .extend(self.confirming.iter().skip(keep_from).copied());
            self.confirming.clear();
            self.phase = Phase::Collecting;
            return StabilizerEvent::Measuring {
                current: weight,
                samples: self.collecting.len(),
            };
        }

        let elapsed = now.saturating_duration_since(started_at);
        if elapsed >= self.confirm_duration && self.confirming.len() >= self.cfg.confirm_min_samples
        {
            let settled = mean(&self.confirming).unwrap_or(weight);
            let weight_lbs = round_to_tenth(settled);
            tracing::debug!(weight_lbs, samples = self.confirming.len(), "settled");
            self.confirming.clear();
            self.phase = Phase::Locked;
            return StabilizerEvent::Settled { weight_lbs };
        }

        let time_progress = if self.confirm_duration.is_zero() {
            1.0
        } else {
            (elapsed.as_secs_f64() / self.confirm_duration.as_secs_f64()).clamp(0.0, 1.0)
        };
        let sample_progress =
            (self.confirming.len() as f64 / self.cfg.confirm_min_samples as f64).clamp(0.0, 1.0);
        StabilizerEvent::Confirming {
            current: weight,
            progress: time_progress.min(sample_progress),
        }
    }

    /// Discard all state and return to Collecting with empty buffers.
    pub fn reset(&mut self) {
        self.phase = Phase::Collecting;
        self.collecting.clear();
        self.confirming.clear();
        self.last_reading_at = None;
    }

    /// Number of samples in the buffer the current phase appends to.
    pub fn sample_count(&self) -> usize {
        match self.phase {
            Phase::Collecting | Phase::Locked => self.collecting.len(),
            Phase::Confirming { .. } => self.confirming.len(),
        }
    }

    /// True once a settlement has been emitted and not yet reset.
    pub fn is_locked(&self) -> bool {
        matches!(self.phase, Phase::Locked)
    }

    pub fn phase_name(&self) -> &'static str {
        match self.phase {
            Phase::Collecting => "collecting",
            Phase::Confirming { .. } => "confirming",
            Phase::Locked => "locked",
        }
    }
}

impl fmt::Debug for WeightStabilizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeightStabilizer")
            .field("phase", &self.phase_name())
            .field("collecting", &self.collecting.len())
            .field("confirming", &self.confirming.len())
            .field("cfg", &self.cfg)
            .finish_non_exhaustive()
    }
}

fn validate(cfg: &StabilizerCfg) -> Result<()> {
    if cfg.window_size == 0 {
        return Err(eyre::Report::new(BuildError::InvalidConfig(
            "window_size must be at least 1",
        )));
    }
    if cfg.confirm_min_samples == 0 {
        return Err(eyre::Report::new(BuildError::InvalidConfig(
            "confirm_min_samples must be at least 1",
        )));
    }
    if cfg.idle_timeout_ms == 0 {
        return Err(eyre::Report::new(BuildError::InvalidConfig(
            "idle_timeout_ms must be positive",
        )));
    }
    for (value, name) in [
        (cfg.tolerance_lbs, "tolerance_lbs must be finite and non-negative"),
        (
            cfg.confirm_tolerance_lbs,
            "confirm_tolerance_lbs must be finite and non-negative",
        ),
        (
            cfg.min_weight_lbs,
            "min_weight_lbs must be finite and non-negative",
        ),
    ] {
        if !value.is_finite() || value < 0.0 {
            return Err(eyre::Report::new(BuildError::InvalidConfig(name)));
        }
    }
    Ok(())
}

/// Append with strict FIFO eviction once `limit` is reached.
fn push_bounded(buf: &mut VecDeque<f64>, value: f64, limit: usize) {
    while buf.len() >= limit {
        buf.pop_front();
    }
    buf.push_back(value);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_bounded_evicts_oldest_first() {
        let mut buf = VecDeque::new();
        for v in [1.0, 2.0, 3.0, 4.0] {
            push_bounded(&mut buf, v, 3);
        }
        assert_eq!(buf, VecDeque::from([2.0, 3.0, 4.0]));
    }

    #[test]
    fn zero_window_is_rejected() {
        let cfg = StabilizerCfg {
            window_size: 0,
            ..StabilizerCfg::default()
        };
        let err = WeightStabilizer::new(cfg).unwrap_err();
        assert!(err.downcast_ref::<BuildError>().is_some());
    }

    #[test]
    fn non_finite_tolerance_is_rejected() {
        let cfg = StabilizerCfg {
            tolerance_lbs: f64::NAN,
            ..StabilizerCfg::default()
        };
        assert!(WeightStabilizer::new(cfg).is_err());
    }
}
