//! Scan-loop orchestration: drive a `WeighSession` from an
//! `AdvertisementSource` until a stop condition is met.
//!
//! A run ends normally (with the weigh-ins recorded so far) on the settle
//! limit, the max-run cap, the idle-exit timer, or an external shutdown
//! signal. Only a transport failure from the source ends it with an error.

use crate::error::{Result as CoreResult, WeighError};
use crate::scanner::Scanner;
use crate::session::{SessionUpdate, WeighIn, WeighSession};
use crate::{ScanCfg, StabilizerCfg};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};
use weigh_traits::AdvertisementSource;
use weigh_traits::clock::MonotonicClock;

/// How advertisement receiving should be orchestrated
#[derive(Debug, Clone, Copy)]
pub enum RunMode {
    /// Receive inside the loop using AdvertisementSource::recv(timeout)
    Direct,
    /// Receive on a background pump thread via `Scanner`
    Pumped,
}

#[derive(Debug, Clone)]
pub struct RunParams {
    pub stabilizer: StabilizerCfg,
    pub scan: ScanCfg,
    /// Stop after this many recorded weigh-ins. `None` runs until another
    /// stop condition fires.
    pub settle_limit: Option<usize>,
    /// Stop after this long without receiving any advertisement. 0 disables.
    pub idle_exit_ms: u64,
    pub mode: RunMode,
    /// External stop flag, e.g. wired to a Ctrl-C handler.
    pub shutdown: Option<Arc<AtomicBool>>,
}

impl Default for RunParams {
    fn default() -> Self {
        Self {
            stabilizer: StabilizerCfg::default(),
            scan: ScanCfg::default(),
            settle_limit: None,
            idle_exit_ms: 0,
            mode: RunMode::Direct,
            shutdown: None,
        }
    }
}

/// Run a scan until a stop condition, returning the recorded weigh-ins.
pub fn run<S>(source: S, params: RunParams) -> CoreResult<Vec<WeighIn>>
where
    S: AdvertisementSource + Send + 'static,
{
    match params.mode {
        RunMode::Direct => run_direct(source, params),
        RunMode::Pumped => run_pumped(source, params),
    }
}

fn run_direct<S>(mut source: S, params: RunParams) -> CoreResult<Vec<WeighIn>>
where
    S: AdvertisementSource,
{
    let mut session = WeighSession::new(params.stabilizer)?;
    let recv_timeout = Duration::from_millis(params.scan.recv_timeout_ms.max(1));
    let start = Instant::now();
    let mut last_adv = start;
    let mut recorded = Vec::new();

    tracing::info!(mode = "direct", "scan start");
    loop {
        if let Some(reason) = stop_reason(&params, start, last_adv, recorded.len()) {
            tracing::info!(reason, count = recorded.len(), "scan complete");
            return Ok(recorded);
        }

        match source.recv(recv_timeout) {
            Ok(Some(adv)) => {
                last_adv = Instant::now();
                if let SessionUpdate::Recorded(weigh_in) = session.handle(&adv) {
                    recorded.push(weigh_in);
                }
            }
            Ok(None) => {}
            Err(e) => {
                tracing::error!(error = %e, "advertisement source failed");
                return Err(crate::error::Report::new(WeighError::Source(e.to_string())));
            }
        }
    }
}

fn run_pumped<S>(source: S, params: RunParams) -> CoreResult<Vec<WeighIn>>
where
    S: AdvertisementSource + Send + 'static,
{
    let mut session = WeighSession::new(params.stabilizer)?;
    let recv_timeout = Duration::from_millis(params.scan.recv_timeout_ms.max(1));
    let scanner = Scanner::spawn(source, recv_timeout, MonotonicClock::new());
    let start = Instant::now();
    let mut last_adv = start;
    let mut recorded = Vec::new();

    tracing::info!(mode = "pumped", "scan start");
    loop {
        if let Some(reason) = stop_reason(&params, start, last_adv, recorded.len()) {
            tracing::info!(reason, count = recorded.len(), "scan complete");
            return Ok(recorded);
        }

        if let Some(adv) = scanner.recv_timeout(recv_timeout) {
            last_adv = Instant::now();
            if let SessionUpdate::Recorded(weigh_in) = session.handle(&adv) {
                recorded.push(weigh_in);
            }
        }
    }
}

/// Which stop condition fired, if any. Checked once per loop iteration.
fn stop_reason(
    params: &RunParams,
    start: Instant,
    last_adv: Instant,
    recorded: usize,
) -> Option<&'static str> {
    if params
        .shutdown
        .as_ref()
        .is_some_and(|flag| flag.load(Ordering::Relaxed))
    {
        return Some("shutdown requested");
    }
    if let Some(limit) = params.settle_limit
        && recorded >= limit
    {
        return Some("settle limit reached");
    }
    if params.scan.max_run_ms > 0 && elapsed_ms(start) >= params.scan.max_run_ms {
        return Some("max run time reached");
    }
    if params.idle_exit_ms > 0 && elapsed_ms(last_adv) >= params.idle_exit_ms {
        return Some("idle exit");
    }
    None
}

#[inline]
fn elapsed_ms(since: Instant) -> u64 {
    let ms = since.elapsed().as_millis();
    (ms.min(u128::from(u64::MAX))) as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settle_limit_wins_over_disabled_timers() {
        let params = RunParams {
            settle_limit: Some(1),
            ..RunParams::default()
        };
        let now = Instant::now();
        assert_eq!(
            stop_reason(&params, now, now, 1),
            Some("settle limit reached")
        );
        assert_eq!(stop_reason(&params, now, now, 0), None);
    }

    #[test]
    fn shutdown_flag_stops_immediately() {
        let flag = Arc::new(AtomicBool::new(true));
        let params = RunParams {
            shutdown: Some(flag),
            ..RunParams::default()
        };
        let now = Instant::now();
        assert_eq!(stop_reason(&params, now, now, 0), Some("shutdown requested"));
    }
}
