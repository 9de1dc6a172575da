//! Background advertisement pump.
//!
//! Spawns a thread that owns the `AdvertisementSource`, forwards received
//! advertisements via a bounded channel, and tracks the last-ok timestamp so
//! the runner can detect a stalled source.
//!
//! Safety: Each `Scanner` spawns exactly one thread that is automatically
//! shut down when the `Scanner` is dropped, preventing thread leaks.
use crossbeam_channel as xch;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::{Duration, Instant};
use weigh_traits::clock::Clock;
use weigh_traits::{AdvertisementSource, RawAdvertisement};

pub struct Scanner {
    rx: xch::Receiver<RawAdvertisement>,
    last_ok: Arc<AtomicU64>,
    epoch: Instant,
    /// Shutdown flag for immediate response (atomic for lock-free check)
    shutdown: Arc<AtomicBool>,
    /// Join handle for graceful thread cleanup
    join_handle: Option<std::thread::JoinHandle<()>>,
}

impl Scanner {
    /// Event-driven pump: `source.recv(timeout)` blocks until an
    /// advertisement arrives or the timeout expires, so no pacing sleep is
    /// added between iterations.
    pub fn spawn<S, C>(mut source: S, timeout: Duration, clock: C) -> Self
    where
        S: AdvertisementSource + Send + 'static,
        C: Clock + Send + Sync + 'static,
    {
        let (tx, rx) = xch::bounded(32);
        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_clone = shutdown.clone();
        let last_ok = Arc::new(AtomicU64::new(0));
        let last_ok_clone = last_ok.clone();
        let epoch = clock.now();

        let join_handle = std::thread::spawn(move || {
            loop {
                // Immediate shutdown check (lock-free atomic)
                if shutdown_clone.load(Ordering::Relaxed) {
                    tracing::debug!("Scanner thread received shutdown signal");
                    break;
                }

                match source.recv(timeout) {
                    Ok(Some(adv)) => {
                        // If send fails, consumer is gone; exit gracefully
                        if tx.send(adv).is_err() {
                            tracing::debug!("Scanner consumer disconnected, exiting thread");
                            break;
                        }
                        let now = clock.ms_since(epoch);
                        last_ok_clone.store(now, Ordering::Relaxed);
                    }
                    Ok(None) => {
                        // Quiet period; nobody is broadcasting. Loop around.
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "advertisement source error, continuing");
                    }
                }
            }
            tracing::trace!("Scanner thread exiting cleanly");
        });

        Self {
            rx,
            last_ok,
            epoch,
            shutdown,
            join_handle: Some(join_handle),
        }
    }

    /// Oldest queued advertisement, if any, without blocking.
    pub fn try_recv(&self) -> Option<RawAdvertisement> {
        self.rx.try_recv().ok()
    }

    /// Block up to `timeout` for the next advertisement.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<RawAdvertisement> {
        self.rx.recv_timeout(timeout).ok()
    }

    pub fn stalled_for(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.last_ok.load(Ordering::Relaxed))
    }

    /// Convenience helper: compute stall using this scanner's epoch and a real monotonic clock.
    pub fn stalled_for_now(&self) -> u64 {
        let now_ms = {
            let dur = Instant::now().saturating_duration_since(self.epoch);
            let ms = dur.as_millis();
            (ms.min(u128::from(u64::MAX))) as u64
        };
        now_ms.saturating_sub(self.last_ok.load(Ordering::Relaxed))
    }
}

impl Drop for Scanner {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::Relaxed);

        // The thread exits either between recv calls (shutdown check) or
        // after the current source.recv() completes (up to `timeout`).
        if let Some(handle) = self.join_handle.take() {
            match handle.join() {
                Ok(()) => {
                    tracing::trace!("Scanner thread joined successfully");
                }
                Err(e) => {
                    // Thread panicked; log but don't propagate (we're in Drop)
                    tracing::warn!(?e, "Scanner thread panicked during shutdown");
                }
            }
        }
    }
}
