#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! Config schemas for the weigh-in pipeline.
//!
//! `Config` and sub-structs are deserialized from TOML and validated with
//! non-panicking checks before they reach the core.

use serde::Deserialize;

/// Stabilizer tuning. All fields have documented defaults; an empty
/// `[stabilizer]` table (or none at all) yields the stock behavior.
#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(default)]
pub struct StabilizerCfg {
    /// Sliding-window size for the initial collection phase (samples).
    pub window_size: usize,
    /// Max spread (max - min, lbs) tolerated within the collection window.
    pub tolerance_lbs: f64,
    /// Readings below this weight (lbs) are ignored entirely.
    pub min_weight_lbs: f64,
    /// Gap between readings (ms) after which all state resets.
    pub idle_timeout_ms: u64,
    /// How long (ms) the weight must hold steady before settling.
    pub confirm_duration_ms: u64,
    /// Stricter spread bound (lbs) applied during confirmation.
    pub confirm_tolerance_lbs: f64,
    /// Minimum samples required during confirmation.
    pub confirm_min_samples: usize,
}

impl Default for StabilizerCfg {
    fn default() -> Self {
        Self {
            window_size: 8,
            tolerance_lbs: 0.3,
            min_weight_lbs: 5.0,
            idle_timeout_ms: 3_000,
            confirm_duration_ms: 1_000,
            confirm_tolerance_lbs: 0.2,
            confirm_min_samples: 6,
        }
    }
}

/// Scan-loop knobs for the runner; independent from stabilizer tuning.
#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(default)]
pub struct ScanCfg {
    /// Max time to block per advertisement receive (ms).
    pub recv_timeout_ms: u64,
    /// Hard cap on a scan run (ms). 0 disables the cap.
    pub max_run_ms: u64,
}

impl Default for ScanCfg {
    fn default() -> Self {
        Self {
            recv_timeout_ms: 250,
            max_run_ms: 0,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Logging {
    pub file: Option<String>,  // path to .log (JSON lines)
    pub level: Option<String>, // "info","debug"
    /// Log rotation policy: "never" | "daily" | "hourly" (default: never)
    pub rotation: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub stabilizer: StabilizerCfg,
    pub scan: ScanCfg,
    pub logging: Logging,
}

pub fn load_toml(s: &str) -> Result<Config, toml::de::Error> {
    toml::from_str::<Config>(s)
}

impl Config {
    /// Validate ranges without panicking; returns the first offending field.
    pub fn validate(&self) -> eyre::Result<()> {
        let st = &self.stabilizer;
        if st.window_size == 0 {
            eyre::bail!("window_size must be > 0");
        }
        if st.confirm_min_samples == 0 {
            eyre::bail!("confirm_min_samples must be > 0");
        }
        if !st.tolerance_lbs.is_finite() || st.tolerance_lbs < 0.0 {
            eyre::bail!("tolerance_lbs must be finite and >= 0");
        }
        if !st.confirm_tolerance_lbs.is_finite() || st.confirm_tolerance_lbs < 0.0 {
            eyre::bail!("confirm_tolerance_lbs must be finite and >= 0");
        }
        if !st.min_weight_lbs.is_finite() || st.min_weight_lbs < 0.0 {
            eyre::bail!("min_weight_lbs must be finite and >= 0");
        }
        if st.idle_timeout_ms == 0 {
            eyre::bail!("idle_timeout_ms must be > 0");
        }
        if self.scan.recv_timeout_ms == 0 {
            eyre::bail!("recv_timeout_ms must be > 0");
        }
        if let Some(rot) = self.logging.rotation.as_deref()
            && !matches!(rot, "never" | "daily" | "hourly")
        {
            eyre::bail!("logging.rotation must be one of never|daily|hourly");
        }
        Ok(())
    }
}
