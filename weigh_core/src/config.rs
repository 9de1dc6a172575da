//! Runtime configuration types for the weigh-in engine.
//!
//! These are the structs consumed by `WeightStabilizer` and the runner.
//! They are separate from the TOML-deserialized config in `weigh_config`;
//! see `conversions` for the mapping.

/// Stabilizer tuning. Defaults match the shipped scale behavior.
#[derive(Debug, Clone, Copy)]
pub struct StabilizerCfg {
    /// Sliding-window size for the initial collection phase (samples).
    pub window_size: usize,
    /// Max spread (max - min, lbs) tolerated within the collection window.
    pub tolerance_lbs: f64,
    /// Readings below this weight (lbs) are ignored entirely; filters out
    /// "no one on the scale" noise.
    pub min_weight_lbs: f64,
    /// Gap between readings (ms) after which all state resets.
    pub idle_timeout_ms: u64,
    /// How long (ms) the weight must hold steady before settling.
    /// 0 means "settle as soon as enough samples agree".
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

/// Scan-loop knobs for the runner.
#[derive(Debug, Clone, Copy)]
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
