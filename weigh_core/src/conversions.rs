//! Mapping from TOML-deserialized config (`weigh_config`) to the runtime
//! structs consumed by the engine.

use crate::config::{ScanCfg, StabilizerCfg};

impl From<&weigh_config::StabilizerCfg> for StabilizerCfg {
    fn from(c: &weigh_config::StabilizerCfg) -> Self {
        Self {
            window_size: c.window_size,
            tolerance_lbs: c.tolerance_lbs,
            min_weight_lbs: c.min_weight_lbs,
            idle_timeout_ms: c.idle_timeout_ms,
            confirm_duration_ms: c.confirm_duration_ms,
            confirm_tolerance_lbs: c.confirm_tolerance_lbs,
            confirm_min_samples: c.confirm_min_samples,
        }
    }
}

impl From<&weigh_config::ScanCfg> for ScanCfg {
    fn from(c: &weigh_config::ScanCfg) -> Self {
        Self {
            recv_timeout_ms: c.recv_timeout_ms,
            max_run_ms: c.max_run_ms,
        }
    }
}
