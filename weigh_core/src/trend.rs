//! Summary statistics over a series of recorded weigh-ins.
//!
//! Operates on whatever slice the caller hands in; storage and retrieval of
//! the series are not this crate's concern.

use std::time::{Duration, SystemTime};

use crate::session::WeighIn;

/// Aggregate view of a weigh-in series, ordered by recording time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendStats {
    pub count: usize,
    pub average_lbs: f64,
    pub minimum_lbs: f64,
    pub maximum_lbs: f64,
    /// Last minus first, chronologically.
    pub net_change_lbs: f64,
    /// Net change relative to the first entry, in percent. 0 when the first
    /// entry is 0.
    pub net_change_percent: f64,
}

/// Compute trend statistics; `None` for an empty series.
pub fn stats(entries: &[WeighIn]) -> Option<TrendStats> {
    if entries.is_empty() {
        return None;
    }
    let mut ordered: Vec<&WeighIn> = entries.iter().collect();
    ordered.sort_by_key(|e| e.recorded_at);

    let mut minimum = f64::INFINITY;
    let mut maximum = f64::NEG_INFINITY;
    let mut sum = 0.0;
    for entry in &ordered {
        minimum = minimum.min(entry.weight_lbs);
        maximum = maximum.max(entry.weight_lbs);
        sum += entry.weight_lbs;
    }
    let first = ordered[0].weight_lbs;
    let last = ordered[ordered.len() - 1].weight_lbs;
    let net_change = last - first;
    let net_change_percent = if first == 0.0 {
        0.0
    } else {
        net_change / first * 100.0
    };

    Some(TrendStats {
        count: ordered.len(),
        average_lbs: sum / ordered.len() as f64,
        minimum_lbs: minimum,
        maximum_lbs: maximum,
        net_change_lbs: net_change,
        net_change_percent,
    })
}

/// The entry recorded closest to `target`, if any.
pub fn nearest(entries: &[WeighIn], target: SystemTime) -> Option<&WeighIn> {
    entries
        .iter()
        .min_by_key(|e| time_distance(e.recorded_at, target))
}

/// Entries recorded within `[from, to]`, in input order.
pub fn within(entries: &[WeighIn], from: SystemTime, to: SystemTime) -> Vec<WeighIn> {
    entries
        .iter()
        .filter(|e| e.recorded_at >= from && e.recorded_at <= to)
        .copied()
        .collect()
}

fn time_distance(a: SystemTime, b: SystemTime) -> Duration {
    a.duration_since(b).unwrap_or_else(|e| e.duration())
}
