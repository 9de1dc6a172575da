//! Trend statistics over recorded weigh-in series.

use std::time::{Duration, SystemTime, UNIX_EPOCH};
use weigh_core::WeighIn;
use weigh_core::trend::{nearest, stats, within};

fn entry(weight_lbs: f64, day: u64) -> WeighIn {
    WeighIn {
        weight_lbs,
        recorded_at: UNIX_EPOCH + Duration::from_secs(day * 86_400),
    }
}

#[test]
fn empty_series_has_no_stats() {
    assert_eq!(stats(&[]), None);
}

#[test]
fn single_entry_series() {
    let s = stats(&[entry(180.0, 1)]).expect("non-empty");
    assert_eq!(s.count, 1);
    assert_eq!(s.average_lbs, 180.0);
    assert_eq!(s.minimum_lbs, 180.0);
    assert_eq!(s.maximum_lbs, 180.0);
    assert_eq!(s.net_change_lbs, 0.0);
    assert_eq!(s.net_change_percent, 0.0);
}

#[test]
fn net_change_is_chronological_even_for_unsorted_input() {
    // Latest entry first: 178.0 on day 30, 180.0 on day 1.
    let series = [entry(178.0, 30), entry(181.0, 15), entry(180.0, 1)];
    let s = stats(&series).expect("non-empty");

    assert_eq!(s.count, 3);
    assert_eq!(s.minimum_lbs, 178.0);
    assert_eq!(s.maximum_lbs, 181.0);
    assert!((s.net_change_lbs - (-2.0)).abs() < 1e-9);
    assert!((s.net_change_percent - (-2.0 / 180.0 * 100.0)).abs() < 1e-9);
}

#[test]
fn zero_baseline_yields_zero_percent_change() {
    let series = [entry(0.0, 1), entry(150.0, 2)];
    let s = stats(&series).expect("non-empty");
    assert_eq!(s.net_change_lbs, 150.0);
    assert_eq!(s.net_change_percent, 0.0);
}

#[test]
fn nearest_picks_the_closest_recording_time() {
    let series = [entry(180.0, 1), entry(179.0, 10), entry(178.0, 20)];
    let target = UNIX_EPOCH + Duration::from_secs(11 * 86_400);
    let hit = nearest(&series, target).expect("non-empty");
    assert_eq!(hit.weight_lbs, 179.0);

    // A target before every entry still resolves to the earliest one.
    let early = nearest(&series, UNIX_EPOCH).expect("non-empty");
    assert_eq!(early.weight_lbs, 180.0);
}

#[test]
fn within_is_inclusive_on_both_ends() {
    let series = [entry(180.0, 1), entry(179.0, 10), entry(178.0, 20)];
    let from = UNIX_EPOCH + Duration::from_secs(86_400);
    let to = UNIX_EPOCH + Duration::from_secs(10 * 86_400);
    let hits = within(&series, from, to);
    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].weight_lbs, 180.0);
    assert_eq!(hits[1].weight_lbs, 179.0);
}

#[test]
fn nearest_on_empty_series_is_none() {
    assert!(nearest(&[], SystemTime::now()).is_none());
}
