//! Throughput of the hot path: decode one advertisement and feed the
//! stabilizer, over a synthetic noisy trace.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use std::time::{Duration, Instant};
use weigh_core::decoder::{decode_weight, parse_company_id_and_payload};
use weigh_core::{StabilizerCfg, WeightStabilizer};

/// Tiny deterministic PRNG so the trace is stable across runs.
struct XorShift(u64);

impl XorShift {
    fn next(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }

    /// Uniform-ish value in [-0.2, 0.2], matching real scale jitter.
    fn jitter(&mut self) -> f64 {
        (self.next() % 401) as f64 / 1000.0 - 0.2
    }
}

fn noisy_trace(len: usize) -> Vec<f64> {
    let mut rng = XorShift(0x9E37_79B9_7F4A_7C15);
    (0..len).map(|_| 180.0 + rng.jitter()).collect()
}

fn bench_feed(c: &mut Criterion) {
    let trace = noisy_trace(10_000);
    c.bench_function("stabilizer_feed_10k", |b| {
        b.iter(|| {
            let mut st = WeightStabilizer::new(StabilizerCfg::default()).unwrap();
            let t0 = Instant::now();
            for (i, w) in trace.iter().enumerate() {
                black_box(st.feed_at(black_box(*w), t0 + Duration::from_millis(i as u64 * 40)));
            }
        });
    });
}

fn bench_decode(c: &mut Criterion) {
    let mut blob = vec![0x01, 0x07, 0x10, 0x00, 0x00, 0x00];
    blob.extend_from_slice(b"URWS01");
    c.bench_function("decode_advertisement", |b| {
        b.iter(|| {
            let (cid, payload) = parse_company_id_and_payload(black_box(&blob)).unwrap();
            black_box(decode_weight(cid, payload))
        });
    });
}

criterion_group!(benches, bench_feed, bench_decode);
criterion_main!(benches);
