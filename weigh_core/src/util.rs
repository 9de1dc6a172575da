//! Small numeric helpers shared across the engine.

/// Round a weight to one decimal place (tenths of a pound).
/// Non-finite input is passed through unchanged.
#[inline]
pub fn round_to_tenth(value: f64) -> f64 {
    if !value.is_finite() {
        return value;
    }
    (value * 10.0).round() / 10.0
}

/// Spread (max - min) over a sample buffer; 0.0 for an empty buffer.
/// This is the noise measure used for both collection and confirmation gating.
#[inline]
pub fn spread<'a, I>(values: I) -> f64
where
    I: IntoIterator<Item = &'a f64>,
{
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    let mut any = false;
    for &v in values {
        min = min.min(v);
        max = max.max(v);
        any = true;
    }
    if any { max - min } else { 0.0 }
}

/// Arithmetic mean over a sample buffer; `None` for an empty buffer.
#[inline]
pub fn mean<'a, I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = &'a f64>,
{
    let mut sum = 0.0;
    let mut n = 0usize;
    for &v in values {
        sum += v;
        n += 1;
    }
    if n == 0 { None } else { Some(sum / n as f64) }
}
