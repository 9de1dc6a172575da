//! Capture replay: run a recorded advertisement log through the pipeline.
//!
//! Captures are CSV with the columns `offset_ms,local_name,data`, where
//! `data` is the hex-encoded manufacturer blob (company id first) and either
//! of the last two columns may be empty. Offsets are relative to the start
//! of the capture, so idle gaps and settle timing replay deterministically.

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant, UNIX_EPOCH};

use eyre::{Result, WrapErr};
use weigh_core::session::SessionCounters;
use weigh_core::{SessionUpdate, StabilizerCfg, StabilizerEvent, WeighIn, WeighSession};
use weigh_traits::RawAdvertisement;

pub struct ReplayOutcome {
    pub records: Vec<WeighIn>,
    pub counters: SessionCounters,
}

/// One parsed capture row.
struct CaptureRow {
    offset_ms: u64,
    advertisement: RawAdvertisement,
}

pub fn replay_capture(
    capture: &Path,
    stabilizer: StabilizerCfg,
    settle_limit: Option<usize>,
    json: bool,
    shutdown: &AtomicBool,
) -> Result<ReplayOutcome> {
    let rows = read_capture(capture)?;
    tracing::info!(rows = rows.len(), capture = %capture.display(), "replay start");

    let mut session = WeighSession::new(stabilizer)?;
    let epoch = Instant::now();
    let mut records = Vec::new();

    for row in rows {
        if shutdown.load(Ordering::Relaxed) {
            tracing::info!("replay interrupted");
            break;
        }
        let now = epoch + Duration::from_millis(row.offset_ms);
        match session.handle_at(&row.advertisement, now) {
            SessionUpdate::Recorded(weigh_in) => {
                emit_record(row.offset_ms, &weigh_in, json);
                records.push(weigh_in);
                if settle_limit.is_some_and(|limit| records.len() >= limit) {
                    tracing::info!(count = records.len(), "settle limit reached");
                    break;
                }
            }
            SessionUpdate::Status(event) => emit_status(row.offset_ms, event),
            SessionUpdate::Skipped => {}
        }
    }

    Ok(ReplayOutcome {
        records,
        counters: session.counters(),
    })
}

fn read_capture(path: &Path) -> Result<Vec<CaptureRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .wrap_err_with(|| format!("failed to open capture {}", path.display()))?;

    let headers = reader.headers().wrap_err("capture has no header row")?;
    if headers.iter().collect::<Vec<_>>() != ["offset_ms", "local_name", "data"] {
        eyre::bail!("capture CSV must have headers 'offset_ms,local_name,data'");
    }

    let mut rows = Vec::new();
    for (i, result) in reader.records().enumerate() {
        let record = result.wrap_err_with(|| format!("capture row {}", i + 1))?;
        let offset_ms: u64 = record
            .get(0)
            .unwrap_or_default()
            .parse()
            .wrap_err_with(|| format!("capture row {}: bad offset_ms", i + 1))?;
        let local_name = match record.get(1).unwrap_or_default() {
            "" => None,
            name => Some(name.to_owned()),
        };
        let manufacturer_data = match record.get(2).unwrap_or_default() {
            "" => None,
            hex => Some(
                decode_hex(hex).wrap_err_with(|| format!("capture row {}: bad data", i + 1))?,
            ),
        };
        rows.push(CaptureRow {
            offset_ms,
            advertisement: RawAdvertisement::new(local_name, manufacturer_data),
        });
    }
    Ok(rows)
}

fn emit_record(offset_ms: u64, weigh_in: &WeighIn, json: bool) {
    if json {
        let recorded_at = weigh_in
            .recorded_at
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        println!(
            "{}",
            serde_json::json!({
                "event": "recorded",
                "offset_ms": offset_ms,
                "weight_lbs": weigh_in.weight_lbs,
                "recorded_at": recorded_at,
            })
        );
    } else {
        println!("[+{offset_ms}ms] recorded {:.1} lbs", weigh_in.weight_lbs);
    }
}

fn emit_status(offset_ms: u64, event: StabilizerEvent) {
    match event {
        StabilizerEvent::Measuring { current, samples } => {
            tracing::debug!(offset_ms, current, samples, "measuring");
        }
        StabilizerEvent::Confirming { current, progress } => {
            tracing::debug!(offset_ms, current, progress, "confirming");
        }
        StabilizerEvent::None | StabilizerEvent::Settled { .. } => {}
    }
}

pub fn print_counters(counters: &SessionCounters, json: bool) {
    if json {
        println!(
            "{}",
            serde_json::json!({
                "event": "stats",
                "advertisements": counters.advertisements,
                "candidates": counters.candidates,
                "decoded": counters.decoded,
                "settled": counters.settled,
            })
        );
    } else {
        println!(
            "advertisements={} candidates={} decoded={} settled={}",
            counters.advertisements, counters.candidates, counters.decoded, counters.settled
        );
    }
}

/// Decode a hex string (even length, no separators) into bytes.
pub fn decode_hex(s: &str) -> Result<Vec<u8>> {
    if s.len() % 2 != 0 {
        eyre::bail!("hex string has odd length");
    }
    let mut out = Vec::with_capacity(s.len() / 2);
    let bytes = s.as_bytes();
    for pair in bytes.chunks_exact(2) {
        let hi = hex_digit(pair[0])?;
        let lo = hex_digit(pair[1])?;
        out.push((hi << 4) | lo);
    }
    Ok(out)
}

fn hex_digit(c: u8) -> Result<u8> {
    match c {
        b'0'..=b'9' => Ok(c - b'0'),
        b'a'..=b'f' => Ok(c - b'a' + 10),
        b'A'..=b'F' => Ok(c - b'A' + 10),
        other => eyre::bail!("invalid hex character '{}'", other as char),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_hex_round_trip() {
        assert_eq!(decode_hex("010b5a").unwrap(), vec![0x01, 0x0B, 0x5A]);
        assert_eq!(decode_hex("FF00").unwrap(), vec![0xFF, 0x00]);
        assert!(decode_hex("abc").is_err());
        assert!(decode_hex("zz").is_err());
        assert!(decode_hex("").unwrap().is_empty());
    }
}
