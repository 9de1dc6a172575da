//! Vendor BLE advertisement decoder for the URWS01 scale family.
//!
//! Everything here is a pure function over byte slices. Malformed input is
//! never an error, it is simply not a scale frame (`None` / `false`), so the
//! scan loop can pour arbitrary advertisements through without filtering
//! first.

/// ASCII model marker embedded in every scale advertisement payload.
pub const MODEL_MARKER: &[u8; 6] = b"URWS01";

/// Byte range of the marker within the manufacturer payload.
const MARKER_START: usize = 4;
const MARKER_END: usize = 10;

/// True if `payload` carries the model marker at its fixed offset.
fn has_model_marker(payload: &[u8]) -> bool {
    payload.len() >= MARKER_END && &payload[MARKER_START..MARKER_END] == MODEL_MARKER
}

/// Split a raw manufacturer-data blob into `(company_id, payload)`.
///
/// The first two bytes are the little-endian company identifier; the rest is
/// the vendor payload. Blobs too short to hold an id plus at least one
/// payload byte yield `None`.
pub fn parse_company_id_and_payload(blob: &[u8]) -> Option<(u16, &[u8])> {
    if blob.len() < 3 {
        return None;
    }
    let company_id = u16::from_le_bytes([blob[0], blob[1]]);
    Some((company_id, &blob[2..]))
}

/// Decide whether an advertisement plausibly comes from a supported scale.
///
/// Matches on the advertised local name (case-insensitive) or on the model
/// marker in the manufacturer payload. Name matching lets the scan loop key
/// on devices that split name and data across advertisement frames.
pub fn is_candidate(local_name: Option<&str>, manufacturer_payload: Option<&[u8]>) -> bool {
    if let Some(name) = local_name
        && name.eq_ignore_ascii_case("urevo")
    {
        return true;
    }
    manufacturer_payload.is_some_and(has_model_marker)
}

/// Extract the weight reading (lbs) from a candidate payload.
///
/// The raw value is a 16-bit quantity in tenths of a pound: high byte from
/// the upper half of the company id, low byte from the first payload byte.
/// A raw value of zero means "empty scale" and decodes to `0.0` exactly.
/// Payloads without the model marker yield `None`.
pub fn decode_weight(company_id: u16, payload: &[u8]) -> Option<f64> {
    if !has_model_marker(payload) {
        return None;
    }
    let high = (company_id >> 8) & 0xFF;
    let raw = (high << 8) | u16::from(payload[0]);
    if raw == 0 {
        return Some(0.0);
    }
    Some(f64::from(raw) / 10.0)
}
