//! Bit-level contract of the advertisement decoder.

use rstest::rstest;
use weigh_core::decoder::{decode_weight, is_candidate, parse_company_id_and_payload};

/// The on-air payload for weightHigh=0x0B, weightLow=0x5A: 290.6 lbs.
const PAYLOAD_290_6: [u8; 10] = [0x5A, 0x00, 0x00, 0x00, 0x55, 0x52, 0x57, 0x53, 0x30, 0x31];

#[rstest]
#[case(&[])]
#[case(&[0x01])]
#[case(&[0x01, 0x02])]
fn blobs_shorter_than_three_bytes_parse_to_none(#[case] blob: &[u8]) {
    assert!(parse_company_id_and_payload(blob).is_none());
}

#[test]
fn company_id_is_little_endian_and_payload_is_the_rest() {
    let mut blob = vec![0x01, 0x0B];
    blob.extend_from_slice(&PAYLOAD_290_6);
    let (cid, payload) = parse_company_id_and_payload(&blob).expect("long enough");
    assert_eq!(cid, 0x0B01);
    assert_eq!(payload, PAYLOAD_290_6);
}

#[test]
fn marker_payload_is_candidate_regardless_of_name() {
    assert!(is_candidate(None, Some(&PAYLOAD_290_6)));
    assert!(is_candidate(Some("some-other-device"), Some(&PAYLOAD_290_6)));
}

#[rstest]
#[case("urevo")]
#[case("UREVO")]
#[case("Urevo")]
fn name_match_is_case_insensitive(#[case] name: &str) {
    assert!(is_candidate(Some(name), None));
}

#[test]
fn unrelated_name_without_payload_is_not_a_candidate() {
    assert!(!is_candidate(Some("JBL Speaker"), None));
    assert!(!is_candidate(None, None));
}

#[test]
fn reference_vector_decodes_to_290_6() {
    // weightHigh=0x0B, weightLow=0x5A -> raw=0x0B5A=2906 -> 290.6
    assert_eq!(decode_weight(0x0B01, &PAYLOAD_290_6), Some(290.6));
}

#[test]
fn corrupted_marker_decodes_to_none() {
    let mut payload = PAYLOAD_290_6;
    payload[4] = b'X';
    assert_eq!(decode_weight(0x0B01, &payload), None);
    assert!(!is_candidate(None, Some(&payload)));
}

#[test]
fn truncated_payload_decodes_to_none() {
    // 9 bytes: marker region incomplete
    assert_eq!(decode_weight(0x0B01, &PAYLOAD_290_6[..9]), None);
    assert!(!is_candidate(None, Some(&PAYLOAD_290_6[..9])));
}

#[test]
fn zero_raw_value_is_a_valid_zero_reading() {
    let mut payload = PAYLOAD_290_6;
    payload[0] = 0x00;
    assert_eq!(decode_weight(0x0001, &payload), Some(0.0));
}

#[test]
fn low_byte_only_weights_decode() {
    // company-id high byte zero: raw fits in the payload byte alone
    let mut payload = PAYLOAD_290_6;
    payload[0] = 72;
    assert_eq!(decode_weight(0x0001, &payload), Some(7.2));
}
