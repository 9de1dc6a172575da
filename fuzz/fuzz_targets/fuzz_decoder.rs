#![no_main]
use libfuzzer_sys::fuzz_target;
use weigh_core::decoder::{decode_weight, is_candidate, parse_company_id_and_payload};

fuzz_target!(|data: &[u8]| {
    // Arbitrary radio bytes must never panic the decoder; rejection is the
    // only acceptable failure mode.
    if let Some((company_id, payload)) = parse_company_id_and_payload(data) {
        let _ = decode_weight(company_id, payload);
        let _ = is_candidate(None, Some(payload));
    }
    let name = core::str::from_utf8(data).ok();
    let _ = is_candidate(name, None);
});
