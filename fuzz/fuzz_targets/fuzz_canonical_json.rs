#![no_main]

use libfuzzer_sys::fuzz_target;
use votechain_crypto::canonical_json;

fuzz_target!(|data: &[u8]| {
    let Ok(value) = serde_json::from_slice::<serde_json::Value>(data) else {
        return;
    };
    let canonical = canonical_json(&value);
    assert!(canonical.is_ascii());
    assert_eq!(canonical_json(&value), canonical);

    // Out-of-range floats render as `Infinity`, which is not JSON; everything
    // else must be a fixed point of the encoding.
    if let Ok(reparsed) = serde_json::from_str::<serde_json::Value>(&canonical) {
        assert_eq!(canonical_json(&reparsed), canonical);
    }
});
