#![no_main]

use libfuzzer_sys::fuzz_target;
use votechain_consensus::ValidatorRegistry;
use votechain_ledger::{audit, reconcile_threshold, tally, verify_chain};
use votechain_types::Block;

fuzz_target!(|data: &[u8]| {
    // Whatever sits in the ledger file, loading and checking it must not panic.
    let Ok(mut chain) = serde_json::from_slice::<Vec<Block>>(data) else {
        return;
    };
    let roster = ValidatorRegistry::authorities(|_| None, None);

    let verdict = verify_chain(&roster, &chain);
    let report = audit(&roster, &chain);
    assert_eq!(verdict.is_ok(), report.is_valid());
    let _ = tally(&chain);

    reconcile_threshold(&roster, &mut chain);
    let _ = serde_json::to_vec_pretty(&chain);
});
