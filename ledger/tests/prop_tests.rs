use proptest::prelude::*;
use serde_json::json;

use votechain_consensus::{Roster, ValidatorRegistry};
use votechain_ledger::{reconcile_threshold, verify_chain, Blockchain, ValidationError};
use votechain_nullables::{NullChainStore, NullClock};
use votechain_types::{Block, Timestamp};

type MemLedger = Blockchain<ValidatorRegistry, NullChainStore, NullClock>;

const IDS: [&str; 7] = ["eci", "judicial", "observer", "nic", "academia", "auditor", "state_pool"];

fn registry(threshold: i64) -> ValidatorRegistry {
    ValidatorRegistry::authorities(|_| None, Some(threshold))
}

fn ledger_with(threshold: i64, votes: &[String]) -> MemLedger {
    let mut ledger = Blockchain::open(
        registry(threshold),
        NullChainStore::new(),
        NullClock::ticking(1_735_689_600, 1),
    );
    for vote in votes {
        ledger.add_block(json!({ "vote": vote })).unwrap();
    }
    ledger
}

#[derive(Clone, Debug)]
enum Tamper {
    Payload,
    Timestamp,
    PreviousHash,
}

fn tamper() -> impl Strategy<Value = Tamper> {
    prop_oneof![
        Just(Tamper::Payload),
        Just(Tamper::Timestamp),
        Just(Tamper::PreviousHash),
    ]
}

fn apply(block: &mut Block, tamper: &Tamper) {
    match tamper {
        Tamper::Payload => block.data = json!({ "vote": "tampered" }),
        Tamper::Timestamp => block.timestamp = Timestamp::new("1999-12-31 23:59:59"),
        Tamper::PreviousHash => block.previous_hash = "f".repeat(64),
    }
}

proptest! {
    /// Altering any block's header without rehashing fails validation at that
    /// block, and re-checking any descendant against it fails too.
    #[test]
    fn tampering_is_detected(
        votes in prop::collection::vec("[A-D]", 1..6),
        target in any::<prop::sample::Index>(),
        kind in tamper(),
    ) {
        let ledger = ledger_with(5, &votes);
        prop_assert!(ledger.is_valid());

        let mut chain = ledger.blocks().to_vec();
        let at = target.index(chain.len());
        apply(&mut chain[at], &kind);

        let err = verify_chain(ledger.roster(), &chain).unwrap_err();
        prop_assert_eq!(err.index(), at);
        let expected_kind = matches!(
            err,
            ValidationError::HashMismatch { .. }
                | ValidationError::LinkageBroken { .. }
                | ValidationError::GenesisMalformed { .. }
        );
        prop_assert!(expected_kind);

        // Every descendant's chain prefix is invalid as well.
        for end in at + 1..=chain.len() {
            prop_assert!(verify_chain(ledger.roster(), &chain[..end]).is_err());
        }
    }

    /// Block authors rotate through the roster by index.
    #[test]
    fn author_rotates_round_robin(count in 1usize..20, threshold in 1i64..=7) {
        let votes: Vec<String> = (0..count).map(|i| format!("v{i}")).collect();
        let ledger = ledger_with(threshold, &votes);
        for block in ledger.blocks() {
            prop_assert_eq!(block.author.as_str(), IDS[(block.index % 7) as usize]);
        }
    }

    /// Adding the same endorsement twice changes nothing the second time, and
    /// no block ever carries two endorsements from one validator.
    #[test]
    fn endorsements_are_idempotent_and_unique(
        votes in prop::collection::vec("[A-D]", 1..5),
        requests in prop::collection::vec((0usize..5, 0usize..7), 1..20),
        threshold in 1i64..=7,
    ) {
        let mut ledger = ledger_with(threshold, &votes);
        for (index, who) in requests {
            let index = index % ledger.len();
            let _ = ledger.add_signature(index, IDS[who]);
            let before = ledger.blocks()[index].signatures.len();
            let _ = ledger.add_signature(index, IDS[who]);
            prop_assert_eq!(ledger.blocks()[index].signatures.len(), before);
        }
        for block in ledger.blocks() {
            let mut ids: Vec<&str> = block.signer_ids().collect();
            let total = ids.len();
            ids.sort_unstable();
            ids.dedup();
            prop_assert_eq!(ids.len(), total);
        }
        prop_assert!(ledger.is_valid());
    }

    /// Reconciling to any threshold never leaves a block short, never removes
    /// an endorsement, and never duplicates one.
    #[test]
    fn migration_meets_threshold_without_duplicates(
        votes in prop::collection::vec("[A-D]", 1..5),
        built_with in 1i64..=7,
        migrate_to in 1i64..=7,
    ) {
        let ledger = ledger_with(built_with, &votes);
        let mut chain = ledger.blocks().to_vec();
        let roster = registry(migrate_to);
        reconcile_threshold(&roster, &mut chain);

        for (before, after) in ledger.blocks().iter().zip(&chain) {
            prop_assert_eq!(after.required_signatures, roster.threshold());
            prop_assert!(after.signatures.len() >= roster.threshold());
            prop_assert!(after.signatures.len() >= before.signatures.len());
            prop_assert_eq!(&after.signatures[..before.signatures.len()], &before.signatures[..]);
            let mut ids: Vec<&str> = after.signer_ids().collect();
            let total = ids.len();
            ids.sort_unstable();
            ids.dedup();
            prop_assert_eq!(ids.len(), total);
        }
        prop_assert_eq!(verify_chain(&roster, &chain), Ok(()));
    }
}
