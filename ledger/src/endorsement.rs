//! Endorsement collection in roster order.

use std::collections::HashSet;

use votechain_consensus::{Authority, Roster};
use votechain_types::{Block, Endorsement};

/// Number of distinct roster members among `signatures`.
///
/// Unknown ids and repeated endorsements from one validator do not count.
pub fn known_signer_count<R: Roster>(roster: &R, signatures: &[Endorsement]) -> usize {
    signatures
        .iter()
        .filter(|s| roster.find(&s.validator_id).is_some())
        .map(|s| s.validator_id.as_str())
        .collect::<HashSet<_>>()
        .len()
}

/// Endorse `hash` with roster members, in roster order, until `target`
/// distinct members have endorsed.
///
/// Members already present are skipped and existing endorsements are never
/// removed. Collection stops as soon as the target is met, so which members
/// sign is deterministic but depends on roster order. Returns the number of
/// endorsements added.
pub fn endorse_up_to<R: Roster>(
    roster: &R,
    hash: &str,
    signatures: &mut Vec<Endorsement>,
    target: usize,
) -> usize {
    let mut present = known_signer_count(roster, signatures);
    let mut added = 0;
    for member in roster.members() {
        if present >= target {
            break;
        }
        if signatures.iter().any(|s| s.validator_id == member.id()) {
            continue;
        }
        signatures.push(Endorsement {
            validator_id: member.id().to_string(),
            sig: member.sign(hash),
        });
        present += 1;
        added += 1;
    }
    added
}

/// Distinct roster members that have endorsed `block`.
pub(crate) fn block_signer_count<R: Roster>(roster: &R, block: &Block) -> usize {
    known_signer_count(roster, &block.signatures)
}
