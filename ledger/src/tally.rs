//! Vote tally read straight from the ledger.

use serde::Serialize;
use votechain_types::Block;

/// Votes recorded for one candidate.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TallyEntry {
    pub candidate: String,
    pub votes: u64,
}

/// Count the `"vote"` field of every block after genesis.
///
/// Blocks whose payload has no non-empty string `"vote"` are skipped.
/// Candidates appear in the order their first vote was recorded.
pub fn tally(chain: &[Block]) -> Vec<TallyEntry> {
    let mut entries: Vec<TallyEntry> = Vec::new();
    for block in chain.iter().skip(1) {
        let Some(candidate) = block.data.get("vote").and_then(|v| v.as_str()) else {
            continue;
        };
        if candidate.is_empty() {
            continue;
        }
        match entries.iter_mut().find(|e| e.candidate == candidate) {
            Some(entry) => entry.votes += 1,
            None => entries.push(TallyEntry {
                candidate: candidate.to_string(),
                votes: 1,
            }),
        }
    }
    entries
}
