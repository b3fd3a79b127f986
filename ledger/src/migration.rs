//! Quorum reconciliation of persisted history.
//!
//! When the configured threshold changes between runs, every block is
//! re-tagged with the threshold now in force and any block with too few
//! endorsements is topped up in roster order. Only the endorsement envelope
//! changes; headers and their hashes are untouched, so linkage and hash checks
//! are unaffected. Endorsements are never removed, so lowering the threshold
//! leaves existing signatures in place.

use serde::Serialize;
use votechain_consensus::Roster;
use votechain_crypto::hash_header;
use votechain_types::Block;

use crate::endorsement::{block_signer_count, endorse_up_to};

/// What a reconciliation pass changed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct MigrationReport {
    /// Blocks whose `required_signatures` was rewritten.
    pub blocks_retagged: usize,
    /// Blocks that received additional endorsements.
    pub blocks_topped_up: usize,
    /// Total endorsements added.
    pub signatures_added: usize,
}

impl MigrationReport {
    /// Whether anything changed (and the chain should be persisted).
    pub fn changed(&self) -> bool {
        self.blocks_retagged > 0 || self.signatures_added > 0
    }
}

/// Bring every block of `chain` in line with the roster's current threshold.
pub fn reconcile_threshold<R: Roster>(roster: &R, chain: &mut [Block]) -> MigrationReport {
    let threshold = roster.threshold();
    let mut report = MigrationReport::default();

    for block in chain.iter_mut() {
        if block.required_signatures != threshold {
            tracing::debug!(
                index = block.index,
                from = block.required_signatures,
                to = threshold,
                "retagging required signatures"
            );
            block.required_signatures = threshold;
            report.blocks_retagged += 1;
        }

        if block_signer_count(roster, block) >= threshold {
            continue;
        }
        let hash = hash_header(&block.header());
        let added = endorse_up_to(roster, &hash, &mut block.signatures, threshold);
        if added > 0 {
            tracing::debug!(index = block.index, added, "topped up endorsements");
            report.blocks_topped_up += 1;
            report.signatures_added += added;
        }
    }

    if report.changed() {
        tracing::info!(
            threshold,
            blocks_retagged = report.blocks_retagged,
            blocks_topped_up = report.blocks_topped_up,
            signatures_added = report.signatures_added,
            "reconciled ledger with current quorum"
        );
    }
    report
}
