//! The chain engine: one in-memory ledger backed by a [`ChainStore`].
//!
//! Every mutation persists the full chain. A failed save never rolls back the
//! in-memory change; the ledger is marked dirty until a later save succeeds.
//! Callers are expected to serialize mutating calls.

use serde_json::Value;
use tracing::{debug, error, info, warn};

use votechain_consensus::{Authority, Roster, ValidatorRegistry};
use votechain_crypto::hash_header;
use votechain_store::{ChainStore, JsonFileStore};
use votechain_types::{Block, BlockHeader, Clock, Endorsement, SystemClock, ValidatorInfo};

use crate::endorsement::endorse_up_to;
use crate::error::{LedgerError, ValidationError};
use crate::genesis::create_genesis_block;
use crate::migration::{reconcile_threshold, MigrationReport};
use crate::tally::{tally, TallyEntry};
use crate::validation::{audit, verify_chain, ChainAudit};

/// Result of asking a validator to endorse a block.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SignatureOutcome {
    /// A new endorsement was appended.
    Added,
    /// The validator had already endorsed the block; nothing changed.
    AlreadyPresent,
}

/// Append-only vote ledger.
pub struct Blockchain<R = ValidatorRegistry, S = JsonFileStore, C = SystemClock> {
    roster: R,
    store: S,
    clock: C,
    chain: Vec<Block>,
    dirty: bool,
    last_migration: Option<MigrationReport>,
}

impl<R: Roster, S: ChainStore, C: Clock> Blockchain<R, S, C> {
    /// Load the ledger from `store`, reconciling it with the roster's current
    /// threshold, or create and persist a genesis block when nothing is stored.
    ///
    /// Unreadable data is moved aside via [`ChainStore::quarantine`] and the
    /// ledger restarts from a fresh genesis. Opening never fails; a failed
    /// save leaves the ledger dirty.
    pub fn open(roster: R, store: S, clock: C) -> Self {
        let mut ledger = Self {
            roster,
            store,
            clock,
            chain: Vec::new(),
            dirty: false,
            last_migration: None,
        };

        match ledger.store.load() {
            Ok(Some(chain)) if !chain.is_empty() => {
                ledger.chain = chain;
                let report = reconcile_threshold(&ledger.roster, &mut ledger.chain);
                ledger.last_migration = Some(report);
                if report.changed() {
                    let _ = ledger.persist();
                }
                info!(
                    blocks = ledger.chain.len(),
                    threshold = ledger.roster.threshold(),
                    "ledger loaded"
                );
            }
            Ok(_) => ledger.start_fresh(),
            Err(e) => {
                error!(error = %e, "ledger unreadable, starting from a fresh genesis");
                match ledger.store.quarantine() {
                    Ok(Some(path)) => warn!(path = %path.display(), "unreadable ledger moved aside"),
                    Ok(None) => {}
                    Err(e) => error!(error = %e, "failed to move unreadable ledger aside"),
                }
                ledger.start_fresh();
            }
        }
        ledger
    }

    fn start_fresh(&mut self) {
        let genesis = create_genesis_block(&self.roster, self.clock.now());
        info!(hash = %genesis.hash, signatures = genesis.signatures.len(), "genesis block created");
        self.chain = vec![genesis];
        let _ = self.persist();
    }

    /// Save the full chain, tracking the dirty flag.
    fn persist(&mut self) -> Result<(), LedgerError> {
        match self.store.save(&self.chain) {
            Ok(()) => {
                self.dirty = false;
                Ok(())
            }
            Err(e) => {
                error!(error = %e, blocks = self.chain.len(), "failed to persist ledger; in-memory state retained");
                self.dirty = true;
                Err(e.into())
            }
        }
    }

    /// Append a block carrying `payload`.
    ///
    /// The author rotates round-robin through the roster and endorsements are
    /// collected in roster order until the threshold is met. On a persistence
    /// error the block stays appended and the error is returned.
    pub fn add_block(&mut self, payload: Value) -> Result<&Block, LedgerError> {
        let previous_hash = self.chain.last().map(|b| b.hash.clone()).unwrap_or_default();
        let index = self.chain.len() as u64;
        let header = BlockHeader::new(index, self.clock.now(), payload, previous_hash);
        let hash = hash_header(&header);

        let author = self
            .roster
            .author_for(index)
            .map(|m| m.id().to_string())
            .unwrap_or_default();
        let threshold = self.roster.threshold();
        let mut signatures = Vec::with_capacity(threshold);
        endorse_up_to(&self.roster, &hash, &mut signatures, threshold);

        let block = Block::from_header(header, hash, author, signatures, threshold);
        debug!(index, author = %block.author, signatures = block.signatures.len(), "block appended");
        self.chain.push(block);
        self.persist()?;

        let last = self.chain.len() - 1;
        Ok(&self.chain[last])
    }

    pub fn last_block(&self) -> Option<&Block> {
        self.chain.last()
    }

    /// The full chain, genesis first.
    pub fn blocks(&self) -> &[Block] {
        &self.chain
    }

    pub fn len(&self) -> usize {
        self.chain.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }

    pub fn is_valid(&self) -> bool {
        self.verify_chain().is_ok()
    }

    /// Verify the chain, reporting the first failing block.
    pub fn verify_chain(&self) -> Result<(), ValidationError> {
        verify_chain(&self.roster, &self.chain)
    }

    /// Per-block verification report.
    pub fn audit(&self) -> ChainAudit {
        audit(&self.roster, &self.chain)
    }

    pub fn get_validator_ids(&self) -> Vec<String> {
        self.roster.ids()
    }

    pub fn get_validators_full(&self) -> Vec<ValidatorInfo> {
        self.roster.full_info()
    }

    pub fn threshold(&self) -> usize {
        self.roster.threshold()
    }

    pub fn roster(&self) -> &R {
        &self.roster
    }

    /// Have `validator_id` endorse the block at `index`.
    ///
    /// Idempotent: a validator that already endorsed the block is reported as
    /// [`SignatureOutcome::AlreadyPresent`] without touching the chain.
    pub fn add_signature(&mut self, index: usize, validator_id: &str) -> Result<SignatureOutcome, LedgerError> {
        let len = self.chain.len();
        let block = self
            .chain
            .get_mut(index)
            .ok_or(LedgerError::BlockOutOfRange { index, len })?;
        if block.is_signed_by(validator_id) {
            return Ok(SignatureOutcome::AlreadyPresent);
        }
        let member = self
            .roster
            .find(validator_id)
            .ok_or_else(|| LedgerError::UnknownValidator(validator_id.to_string()))?;

        let hash = hash_header(&block.header());
        block.signatures.push(Endorsement {
            validator_id: validator_id.to_string(),
            sig: member.sign(&hash),
        });
        info!(index, validator = validator_id, "endorsement added");
        self.persist()?;
        Ok(SignatureOutcome::Added)
    }

    /// Have `validator_id` endorse the latest block.
    pub fn add_signature_latest(&mut self, validator_id: &str) -> Result<SignatureOutcome, LedgerError> {
        match self.chain.len() {
            0 => Err(LedgerError::BlockOutOfRange { index: 0, len: 0 }),
            len => self.add_signature(len - 1, validator_id),
        }
    }

    /// Have `validator_id` endorse every block it has not endorsed yet.
    ///
    /// Returns the number of blocks touched. The chain is persisted once, and
    /// only if something changed.
    pub fn add_signature_all(&mut self, validator_id: &str) -> Result<usize, LedgerError> {
        let member = self
            .roster
            .find(validator_id)
            .ok_or_else(|| LedgerError::UnknownValidator(validator_id.to_string()))?;

        let mut touched = 0;
        for block in self.chain.iter_mut().filter(|b| !b.is_signed_by(validator_id)) {
            let hash = hash_header(&block.header());
            block.signatures.push(Endorsement {
                validator_id: validator_id.to_string(),
                sig: member.sign(&hash),
            });
            touched += 1;
        }

        if touched > 0 {
            info!(validator = validator_id, blocks = touched, "endorsements backfilled");
            self.persist()?;
        }
        Ok(touched)
    }

    /// Whether the in-memory chain has changes the store does not hold.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Retry persisting the chain.
    pub fn flush(&mut self) -> Result<(), LedgerError> {
        self.persist()
    }

    /// Votes per candidate across the chain.
    pub fn tally(&self) -> Vec<TallyEntry> {
        tally(&self.chain)
    }

    /// What reconciliation changed when the ledger was loaded, if it was loaded
    /// rather than created.
    pub fn migration_report(&self) -> Option<&MigrationReport> {
        self.last_migration.as_ref()
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use votechain_nullables::{NullChainStore, NullClock};

    fn roster(threshold: Option<i64>) -> ValidatorRegistry {
        ValidatorRegistry::authorities(|_| None, threshold)
    }

    fn fresh() -> Blockchain<ValidatorRegistry, NullChainStore, NullClock> {
        Blockchain::open(roster(None), NullChainStore::new(), NullClock::ticking(1_735_689_600, 1))
    }

    #[test]
    fn fresh_ledger_has_persisted_genesis() {
        let ledger = fresh();
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.blocks()[0].signatures.len(), 7);
        assert_eq!(ledger.blocks()[0].timestamp.as_str(), "2025-01-01 00:00:00");
        assert!(ledger.is_valid());
        assert!(!ledger.is_dirty());
        assert_eq!(ledger.store().save_count(), 1);
        assert!(ledger.migration_report().is_none());
    }

    #[test]
    fn append_rotates_author_and_collects_quorum() {
        let mut ledger = fresh();
        let block = ledger.add_block(json!({"vote": "A"})).unwrap();
        assert_eq!(block.index, 1);
        assert_eq!(block.author, "judicial");
        assert_eq!(block.required_signatures, 5);
        let ids: Vec<&str> = block.signer_ids().collect();
        assert_eq!(ids, vec!["eci", "judicial", "observer", "nic", "academia"]);

        for _ in 0..7 {
            ledger.add_block(json!({"vote": "B"})).unwrap();
        }
        assert_eq!(ledger.blocks()[7].author, "eci");
        assert_eq!(ledger.blocks()[8].author, "judicial");
        assert!(ledger.is_valid());
    }

    #[test]
    fn blocks_link_and_timestamps_advance() {
        let mut ledger = fresh();
        ledger.add_block(json!({"vote": "A"})).unwrap();
        let blocks = ledger.blocks();
        assert_eq!(blocks[1].previous_hash, blocks[0].hash);
        assert_eq!(blocks[1].timestamp.as_str(), "2025-01-01 00:00:01");
        assert_eq!(
            blocks[1].hash,
            "b5cf91277ba1ada79686ff29442bf6770257392d27c83f696aeee8e2d1afeb8a"
        );
    }

    #[test]
    fn add_signature_is_idempotent() {
        let mut ledger = fresh();
        ledger.add_block(json!({"vote": "A"})).unwrap();
        assert_eq!(ledger.add_signature(1, "auditor").unwrap(), SignatureOutcome::Added);
        assert_eq!(ledger.add_signature(1, "auditor").unwrap(), SignatureOutcome::AlreadyPresent);
        assert_eq!(ledger.blocks()[1].signatures.len(), 6);
        assert!(ledger.is_valid());
    }

    #[test]
    fn add_signature_rejects_unknown_and_out_of_range() {
        let mut ledger = fresh();
        assert!(matches!(
            ledger.add_signature(0, "mallory"),
            Err(LedgerError::UnknownValidator(id)) if id == "mallory"
        ));
        assert!(matches!(
            ledger.add_signature(3, "eci"),
            Err(LedgerError::BlockOutOfRange { index: 3, len: 1 })
        ));
        assert!(matches!(
            ledger.add_signature_all("mallory"),
            Err(LedgerError::UnknownValidator(_))
        ));
    }

    #[test]
    fn add_signature_latest_targets_last_block() {
        let mut ledger = fresh();
        ledger.add_block(json!({"vote": "A"})).unwrap();
        ledger.add_block(json!({"vote": "B"})).unwrap();
        assert_eq!(ledger.add_signature_latest("state_pool").unwrap(), SignatureOutcome::Added);
        assert!(ledger.blocks()[2].is_signed_by("state_pool"));
        assert!(!ledger.blocks()[1].is_signed_by("state_pool"));
    }

    #[test]
    fn add_signature_all_backfills_once() {
        let mut ledger = fresh();
        ledger.add_block(json!({"vote": "A"})).unwrap();
        ledger.add_block(json!({"vote": "B"})).unwrap();
        let saves = ledger.store().save_count();

        // Genesis already carries every roster member.
        assert_eq!(ledger.add_signature_all("auditor").unwrap(), 2);
        assert_eq!(ledger.store().save_count(), saves + 1);
        assert_eq!(ledger.add_signature_all("auditor").unwrap(), 0);
        assert_eq!(ledger.store().save_count(), saves + 1);
        assert!(ledger.is_valid());
    }

    #[test]
    fn failed_save_keeps_block_and_marks_dirty() {
        let mut ledger = fresh();
        ledger.store().fail_saves(true);
        assert!(matches!(
            ledger.add_block(json!({"vote": "A"})),
            Err(LedgerError::Persistence(_))
        ));
        assert_eq!(ledger.len(), 2);
        assert!(ledger.is_dirty());
        assert_eq!(ledger.store().persisted().map(|c| c.len()), Some(1));

        ledger.store().fail_saves(false);
        ledger.flush().unwrap();
        assert!(!ledger.is_dirty());
        assert_eq!(ledger.store().persisted().map(|c| c.len()), Some(2));
    }

    #[test]
    fn corrupt_store_is_quarantined_and_replaced() {
        let ledger = Blockchain::open(roster(None), NullChainStore::corrupted(), NullClock::default());
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.store().quarantine_count(), 1);
        assert_eq!(ledger.store().persisted().map(|c| c.len()), Some(1));
        assert!(ledger.is_valid());
    }

    #[test]
    fn reopen_with_lower_threshold_migrates() {
        let mut ledger = fresh();
        ledger.add_block(json!({"vote": "A"})).unwrap();
        ledger.add_signature(1, "auditor").unwrap();
        let stored = ledger.store().persisted().unwrap();

        let reopened = Blockchain::open(roster(Some(3)), NullChainStore::with_chain(stored), NullClock::default());
        let report = reopened.migration_report().copied().unwrap();
        assert_eq!(report.blocks_retagged, 2);
        assert_eq!(report.signatures_added, 0);
        assert_eq!(reopened.store().save_count(), 1);
        assert!(reopened.blocks().iter().all(|b| b.required_signatures == 3));
        assert_eq!(reopened.blocks()[1].signatures.len(), 6);
        assert!(reopened.is_valid());
    }

    #[test]
    fn reopen_with_same_threshold_does_not_rewrite() {
        let mut ledger = fresh();
        ledger.add_block(json!({"vote": "A"})).unwrap();
        let stored = ledger.store().persisted().unwrap();

        let reopened = Blockchain::open(roster(None), NullChainStore::with_chain(stored), NullClock::default());
        assert!(!reopened.migration_report().unwrap().changed());
        assert_eq!(reopened.store().save_count(), 0);
    }

    #[test]
    fn tally_and_roster_views() {
        let mut ledger = fresh();
        ledger.add_block(json!({"vote": "A"})).unwrap();
        ledger.add_block(json!({"vote": "A"})).unwrap();
        assert_eq!(ledger.tally()[0].votes, 2);
        assert_eq!(ledger.get_validator_ids().len(), 7);
        assert_eq!(ledger.get_validators_full()[0].id, "eci");
        assert_eq!(ledger.threshold(), 5);
        assert_eq!(ledger.last_block().map(|b| b.index), Some(2));
    }
}
