//! Chain verification.
//!
//! A chain is valid when:
//! - the genesis root has index 0, previous hash `"0"` and a header hash that recomputes;
//! - every later block links to its predecessor's hash;
//! - every later block's stored hash is the hash of its header;
//! - every later block carries at least `required_signatures` endorsements, and
//!   at least that many distinct roster members' endorsements verify against
//!   the recomputed hash.
//!
//! Genesis endorsements are not re-verified: the root is trusted once its
//! header is anchored.

use std::collections::HashSet;

use serde::Serialize;
use votechain_consensus::{Authority, Roster};
use votechain_crypto::hash_header;
use votechain_types::Block;

use crate::error::ValidationError;
use crate::genesis::GENESIS_PREVIOUS_HASH;

fn check_genesis(genesis: &Block) -> Result<(), ValidationError> {
    if genesis.index != 0 {
        return Err(ValidationError::GenesisMalformed {
            reason: format!("index is {}, expected 0", genesis.index),
        });
    }
    if genesis.previous_hash != GENESIS_PREVIOUS_HASH {
        return Err(ValidationError::GenesisMalformed {
            reason: format!("previous_hash is {:?}, expected \"0\"", genesis.previous_hash),
        });
    }
    let computed = hash_header(&genesis.header());
    if computed != genesis.hash {
        return Err(ValidationError::HashMismatch {
            index: 0,
            stored: genesis.hash.clone(),
            computed,
        });
    }
    Ok(())
}

/// Roster members whose endorsement of `hash` verifies, in endorsement order,
/// each counted once.
fn verified_signers<'a, R: Roster>(roster: &R, block: &'a Block, hash: &str) -> Vec<&'a str> {
    let mut seen = HashSet::new();
    block
        .signatures
        .iter()
        .filter(|s| {
            roster
                .find(&s.validator_id)
                .is_some_and(|member| member.verify(hash, &s.sig))
        })
        .map(|s| s.validator_id.as_str())
        .filter(|id| seen.insert(*id))
        .collect()
}

/// Check one non-genesis block against its predecessor.
///
/// Returns the number of distinct validators whose endorsement verified.
pub fn verify_block<R: Roster>(
    roster: &R,
    index: usize,
    previous: &Block,
    block: &Block,
) -> Result<usize, ValidationError> {
    if block.previous_hash != previous.hash {
        return Err(ValidationError::LinkageBroken {
            index,
            expected: previous.hash.clone(),
            found: block.previous_hash.clone(),
        });
    }

    let computed = hash_header(&block.header());
    if computed != block.hash {
        return Err(ValidationError::HashMismatch {
            index,
            stored: block.hash.clone(),
            computed,
        });
    }

    // A zero requirement in a tampered envelope still needs one endorsement.
    let need = block.required_signatures.max(1);
    if block.signatures.len() < need {
        return Err(ValidationError::InsufficientSignatures {
            index,
            have: block.signatures.len(),
            need,
        });
    }

    let verified = verified_signers(roster, block, &computed).len();
    if verified < need {
        return Err(ValidationError::InsufficientValidSignatures {
            index,
            verified,
            need,
        });
    }
    Ok(verified)
}

/// Verify the whole chain, stopping at the first failing block.
///
/// An empty chain is vacuously valid.
pub fn verify_chain<R: Roster>(roster: &R, chain: &[Block]) -> Result<(), ValidationError> {
    let Some(genesis) = chain.first() else {
        return Ok(());
    };
    check_genesis(genesis)?;
    for (i, pair) in chain.windows(2).enumerate() {
        verify_block(roster, i + 1, &pair[0], &pair[1])?;
    }
    Ok(())
}

/// Per-block verification result, for audit display.
#[derive(Clone, Debug, Serialize)]
pub struct BlockAudit {
    pub index: usize,
    pub author: String,
    pub required_signatures: usize,
    pub signatures: usize,
    /// Distinct roster members whose endorsement verified.
    pub verified_signers: Vec<String>,
    #[serde(serialize_with = "serialize_outcome")]
    pub outcome: Result<(), ValidationError>,
}

fn serialize_outcome<S: serde::Serializer>(
    outcome: &Result<(), ValidationError>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match outcome {
        Ok(()) => serializer.serialize_str("ok"),
        Err(e) => serializer.serialize_str(&e.to_string()),
    }
}

/// Verification report for every block of a chain.
#[derive(Clone, Debug, Serialize)]
pub struct ChainAudit {
    pub blocks: Vec<BlockAudit>,
}

impl ChainAudit {
    pub fn is_valid(&self) -> bool {
        self.blocks.iter().all(|b| b.outcome.is_ok())
    }

    /// The earliest failing block, if any.
    pub fn first_failure(&self) -> Option<&ValidationError> {
        self.blocks.iter().find_map(|b| b.outcome.as_ref().err())
    }
}

/// Check every block without stopping at the first failure.
///
/// Each block is judged against its own stored predecessor, so a single
/// tampered block shows up where it is rather than hiding everything after it.
pub fn audit<R: Roster>(roster: &R, chain: &[Block]) -> ChainAudit {
    let blocks = chain
        .iter()
        .enumerate()
        .map(|(index, block)| {
            let computed = hash_header(&block.header());
            let verified_signers = verified_signers(roster, block, &computed)
                .into_iter()
                .map(str::to_string)
                .collect();
            let outcome = if index == 0 {
                check_genesis(block)
            } else {
                verify_block(roster, index, &chain[index - 1], block).map(|_| ())
            };
            BlockAudit {
                index,
                author: block.author.clone(),
                required_signatures: block.required_signatures,
                signatures: block.signatures.len(),
                verified_signers,
                outcome,
            }
        })
        .collect();
    ChainAudit { blocks }
}
