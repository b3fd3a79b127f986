//! Seams between the ledger and whoever holds the signing capability.
//!
//! The chain engine only ever asks an authority for its identity and for an
//! endorsement, so an in-process registry can later be swapped for one that
//! forwards signing requests to independent validator processes.

use votechain_types::ValidatorInfo;

/// A party able to endorse block hashes.
pub trait Authority {
    fn id(&self) -> &str;

    fn role(&self) -> &str;

    /// Endorse `message` (a block hash).
    fn sign(&self, message: &str) -> String;

    /// Check an endorsement claimed to come from this authority.
    fn verify(&self, message: &str, signature: &str) -> bool;
}

/// An ordered set of authorities plus the quorum they operate under.
pub trait Roster {
    type Member: Authority;

    /// Members in roster order. Order drives authorship rotation and the
    /// order in which endorsements are collected.
    fn members(&self) -> &[Self::Member];

    /// Endorsements required for a block to be accepted.
    fn threshold(&self) -> usize;

    fn size(&self) -> usize {
        self.members().len()
    }

    fn ids(&self) -> Vec<String> {
        self.members().iter().map(|m| m.id().to_string()).collect()
    }

    fn full_info(&self) -> Vec<ValidatorInfo> {
        self.members()
            .iter()
            .map(|m| ValidatorInfo {
                id: m.id().to_string(),
                role: m.role().to_string(),
            })
            .collect()
    }

    fn find(&self, id: &str) -> Option<&Self::Member> {
        self.members().iter().find(|m| m.id() == id)
    }

    /// Round-robin author for the block at `index`.
    fn author_for(&self, index: u64) -> Option<&Self::Member> {
        let members = self.members();
        if members.is_empty() {
            return None;
        }
        let slot = (index % members.len() as u64) as usize;
        Some(&members[slot])
    }
}
