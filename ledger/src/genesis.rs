//! Genesis block creation.
//!
//! Genesis differs from every later block in one way: it is endorsed by the
//! whole roster, not just a quorum. Its `required_signatures` is still the
//! threshold in force when it was created.

use serde_json::{json, Value};
use votechain_consensus::{Authority, Roster};
use votechain_crypto::hash_header;
use votechain_types::{Block, BlockHeader, Timestamp};

use crate::endorsement::endorse_up_to;

/// `previous_hash` of the genesis block.
pub const GENESIS_PREVIOUS_HASH: &str = "0";

/// Fixed marker payload carried by the genesis block.
pub fn genesis_payload() -> Value {
    json!({"voter_id": "0", "vote": "Genesis Block"})
}

/// Create a genesis block stamped at `timestamp`, endorsed by every member of `roster`.
pub fn create_genesis_block<R: Roster>(roster: &R, timestamp: Timestamp) -> Block {
    let header = BlockHeader::new(0, timestamp, genesis_payload(), GENESIS_PREVIOUS_HASH);
    let hash = hash_header(&header);

    let mut signatures = Vec::with_capacity(roster.size());
    endorse_up_to(roster, &hash, &mut signatures, roster.size());

    let author = roster
        .members()
        .first()
        .map(|m| m.id().to_string())
        .unwrap_or_default();

    Block::from_header(header, hash, author, signatures, roster.threshold())
}
