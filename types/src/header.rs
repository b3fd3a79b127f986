//! Block header: the hashed part of a block.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::time::Timestamp;

/// Header version stamped on every block this code produces.
pub const BLOCK_VERSION: &str = "1";

/// The fields a block's hash commits to.
///
/// Endorsements, the author and the required signature count live outside the
/// header, so they can change after creation without touching the hash.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BlockHeader {
    pub version: String,
    pub index: u64,
    pub timestamp: Timestamp,
    /// Opaque payload supplied by the caller (a cast vote, or the genesis marker).
    pub data: Value,
    pub previous_hash: String,
}

impl BlockHeader {
    /// Build a header with the current [`BLOCK_VERSION`].
    pub fn new(index: u64, timestamp: Timestamp, data: Value, previous_hash: impl Into<String>) -> Self {
        Self {
            version: BLOCK_VERSION.to_string(),
            index,
            timestamp,
            data,
            previous_hash: previous_hash.into(),
        }
    }
}
