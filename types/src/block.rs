//! Endorsed block: a header plus its mutable endorsement envelope.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::header::{BlockHeader, BLOCK_VERSION};
use crate::time::Timestamp;

/// One validator's keyed-MAC endorsement of a block hash.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endorsement {
    /// Roster id of the endorsing validator.
    #[serde(rename = "validator", alias = "validator_id")]
    pub validator_id: String,
    /// Lowercase hex HMAC-SHA256 of the block hash.
    pub sig: String,
}

/// A block as stored in the ledger file.
///
/// Field order matches the persisted layout. Missing fields in older files
/// fall back to the values the ledger has always assumed for them. Envelope
/// fields that are present but null or mistyped fall back the same way, and
/// unreadable endorsement records are dropped; migration repairs both on load.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Block {
    #[serde(default = "default_version")]
    pub version: String,
    pub index: u64,
    pub timestamp: Timestamp,
    #[serde(default)]
    pub data: Value,
    pub previous_hash: String,
    #[serde(default, deserialize_with = "lenient_author")]
    pub author: String,
    #[serde(default, deserialize_with = "lenient_signatures")]
    pub signatures: Vec<Endorsement>,
    #[serde(default = "default_required_signatures", deserialize_with = "lenient_required")]
    pub required_signatures: usize,
    pub hash: String,
}

fn default_version() -> String {
    BLOCK_VERSION.to_string()
}

fn default_required_signatures() -> usize {
    1
}

fn lenient_author<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::String(s) => s,
        _ => String::new(),
    })
}

fn lenient_signatures<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<Endorsement>, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => Vec::new(),
    })
}

fn lenient_required<'de, D: Deserializer<'de>>(d: D) -> Result<usize, D::Error> {
    Ok(Value::deserialize(d)?
        .as_u64()
        .and_then(|n| usize::try_from(n).ok())
        .unwrap_or_else(default_required_signatures))
}

impl Block {
    /// Assemble a block from a header and its envelope.
    pub fn from_header(
        header: BlockHeader,
        hash: String,
        author: String,
        signatures: Vec<Endorsement>,
        required_signatures: usize,
    ) -> Self {
        Self {
            version: header.version,
            index: header.index,
            timestamp: header.timestamp,
            data: header.data,
            previous_hash: header.previous_hash,
            author,
            signatures,
            required_signatures,
            hash,
        }
    }

    /// The hashed part of this block, as currently stored.
    pub fn header(&self) -> BlockHeader {
        BlockHeader {
            version: self.version.clone(),
            index: self.index,
            timestamp: self.timestamp.clone(),
            data: self.data.clone(),
            previous_hash: self.previous_hash.clone(),
        }
    }

    /// Whether `validator_id` has already endorsed this block.
    pub fn is_signed_by(&self, validator_id: &str) -> bool {
        self.signatures.iter().any(|s| s.validator_id == validator_id)
    }

    /// Ids of the endorsing validators, in endorsement order.
    pub fn signer_ids(&self) -> impl Iterator<Item = &str> {
        self.signatures.iter().map(|s| s.validator_id.as_str())
    }
}
