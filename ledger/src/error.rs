use thiserror::Error;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("unknown validator: {0}")]
    UnknownValidator(String),

    #[error("block {index} out of range (chain has {len} blocks)")]
    BlockOutOfRange { index: usize, len: usize },

    #[error("persistence error: {0}")]
    Persistence(#[from] votechain_store::StoreError),

    #[error("consensus error: {0}")]
    Consensus(#[from] votechain_consensus::ConsensusError),

    #[error("config error: {0}")]
    Config(String),
}

/// Why a chain failed verification.
///
/// These are returned as values; a failed check never aborts the process.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("genesis block is malformed: {reason}")]
    GenesisMalformed { reason: String },

    #[error("block {index}: previous_hash {found} does not link to {expected}")]
    LinkageBroken {
        index: usize,
        expected: String,
        found: String,
    },

    #[error("block {index}: stored hash {stored} does not match header hash {computed}")]
    HashMismatch {
        index: usize,
        stored: String,
        computed: String,
    },

    #[error("block {index}: {have} signatures, {need} required")]
    InsufficientSignatures { index: usize, have: usize, need: usize },

    #[error("block {index}: {verified} valid endorsements from distinct validators, {need} required")]
    InsufficientValidSignatures {
        index: usize,
        verified: usize,
        need: usize,
    },
}

impl ValidationError {
    /// Position of the offending block in the chain.
    pub fn index(&self) -> usize {
        match self {
            Self::GenesisMalformed { .. } => 0,
            Self::LinkageBroken { index, .. }
            | Self::HashMismatch { index, .. }
            | Self::InsufficientSignatures { index, .. }
            | Self::InsufficientValidSignatures { index, .. } => *index,
        }
    }
}
