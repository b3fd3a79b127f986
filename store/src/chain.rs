//! Chain snapshot storage trait.

use std::path::PathBuf;

use crate::StoreError;
use votechain_types::Block;

/// Durable home of the ledger.
pub trait ChainStore {
    /// Load the persisted chain.
    ///
    /// Returns `Ok(None)` when nothing has been persisted yet and
    /// [`StoreError::Corruption`] when something exists but cannot be read
    /// as a chain.
    fn load(&self) -> Result<Option<Vec<Block>>, StoreError>;

    /// Replace the persisted chain with `chain`.
    fn save(&self, chain: &[Block]) -> Result<(), StoreError>;

    /// Move unreadable persisted data aside so a fresh chain can be written
    /// without destroying it. Returns where it went, if anywhere.
    fn quarantine(&self) -> Result<Option<PathBuf>, StoreError> {
        Ok(None)
    }
}
