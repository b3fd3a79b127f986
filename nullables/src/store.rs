//! Nullable ledger store: in-memory chain snapshots for testing.

use std::path::PathBuf;
use std::sync::Mutex;

use votechain_store::{ChainStore, StoreError};
use votechain_types::Block;

/// An in-memory [`ChainStore`] with switchable failure modes.
pub struct NullChainStore {
    chain: Mutex<Option<Vec<Block>>>,
    corrupt: Mutex<bool>,
    fail_saves: Mutex<bool>,
    saves: Mutex<usize>,
    quarantined: Mutex<Vec<Vec<Block>>>,
}

impl NullChainStore {
    /// An empty store (nothing persisted yet).
    pub fn new() -> Self {
        Self {
            chain: Mutex::new(None),
            corrupt: Mutex::new(false),
            fail_saves: Mutex::new(false),
            saves: Mutex::new(0),
            quarantined: Mutex::new(Vec::new()),
        }
    }

    /// A store already holding `chain`.
    pub fn with_chain(chain: Vec<Block>) -> Self {
        let store = Self::new();
        *store.chain.lock().unwrap() = Some(chain);
        store
    }

    /// A store whose persisted data cannot be parsed.
    pub fn corrupted() -> Self {
        let store = Self::new();
        *store.corrupt.lock().unwrap() = true;
        store
    }

    /// Make every subsequent `save` fail (or succeed again).
    pub fn fail_saves(&self, fail: bool) {
        *self.fail_saves.lock().unwrap() = fail;
    }

    /// Number of successful saves so far.
    pub fn save_count(&self) -> usize {
        *self.saves.lock().unwrap()
    }

    /// The last successfully saved chain.
    pub fn persisted(&self) -> Option<Vec<Block>> {
        self.chain.lock().unwrap().clone()
    }

    /// Number of times unreadable data was moved aside.
    pub fn quarantine_count(&self) -> usize {
        self.quarantined.lock().unwrap().len()
    }
}

impl Default for NullChainStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ChainStore for NullChainStore {
    fn load(&self) -> Result<Option<Vec<Block>>, StoreError> {
        if *self.corrupt.lock().unwrap() {
            return Err(StoreError::Corruption("null store marked corrupt".into()));
        }
        Ok(self.chain.lock().unwrap().clone())
    }

    fn save(&self, chain: &[Block]) -> Result<(), StoreError> {
        if *self.fail_saves.lock().unwrap() {
            return Err(StoreError::Io(std::io::Error::other("null store save failure")));
        }
        *self.chain.lock().unwrap() = Some(chain.to_vec());
        *self.saves.lock().unwrap() += 1;
        Ok(())
    }

    fn quarantine(&self) -> Result<Option<PathBuf>, StoreError> {
        let mut corrupt = self.corrupt.lock().unwrap();
        if !*corrupt {
            return Ok(None);
        }
        *corrupt = false;
        let previous = self.chain.lock().unwrap().take().unwrap_or_default();
        self.quarantined.lock().unwrap().push(previous);
        Ok(Some(PathBuf::from("null.corrupt")))
    }
}
