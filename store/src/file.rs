//! JSON snapshot file backend.
//!
//! The whole chain is written as a pretty-printed JSON array on every save.
//! Writes go to a sibling `.tmp` file which is then renamed over the ledger,
//! so a crash mid-write leaves either the old or the new snapshot, never a
//! truncated one.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use votechain_types::Block;

use crate::chain::ChainStore;
use crate::StoreError;

/// File name used when only a data directory is configured.
pub const DEFAULT_LEDGER_FILE: &str = "blockchain.json";

/// Ledger stored as a single JSON file.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at `<data_dir>/blockchain.json`.
    pub fn in_dir(data_dir: impl AsRef<Path>) -> Self {
        Self::new(data_dir.as_ref().join(DEFAULT_LEDGER_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn sibling(&self, suffix: &str) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(suffix);
        PathBuf::from(name)
    }
}

impl ChainStore for JsonFileStore {
    fn load(&self) -> Result<Option<Vec<Block>>, StoreError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(&self.path)?;
        if contents.trim().is_empty() {
            return Ok(None);
        }
        let chain: Vec<Block> = serde_json::from_str(&contents)
            .map_err(|e| StoreError::Corruption(format!("{}: {e}", self.path.display())))?;
        tracing::debug!(path = %self.path.display(), blocks = chain.len(), "loaded ledger");
        Ok(Some(chain))
    }

    fn save(&self, chain: &[Block]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let data = serde_json::to_vec_pretty(chain)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;

        let tmp_path = self.sibling(".tmp");
        {
            let mut file = fs::File::create(&tmp_path)?;
            file.write_all(&data)?;
            file.sync_all()?;
        }
        fs::rename(&tmp_path, &self.path)?;
        tracing::debug!(path = %self.path.display(), blocks = chain.len(), "ledger saved");
        Ok(())
    }

    fn quarantine(&self) -> Result<Option<PathBuf>, StoreError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let mut target = self.sibling(".corrupt");
        let mut n = 1u32;
        while target.exists() {
            target = self.sibling(&format!(".corrupt.{n}"));
            n += 1;
        }
        fs::rename(&self.path, &target)?;
        tracing::warn!(from = %self.path.display(), to = %target.display(), "quarantined unreadable ledger");
        Ok(Some(target))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use votechain_types::{BlockHeader, Endorsement, Timestamp};

    fn block(index: u64) -> Block {
        Block::from_header(
            BlockHeader::new(index, Timestamp::new("2025-01-01 00:00:00"), json!({"vote": "A"}), "0"),
            format!("hash{index}"),
            "eci".into(),
            vec![Endorsement {
                validator_id: "eci".into(),
                sig: "ab".into(),
            }],
            5,
        )
    }

    #[test]
    fn missing_file_loads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::in_dir(dir.path());
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::in_dir(dir.path());
        let chain = vec![block(0), block(1)];
        store.save(&chain).unwrap();

        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded, chain);
        assert!(!store.sibling(".tmp").exists());
    }

    #[test]
    fn save_is_pretty_printed_array() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::in_dir(dir.path());
        store.save(&[block(0)]).unwrap();

        let text = fs::read_to_string(store.path()).unwrap();
        assert!(text.starts_with("[\n  {\n    \"version\": \"1\""), "{text}");
        assert!(text.contains("\"validator\": \"eci\""));
    }

    #[test]
    fn save_creates_missing_directories() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("nested/deeper/ledger.json"));
        store.save(&[block(0)]).unwrap();
        assert!(store.path().exists());
    }

    #[test]
    fn overwrite_replaces_whole_chain() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::in_dir(dir.path());
        store.save(&[block(0), block(1), block(2)]).unwrap();
        store.save(&[block(0)]).unwrap();
        assert_eq!(store.load().unwrap().unwrap().len(), 1);
    }

    #[test]
    fn garbage_is_corruption() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::in_dir(dir.path());
        fs::write(store.path(), "{not json").unwrap();
        assert!(matches!(store.load(), Err(StoreError::Corruption(_))));
    }

    #[test]
    fn wrong_shape_is_corruption() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::in_dir(dir.path());
        fs::write(store.path(), r#"{"chain": []}"#).unwrap();
        assert!(matches!(store.load(), Err(StoreError::Corruption(_))));
    }

    #[test]
    fn blank_file_loads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::in_dir(dir.path());
        fs::write(store.path(), "  \n").unwrap();
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn quarantine_moves_file_aside() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::in_dir(dir.path());
        assert!(store.quarantine().unwrap().is_none());

        fs::write(store.path(), "garbage").unwrap();
        let first = store.quarantine().unwrap().unwrap();
        assert!(!store.path().exists());
        assert_eq!(fs::read_to_string(&first).unwrap(), "garbage");

        fs::write(store.path(), "more garbage").unwrap();
        let second = store.quarantine().unwrap().unwrap();
        assert_ne!(first, second);
        assert!(second.to_string_lossy().ends_with(".corrupt.1"));
    }

    #[test]
    fn reads_records_written_by_older_ledgers() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::in_dir(dir.path());
        fs::write(
            store.path(),
            r#"[{"version": "1", "index": 0, "timestamp": "2025-01-01 00:00:00",
                 "data": {"voter_id": "0", "vote": "Genesis Block"}, "previous_hash": "0",
                 "author": "eci", "signatures": [{"validator": "eci", "sig": "ab"}],
                 "required_signatures": 5, "hash": "h"}]"#,
        )
        .unwrap();
        let chain = store.load().unwrap().unwrap();
        assert_eq!(chain[0].signatures[0].validator_id, "eci");
        assert_eq!(chain[0].required_signatures, 5);
    }
}
