//! Ledger configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use votechain_consensus::ValidatorRegistry;
use votechain_store::{JsonFileStore, DEFAULT_LEDGER_FILE};
use votechain_types::SystemClock;
use votechain_utils::LogFormat;

use crate::chain::Blockchain;
use crate::LedgerError;

/// Configuration for a ledger process.
///
/// Can be loaded from a TOML file via [`LedgerConfig::from_toml_file`] or
/// built programmatically (e.g. for tests). Validator secrets set here are
/// overridden by their `POA_*_SECRET` environment variables.
#[derive(Clone, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// Directory holding the ledger file.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Ledger file name inside `data_dir`.
    #[serde(default = "default_ledger_file")]
    pub ledger_file: String,

    /// Quorum override. `POA_THRESHOLD` applies when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold: Option<i64>,

    /// Log format: "human" or "json".
    #[serde(default)]
    pub log_format: LogFormat,

    /// Log level filter (e.g. "info", "debug", "warn,votechain_ledger=debug").
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Validator id → signing secret.
    #[serde(default)]
    pub secrets: BTreeMap<String, String>,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./votechain_data")
}

fn default_ledger_file() -> String {
    DEFAULT_LEDGER_FILE.to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl LedgerConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &str) -> Result<Self, LedgerError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| LedgerError::Config(format!("{path}: {e}")))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, LedgerError> {
        toml::from_str(s).map_err(|e| LedgerError::Config(e.to_string()))
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> String {
        toml::to_string_pretty(self).expect("LedgerConfig is always serializable to TOML")
    }

    pub fn ledger_path(&self) -> PathBuf {
        self.data_dir.join(&self.ledger_file)
    }

    /// Build the authority roster from the environment, this file's secrets,
    /// and the configured threshold.
    pub fn registry(&self) -> ValidatorRegistry {
        ValidatorRegistry::from_env(&self.secrets, self.threshold)
    }

    /// Open (or create) the ledger this configuration points at.
    pub fn open_ledger(&self) -> Blockchain {
        Blockchain::open(
            self.registry(),
            JsonFileStore::new(self.ledger_path()),
            SystemClock,
        )
    }
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            ledger_file: default_ledger_file(),
            threshold: None,
            log_format: LogFormat::default(),
            log_level: default_log_level(),
            secrets: BTreeMap::new(),
        }
    }
}

impl fmt::Debug for LedgerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LedgerConfig")
            .field("data_dir", &self.data_dir)
            .field("ledger_file", &self.ledger_file)
            .field("threshold", &self.threshold)
            .field("log_format", &self.log_format)
            .field("log_level", &self.log_level)
            .field("secrets", &self.secrets.keys().collect::<Vec<_>>())
            .finish()
    }
}
