//! Ledger persistence for votechain.
//!
//! The chain engine depends only on the [`ChainStore`] trait. Every mutation
//! hands the store a full snapshot of the chain; the store decides how to make
//! that durable.

pub mod chain;
pub mod error;
pub mod file;

pub use chain::ChainStore;
pub use error::StoreError;
pub use file::{JsonFileStore, DEFAULT_LEDGER_FILE};
