//! Nullable infrastructure for deterministic testing.
//!
//! The chain engine reaches the outside world through two seams: the
//! [`Clock`](votechain_types::Clock) that stamps blocks and the
//! [`ChainStore`](votechain_store::ChainStore) that persists them. This crate
//! provides test-friendly implementations that:
//! - Return deterministic values
//! - Can be controlled programmatically (including injected failures)
//! - Never touch the filesystem
//!
//! Usage: swap real implementations for nullables in tests.

pub mod clock;
pub mod store;

pub use clock::NullClock;
pub use store::NullChainStore;
