//! Cryptographic primitives for the votechain ledger.
//!
//! - **Canonical JSON** for block headers (sorted keys, fixed separators, ASCII-only)
//! - **SHA-256** for header hashes, rendered as lowercase hex
//! - **HMAC-SHA256** keyed endorsements with constant-time verification

pub mod canonical;
pub mod hash;
pub mod sign;

pub use canonical::{canonical_header, canonical_json};
pub use hash::{hash_header, sha256_hex};
pub use sign::{sign_hash, verify_hash};
