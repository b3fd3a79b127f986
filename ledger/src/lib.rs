//! Append-only vote ledger endorsed by a Proof-of-Authority roster.
//!
//! Each block separates two things:
//! - the **header** (version, index, timestamp, payload, previous hash), which
//!   is hashed once at creation and never changes;
//! - the **endorsement envelope** (author, signatures, required signature
//!   count), which may grow later as validators add endorsements or as the
//!   quorum policy is reconciled on load.
//!
//! Integrity of history rests on the header hashes; acceptance rests on the
//! envelope meeting the quorum.

pub mod chain;
pub mod config;
pub mod endorsement;
pub mod error;
pub mod genesis;
pub mod migration;
pub mod tally;
pub mod validation;

pub use chain::{Blockchain, SignatureOutcome};
pub use config::LedgerConfig;
pub use endorsement::{endorse_up_to, known_signer_count};
pub use error::{LedgerError, ValidationError};
pub use genesis::{create_genesis_block, genesis_payload, GENESIS_PREVIOUS_HASH};
pub use migration::{reconcile_threshold, MigrationReport};
pub use tally::{tally, TallyEntry};
pub use validation::{audit, verify_block, verify_chain, BlockAudit, ChainAudit};
