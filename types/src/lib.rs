//! Fundamental types for the votechain ledger.
//!
//! This crate defines the records shared across every other crate in the
//! workspace: block headers, endorsed blocks, endorsements, timestamps and the
//! public view of a validator.

pub mod block;
pub mod header;
pub mod time;
pub mod validator;

pub use block::{Block, Endorsement};
pub use header::{BlockHeader, BLOCK_VERSION};
pub use time::{Clock, SystemClock, Timestamp, TIMESTAMP_FORMAT};
pub use validator::ValidatorInfo;
