//! Proof-of-Authority roster.
//!
//! A fixed, ordered set of authorities endorses every block with a keyed MAC.
//! A block is accepted once it carries endorsements from at least `threshold`
//! distinct authorities.
//!
//! ## Module overview
//!
//! - [`authority`]: the `Authority` and `Roster` seams the ledger is written against.
//! - [`validator`]: an in-process authority holding its own signing secret.
//! - [`registry`]: the election roster and its configuration sources.
//! - [`quorum`]: threshold defaults and override clamping.
//! - [`error`]: consensus error types.

pub mod authority;
pub mod error;
pub mod quorum;
pub mod registry;
pub mod validator;

pub use authority::{Authority, Roster};
pub use error::ConsensusError;
pub use quorum::{default_threshold, parse_threshold_override, resolve_threshold};
pub use registry::{RosterEntry, ValidatorRegistry, AUTHORITY_ROSTER, THRESHOLD_ENV};
pub use validator::{Validator, ValidatorSecret};
