//! The election authority roster.
//!
//! Seven authorities endorse the ledger, in this fixed order. Each one's
//! secret comes from its `POA_*_SECRET` environment variable, then from the
//! configuration file, then from a documented default. The defaults exist so a
//! development ledger works out of the box and must never be used unmodified
//! in a genuine deployment.

use std::collections::{BTreeMap, HashSet};

use crate::authority::{Authority, Roster};
use crate::error::ConsensusError;
use crate::quorum::{parse_threshold_override, resolve_threshold};
use crate::validator::{Validator, ValidatorSecret};

/// Environment variable carrying the quorum override.
pub const THRESHOLD_ENV: &str = "POA_THRESHOLD";

/// Static description of one roster seat.
#[derive(Clone, Copy, Debug)]
pub struct RosterEntry {
    pub id: &'static str,
    pub role: &'static str,
    pub public_marker: &'static str,
    pub secret_env: &'static str,
    pub default_secret: &'static str,
}

/// The authority roster, in endorsement order.
pub const AUTHORITY_ROSTER: [RosterEntry; 7] = [
    // Constitutional and oversight bodies
    RosterEntry {
        id: "eci",
        role: "Election Commission of India (ECI)",
        public_marker: "eci_pub",
        secret_env: "POA_ECI_SECRET",
        default_secret: "eci_secret",
    },
    RosterEntry {
        id: "judicial",
        role: "Judicial Oversight Panel (High Court\u{2013}nominated)",
        public_marker: "judicial_pub",
        secret_env: "POA_JUDICIAL_SECRET",
        default_secret: "judicial_secret",
    },
    RosterEntry {
        id: "observer",
        role: "Accredited Independent Observers (NGO/CSO)",
        public_marker: "observer_pub",
        secret_env: "POA_OBSERVER_SECRET",
        default_secret: "observer_secret",
    },
    // Technical and independent assurance
    RosterEntry {
        id: "nic",
        role: "National Informatics Centre / CERT-In",
        public_marker: "nic_pub",
        secret_env: "POA_NIC_SECRET",
        default_secret: "nic_secret",
    },
    RosterEntry {
        id: "academia",
        role: "Academic Consortium (IIT/IIIT/NIT)",
        public_marker: "academia_pub",
        secret_env: "POA_ACADEMIA_SECRET",
        default_secret: "academia_secret",
    },
    RosterEntry {
        id: "auditor",
        role: "Independent External Audit Firm Pool",
        public_marker: "auditor_pub",
        secret_env: "POA_AUDITOR_SECRET",
        default_secret: "auditor_secret",
    },
    // Federal balance via rotating state pool
    RosterEntry {
        id: "state_pool",
        role: "State Election Commission (Rotating Pool)",
        public_marker: "state_pub",
        secret_env: "POA_STATE_SECRET",
        default_secret: "state_secret",
    },
];

/// Fixed, ordered roster of validators and the quorum threshold in force.
///
/// The registry is the only owner of validator secrets; callers get
/// identities and endorsements, never key material.
pub struct ValidatorRegistry {
    validators: Vec<Validator>,
    threshold: usize,
}

impl ValidatorRegistry {
    /// Build a registry from explicit validators.
    pub fn new(validators: Vec<Validator>, threshold_override: Option<i64>) -> Result<Self, ConsensusError> {
        if validators.is_empty() {
            return Err(ConsensusError::EmptyRoster);
        }
        let mut seen = HashSet::new();
        for v in &validators {
            if !seen.insert(v.id()) {
                return Err(ConsensusError::DuplicateValidator(v.id().to_string()));
            }
        }
        let threshold = resolve_threshold(validators.len(), threshold_override);
        Ok(Self {
            validators,
            threshold,
        })
    }

    /// Build the [`AUTHORITY_ROSTER`], resolving each secret through `lookup`.
    ///
    /// Seats for which `lookup` returns `None` fall back to their default secret.
    pub fn authorities<F>(lookup: F, threshold_override: Option<i64>) -> Self
    where
        F: Fn(&RosterEntry) -> Option<String>,
    {
        let validators: Vec<Validator> = AUTHORITY_ROSTER
            .iter()
            .map(|entry| {
                let configured = lookup(entry);
                let default_secret = configured.is_none();
                let secret = configured.unwrap_or_else(|| entry.default_secret.to_string());
                Validator::new(entry.id, entry.role, entry.public_marker, ValidatorSecret::new(secret))
                    .with_default_secret(default_secret)
            })
            .collect();
        let threshold = resolve_threshold(validators.len(), threshold_override);
        Self {
            validators,
            threshold,
        }
    }

    /// Build the authority roster from the process environment.
    ///
    /// `file_secrets` (validator id → secret) sits between the environment and
    /// the defaults. `threshold_override` wins over `POA_THRESHOLD` when set.
    pub fn from_env(file_secrets: &BTreeMap<String, String>, threshold_override: Option<i64>) -> Self {
        let threshold = threshold_override.or_else(|| {
            std::env::var(THRESHOLD_ENV)
                .ok()
                .and_then(|raw| parse_threshold_override(&raw))
        });
        Self::authorities(
            |entry| {
                std::env::var(entry.secret_env)
                    .ok()
                    .or_else(|| file_secrets.get(entry.id).cloned())
            },
            threshold,
        )
    }

    /// Ids of validators still running on their documented default secret.
    pub fn defaulted_ids(&self) -> Vec<&str> {
        self.validators
            .iter()
            .filter(|v| v.uses_default_secret())
            .map(|v| v.id())
            .collect()
    }
}

impl Roster for ValidatorRegistry {
    type Member = Validator;

    fn members(&self) -> &[Validator] {
        &self.validators
    }

    fn threshold(&self) -> usize {
        self.threshold
    }
}
