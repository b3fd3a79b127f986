//! In-process authority holding its own signing secret.

use votechain_crypto::{sign_hash, verify_hash};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::authority::Authority;

/// Shared secret keying a validator's endorsements.
///
/// This type intentionally does not implement `Debug`, `Serialize`, or `Clone`
/// to prevent accidental exposure. Secret bytes are zeroized on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct ValidatorSecret(Vec<u8>);

impl ValidatorSecret {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }
}

/// An authority in the roster.
pub struct Validator {
    id: String,
    role: String,
    public_marker: String,
    secret: ValidatorSecret,
    default_secret: bool,
}

impl Validator {
    pub fn new(
        id: impl Into<String>,
        role: impl Into<String>,
        public_marker: impl Into<String>,
        secret: ValidatorSecret,
    ) -> Self {
        Self {
            id: id.into(),
            role: role.into(),
            public_marker: public_marker.into(),
            secret,
            default_secret: false,
        }
    }

    /// Mark this validator as running on its documented fallback secret.
    pub(crate) fn with_default_secret(mut self, default_secret: bool) -> Self {
        self.default_secret = default_secret;
        self
    }

    pub fn public_marker(&self) -> &str {
        &self.public_marker
    }

    /// Whether the secret is the documented default rather than a configured one.
    pub fn uses_default_secret(&self) -> bool {
        self.default_secret
    }
}

impl Authority for Validator {
    fn id(&self) -> &str {
        &self.id
    }

    fn role(&self) -> &str {
        &self.role
    }

    fn sign(&self, message: &str) -> String {
        sign_hash(&self.secret.0, message)
    }

    fn verify(&self, message: &str, signature: &str) -> bool {
        verify_hash(&self.secret.0, message, signature)
    }
}
