//! Public view of a validator.

use serde::{Deserialize, Serialize};

/// Identity and role of an authority, without its signing secret.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorInfo {
    pub id: String,
    pub role: String,
}
