//! HMAC-SHA256 endorsements over header hashes.
//!
//! An endorsement is `HMAC-SHA256(key = validator secret, message = hex hash)`,
//! lowercase hex. Verification fails closed: a signature that is not
//! lowercase hex, or has the wrong length, is simply not a valid endorsement.

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

fn keyed(secret: &[u8], message: &str) -> HmacSha256 {
    let mut mac = HmacSha256::new_from_slice(secret).expect("HMAC accepts any key length");
    mac.update(message.as_bytes());
    mac
}

/// Endorse `message` (a block hash) with `secret`, returning lowercase hex.
pub fn sign_hash(secret: &[u8], message: &str) -> String {
    hex::encode(keyed(secret, message).finalize().into_bytes())
}

/// Check an endorsement in constant time.
///
/// Only the exact lowercase hex produced by [`sign_hash`] is accepted.
pub fn verify_hash(secret: &[u8], message: &str, signature: &str) -> bool {
    if !signature.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f')) {
        return false;
    }
    let Ok(bytes) = hex::decode(signature) else {
        return false;
    };
    keyed(secret, message).verify_slice(&bytes).is_ok()
}
