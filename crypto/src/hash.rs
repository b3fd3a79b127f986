//! SHA-256 header hashing.

use sha2::{Digest, Sha256};
use votechain_types::BlockHeader;

use crate::canonical::canonical_header;

/// SHA-256 of `data`, lowercase hex.
pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

/// Hash a header: SHA-256 over its canonical encoding.
pub fn hash_header(header: &BlockHeader) -> String {
    sha256_hex(canonical_header(header).as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use votechain_types::Timestamp;

    const GENESIS_HASH: &str = "07ebcda87555c3be7e9e86d69b4f0d643adbd548337758d6b66824d29c37175f";

    fn genesis_header() -> BlockHeader {
        BlockHeader::new(
            0,
            Timestamp::new("2025-01-01 00:00:00"),
            json!({"voter_id": "0", "vote": "Genesis Block"}),
            "0",
        )
    }

    #[test]
    fn sha256_empty_input() {
        assert_eq!(
            sha256_hex(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn genesis_hash_matches_reference() {
        assert_eq!(hash_header(&genesis_header()), GENESIS_HASH);
    }

    #[test]
    fn chained_header_matches_reference() {
        let header = BlockHeader::new(
            1,
            Timestamp::new("2025-01-01 00:00:01"),
            json!({"vote": "A"}),
            GENESIS_HASH,
        );
        assert_eq!(
            hash_header(&header),
            "b5cf91277ba1ada79686ff29442bf6770257392d27c83f696aeee8e2d1afeb8a"
        );
    }

    #[test]
    fn numeric_payloads_match_reference() {
        let cases = [
            ("1.5e-07", "8cd2df304c64332e1e2bd7164b323eee7b01372dd30f826e3b92be992b6e16ab"),
            ("12345678901234567890123", "b71cb37c48f2c20f6e72164e9aef6c2ca673ecaa785048bfb2506a69bb4e67f2"),
            ("1e16", "0cab259ec7608bcdf4db84cf3321381b38398ad538544c5190f07884dc4f1fac"),
            ("1E5", "d108607e9e81d424037bdc744f50421a3ba9a4247f022a57340fc8b5ec09d124"),
        ];
        for (raw, expected) in cases {
            let data = serde_json::from_str(&format!(r#"{{"vote": "A", "n": {raw}}}"#)).unwrap();
            let header = BlockHeader::new(1, Timestamp::new("2025-01-01 00:00:01"), data, "0");
            assert_eq!(hash_header(&header), expected, "{raw}");
        }
    }

    #[test]
    fn any_field_change_changes_hash() {
        let base = genesis_header();
        let h = hash_header(&base);

        let mut changed = base.clone();
        changed.timestamp = Timestamp::new("2025-01-01 00:00:01");
        assert_ne!(hash_header(&changed), h);

        let mut changed = base.clone();
        changed.data = json!({"voter_id": "0", "vote": "Genesis block"});
        assert_ne!(hash_header(&changed), h);

        let mut changed = base.clone();
        changed.previous_hash = "1".into();
        assert_ne!(hash_header(&changed), h);

        let mut changed = base;
        changed.version = "2".into();
        assert_ne!(hash_header(&changed), h);
    }
}
