//! Content fingerprint of a loaded dataset.

use sha2::{Digest, Sha256};

/// Hex-encoded SHA-256 of the raw file bytes, recorded in reports so that
/// figures can be traced back to the exact input.
pub fn dataset_fingerprint(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fingerprint_is_stable_hex() {
        let fingerprint = dataset_fingerprint(b"");
        assert_eq!(
            fingerprint,
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_ne!(dataset_fingerprint(b"a"), dataset_fingerprint(b"b"));
    }
}
