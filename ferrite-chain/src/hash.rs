//! Hash functions and the hashX index key.

use sha2::{Digest, Sha256};

/// Length of the index key derived from a script hash.
pub const HASHX_LEN: usize = 20;

/// Double-SHA-256 (SHA256d) as used for block-header and transaction
/// hashes across the supported chains.
pub fn double_sha256(data: &[u8]) -> [u8; 32] {
    let first = Sha256::digest(data);
    let second = Sha256::digest(first);
    let mut out = [0u8; 32];
    out.copy_from_slice(&second);
    out
}

/// Returns the index key for a script.
///
/// This is a lossy, collision-tolerant database key, not a unique
/// identifier: distinct scripts may map to the same value and callers must
/// not assume injectivity.
pub fn hashx_from_script(script: &[u8]) -> [u8; HASHX_LEN] {
    let digest = Sha256::digest(script);
    let mut out = [0u8; HASHX_LEN];
    out.copy_from_slice(&digest[..HASHX_LEN]);
    out
}

/// Renders a 32-byte hash in the conventional reversed-hex display form.
pub fn hash_to_hex_str(hash: &[u8; 32]) -> String {
    let mut reversed = *hash;
    reversed.reverse();
    hex::encode(reversed)
}

#[cfg(test)]
mod hash_tests {
    use super::*;

    #[test]
    fn hashx_is_deterministic_and_twenty_bytes() {
        let script = b"\x76\xa9\x14ferrite-test-hash160\x88\xac";
        let first = hashx_from_script(script);
        let second = hashx_from_script(script);
        assert_eq!(first, second);
        assert_eq!(first.len(), HASHX_LEN);

        // Different scripts are allowed to collide, so the only thing
        // asserted about a second script is determinism again.
        let other = hashx_from_script(b"\x51");
        assert_eq!(other, hashx_from_script(b"\x51"));
    }

    #[test]
    fn double_sha256_of_empty_input() {
        // SHA256d("") is a fixed, well-known value.
        assert_eq!(
            hex::encode(double_sha256(b"")),
            "5df6e0e2761359d30a8275058e299fcc0381534545f55cf43e41983f5d4c9456"
        );
    }

    #[test]
    fn hash_to_hex_str_reverses_byte_order() {
        let mut hash = [0u8; 32];
        hash[0] = 0xab;
        let rendered = hash_to_hex_str(&hash);
        assert!(rendered.ends_with("ab"));
        assert!(rendered.starts_with("00"));
    }
}
