//! # Hashing Utilities
//!
//! SHA-256 is the only hash the ledger uses: network ids, transaction
//! hashes and hash-x signer keys are all plain SHA-256.

use sha2::{Digest, Sha256};

/// Compute the SHA-256 hash of the input data.
///
/// # Example
///
/// ```
/// use txnbuild::crypto::sha256;
///
/// let hash = sha256(b"txnbuild");
/// assert_eq!(hash.len(), 32);
/// ```
pub fn sha256(data: &[u8]) -> Vec<u8> {
    sha256_array(data).to_vec()
}

/// Same as `sha256()` but returns `[u8; 32]`.
pub fn sha256_array(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Network id: the SHA-256 of the network passphrase.
pub fn network_id(passphrase: &str) -> [u8; 32] {
    sha256_array(passphrase.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_known_vector() {
        assert_eq!(
            hex::encode(sha256(b"abc")),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_array_matches_vec() {
        assert_eq!(sha256(b"x"), sha256_array(b"x").to_vec());
    }

    #[test]
    fn test_network_ids_differ() {
        assert_ne!(
            network_id(crate::config::TEST_NETWORK_PASSPHRASE),
            network_id(crate::config::PUBLIC_NETWORK_PASSPHRASE)
        );
    }
}
