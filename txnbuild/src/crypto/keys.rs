//! # Key Management
//!
//! Ed25519 keypairs addressed by strkey.
//!
//! A keypair is loaded from an `S...` seed (or generated fresh) and knows its
//! `G...` address. Signing produces raw 64-byte Ed25519 signatures; the
//! transaction layer wraps them into decorated signatures with a hint.
//!
//! ## Security considerations
//!
//! - Private keys are zeroized on drop (thanks, ed25519-dalek).
//! - We use OS-level RNG (`OsRng`) for key generation.
//! - Key bytes are never logged, and `Debug` only shows the address.

use ed25519_dalek::{Signature as DalekSignature, Signer, SigningKey, Verifier, VerifyingKey};
use rand::rngs::OsRng;
use std::fmt;
use thiserror::Error;

use crate::strkey::{self, StrkeyError, VersionByte};
use crate::xdr::DecoratedSignature;

/// Errors that can occur during key operations.
///
/// Deliberately vague about the secret: the seed string never appears in an
/// error message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyError {
    #[error("invalid secret seed: {0}")]
    InvalidSeed(StrkeyError),

    #[error("invalid address {address}: {source}")]
    InvalidAddress {
        address: String,
        source: StrkeyError,
    },

    #[error("invalid public key bytes: not a valid Ed25519 point")]
    InvalidPublicKey,
}

/// An Ed25519 keypair able to sign transactions.
///
/// `Keypair` intentionally does NOT implement `Serialize`. Exporting the seed
/// should be a deliberate call to [`seed`](Self::seed).
pub struct Keypair {
    signing_key: SigningKey,
}

impl Keypair {
    /// Generate a fresh keypair using the OS cryptographic RNG.
    pub fn random() -> Self {
        Self {
            signing_key: SigningKey::generate(&mut OsRng),
        }
    }

    /// Parses an `S...` secret seed.
    pub fn from_seed(seed: &str) -> Result<Self, KeyError> {
        let raw = strkey::decode(VersionByte::Seed, seed).map_err(KeyError::InvalidSeed)?;
        Ok(Self::from_raw_seed(&raw))
    }

    /// Constructs a keypair deterministically from 32 raw seed bytes.
    pub fn from_raw_seed(seed: &[u8; 32]) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(seed),
        }
    }

    /// `G...` address of the public key.
    pub fn address(&self) -> String {
        strkey::encode_account_id(&self.public_key_bytes())
    }

    /// `S...` secret seed. Handle with care.
    pub fn seed(&self) -> String {
        strkey::encode(VersionByte::Seed, &self.signing_key.to_bytes())
    }

    /// Get the raw public key bytes (32 bytes).
    pub fn public_key_bytes(&self) -> [u8; 32] {
        self.signing_key.verifying_key().to_bytes()
    }

    /// Last four bytes of the public key, used to match signatures to
    /// signers without trying every key.
    pub fn hint(&self) -> [u8; 4] {
        hint_for(&self.public_key_bytes())
    }

    /// Signs `message` and returns the raw 64-byte signature.
    pub fn sign(&self, message: &[u8]) -> [u8; 64] {
        self.signing_key.sign(message).to_bytes()
    }

    /// Signs `message` and attaches this key's hint.
    pub fn sign_decorated(&self, message: &[u8]) -> DecoratedSignature {
        DecoratedSignature {
            hint: self.hint(),
            signature: self.sign(message).to_vec(),
        }
    }

    /// Verify a signature against this keypair's public key.
    pub fn verify(&self, message: &[u8], signature: &[u8]) -> bool {
        verify_signature(&self.public_key_bytes(), message, signature)
    }
}

/// Last four bytes of `bytes`, the hint attached to a decorated signature.
pub fn hint_for(bytes: &[u8; 32]) -> [u8; 4] {
    let mut hint = [0u8; 4];
    hint.copy_from_slice(&bytes[28..]);
    hint
}

/// Verifies an Ed25519 signature against a raw public key.
///
/// Returns `false` for malformed keys or signatures rather than erroring;
/// callers only care whether the signature counts.
pub fn verify_signature(public_key: &[u8; 32], message: &[u8], signature: &[u8]) -> bool {
    let Ok(verifying_key) = VerifyingKey::from_bytes(public_key) else {
        return false;
    };
    let Ok(sig_bytes) = <[u8; 64]>::try_from(signature) else {
        return false;
    };
    let sig = DalekSignature::from_bytes(&sig_bytes);
    verifying_key.verify(message, &sig).is_ok()
}

/// Decodes a `G...` address into raw key bytes, keeping the address in the
/// error for context.
pub fn decode_address(address: &str) -> Result<[u8; 32], KeyError> {
    strkey::decode_account_id(address).map_err(|source| KeyError::InvalidAddress {
        address: address.to_string(),
        source,
    })
}

impl Clone for Keypair {
    fn clone(&self) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(&self.signing_key.to_bytes()),
        }
    }
}

impl fmt::Debug for Keypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Never print secret key material.
        write!(f, "Keypair({})", self.address())
    }
}

impl PartialEq for Keypair {
    /// Compared by public key only.
    fn eq(&self, other: &Self) -> bool {
        self.public_key_bytes() == other.public_key_bytes()
    }
}

impl Eq for Keypair {}

#[cfg(test)]
mod tests {
    use super::*;

    const SEED: &str = "SBPQUZ6G4FZNWFHKUWC5BEYWF6R52E3SEP7R3GWYSM2XTKGF5LNTWW4R";
    const ADDRESS: &str = "GDQNY3PBOJOKYZSRMK2S7LHHGWZIUISD4QORETLMXEWXBI7KFZZMKTL3";

    #[test]
    fn seed_derives_known_address() {
        let kp = Keypair::from_seed(SEED).unwrap();
        assert_eq!(kp.address(), ADDRESS);
        assert_eq!(kp.seed(), SEED);
    }

    #[test]
    fn keypair_sign_verify_roundtrip() {
        let kp = Keypair::random();
        let sig = kp.sign(b"pay 10 to bob");
        assert!(kp.verify(b"pay 10 to bob", &sig));
        assert!(!kp.verify(b"pay 11 to bob", &sig));
    }

    #[test]
    fn hint_is_last_four_bytes_of_public_key() {
        let kp = Keypair::random();
        let pk = kp.public_key_bytes();
        assert_eq!(kp.hint(), [pk[28], pk[29], pk[30], pk[31]]);
        assert_eq!(kp.sign_decorated(b"m").hint, kp.hint());
    }

    #[test]
    fn address_is_rejected_as_seed() {
        assert!(matches!(
            Keypair::from_seed(ADDRESS),
            Err(KeyError::InvalidSeed(_))
        ));
    }

    #[test]
    fn short_signature_does_not_verify() {
        let kp = Keypair::random();
        assert!(!kp.verify(b"m", &[0u8; 10]));
    }

    #[test]
    fn debug_hides_secret() {
        let kp = Keypair::from_seed(SEED).unwrap();
        let dbg = format!("{:?}", kp);
        assert!(dbg.contains(ADDRESS));
        assert!(!dbg.contains(SEED));
    }

    #[test]
    fn decode_address_reports_input() {
        let err = decode_address("GBAD").unwrap_err();
        assert!(err.to_string().contains("GBAD"));
    }
}
