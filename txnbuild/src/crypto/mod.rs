//! # Cryptographic Primitives
//!
//! Ed25519 for signatures and SHA-256 for hashing. Everything here is a thin,
//! type-safe wrapper around audited implementations.

pub mod hash;
pub mod keys;

pub use hash::{network_id, sha256, sha256_array};
pub use keys::{decode_address, hint_for, verify_signature, KeyError, Keypair};
