//! Signature checks against a built transaction.
//!
//! A signature counts for an address when its hint matches the last four
//! bytes of the address's public key and it verifies as Ed25519 over the
//! transaction hash. Hints are not unique, so every matching signature is
//! tried.

use super::builder::Transaction;
use super::error::TransactionError;
use crate::crypto::keys::{decode_address, hint_for, verify_signature};
use crate::xdr::DecoratedSignature;

/// Fails with "transaction not signed by <address>" unless one of the
/// transaction's signatures is a valid signature by `address`.
pub fn verify_tx_signature(tx: &Transaction, address: &str) -> Result<(), TransactionError> {
    let hash = tx.hash()?;
    verify_signature_for(&hash, tx.signatures(), address)
}

/// As [`verify_tx_signature`] for a hash computed once by the caller.
pub fn verify_signature_for(
    hash: &[u8; 32],
    signatures: &[DecoratedSignature],
    address: &str,
) -> Result<(), TransactionError> {
    let public_key = decode_address(address)?;
    let hint = hint_for(&public_key);
    let signed = signatures
        .iter()
        .filter(|sig| sig.hint == hint)
        .any(|sig| verify_signature(&public_key, hash, &sig.signature));
    if signed {
        Ok(())
    } else {
        Err(TransactionError::MissingSignature(address.to_string()))
    }
}
