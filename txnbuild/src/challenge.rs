//! # Challenge Authentication
//!
//! Web authentication by transaction: the server hands the client a
//! challenge transaction it has signed, the client co-signs it, and the
//! server checks both signatures. The transaction is never submitted; its
//! sequence number of 0 makes it invalid on the ledger anyway.
//!
//! A challenge is:
//!
//! - source: the server account, sequence 0
//! - one manage data operation, source the client account, named
//!   `"<anchor> auth"`, whose value is 48 random bytes in base64 (64 chars)
//! - time bounds `[now, now + timeout]`
//! - base fee 100
//! - signed by the server

use base64::{engine::general_purpose::STANDARD, Engine};
use chrono::Utc;
use rand::rngs::OsRng;
use rand::RngCore;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

use crate::account::SimpleAccount;
use crate::config::{CHALLENGE_BASE_FEE, CHALLENGE_NONCE_BASE64_LENGTH, CHALLENGE_NONCE_BYTES};
use crate::crypto::keys::{KeyError, Keypair};
use crate::operation::{ManageData, Operation};
use crate::transaction::{
    verify_signature_for, TimeBounds, Transaction, TransactionBuilder, TransactionError,
};

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Why a challenge could not be built or did not verify.
///
/// Verification fails fast, so the variant names the first check that did
/// not pass.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChallengeError {
    #[error("provided timebound must be at least 1s (300s is recommended)")]
    TimeoutTooShort,

    #[error("invalid server seed: {0}")]
    ServerKey(#[from] KeyError),

    #[error("could not parse challenge: {0}")]
    Parse(#[source] TransactionError),

    #[error("transaction source account is not equal to server's account")]
    SourceMismatch,

    #[error("transaction sequence number must be 0")]
    NonZeroSequence,

    #[error("transaction requires timebounds")]
    MissingTimeBounds,

    #[error("transaction requires non-infinite timebounds")]
    InfiniteTimeBounds,

    #[error("transaction is not within range of the specified timebounds")]
    OutsideTimeBounds,

    #[error("transaction requires a single manage_data operation")]
    NotSingleOperation,

    #[error("operation type should be manage_data")]
    NotManageData,

    #[error("operation should have a source account")]
    MissingOperationSource,

    #[error("random nonce encoded as base64 should be 64 bytes long")]
    NonceEncodedLength,

    #[error("failed to decode random nonce provided in manage_data operation")]
    NonceNotBase64,

    #[error("random nonce before encoding as base64 should be 48 bytes long")]
    NonceDecodedLength,

    #[error("transaction not signed by {0}")]
    NotSigned(String),

    #[error(transparent)]
    Transaction(#[from] TransactionError),
}

// ---------------------------------------------------------------------------
// Build
// ---------------------------------------------------------------------------

/// Builds a server-signed challenge for `client_address` and returns it as
/// a base64 envelope.
///
/// # Arguments
///
/// * `server_seed` - `S...` seed of the server's signing account.
/// * `client_address` - `G...` account the client must prove control of.
/// * `anchor_name` - Used to name the data entry `"<anchor_name> auth"`.
/// * `network_passphrase` - Network the signatures are bound to.
/// * `timeout` - Validity window; at least one second.
pub fn build_challenge_tx(
    server_seed: &str,
    client_address: &str,
    anchor_name: &str,
    network_passphrase: &str,
    timeout: Duration,
) -> Result<String, ChallengeError> {
    if timeout.as_secs() < 1 {
        return Err(ChallengeError::TimeoutTooShort);
    }
    let server = Keypair::from_seed(server_seed)?;

    let mut nonce = [0u8; CHALLENGE_NONCE_BYTES];
    OsRng.fill_bytes(&mut nonce);

    let now = Utc::now().timestamp();
    let window = i64::try_from(timeout.as_secs()).unwrap_or(i64::MAX);

    let mut op = ManageData::new(
        format!("{anchor_name} auth"),
        Some(STANDARD.encode(nonce).into_bytes()),
    );
    op.source_account = Some(client_address.to_string());

    // -1 so that building consumes sequence 0
    let mut tx = TransactionBuilder::new(SimpleAccount::new(server.address(), -1), network_passphrase)
        .operation(op)
        .base_fee(CHALLENGE_BASE_FEE)
        .time_bounds(TimeBounds::new(now, now.saturating_add(window)))
        .finish();
    let encoded = tx.build_sign_encode(&[&server])?;

    debug!(
        server = %server.address(),
        client = client_address,
        timeout_secs = window,
        "built challenge"
    );
    Ok(encoded)
}

// ---------------------------------------------------------------------------
// Verify
// ---------------------------------------------------------------------------

/// Verifies a challenge co-signed by the client.
///
/// The checks, in order:
///
/// 1. **Decode** — must be a valid envelope.
/// 2. **Source** — must be the server account.
/// 3. **Sequence** — must be 0.
/// 4. **Time bounds** — present, bounded, and containing now.
/// 5. **Operation** — exactly one manage data operation with a source.
/// 6. **Nonce** — 64 base64 characters decoding to 48 bytes.
/// 7. **Client signature** — by the operation source.
/// 8. **Server signature** — by the server account.
pub fn verify_challenge_tx(
    challenge: &str,
    server_account_id: &str,
    network_passphrase: &str,
) -> Result<(), ChallengeError> {
    let result = verify_challenge(challenge, server_account_id, network_passphrase);
    match &result {
        Ok(()) => debug!(server = server_account_id, "challenge verified"),
        Err(e) => warn!(server = server_account_id, reason = %e, "challenge rejected"),
    }
    result
}

fn verify_challenge(
    challenge: &str,
    server_account_id: &str,
    network_passphrase: &str,
) -> Result<(), ChallengeError> {
    // 1.
    let tx = Transaction::from_base64(challenge, network_passphrase).map_err(ChallengeError::Parse)?;

    // 2.
    if tx.source_account().account_id != server_account_id {
        return Err(ChallengeError::SourceMismatch);
    }

    // 3.
    if tx.source_account().sequence != 0 {
        return Err(ChallengeError::NonZeroSequence);
    }

    // 4.
    let time_bounds = tx.time_bounds().ok_or(ChallengeError::MissingTimeBounds)?;
    if time_bounds.is_unbounded() {
        return Err(ChallengeError::InfiniteTimeBounds);
    }
    if !time_bounds.contains(Utc::now().timestamp()) {
        return Err(ChallengeError::OutsideTimeBounds);
    }

    // 5.
    let [op] = tx.operations() else {
        return Err(ChallengeError::NotSingleOperation);
    };
    let Operation::ManageData(data) = op else {
        return Err(ChallengeError::NotManageData);
    };
    let client_account_id = data
        .source_account
        .as_deref()
        .ok_or(ChallengeError::MissingOperationSource)?;

    // 6.
    let encoded_nonce = data.value.as_deref().unwrap_or_default();
    if encoded_nonce.len() != CHALLENGE_NONCE_BASE64_LENGTH {
        return Err(ChallengeError::NonceEncodedLength);
    }
    let nonce = STANDARD
        .decode(encoded_nonce)
        .map_err(|_| ChallengeError::NonceNotBase64)?;
    if nonce.len() != CHALLENGE_NONCE_BYTES {
        return Err(ChallengeError::NonceDecodedLength);
    }

    // 7. and 8.
    let hash = tx.hash()?;
    for signer in [client_account_id, server_account_id] {
        verify_signature_for(&hash, tx.signatures(), signer).map_err(|e| match e {
            TransactionError::MissingSignature(address) => ChallengeError::NotSigned(address),
            other => ChallengeError::Transaction(other),
        })?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
