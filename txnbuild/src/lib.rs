// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # txnbuild
//!
//! Builds, signs and decodes transactions for Stellar-style ledgers, and
//! implements the challenge transactions used for web authentication.
//!
//! Nothing here talks to the network. You bring the source account's
//! current sequence number; we hand back a base64 envelope ready to submit.
//!
//! ## Architecture
//!
//! - **xdr** — Wire types and the big-endian XDR codec.
//! - **strkey** — Checksummed base32 text encoding of keys (`G...`, `S...`).
//! - **crypto** — Ed25519 keypairs, hints and SHA-256.
//! - **amount** — Decimal amount and price strings to and from wire integers.
//! - **asset** — Native and credit assets.
//! - **account** — Source accounts and sequence numbers.
//! - **operation** — The fourteen operation kinds with their validation rules.
//! - **transaction** — Assemble, sign, hash, encode and decode.
//! - **challenge** — Build and verify authentication challenges.
//! - **config** — Network passphrases and protocol limits.
//!
//! ## Quick tour
//!
//! ```no_run
//! use txnbuild::{Keypair, Payment, Asset, SimpleAccount, TimeBounds, TransactionBuilder};
//! use txnbuild::config::TEST_NETWORK_PASSPHRASE;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let kp = Keypair::from_seed("SBPQUZ6G4FZNWFHKUWC5BEYWF6R52E3SEP7R3GWYSM2XTKGF5LNTWW4R")?;
//! let source = SimpleAccount::new(kp.address(), 9605939170639897);
//! let mut tx = TransactionBuilder::new(source, TEST_NETWORK_PASSPHRASE)
//!     .operation(Payment::new(
//!         "GB7BDSZU2Y27LYNLALKKALB52WS2IZWYBDGY6EQBLEED3TJOCVMZRH7H",
//!         "10",
//!         Asset::Native,
//!     ))
//!     .time_bounds(TimeBounds::infinite())
//!     .finish();
//! let envelope = tx.build_sign_encode(&[&kp])?;
//! # let _ = envelope;
//! # Ok(())
//! # }
//! ```

pub mod account;
pub mod amount;
pub mod asset;
pub mod challenge;
pub mod config;
pub mod crypto;
pub mod operation;
pub mod strkey;
pub mod transaction;
pub mod xdr;

pub use account::{Account, AccountError, SimpleAccount};
pub use asset::{Asset, AssetError, AssetType, CreditAsset};
pub use challenge::{build_challenge_tx, verify_challenge_tx, ChallengeError};
pub use crypto::{Keypair, KeyError};
pub use operation::{
    AccountFlag, AccountMerge, AllowTrust, BumpSequence, ChangeTrust, CreateAccount,
    CreatePassiveSellOffer, Inflation, ManageBuyOffer, ManageData, ManageSellOffer, Operation,
    PathPayment, PathPaymentStrictReceive, PathPaymentStrictSend, Payment, SetOptions, Signer,
    Threshold, ValidationError,
};
pub use transaction::{
    verify_tx_signature, Memo, StateError, TimeBounds, Transaction, TransactionBuilder,
    TransactionError,
};
