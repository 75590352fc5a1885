//! # Transaction Module
//!
//! Assembly, signing, encoding and decoding of ledger transactions.
//!
//! ## Architecture
//!
//! ```text
//! types.rs        — Memo and TimeBounds
//! builder.rs      — Transaction and the fluent TransactionBuilder; build, hash, encode, decode
//! signing.rs      — Ed25519, hash-x and seed-string signing
//! verification.rs — Checking that an address signed a transaction
//! error.rs        — TransactionError and StateError
//! ```
//!
//! ## Transaction Lifecycle
//!
//! 1. **Assemble** — [`TransactionBuilder`] collects source, operations,
//!    fee, memo, time bounds and network.
//! 2. **Build** — [`Transaction::build`] validates, consumes the next
//!    sequence number and encodes the envelope.
//! 3. **Sign** — [`Transaction::sign`] / [`Transaction::sign_hash_x`], as
//!    many times as needed. A signed transaction can no longer be rebuilt.
//! 4. **Encode** — [`Transaction::base64`] for submission.
//!
//! ## Design Decisions
//!
//! - The transaction owns its source account. Callers read the advanced
//!   sequence back from [`Transaction::source_account`].
//! - The hash is bound to the network passphrase, so the same transaction
//!   signed for the test network is worthless on the public one.
//! - Decoding yields a built transaction; it can be signed or re-encoded
//!   without rebuilding.

pub mod builder;
pub mod error;
pub mod signing;
pub mod types;
pub mod verification;

pub use builder::{Transaction, TransactionBuilder};
pub use error::{StateError, TransactionError};
pub use types::{Memo, TimeBounds};
pub use verification::{verify_signature_for, verify_tx_signature};
