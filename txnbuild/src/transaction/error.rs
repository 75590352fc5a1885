//! Error types for transaction assembly, signing and decoding.

use thiserror::Error;

use crate::account::AccountError;
use crate::amount::AmountError;
use crate::asset::AssetError;
use crate::crypto::keys::KeyError;
use crate::operation::ValidationError;
use crate::strkey::StrkeyError;
use crate::xdr::{DecodeError, EncodeError, OperationType};

/// Lifecycle violations: doing something in the wrong state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateError {
    #[error("transaction has already been signed, so cannot be rebuilt.")]
    AlreadySigned,

    #[error("transaction has not been built")]
    NotBuilt,

    #[error("transaction has no network passphrase")]
    EmptyNetwork,
}

/// Everything that can go wrong between assembling operations and
/// producing a signed envelope.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransactionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    State(#[from] StateError),

    #[error("encode: {0}")]
    Encode(#[from] EncodeError),

    #[error("decode: {0}")]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Key(#[from] KeyError),

    #[error(transparent)]
    Strkey(#[from] StrkeyError),

    #[error(transparent)]
    Amount(#[from] AmountError),

    #[error(transparent)]
    Asset(#[from] AssetError),

    #[error(transparent)]
    Account(#[from] AccountError),

    #[error("transaction has no operations")]
    NoOperations,

    #[error("transaction has {0} operations, maximum is 100")]
    TooManyOperations(usize),

    #[error("fee overflow: base fee {base_fee} x {op_count} operations exceeds u32")]
    FeeOverflow { base_fee: u32, op_count: usize },

    #[error("hash-x preimage is {0} bytes, maximum is 64")]
    PreimageTooLong(usize),

    #[error("invalid timebounds: {0}")]
    InvalidTimeBounds(&'static str),

    #[error("transaction not signed by {0}")]
    MissingSignature(String),

    #[error("expected {expected} operation, got {got}")]
    OperationMismatch {
        expected: OperationType,
        got: OperationType,
    },
}
