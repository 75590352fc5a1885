//! # Operations
//!
//! One payload struct per operation kind, and the closed [`Operation`] sum
//! type the transaction assembler works with.
//!
//! ```text
//! validation.rs — ValidationError and the field-scoped Validator
//! payment.rs    — CreateAccount, Payment, PathPaymentStrictReceive/Send
//! offer.rs      — ManageSellOffer, ManageBuyOffer, CreatePassiveSellOffer
//! trust.rs      — ChangeTrust, AllowTrust
//! options.rs    — SetOptions, AccountFlag, Signer
//! admin.rs      — AccountMerge, BumpSequence, Inflation, ManageData
//! ```
//!
//! Payloads hold caller-friendly values (decimal amount strings, `G...`
//! addresses, [`Asset`](crate::asset::Asset)s). Conversion to the wire form
//! validates every field on the way, so an operation that encodes is an
//! operation that passed validation.

pub mod admin;
pub mod offer;
pub mod options;
pub mod payment;
pub mod trust;
pub mod validation;

use serde::{Deserialize, Serialize};

use crate::asset::account_address;
use crate::transaction::TransactionError;
use crate::xdr::{self, OperationType};

pub use admin::{AccountMerge, BumpSequence, Inflation, ManageData};
pub use offer::{CreatePassiveSellOffer, ManageBuyOffer, ManageSellOffer};
pub use options::{AccountFlag, SetOptions, Signer, Threshold};
pub use payment::{CreateAccount, PathPayment, PathPaymentStrictReceive, PathPaymentStrictSend, Payment};
pub use trust::{AllowTrust, ChangeTrust};
pub use validation::ValidationError;

use validation::Validator;

// ---------------------------------------------------------------------------
// Payload trait
// ---------------------------------------------------------------------------

/// Shared behaviour of every operation payload.
///
/// Implementors provide the single checked conversion to the wire body and
/// the reverse mapping; validation, encoding and decoding follow from those.
pub trait OperationPayload: Sized {
    /// Wire discriminant of this payload.
    const KIND: OperationType;

    /// Per-operation source account, if any.
    fn source_account(&self) -> Option<&str>;

    /// Validates every field and converts to the wire body.
    fn checked_body(&self) -> Result<xdr::OperationBody, ValidationError>;

    /// Rebuilds the payload from a wire body, or `None` if the body is a
    /// different kind.
    fn from_body(body: &xdr::OperationBody, source_account: Option<String>) -> Option<Self>;

    fn validate(&self) -> Result<(), ValidationError> {
        self.checked_body().map(|_| ())
    }

    fn to_xdr(&self) -> Result<xdr::OperationBody, TransactionError> {
        Ok(self.checked_body()?)
    }

    fn from_xdr(op: &xdr::Operation) -> Result<Self, TransactionError> {
        let source = op.source_account.as_ref().map(account_address);
        Self::from_body(&op.body, source).ok_or(TransactionError::OperationMismatch {
            expected: Self::KIND,
            got: op.body.operation_type(),
        })
    }

    /// Full wire operation including the source account.
    fn to_xdr_operation(&self) -> Result<xdr::Operation, TransactionError> {
        let source_account = Validator::new(Self::KIND).source(self.source_account())?;
        Ok(xdr::Operation {
            source_account,
            body: self.checked_body()?,
        })
    }
}

// ---------------------------------------------------------------------------
// Operation
// ---------------------------------------------------------------------------

/// Any operation a transaction can carry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Operation {
    CreateAccount(CreateAccount),
    Payment(Payment),
    PathPaymentStrictReceive(PathPaymentStrictReceive),
    PathPaymentStrictSend(PathPaymentStrictSend),
    ManageSellOffer(ManageSellOffer),
    ManageBuyOffer(ManageBuyOffer),
    CreatePassiveSellOffer(CreatePassiveSellOffer),
    SetOptions(SetOptions),
    ChangeTrust(ChangeTrust),
    AllowTrust(AllowTrust),
    AccountMerge(AccountMerge),
    Inflation(Inflation),
    ManageData(ManageData),
    BumpSequence(BumpSequence),
}

/// Applies `$f` to the payload of every variant.
macro_rules! dispatch {
    ($op:expr, $p:ident => $f:expr) => {
        match $op {
            Operation::CreateAccount($p) => $f,
            Operation::Payment($p) => $f,
            Operation::PathPaymentStrictReceive($p) => $f,
            Operation::PathPaymentStrictSend($p) => $f,
            Operation::ManageSellOffer($p) => $f,
            Operation::ManageBuyOffer($p) => $f,
            Operation::CreatePassiveSellOffer($p) => $f,
            Operation::SetOptions($p) => $f,
            Operation::ChangeTrust($p) => $f,
            Operation::AllowTrust($p) => $f,
            Operation::AccountMerge($p) => $f,
            Operation::Inflation($p) => $f,
            Operation::ManageData($p) => $f,
            Operation::BumpSequence($p) => $f,
        }
    };
}

impl Operation {
    pub fn kind(&self) -> OperationType {
        fn kind_of<P: OperationPayload>(_: &P) -> OperationType {
            P::KIND
        }
        dispatch!(self, p => kind_of(p))
    }

    pub fn source_account(&self) -> Option<&str> {
        dispatch!(self, p => p.source_account())
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        dispatch!(self, p => p.validate())
    }

    /// Validates and encodes, source account included.
    pub fn to_xdr(&self) -> Result<xdr::Operation, TransactionError> {
        dispatch!(self, p => p.to_xdr_operation())
    }

    /// Decodes any wire operation into the matching variant.
    pub fn from_xdr(op: &xdr::Operation) -> Result<Self, TransactionError> {
        Ok(match op.body.operation_type() {
            OperationType::CreateAccount => CreateAccount::from_xdr(op)?.into(),
            OperationType::Payment => Payment::from_xdr(op)?.into(),
            OperationType::PathPaymentStrictReceive => PathPaymentStrictReceive::from_xdr(op)?.into(),
            OperationType::PathPaymentStrictSend => PathPaymentStrictSend::from_xdr(op)?.into(),
            OperationType::ManageSellOffer => ManageSellOffer::from_xdr(op)?.into(),
            OperationType::ManageBuyOffer => ManageBuyOffer::from_xdr(op)?.into(),
            OperationType::CreatePassiveSellOffer => CreatePassiveSellOffer::from_xdr(op)?.into(),
            OperationType::SetOptions => SetOptions::from_xdr(op)?.into(),
            OperationType::ChangeTrust => ChangeTrust::from_xdr(op)?.into(),
            OperationType::AllowTrust => AllowTrust::from_xdr(op)?.into(),
            OperationType::AccountMerge => AccountMerge::from_xdr(op)?.into(),
            OperationType::Inflation => Inflation::from_xdr(op)?.into(),
            OperationType::ManageData => ManageData::from_xdr(op)?.into(),
            OperationType::BumpSequence => BumpSequence::from_xdr(op)?.into(),
        })
    }
}

macro_rules! impl_from_payload {
    ($($variant:ident),* $(,)?) => {
        $(
            impl From<$variant> for Operation {
                fn from(op: $variant) -> Self {
                    Operation::$variant(op)
                }
            }
        )*
    };
}

impl_from_payload!(
    CreateAccount,
    Payment,
    PathPaymentStrictReceive,
    PathPaymentStrictSend,
    ManageSellOffer,
    ManageBuyOffer,
    CreatePassiveSellOffer,
    SetOptions,
    ChangeTrust,
    AllowTrust,
    AccountMerge,
    Inflation,
    ManageData,
    BumpSequence,
);

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
