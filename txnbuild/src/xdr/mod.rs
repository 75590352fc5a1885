//! # XDR Wire Format
//!
//! Canonical binary encoding for everything that goes on the ledger. The
//! [`codec`] module holds the primitive reader and writer; the wire types in
//! [`types`], [`operation`] and [`transaction`] mirror the network schema
//! one-to-one and know how to encode and decode themselves.
//!
//! These are raw wire structures. The friendly builder types elsewhere in
//! the crate convert into them on build and back out of them on decode.

pub mod codec;
pub mod error;
pub mod operation;
pub mod transaction;
pub mod types;

use base64::{engine::general_purpose::STANDARD, Engine};

pub use codec::{XdrReader, XdrWriter};
pub use error::{DecodeError, EncodeError};
pub use operation::{
    AllowTrustAsset, AllowTrustOp, BumpSequenceOp, ChangeTrustOp, CreateAccountOp,
    CreatePassiveSellOfferOp, ManageBuyOfferOp, ManageDataOp, ManageSellOfferOp, Operation,
    OperationBody, OperationType, PathPaymentStrictReceiveOp, PathPaymentStrictSendOp, PaymentOp,
    SetOptionsOp,
};
pub use transaction::{Transaction, TransactionEnvelope, TransactionSignaturePayload};
pub use types::{
    AccountId, AlphaNum12, AlphaNum4, Asset, DecoratedSignature, Memo, Price, PublicKey, Signer,
    SignerKey, TimeBounds,
};

/// A value that can be written in XDR form.
pub trait WriteXdr {
    /// Appends the encoding of `self` to the writer.
    fn write_xdr(&self, w: &mut XdrWriter) -> Result<(), EncodeError>;

    /// Encodes `self` into a fresh byte vector.
    fn to_xdr_bytes(&self) -> Result<Vec<u8>, EncodeError> {
        let mut w = XdrWriter::new();
        self.write_xdr(&mut w)?;
        Ok(w.into_bytes())
    }

    /// Encodes `self` and wraps it in standard padded base64.
    fn to_xdr_base64(&self) -> Result<String, EncodeError> {
        Ok(STANDARD.encode(self.to_xdr_bytes()?))
    }
}

/// A value that can be read from XDR form.
pub trait ReadXdr: Sized {
    /// Reads one value from the current reader position.
    fn read_xdr(r: &mut XdrReader<'_>) -> Result<Self, DecodeError>;

    /// Decodes a complete value. Trailing bytes are an error.
    fn from_xdr_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        let mut r = XdrReader::new(bytes);
        let value = Self::read_xdr(&mut r)?;
        r.finish()?;
        Ok(value)
    }

    /// Decodes a complete value from standard base64.
    fn from_xdr_base64(encoded: &str) -> Result<Self, DecodeError> {
        let bytes = STANDARD.decode(encoded.trim())?;
        Self::from_xdr_bytes(&bytes)
    }
}
