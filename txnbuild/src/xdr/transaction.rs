//! Transaction, envelope and signature payload.

use super::codec::{XdrReader, XdrWriter};
use super::error::{DecodeError, EncodeError};
use super::operation::Operation;
use super::types::{AccountId, DecoratedSignature, Memo, TimeBounds};
use super::{ReadXdr, WriteXdr};
use crate::config::{ENVELOPE_TYPE_TX, MAX_OPERATIONS, MAX_SIGNATURES};

/// Unsigned transaction body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    pub source_account: AccountId,
    /// Total fee in stroops for all operations.
    pub fee: u32,
    pub seq_num: i64,
    pub time_bounds: Option<TimeBounds>,
    pub memo: Memo,
    pub operations: Vec<Operation>,
}

impl WriteXdr for Transaction {
    fn write_xdr(&self, w: &mut XdrWriter) -> Result<(), EncodeError> {
        self.source_account.write_xdr(w)?;
        w.write_u32(self.fee);
        w.write_i64(self.seq_num);
        w.write_option(self.time_bounds.as_ref())?;
        self.memo.write_xdr(w)?;
        w.write_array(&self.operations, MAX_OPERATIONS, "operations")?;
        // ext: only the v0 arm exists
        w.write_discriminant(0);
        Ok(())
    }
}

impl ReadXdr for Transaction {
    fn read_xdr(r: &mut XdrReader<'_>) -> Result<Self, DecodeError> {
        let tx = Transaction {
            source_account: AccountId::read_xdr(r)?,
            fee: r.read_u32()?,
            seq_num: r.read_i64()?,
            time_bounds: r.read_option()?,
            memo: Memo::read_xdr(r)?,
            operations: r.read_array(MAX_OPERATIONS, "operations")?,
        };
        match r.read_discriminant()? {
            (0, _) => Ok(tx),
            (value, offset) => Err(DecodeError::UnknownDiscriminant {
                type_name: "TransactionExt",
                value,
                offset,
            }),
        }
    }
}

/// A transaction together with its signatures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionEnvelope {
    pub tx: Transaction,
    pub signatures: Vec<DecoratedSignature>,
}

impl WriteXdr for TransactionEnvelope {
    fn write_xdr(&self, w: &mut XdrWriter) -> Result<(), EncodeError> {
        self.tx.write_xdr(w)?;
        w.write_array(&self.signatures, MAX_SIGNATURES, "signatures")
    }
}

impl ReadXdr for TransactionEnvelope {
    fn read_xdr(r: &mut XdrReader<'_>) -> Result<Self, DecodeError> {
        Ok(TransactionEnvelope {
            tx: Transaction::read_xdr(r)?,
            signatures: r.read_array(MAX_SIGNATURES, "signatures")?,
        })
    }
}

/// The bytes that are hashed and signed: network id, envelope type tag and
/// the transaction body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionSignaturePayload<'a> {
    pub network_id: [u8; 32],
    pub tx: &'a Transaction,
}

impl WriteXdr for TransactionSignaturePayload<'_> {
    fn write_xdr(&self, w: &mut XdrWriter) -> Result<(), EncodeError> {
        w.write_fixed_opaque(&self.network_id);
        w.write_discriminant(ENVELOPE_TYPE_TX);
        self.tx.write_xdr(w)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xdr::operation::{BumpSequenceOp, OperationBody};
    use crate::xdr::types::PublicKey;

    fn sample_tx() -> Transaction {
        Transaction {
            source_account: PublicKey::Ed25519([9u8; 32]),
            fee: 100,
            seq_num: 42,
            time_bounds: Some(TimeBounds {
                min_time: 0,
                max_time: 0,
            }),
            memo: Memo::None,
            operations: vec![Operation {
                source_account: None,
                body: OperationBody::BumpSequence(BumpSequenceOp { bump_to: 1 }),
            }],
        }
    }

    #[test]
    fn envelope_round_trip() {
        let env = TransactionEnvelope {
            tx: sample_tx(),
            signatures: vec![DecoratedSignature {
                hint: [1, 2, 3, 4],
                signature: vec![5; 64],
            }],
        };
        let encoded = env.to_xdr_base64().unwrap();
        assert_eq!(TransactionEnvelope::from_xdr_base64(&encoded).unwrap(), env);
    }

    #[test]
    fn trailing_bytes_are_rejected() {
        let env = TransactionEnvelope {
            tx: sample_tx(),
            signatures: vec![],
        };
        let mut bytes = env.to_xdr_bytes().unwrap();
        bytes.extend_from_slice(&[0, 0, 0, 0]);
        assert!(matches!(
            TransactionEnvelope::from_xdr_bytes(&bytes),
            Err(DecodeError::TrailingBytes { remaining: 4, .. })
        ));
    }

    #[test]
    fn signature_payload_prefix() {
        let tx = sample_tx();
        let payload = TransactionSignaturePayload {
            network_id: [0xaa; 32],
            tx: &tx,
        };
        let bytes = payload.to_xdr_bytes().unwrap();
        assert_eq!(&bytes[..32], &[0xaa; 32]);
        assert_eq!(&bytes[32..36], &[0, 0, 0, 2]);
        assert_eq!(&bytes[36..], tx.to_xdr_bytes().unwrap().as_slice());
    }

    #[test]
    fn too_many_signatures_fail_to_encode() {
        let sig = DecoratedSignature {
            hint: [0; 4],
            signature: vec![0; 64],
        };
        let env = TransactionEnvelope {
            tx: sample_tx(),
            signatures: vec![sig; 21],
        };
        assert!(env.to_xdr_bytes().is_err());
    }
}
