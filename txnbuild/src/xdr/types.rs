//! Shared wire types: keys, assets, prices, memos, time bounds and
//! signatures.

use super::codec::{XdrReader, XdrWriter};
use super::error::{DecodeError, EncodeError};
use super::{ReadXdr, WriteXdr};
use crate::config::{MAX_MEMO_TEXT_LENGTH, MAX_SIGNATURE_LENGTH};

// ---------------------------------------------------------------------------
// Keys
// ---------------------------------------------------------------------------

/// Public key union. Ed25519 is the only arm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PublicKey {
    Ed25519([u8; 32]),
}

/// Accounts are identified by their master public key.
pub type AccountId = PublicKey;

impl PublicKey {
    /// Raw 32-byte key.
    pub fn as_bytes(&self) -> &[u8; 32] {
        match self {
            PublicKey::Ed25519(k) => k,
        }
    }
}

impl WriteXdr for PublicKey {
    fn write_xdr(&self, w: &mut XdrWriter) -> Result<(), EncodeError> {
        match self {
            PublicKey::Ed25519(k) => {
                w.write_discriminant(0);
                w.write_fixed_opaque(k);
            }
        }
        Ok(())
    }
}

impl ReadXdr for PublicKey {
    fn read_xdr(r: &mut XdrReader<'_>) -> Result<Self, DecodeError> {
        match r.read_discriminant()? {
            (0, _) => Ok(PublicKey::Ed25519(r.read_fixed_opaque::<32>()?)),
            (value, offset) => Err(DecodeError::UnknownDiscriminant {
                type_name: "PublicKey",
                value,
                offset,
            }),
        }
    }
}

/// Key that may be added to an account as an additional signer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignerKey {
    Ed25519([u8; 32]),
    /// Hash of a transaction that is authorised in advance.
    PreAuthTx([u8; 32]),
    /// SHA-256 of a preimage whose reveal counts as a signature.
    HashX([u8; 32]),
}

impl WriteXdr for SignerKey {
    fn write_xdr(&self, w: &mut XdrWriter) -> Result<(), EncodeError> {
        let (disc, key) = match self {
            SignerKey::Ed25519(k) => (0, k),
            SignerKey::PreAuthTx(k) => (1, k),
            SignerKey::HashX(k) => (2, k),
        };
        w.write_discriminant(disc);
        w.write_fixed_opaque(key);
        Ok(())
    }
}

impl ReadXdr for SignerKey {
    fn read_xdr(r: &mut XdrReader<'_>) -> Result<Self, DecodeError> {
        match r.read_discriminant()? {
            (0, _) => Ok(SignerKey::Ed25519(r.read_fixed_opaque::<32>()?)),
            (1, _) => Ok(SignerKey::PreAuthTx(r.read_fixed_opaque::<32>()?)),
            (2, _) => Ok(SignerKey::HashX(r.read_fixed_opaque::<32>()?)),
            (value, offset) => Err(DecodeError::UnknownDiscriminant {
                type_name: "SignerKey",
                value,
                offset,
            }),
        }
    }
}

/// A signer key with its weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signer {
    pub key: SignerKey,
    pub weight: u32,
}

impl WriteXdr for Signer {
    fn write_xdr(&self, w: &mut XdrWriter) -> Result<(), EncodeError> {
        self.key.write_xdr(w)?;
        w.write_u32(self.weight);
        Ok(())
    }
}

impl ReadXdr for Signer {
    fn read_xdr(r: &mut XdrReader<'_>) -> Result<Self, DecodeError> {
        Ok(Signer {
            key: SignerKey::read_xdr(r)?,
            weight: r.read_u32()?,
        })
    }
}

// ---------------------------------------------------------------------------
// Assets
// ---------------------------------------------------------------------------

/// Credit asset with a code of 1 to 4 characters, zero padded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AlphaNum4 {
    pub asset_code: [u8; 4],
    pub issuer: AccountId,
}

/// Credit asset with a code of 5 to 12 characters, zero padded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AlphaNum12 {
    pub asset_code: [u8; 12],
    pub issuer: AccountId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Asset {
    Native,
    CreditAlphanum4(AlphaNum4),
    CreditAlphanum12(AlphaNum12),
}

impl WriteXdr for Asset {
    fn write_xdr(&self, w: &mut XdrWriter) -> Result<(), EncodeError> {
        match self {
            Asset::Native => w.write_discriminant(0),
            Asset::CreditAlphanum4(a) => {
                w.write_discriminant(1);
                w.write_fixed_opaque(&a.asset_code);
                a.issuer.write_xdr(w)?;
            }
            Asset::CreditAlphanum12(a) => {
                w.write_discriminant(2);
                w.write_fixed_opaque(&a.asset_code);
                a.issuer.write_xdr(w)?;
            }
        }
        Ok(())
    }
}

impl ReadXdr for Asset {
    fn read_xdr(r: &mut XdrReader<'_>) -> Result<Self, DecodeError> {
        match r.read_discriminant()? {
            (0, _) => Ok(Asset::Native),
            (1, _) => Ok(Asset::CreditAlphanum4(AlphaNum4 {
                asset_code: r.read_fixed_opaque::<4>()?,
                issuer: AccountId::read_xdr(r)?,
            })),
            (2, _) => Ok(Asset::CreditAlphanum12(AlphaNum12 {
                asset_code: r.read_fixed_opaque::<12>()?,
                issuer: AccountId::read_xdr(r)?,
            })),
            (value, offset) => Err(DecodeError::UnknownDiscriminant {
                type_name: "Asset",
                value,
                offset,
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Price
// ---------------------------------------------------------------------------

/// Exchange rate as a fraction `n / d`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Price {
    pub n: i32,
    pub d: i32,
}

impl WriteXdr for Price {
    fn write_xdr(&self, w: &mut XdrWriter) -> Result<(), EncodeError> {
        w.write_i32(self.n);
        w.write_i32(self.d);
        Ok(())
    }
}

impl ReadXdr for Price {
    fn read_xdr(r: &mut XdrReader<'_>) -> Result<Self, DecodeError> {
        Ok(Price {
            n: r.read_i32()?,
            d: r.read_i32()?,
        })
    }
}

// ---------------------------------------------------------------------------
// Time bounds
// ---------------------------------------------------------------------------

/// Validity window in unix seconds. `max_time == 0` means no upper bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimeBounds {
    pub min_time: u64,
    pub max_time: u64,
}

impl WriteXdr for TimeBounds {
    fn write_xdr(&self, w: &mut XdrWriter) -> Result<(), EncodeError> {
        w.write_u64(self.min_time);
        w.write_u64(self.max_time);
        Ok(())
    }
}

impl ReadXdr for TimeBounds {
    fn read_xdr(r: &mut XdrReader<'_>) -> Result<Self, DecodeError> {
        Ok(TimeBounds {
            min_time: r.read_u64()?,
            max_time: r.read_u64()?,
        })
    }
}

// ---------------------------------------------------------------------------
// Memo
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Memo {
    #[default]
    None,
    /// Raw bytes. The ledger does not require UTF-8.
    Text(Vec<u8>),
    Id(u64),
    Hash([u8; 32]),
    Return([u8; 32]),
}

impl WriteXdr for Memo {
    fn write_xdr(&self, w: &mut XdrWriter) -> Result<(), EncodeError> {
        match self {
            Memo::None => w.write_discriminant(0),
            Memo::Text(text) => {
                w.write_discriminant(1);
                w.write_var_opaque(text, MAX_MEMO_TEXT_LENGTH, "memo text")?;
            }
            Memo::Id(id) => {
                w.write_discriminant(2);
                w.write_u64(*id);
            }
            Memo::Hash(h) => {
                w.write_discriminant(3);
                w.write_fixed_opaque(h);
            }
            Memo::Return(h) => {
                w.write_discriminant(4);
                w.write_fixed_opaque(h);
            }
        }
        Ok(())
    }
}

impl ReadXdr for Memo {
    fn read_xdr(r: &mut XdrReader<'_>) -> Result<Self, DecodeError> {
        match r.read_discriminant()? {
            (0, _) => Ok(Memo::None),
            (1, _) => Ok(Memo::Text(r.read_var_opaque(MAX_MEMO_TEXT_LENGTH, "memo text")?)),
            (2, _) => Ok(Memo::Id(r.read_u64()?)),
            (3, _) => Ok(Memo::Hash(r.read_fixed_opaque::<32>()?)),
            (4, _) => Ok(Memo::Return(r.read_fixed_opaque::<32>()?)),
            (value, offset) => Err(DecodeError::UnknownDiscriminant {
                type_name: "Memo",
                value,
                offset,
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Signatures
// ---------------------------------------------------------------------------

/// A signature with the four-byte hint identifying its signer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DecoratedSignature {
    pub hint: [u8; 4],
    pub signature: Vec<u8>,
}

impl WriteXdr for DecoratedSignature {
    fn write_xdr(&self, w: &mut XdrWriter) -> Result<(), EncodeError> {
        w.write_fixed_opaque(&self.hint);
        w.write_var_opaque(&self.signature, MAX_SIGNATURE_LENGTH, "signature")
    }
}

impl ReadXdr for DecoratedSignature {
    fn read_xdr(r: &mut XdrReader<'_>) -> Result<Self, DecodeError> {
        Ok(DecoratedSignature {
            hint: r.read_fixed_opaque::<4>()?,
            signature: r.read_var_opaque(MAX_SIGNATURE_LENGTH, "signature")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn account_id_is_discriminant_then_key() {
        let bytes = PublicKey::Ed25519([7u8; 32]).to_xdr_bytes().unwrap();
        assert_eq!(bytes.len(), 36);
        assert_eq!(&bytes[..4], &[0, 0, 0, 0]);
        assert_eq!(&bytes[4..], &[7u8; 32]);
    }

    #[test]
    fn credit_asset_layout() {
        let asset = Asset::CreditAlphanum4(AlphaNum4 {
            asset_code: *b"ABCD",
            issuer: PublicKey::Ed25519([1u8; 32]),
        });
        let bytes = asset.to_xdr_bytes().unwrap();
        assert_eq!(&bytes[..8], &[0, 0, 0, 1, b'A', b'B', b'C', b'D']);
        assert_eq!(bytes.len(), 4 + 4 + 36);
        assert_eq!(Asset::from_xdr_bytes(&bytes).unwrap(), asset);
    }

    #[test]
    fn unknown_asset_discriminant_is_rejected() {
        let err = Asset::from_xdr_bytes(&[0, 0, 0, 3]).unwrap_err();
        assert_eq!(
            err,
            DecodeError::UnknownDiscriminant {
                type_name: "Asset",
                value: 3,
                offset: 0
            }
        );
    }

    #[test]
    fn memo_text_longer_than_28_bytes_fails_to_encode() {
        let memo = Memo::Text(vec![b'x'; 29]);
        assert!(memo.to_xdr_bytes().is_err());
    }

    #[test]
    fn memo_text_need_not_be_utf8() {
        let mut bytes = Memo::Text(b"abcd".to_vec()).to_xdr_bytes().unwrap();
        let last = bytes.len() - 1;
        bytes[last] = 0xff;
        assert_eq!(
            Memo::from_xdr_bytes(&bytes).unwrap(),
            Memo::Text(vec![b'a', b'b', b'c', 0xff])
        );
    }

    #[test]
    fn memo_id_layout() {
        let bytes = Memo::Id(314159).to_xdr_bytes().unwrap();
        assert_eq!(bytes, vec![0, 0, 0, 2, 0, 0, 0, 0, 0, 0x04, 0xcb, 0x2f]);
    }

    #[test]
    fn signature_longer_than_64_bytes_fails_to_encode() {
        let sig = DecoratedSignature {
            hint: [0; 4],
            signature: vec![0; 65],
        };
        assert!(sig.to_xdr_bytes().is_err());
    }
}
