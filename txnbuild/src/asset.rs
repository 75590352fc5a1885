//! # Assets
//!
//! An asset is either the native currency or a credit issued by an account.
//! Credit codes of 1-4 characters travel as `CreditAlphanum4`, 5-12 as
//! `CreditAlphanum12`; anything else cannot be put on the wire.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::crypto::keys::{decode_address, KeyError};
use crate::strkey;
use crate::xdr;

/// Errors from asset construction and conversion.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssetError {
    #[error("invalid asset code length")]
    InvalidCodeLength,

    #[error("asset code {0:?} must be ASCII alphanumeric")]
    InvalidCode(String),

    #[error(transparent)]
    Issuer(#[from] KeyError),
}

/// Wire category of an asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssetType {
    Native,
    CreditAlphanum4,
    CreditAlphanum12,
}

/// A credit asset: code plus issuing account.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CreditAsset {
    pub code: String,
    pub issuer: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Asset {
    Native,
    Credit(CreditAsset),
}

impl Asset {
    /// Shorthand for a credit asset.
    pub fn credit(code: impl Into<String>, issuer: impl Into<String>) -> Self {
        Asset::Credit(CreditAsset {
            code: code.into(),
            issuer: issuer.into(),
        })
    }

    pub fn is_native(&self) -> bool {
        matches!(self, Asset::Native)
    }

    /// Asset code; empty for native.
    pub fn code(&self) -> &str {
        match self {
            Asset::Native => "",
            Asset::Credit(c) => &c.code,
        }
    }

    /// Issuer address; empty for native.
    pub fn issuer(&self) -> &str {
        match self {
            Asset::Native => "",
            Asset::Credit(c) => &c.issuer,
        }
    }

    /// Wire category, decided by code length.
    pub fn asset_type(&self) -> Result<AssetType, AssetError> {
        match self {
            Asset::Native => Ok(AssetType::Native),
            Asset::Credit(c) => match c.code.len() {
                1..=4 => Ok(AssetType::CreditAlphanum4),
                5..=12 => Ok(AssetType::CreditAlphanum12),
                _ => Err(AssetError::InvalidCodeLength),
            },
        }
    }

    /// Converts to the wire asset. Codes are zero padded and the issuer is
    /// decoded from its address.
    pub fn to_xdr(&self) -> Result<xdr::Asset, AssetError> {
        match self.asset_type()? {
            AssetType::Native => Ok(xdr::Asset::Native),
            AssetType::CreditAlphanum4 => Ok(xdr::Asset::CreditAlphanum4(xdr::AlphaNum4 {
                asset_code: padded_code(self.code())?,
                issuer: xdr::PublicKey::Ed25519(decode_address(self.issuer())?),
            })),
            AssetType::CreditAlphanum12 => Ok(xdr::Asset::CreditAlphanum12(xdr::AlphaNum12 {
                asset_code: padded_code(self.code())?,
                issuer: xdr::PublicKey::Ed25519(decode_address(self.issuer())?),
            })),
        }
    }

    /// Converts from the wire asset, trimming the code's trailing NULs.
    pub fn from_xdr(asset: &xdr::Asset) -> Self {
        match asset {
            xdr::Asset::Native => Asset::Native,
            xdr::Asset::CreditAlphanum4(a) => {
                Asset::credit(trimmed_code(&a.asset_code), account_address(&a.issuer))
            }
            xdr::Asset::CreditAlphanum12(a) => {
                Asset::credit(trimmed_code(&a.asset_code), account_address(&a.issuer))
            }
        }
    }

    /// Code-only wire form used by allow trust; the issuer is not needed.
    pub fn to_allow_trust_xdr(&self) -> Result<xdr::AllowTrustAsset, AssetError> {
        match self.asset_type()? {
            AssetType::CreditAlphanum4 => Ok(xdr::AllowTrustAsset::CreditAlphanum4(padded_code(
                self.code(),
            )?)),
            AssetType::CreditAlphanum12 => Ok(xdr::AllowTrustAsset::CreditAlphanum12(
                padded_code(self.code())?,
            )),
            AssetType::Native => Err(AssetError::InvalidCodeLength),
        }
    }

    /// Credit asset with no issuer, from the allow trust wire form.
    pub fn from_allow_trust_xdr(asset: &xdr::AllowTrustAsset) -> Self {
        let code = match asset {
            xdr::AllowTrustAsset::CreditAlphanum4(code) => trimmed_code(code),
            xdr::AllowTrustAsset::CreditAlphanum12(code) => trimmed_code(code),
        };
        Asset::credit(code, "")
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Asset::Native => write!(f, "native"),
            Asset::Credit(c) => write!(f, "{}:{}", c.code, c.issuer),
        }
    }
}

pub(crate) fn account_address(key: &xdr::AccountId) -> String {
    strkey::encode_account_id(key.as_bytes())
}

fn padded_code<const N: usize>(code: &str) -> Result<[u8; N], AssetError> {
    if !code.bytes().all(|b| b.is_ascii_alphanumeric()) {
        return Err(AssetError::InvalidCode(code.to_string()));
    }
    if code.is_empty() || code.len() > N {
        return Err(AssetError::InvalidCodeLength);
    }
    let mut out = [0u8; N];
    out[..code.len()].copy_from_slice(code.as_bytes());
    Ok(out)
}

fn trimmed_code(code: &[u8]) -> String {
    let end = code.iter().rposition(|b| *b != 0).map_or(0, |i| i + 1);
    String::from_utf8_lossy(&code[..end]).into_owned()
}
