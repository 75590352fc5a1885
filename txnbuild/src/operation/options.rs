//! Account options: flags, thresholds, signers, home domain and
//! inflation destination.
//!
//! Every field is optional; only the ones that are set are sent. Flags are
//! OR'd together without complaint about duplicates, matching what the
//! ledger accepts.

use serde::{Deserialize, Serialize};

use super::validation::{ValidationError, Validator};
use super::OperationPayload;
use crate::asset::account_address;
use crate::config::MAX_HOME_DOMAIN_LENGTH;
use crate::strkey::{self, VersionByte};
use crate::xdr::{self, OperationBody, OperationType, SignerKey};

/// Signer weight or account threshold.
///
/// The wire carries these as `u32` but the ledger only honors 0..=255.
/// Decoding clamps larger wire values to 255, so a decoded operation
/// re-encodes with the clamped value.
pub type Threshold = u8;

/// Account authorization flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccountFlag {
    /// Trustlines must be authorized by the issuer before holding the asset.
    AuthRequired,
    /// The issuer may revoke trustline authorization.
    AuthRevocable,
    /// None of the auth flags can change and the account can never be merged.
    AuthImmutable,
    /// Raw bits outside the known flags, passed to the ledger untouched.
    /// `Other(0)` sends an explicit empty mask.
    Other(u32),
}

impl AccountFlag {
    pub const ALL: [AccountFlag; 3] = [
        AccountFlag::AuthRequired,
        AccountFlag::AuthRevocable,
        AccountFlag::AuthImmutable,
    ];

    pub fn bit(self) -> u32 {
        match self {
            AccountFlag::AuthRequired => 1,
            AccountFlag::AuthRevocable => 2,
            AccountFlag::AuthImmutable => 4,
            AccountFlag::Other(bits) => bits,
        }
    }
}

fn flags_to_bits(flags: &[AccountFlag]) -> Option<u32> {
    if flags.is_empty() {
        return None;
    }
    Some(flags.iter().fold(0, |acc, f| acc | f.bit()))
}

fn bits_to_flags(bits: Option<u32>) -> Vec<AccountFlag> {
    let Some(bits) = bits else {
        return Vec::new();
    };
    let mut flags: Vec<AccountFlag> = AccountFlag::ALL
        .into_iter()
        .filter(|f| bits & f.bit() != 0)
        .collect();
    let known = AccountFlag::ALL.iter().fold(0, |acc, f| acc | f.bit());
    let rest = bits & !known;
    if rest != 0 || bits == 0 {
        flags.push(AccountFlag::Other(rest));
    }
    flags
}

fn clamp_threshold(wire: u32) -> Threshold {
    Threshold::try_from(wire).unwrap_or(Threshold::MAX)
}

/// An additional signer. The address selects the key type: `G...` for an
/// Ed25519 key, `T...` for a pre-authorized transaction hash, `X...` for a
/// hash-x preimage hash. Weight 0 removes the signer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signer {
    pub address: String,
    pub weight: Threshold,
}

impl Signer {
    pub fn new(address: impl Into<String>, weight: Threshold) -> Self {
        Self {
            address: address.into(),
            weight,
        }
    }

    /// Wire signer key for the address.
    pub fn key(&self) -> Result<SignerKey, strkey::StrkeyError> {
        let (version, payload) = strkey::decode_any(&self.address)?;
        match version {
            VersionByte::AccountId => Ok(SignerKey::Ed25519(payload)),
            VersionByte::PreAuthTx => Ok(SignerKey::PreAuthTx(payload)),
            VersionByte::HashX => Ok(SignerKey::HashX(payload)),
            VersionByte::Seed => Err(strkey::StrkeyError::VersionMismatch {
                expected: VersionByte::AccountId,
                got: VersionByte::Seed,
            }),
        }
    }

    fn from_xdr(signer: &xdr::Signer) -> Self {
        let address = match signer.key {
            SignerKey::Ed25519(k) => strkey::encode(VersionByte::AccountId, &k),
            SignerKey::PreAuthTx(k) => strkey::encode(VersionByte::PreAuthTx, &k),
            SignerKey::HashX(k) => strkey::encode(VersionByte::HashX, &k),
        };
        Self {
            address,
            weight: clamp_threshold(signer.weight),
        }
    }
}

/// Changes account settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SetOptions {
    pub inflation_destination: Option<String>,
    pub set_flags: Vec<AccountFlag>,
    pub clear_flags: Vec<AccountFlag>,
    pub master_weight: Option<Threshold>,
    pub low_threshold: Option<Threshold>,
    pub medium_threshold: Option<Threshold>,
    pub high_threshold: Option<Threshold>,
    pub home_domain: Option<String>,
    pub signer: Option<Signer>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_account: Option<String>,
}

impl OperationPayload for SetOptions {
    const KIND: OperationType = OperationType::SetOptions;

    fn source_account(&self) -> Option<&str> {
        self.source_account.as_deref()
    }

    fn checked_body(&self) -> Result<OperationBody, ValidationError> {
        let v = Validator::new(Self::KIND);

        let inflation_dest = self
            .inflation_destination
            .as_deref()
            .map(|a| v.account("InflationDestination", a))
            .transpose()?;

        if let Some(domain) = &self.home_domain {
            if domain.len() > MAX_HOME_DOMAIN_LENGTH {
                return Err(v.error(
                    "HomeDomain",
                    format!("homeDomain must be {MAX_HOME_DOMAIN_LENGTH} characters or less"),
                ));
            }
        }

        let signer = self
            .signer
            .as_ref()
            .map(|s| {
                s.key()
                    .map(|key| xdr::Signer {
                        key,
                        weight: u32::from(s.weight),
                    })
                    .map_err(|e| v.error("Signer", format!("{}: {e}", s.address)))
            })
            .transpose()?;

        Ok(OperationBody::SetOptions(xdr::SetOptionsOp {
            inflation_dest,
            clear_flags: flags_to_bits(&self.clear_flags),
            set_flags: flags_to_bits(&self.set_flags),
            master_weight: self.master_weight.map(u32::from),
            low_threshold: self.low_threshold.map(u32::from),
            med_threshold: self.medium_threshold.map(u32::from),
            high_threshold: self.high_threshold.map(u32::from),
            home_domain: self.home_domain.clone(),
            signer,
        }))
    }

    fn from_body(body: &OperationBody, source_account: Option<String>) -> Option<Self> {
        let OperationBody::SetOptions(op) = body else {
            return None;
        };
        let threshold = |t: Option<u32>| t.map(clamp_threshold);
        Some(Self {
            inflation_destination: op.inflation_dest.as_ref().map(account_address),
            set_flags: bits_to_flags(op.set_flags),
            clear_flags: bits_to_flags(op.clear_flags),
            master_weight: threshold(op.master_weight),
            low_threshold: threshold(op.low_threshold),
            medium_threshold: threshold(op.med_threshold),
            high_threshold: threshold(op.high_threshold),
            home_domain: op.home_domain.clone(),
            signer: op.signer.as_ref().map(Signer::from_xdr),
            source_account,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const KP1: &str = "GAS4V4O2B7DW5T7IQRPEEVCRXMDZESKISR7DVIGKZQYYV3OSQ5SH5LVP";

    fn body(op: &SetOptions) -> xdr::SetOptionsOp {
        match op.to_xdr().unwrap() {
            OperationBody::SetOptions(b) => b,
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn empty_options_send_nothing() {
        assert_eq!(body(&SetOptions::default()), xdr::SetOptionsOp::default());
    }

    #[test]
    fn flags_are_ored() {
        let op = SetOptions {
            set_flags: vec![AccountFlag::AuthRequired, AccountFlag::AuthRevocable],
            clear_flags: vec![AccountFlag::AuthImmutable, AccountFlag::AuthImmutable],
            ..Default::default()
        };
        let b = body(&op);
        assert_eq!(b.set_flags, Some(3));
        assert_eq!(b.clear_flags, Some(4));
    }

    #[test]
    fn flags_decode_to_list() {
        let wire = xdr::Operation {
            source_account: None,
            body: OperationBody::SetOptions(xdr::SetOptionsOp {
                set_flags: Some(7),
                clear_flags: Some(5),
                ..Default::default()
            }),
        };
        let op = SetOptions::from_xdr(&wire).unwrap();
        assert_eq!(op.set_flags, AccountFlag::ALL.to_vec());
        assert_eq!(
            op.clear_flags,
            vec![AccountFlag::AuthRequired, AccountFlag::AuthImmutable]
        );
    }

    #[test]
    fn unknown_and_empty_flag_masks_survive_decode() {
        for (set, clear) in [(Some(8), Some(0)), (Some(9), None), (None, Some(0x30))] {
            let wire = xdr::Operation {
                source_account: None,
                body: OperationBody::SetOptions(xdr::SetOptionsOp {
                    set_flags: set,
                    clear_flags: clear,
                    ..Default::default()
                }),
            };
            let op = SetOptions::from_xdr(&wire).unwrap();
            let b = body(&op);
            assert_eq!(b.set_flags, set);
            assert_eq!(b.clear_flags, clear);
        }

        let wire = xdr::Operation {
            source_account: None,
            body: OperationBody::SetOptions(xdr::SetOptionsOp {
                set_flags: Some(9),
                ..Default::default()
            }),
        };
        assert_eq!(
            SetOptions::from_xdr(&wire).unwrap().set_flags,
            vec![AccountFlag::AuthRequired, AccountFlag::Other(8)]
        );
    }

    #[test]
    fn home_domain_limit() {
        let ok = SetOptions {
            home_domain: Some("LovelyLumensLookLuminous.com".into()),
            ..Default::default()
        };
        assert!(ok.validate().is_ok());

        let too_long = SetOptions {
            home_domain: Some("LovelyLumensLookLuminousLately.com".into()),
            ..Default::default()
        };
        assert_eq!(too_long.validate().unwrap_err().field, "HomeDomain");
    }

    #[test]
    fn signer_key_follows_address_version() {
        let raw = [7u8; 32];
        let cases = [
            (VersionByte::AccountId, SignerKey::Ed25519(raw)),
            (VersionByte::PreAuthTx, SignerKey::PreAuthTx(raw)),
            (VersionByte::HashX, SignerKey::HashX(raw)),
        ];
        for (version, expected) in cases {
            let signer = Signer::new(strkey::encode(version, &raw), 1);
            assert_eq!(signer.key().unwrap(), expected);
        }
        let seed = Signer::new(strkey::encode(VersionByte::Seed, &raw), 1);
        assert!(seed.key().is_err());
    }

    #[test]
    fn signer_round_trip() {
        let op = SetOptions {
            signer: Some(Signer::new(KP1, 4)),
            master_weight: Some(10),
            inflation_destination: Some(KP1.into()),
            ..Default::default()
        };
        let b = body(&op);
        assert_eq!(b.signer.map(|s| s.weight), Some(4));
        assert_eq!(b.master_weight, Some(10));

        let wire = xdr::Operation {
            source_account: None,
            body: OperationBody::SetOptions(b),
        };
        assert_eq!(SetOptions::from_xdr(&wire).unwrap(), op);
    }

    #[test]
    fn oversized_wire_weights_clamp_to_255() {
        let wire = xdr::Operation {
            source_account: None,
            body: OperationBody::SetOptions(xdr::SetOptionsOp {
                master_weight: Some(256),
                high_threshold: Some(u32::MAX),
                low_threshold: Some(255),
                signer: Some(xdr::Signer {
                    key: SignerKey::Ed25519([7u8; 32]),
                    weight: 1000,
                }),
                ..Default::default()
            }),
        };
        let op = SetOptions::from_xdr(&wire).unwrap();
        assert_eq!(op.master_weight, Some(255));
        assert_eq!(op.high_threshold, Some(255));
        assert_eq!(op.low_threshold, Some(255));
        assert_eq!(op.signer.as_ref().map(|s| s.weight), Some(255));

        let b = body(&op);
        assert_eq!(b.master_weight, Some(255));
        assert_eq!(b.signer.map(|s| s.weight), Some(255));
    }

    #[test]
    fn bad_inflation_destination_rejected() {
        let op = SetOptions {
            inflation_destination: Some("GBAD".into()),
            ..Default::default()
        };
        assert_eq!(op.validate().unwrap_err().field, "InflationDestination");
    }
}
