//! Wire form of ledger operations.
//!
//! `OperationBody` is the discriminated union of every operation kind the
//! builder supports. Discriminants follow the network's numbering; the
//! accessor methods return `None` on an arm mismatch instead of panicking.

use std::fmt;

use super::codec::{XdrReader, XdrWriter};
use super::error::{DecodeError, EncodeError};
use super::types::{AccountId, Asset, Price, Signer};
use super::{ReadXdr, WriteXdr};
use crate::config::{MAX_DATA_LENGTH, MAX_HOME_DOMAIN_LENGTH, MAX_PATH_LENGTH};

// ---------------------------------------------------------------------------
// Operation type
// ---------------------------------------------------------------------------

/// Operation discriminant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationType {
    CreateAccount = 0,
    Payment = 1,
    PathPaymentStrictReceive = 2,
    ManageSellOffer = 3,
    CreatePassiveSellOffer = 4,
    SetOptions = 5,
    ChangeTrust = 6,
    AllowTrust = 7,
    AccountMerge = 8,
    Inflation = 9,
    ManageData = 10,
    BumpSequence = 11,
    ManageBuyOffer = 12,
    PathPaymentStrictSend = 13,
}

impl OperationType {
    /// Name used in diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            OperationType::CreateAccount => "CreateAccount",
            OperationType::Payment => "Payment",
            OperationType::PathPaymentStrictReceive => "PathPaymentStrictReceive",
            OperationType::ManageSellOffer => "ManageSellOffer",
            OperationType::CreatePassiveSellOffer => "CreatePassiveSellOffer",
            OperationType::SetOptions => "SetOptions",
            OperationType::ChangeTrust => "ChangeTrust",
            OperationType::AllowTrust => "AllowTrust",
            OperationType::AccountMerge => "AccountMerge",
            OperationType::Inflation => "Inflation",
            OperationType::ManageData => "ManageData",
            OperationType::BumpSequence => "BumpSequence",
            OperationType::ManageBuyOffer => "ManageBuyOffer",
            OperationType::PathPaymentStrictSend => "PathPaymentStrictSend",
        }
    }
}

impl fmt::Display for OperationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Operation payloads
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateAccountOp {
    pub destination: AccountId,
    pub starting_balance: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentOp {
    pub destination: AccountId,
    pub asset: Asset,
    pub amount: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPaymentStrictReceiveOp {
    pub send_asset: Asset,
    pub send_max: i64,
    pub destination: AccountId,
    pub dest_asset: Asset,
    pub dest_amount: i64,
    pub path: Vec<Asset>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPaymentStrictSendOp {
    pub send_asset: Asset,
    pub send_amount: i64,
    pub destination: AccountId,
    pub dest_asset: Asset,
    pub dest_min: i64,
    pub path: Vec<Asset>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManageSellOfferOp {
    pub selling: Asset,
    pub buying: Asset,
    pub amount: i64,
    pub price: Price,
    pub offer_id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManageBuyOfferOp {
    pub selling: Asset,
    pub buying: Asset,
    pub buy_amount: i64,
    pub price: Price,
    pub offer_id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatePassiveSellOfferOp {
    pub selling: Asset,
    pub buying: Asset,
    pub amount: i64,
    pub price: Price,
}

/// Every field is optional; absent fields leave the account unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SetOptionsOp {
    pub inflation_dest: Option<AccountId>,
    pub clear_flags: Option<u32>,
    pub set_flags: Option<u32>,
    pub master_weight: Option<u32>,
    pub low_threshold: Option<u32>,
    pub med_threshold: Option<u32>,
    pub high_threshold: Option<u32>,
    pub home_domain: Option<String>,
    pub signer: Option<Signer>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeTrustOp {
    pub line: Asset,
    pub limit: i64,
}

/// Asset code without issuer. The issuer is implied by the operation source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllowTrustAsset {
    CreditAlphanum4([u8; 4]),
    CreditAlphanum12([u8; 12]),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllowTrustOp {
    pub trustor: AccountId,
    pub asset: AllowTrustAsset,
    pub authorize: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManageDataOp {
    pub data_name: String,
    pub data_value: Option<Vec<u8>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BumpSequenceOp {
    pub bump_to: i64,
}

// ---------------------------------------------------------------------------
// Body union
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationBody {
    CreateAccount(CreateAccountOp),
    Payment(PaymentOp),
    PathPaymentStrictReceive(PathPaymentStrictReceiveOp),
    ManageSellOffer(ManageSellOfferOp),
    CreatePassiveSellOffer(CreatePassiveSellOfferOp),
    SetOptions(SetOptionsOp),
    ChangeTrust(ChangeTrustOp),
    AllowTrust(AllowTrustOp),
    AccountMerge(AccountId),
    Inflation,
    ManageData(ManageDataOp),
    BumpSequence(BumpSequenceOp),
    ManageBuyOffer(ManageBuyOfferOp),
    PathPaymentStrictSend(PathPaymentStrictSendOp),
}

impl OperationBody {
    pub fn operation_type(&self) -> OperationType {
        match self {
            OperationBody::CreateAccount(_) => OperationType::CreateAccount,
            OperationBody::Payment(_) => OperationType::Payment,
            OperationBody::PathPaymentStrictReceive(_) => OperationType::PathPaymentStrictReceive,
            OperationBody::ManageSellOffer(_) => OperationType::ManageSellOffer,
            OperationBody::CreatePassiveSellOffer(_) => OperationType::CreatePassiveSellOffer,
            OperationBody::SetOptions(_) => OperationType::SetOptions,
            OperationBody::ChangeTrust(_) => OperationType::ChangeTrust,
            OperationBody::AllowTrust(_) => OperationType::AllowTrust,
            OperationBody::AccountMerge(_) => OperationType::AccountMerge,
            OperationBody::Inflation => OperationType::Inflation,
            OperationBody::ManageData(_) => OperationType::ManageData,
            OperationBody::BumpSequence(_) => OperationType::BumpSequence,
            OperationBody::ManageBuyOffer(_) => OperationType::ManageBuyOffer,
            OperationBody::PathPaymentStrictSend(_) => OperationType::PathPaymentStrictSend,
        }
    }

    pub fn manage_data(&self) -> Option<&ManageDataOp> {
        match self {
            OperationBody::ManageData(op) => Some(op),
            _ => None,
        }
    }

    pub fn payment(&self) -> Option<&PaymentOp> {
        match self {
            OperationBody::Payment(op) => Some(op),
            _ => None,
        }
    }

    pub fn change_trust(&self) -> Option<&ChangeTrustOp> {
        match self {
            OperationBody::ChangeTrust(op) => Some(op),
            _ => None,
        }
    }
}

fn write_asset_path(w: &mut XdrWriter, path: &[Asset]) -> Result<(), EncodeError> {
    w.write_array(path, MAX_PATH_LENGTH, "path")
}

impl WriteXdr for OperationBody {
    fn write_xdr(&self, w: &mut XdrWriter) -> Result<(), EncodeError> {
        w.write_discriminant(self.operation_type() as i32);
        match self {
            OperationBody::CreateAccount(op) => {
                op.destination.write_xdr(w)?;
                w.write_i64(op.starting_balance);
            }
            OperationBody::Payment(op) => {
                op.destination.write_xdr(w)?;
                op.asset.write_xdr(w)?;
                w.write_i64(op.amount);
            }
            OperationBody::PathPaymentStrictReceive(op) => {
                op.send_asset.write_xdr(w)?;
                w.write_i64(op.send_max);
                op.destination.write_xdr(w)?;
                op.dest_asset.write_xdr(w)?;
                w.write_i64(op.dest_amount);
                write_asset_path(w, &op.path)?;
            }
            OperationBody::ManageSellOffer(op) => {
                op.selling.write_xdr(w)?;
                op.buying.write_xdr(w)?;
                w.write_i64(op.amount);
                op.price.write_xdr(w)?;
                w.write_i64(op.offer_id);
            }
            OperationBody::CreatePassiveSellOffer(op) => {
                op.selling.write_xdr(w)?;
                op.buying.write_xdr(w)?;
                w.write_i64(op.amount);
                op.price.write_xdr(w)?;
            }
            OperationBody::SetOptions(op) => {
                w.write_option(op.inflation_dest.as_ref())?;
                w.write_option(op.clear_flags.as_ref())?;
                w.write_option(op.set_flags.as_ref())?;
                w.write_option(op.master_weight.as_ref())?;
                w.write_option(op.low_threshold.as_ref())?;
                w.write_option(op.med_threshold.as_ref())?;
                w.write_option(op.high_threshold.as_ref())?;
                match &op.home_domain {
                    Some(domain) => {
                        w.write_bool(true);
                        w.write_string(domain, MAX_HOME_DOMAIN_LENGTH, "home domain")?;
                    }
                    None => w.write_bool(false),
                }
                w.write_option(op.signer.as_ref())?;
            }
            OperationBody::ChangeTrust(op) => {
                op.line.write_xdr(w)?;
                w.write_i64(op.limit);
            }
            OperationBody::AllowTrust(op) => {
                op.trustor.write_xdr(w)?;
                match &op.asset {
                    AllowTrustAsset::CreditAlphanum4(code) => {
                        w.write_discriminant(1);
                        w.write_fixed_opaque(code);
                    }
                    AllowTrustAsset::CreditAlphanum12(code) => {
                        w.write_discriminant(2);
                        w.write_fixed_opaque(code);
                    }
                }
                w.write_bool(op.authorize);
            }
            OperationBody::AccountMerge(destination) => destination.write_xdr(w)?,
            OperationBody::Inflation => {}
            OperationBody::ManageData(op) => {
                w.write_string(&op.data_name, MAX_DATA_LENGTH, "data name")?;
                match &op.data_value {
                    Some(value) => {
                        w.write_bool(true);
                        w.write_var_opaque(value, MAX_DATA_LENGTH, "data value")?;
                    }
                    None => w.write_bool(false),
                }
            }
            OperationBody::BumpSequence(op) => w.write_i64(op.bump_to),
            OperationBody::ManageBuyOffer(op) => {
                op.selling.write_xdr(w)?;
                op.buying.write_xdr(w)?;
                w.write_i64(op.buy_amount);
                op.price.write_xdr(w)?;
                w.write_i64(op.offer_id);
            }
            OperationBody::PathPaymentStrictSend(op) => {
                op.send_asset.write_xdr(w)?;
                w.write_i64(op.send_amount);
                op.destination.write_xdr(w)?;
                op.dest_asset.write_xdr(w)?;
                w.write_i64(op.dest_min);
                write_asset_path(w, &op.path)?;
            }
        }
        Ok(())
    }
}

impl ReadXdr for OperationBody {
    fn read_xdr(r: &mut XdrReader<'_>) -> Result<Self, DecodeError> {
        let (disc, offset) = r.read_discriminant()?;
        let body = match disc {
            0 => OperationBody::CreateAccount(CreateAccountOp {
                destination: AccountId::read_xdr(r)?,
                starting_balance: r.read_i64()?,
            }),
            1 => OperationBody::Payment(PaymentOp {
                destination: AccountId::read_xdr(r)?,
                asset: Asset::read_xdr(r)?,
                amount: r.read_i64()?,
            }),
            2 => OperationBody::PathPaymentStrictReceive(PathPaymentStrictReceiveOp {
                send_asset: Asset::read_xdr(r)?,
                send_max: r.read_i64()?,
                destination: AccountId::read_xdr(r)?,
                dest_asset: Asset::read_xdr(r)?,
                dest_amount: r.read_i64()?,
                path: r.read_array(MAX_PATH_LENGTH, "path")?,
            }),
            3 => OperationBody::ManageSellOffer(ManageSellOfferOp {
                selling: Asset::read_xdr(r)?,
                buying: Asset::read_xdr(r)?,
                amount: r.read_i64()?,
                price: Price::read_xdr(r)?,
                offer_id: r.read_i64()?,
            }),
            4 => OperationBody::CreatePassiveSellOffer(CreatePassiveSellOfferOp {
                selling: Asset::read_xdr(r)?,
                buying: Asset::read_xdr(r)?,
                amount: r.read_i64()?,
                price: Price::read_xdr(r)?,
            }),
            5 => OperationBody::SetOptions(SetOptionsOp {
                inflation_dest: r.read_option()?,
                clear_flags: r.read_option()?,
                set_flags: r.read_option()?,
                master_weight: r.read_option()?,
                low_threshold: r.read_option()?,
                med_threshold: r.read_option()?,
                high_threshold: r.read_option()?,
                home_domain: if r.read_bool()? {
                    Some(r.read_string(MAX_HOME_DOMAIN_LENGTH, "home domain")?)
                } else {
                    None
                },
                signer: r.read_option()?,
            }),
            6 => OperationBody::ChangeTrust(ChangeTrustOp {
                line: Asset::read_xdr(r)?,
                limit: r.read_i64()?,
            }),
            7 => {
                let trustor = AccountId::read_xdr(r)?;
                let asset = match r.read_discriminant()? {
                    (1, _) => AllowTrustAsset::CreditAlphanum4(r.read_fixed_opaque::<4>()?),
                    (2, _) => AllowTrustAsset::CreditAlphanum12(r.read_fixed_opaque::<12>()?),
                    (value, offset) => {
                        return Err(DecodeError::UnknownDiscriminant {
                            type_name: "AllowTrustAsset",
                            value,
                            offset,
                        })
                    }
                };
                OperationBody::AllowTrust(AllowTrustOp {
                    trustor,
                    asset,
                    authorize: r.read_bool()?,
                })
            }
            8 => OperationBody::AccountMerge(AccountId::read_xdr(r)?),
            9 => OperationBody::Inflation,
            10 => OperationBody::ManageData(ManageDataOp {
                data_name: r.read_string(MAX_DATA_LENGTH, "data name")?,
                data_value: if r.read_bool()? {
                    Some(r.read_var_opaque(MAX_DATA_LENGTH, "data value")?)
                } else {
                    None
                },
            }),
            11 => OperationBody::BumpSequence(BumpSequenceOp {
                bump_to: r.read_i64()?,
            }),
            12 => OperationBody::ManageBuyOffer(ManageBuyOfferOp {
                selling: Asset::read_xdr(r)?,
                buying: Asset::read_xdr(r)?,
                buy_amount: r.read_i64()?,
                price: Price::read_xdr(r)?,
                offer_id: r.read_i64()?,
            }),
            13 => OperationBody::PathPaymentStrictSend(PathPaymentStrictSendOp {
                send_asset: Asset::read_xdr(r)?,
                send_amount: r.read_i64()?,
                destination: AccountId::read_xdr(r)?,
                dest_asset: Asset::read_xdr(r)?,
                dest_min: r.read_i64()?,
                path: r.read_array(MAX_PATH_LENGTH, "path")?,
            }),
            value => {
                return Err(DecodeError::UnknownDiscriminant {
                    type_name: "OperationBody",
                    value,
                    offset,
                })
            }
        };
        Ok(body)
    }
}

// ---------------------------------------------------------------------------
// Operation
// ---------------------------------------------------------------------------

/// An operation with its optional source account override.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operation {
    pub source_account: Option<AccountId>,
    pub body: OperationBody,
}

impl WriteXdr for Operation {
    fn write_xdr(&self, w: &mut XdrWriter) -> Result<(), EncodeError> {
        w.write_option(self.source_account.as_ref())?;
        self.body.write_xdr(w)
    }
}

impl ReadXdr for Operation {
    fn read_xdr(r: &mut XdrReader<'_>) -> Result<Self, DecodeError> {
        Ok(Operation {
            source_account: r.read_option()?,
            body: OperationBody::read_xdr(r)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xdr::types::{AlphaNum4, PublicKey};

    fn key(b: u8) -> AccountId {
        PublicKey::Ed25519([b; 32])
    }

    #[test]
    fn inflation_has_no_payload() {
        let op = Operation {
            source_account: None,
            body: OperationBody::Inflation,
        };
        assert_eq!(op.to_xdr_bytes().unwrap(), vec![0, 0, 0, 0, 0, 0, 0, 9]);
    }

    #[test]
    fn discriminants_follow_network_numbering() {
        assert_eq!(OperationType::BumpSequence as i32, 11);
        assert_eq!(OperationType::ManageBuyOffer as i32, 12);
        assert_eq!(OperationType::PathPaymentStrictSend as i32, 13);
    }

    #[test]
    fn unknown_operation_reports_offset() {
        // no source account, then discriminant 99
        let bytes = [0u8, 0, 0, 0, 0, 0, 0, 99];
        assert_eq!(
            Operation::from_xdr_bytes(&bytes).unwrap_err(),
            DecodeError::UnknownDiscriminant {
                type_name: "OperationBody",
                value: 99,
                offset: 4
            }
        );
    }

    #[test]
    fn path_longer_than_five_fails_to_encode() {
        let body = OperationBody::PathPaymentStrictSend(PathPaymentStrictSendOp {
            send_asset: Asset::Native,
            send_amount: 1,
            destination: key(1),
            dest_asset: Asset::Native,
            dest_min: 1,
            path: vec![Asset::Native; 6],
        });
        assert!(body.to_xdr_bytes().is_err());
    }

    #[test]
    fn set_options_round_trip() {
        let body = OperationBody::SetOptions(SetOptionsOp {
            inflation_dest: Some(key(3)),
            set_flags: Some(3),
            home_domain: Some("example.com".to_string()),
            ..Default::default()
        });
        let bytes = body.to_xdr_bytes().unwrap();
        assert_eq!(OperationBody::from_xdr_bytes(&bytes).unwrap(), body);
    }

    #[test]
    fn allow_trust_rejects_native_arm() {
        let mut w = XdrWriter::new();
        w.write_discriminant(7);
        key(2).write_xdr(&mut w).unwrap();
        w.write_discriminant(0);
        let bytes = w.into_bytes();
        assert!(matches!(
            OperationBody::from_xdr_bytes(&bytes),
            Err(DecodeError::UnknownDiscriminant {
                type_name: "AllowTrustAsset",
                ..
            })
        ));
    }

    #[test]
    fn accessors_do_not_panic_on_mismatch() {
        let body = OperationBody::ChangeTrust(ChangeTrustOp {
            line: Asset::CreditAlphanum4(AlphaNum4 {
                asset_code: *b"ABCD",
                issuer: key(4),
            }),
            limit: 10,
        });
        assert!(body.manage_data().is_none());
        assert!(body.payment().is_none());
        assert!(body.change_trust().is_some());
    }
}
