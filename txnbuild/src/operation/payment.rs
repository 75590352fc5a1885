//! Operations that move value: account creation, payments and path payments.

use serde::{Deserialize, Serialize};

use super::validation::{ValidationError, Validator};
use super::OperationPayload;
use crate::amount::format_amount;
use crate::asset::{account_address, Asset};
use crate::config::MAX_PATH_LENGTH;
use crate::xdr::{self, OperationBody, OperationType};

// ---------------------------------------------------------------------------
// CreateAccount
// ---------------------------------------------------------------------------

/// Funds a new account with a starting balance of native currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateAccount {
    pub destination: String,
    /// Starting balance, e.g. `"10"` or `"10.5000000"`.
    pub amount: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_account: Option<String>,
}

impl CreateAccount {
    pub fn new(destination: impl Into<String>, amount: impl Into<String>) -> Self {
        Self {
            destination: destination.into(),
            amount: amount.into(),
            source_account: None,
        }
    }
}

impl OperationPayload for CreateAccount {
    const KIND: OperationType = OperationType::CreateAccount;

    fn source_account(&self) -> Option<&str> {
        self.source_account.as_deref()
    }

    fn checked_body(&self) -> Result<OperationBody, ValidationError> {
        let v = Validator::new(Self::KIND);
        Ok(OperationBody::CreateAccount(xdr::CreateAccountOp {
            destination: v.account("Destination", &self.destination)?,
            starting_balance: v.amount("Amount", &self.amount)?,
        }))
    }

    fn from_body(body: &OperationBody, source_account: Option<String>) -> Option<Self> {
        match body {
            OperationBody::CreateAccount(op) => Some(Self {
                destination: account_address(&op.destination),
                amount: format_amount(op.starting_balance),
                source_account,
            }),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Payment
// ---------------------------------------------------------------------------

/// Sends an amount of an asset to an existing account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    pub destination: String,
    pub amount: String,
    pub asset: Asset,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_account: Option<String>,
}

impl Payment {
    pub fn new(destination: impl Into<String>, amount: impl Into<String>, asset: Asset) -> Self {
        Self {
            destination: destination.into(),
            amount: amount.into(),
            asset,
            source_account: None,
        }
    }
}

impl OperationPayload for Payment {
    const KIND: OperationType = OperationType::Payment;

    fn source_account(&self) -> Option<&str> {
        self.source_account.as_deref()
    }

    fn checked_body(&self) -> Result<OperationBody, ValidationError> {
        let v = Validator::new(Self::KIND);
        Ok(OperationBody::Payment(xdr::PaymentOp {
            destination: v.account("Destination", &self.destination)?,
            asset: v.asset("Asset", &self.asset)?,
            amount: v.amount("Amount", &self.amount)?,
        }))
    }

    fn from_body(body: &OperationBody, source_account: Option<String>) -> Option<Self> {
        match body {
            OperationBody::Payment(op) => Some(Self {
                destination: account_address(&op.destination),
                amount: format_amount(op.amount),
                asset: Asset::from_xdr(&op.asset),
                source_account,
            }),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Path payments
// ---------------------------------------------------------------------------

fn checked_path(v: &Validator, path: &[Asset]) -> Result<Vec<xdr::Asset>, ValidationError> {
    if path.len() > MAX_PATH_LENGTH {
        return Err(v.error(
            "Path",
            format!("path can contain at most {MAX_PATH_LENGTH} assets"),
        ));
    }
    path.iter().map(|asset| v.asset("Path", asset)).collect()
}

/// Sends at most `send_max` of `send_asset` so that the destination receives
/// exactly `dest_amount` of `dest_asset`, converting through `path`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathPaymentStrictReceive {
    pub send_asset: Asset,
    pub send_max: String,
    pub destination: String,
    pub dest_asset: Asset,
    pub dest_amount: String,
    #[serde(default)]
    pub path: Vec<Asset>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_account: Option<String>,
}

/// Older name of [`PathPaymentStrictReceive`].
pub type PathPayment = PathPaymentStrictReceive;

impl OperationPayload for PathPaymentStrictReceive {
    const KIND: OperationType = OperationType::PathPaymentStrictReceive;

    fn source_account(&self) -> Option<&str> {
        self.source_account.as_deref()
    }

    fn checked_body(&self) -> Result<OperationBody, ValidationError> {
        let v = Validator::new(Self::KIND);
        Ok(OperationBody::PathPaymentStrictReceive(
            xdr::PathPaymentStrictReceiveOp {
                send_asset: v.asset("SendAsset", &self.send_asset)?,
                send_max: v.amount("SendMax", &self.send_max)?,
                destination: v.account("Destination", &self.destination)?,
                dest_asset: v.asset("DestAsset", &self.dest_asset)?,
                dest_amount: v.amount("DestAmount", &self.dest_amount)?,
                path: checked_path(&v, &self.path)?,
            },
        ))
    }

    fn from_body(body: &OperationBody, source_account: Option<String>) -> Option<Self> {
        match body {
            OperationBody::PathPaymentStrictReceive(op) => Some(Self {
                send_asset: Asset::from_xdr(&op.send_asset),
                send_max: format_amount(op.send_max),
                destination: account_address(&op.destination),
                dest_asset: Asset::from_xdr(&op.dest_asset),
                dest_amount: format_amount(op.dest_amount),
                path: op.path.iter().map(Asset::from_xdr).collect(),
                source_account,
            }),
            _ => None,
        }
    }
}

/// Sends exactly `send_amount` of `send_asset` so that the destination
/// receives at least `dest_min` of `dest_asset`, converting through `path`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathPaymentStrictSend {
    pub send_asset: Asset,
    pub send_amount: String,
    pub destination: String,
    pub dest_asset: Asset,
    pub dest_min: String,
    #[serde(default)]
    pub path: Vec<Asset>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_account: Option<String>,
}

impl OperationPayload for PathPaymentStrictSend {
    const KIND: OperationType = OperationType::PathPaymentStrictSend;

    fn source_account(&self) -> Option<&str> {
        self.source_account.as_deref()
    }

    fn checked_body(&self) -> Result<OperationBody, ValidationError> {
        let v = Validator::new(Self::KIND);
        Ok(OperationBody::PathPaymentStrictSend(
            xdr::PathPaymentStrictSendOp {
                send_asset: v.asset("SendAsset", &self.send_asset)?,
                send_amount: v.amount("SendAmount", &self.send_amount)?,
                destination: v.account("Destination", &self.destination)?,
                dest_asset: v.asset("DestAsset", &self.dest_asset)?,
                dest_min: v.amount("DestMin", &self.dest_min)?,
                path: checked_path(&v, &self.path)?,
            },
        ))
    }

    fn from_body(body: &OperationBody, source_account: Option<String>) -> Option<Self> {
        match body {
            OperationBody::PathPaymentStrictSend(op) => Some(Self {
                send_asset: Asset::from_xdr(&op.send_asset),
                send_amount: format_amount(op.send_amount),
                destination: account_address(&op.destination),
                dest_asset: Asset::from_xdr(&op.dest_asset),
                dest_min: format_amount(op.dest_min),
                path: op.path.iter().map(Asset::from_xdr).collect(),
                source_account,
            }),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::TransactionError;

    const KP0: &str = "GDQNY3PBOJOKYZSRMK2S7LHHGWZIUISD4QORETLMXEWXBI7KFZZMKTL3";
    const KP2: &str = "GB7BDSZU2Y27LYNLALKKALB52WS2IZWYBDGY6EQBLEED3TJOCVMZRH7H";

    fn wire(body: OperationBody) -> xdr::Operation {
        xdr::Operation {
            source_account: None,
            body,
        }
    }

    #[test]
    fn create_account_round_trip() {
        let op = CreateAccount::new(KP2, "10");
        let body = op.to_xdr().unwrap();
        match &body {
            OperationBody::CreateAccount(b) => assert_eq!(b.starting_balance, 100_000_000),
            other => panic!("unexpected {other:?}"),
        }
        let back = CreateAccount::from_xdr(&wire(body)).unwrap();
        assert_eq!(back.destination, KP2);
        assert_eq!(back.amount, "10.0000000");
        assert_eq!(back.source_account, None);
    }

    #[test]
    fn create_account_rejects_bad_destination() {
        let err = CreateAccount::new("GABC", "10").validate().unwrap_err();
        assert_eq!(err.field, "Destination");
        assert_eq!(err.kind, OperationType::CreateAccount);
    }

    #[test]
    fn payment_rejects_negative_amount() {
        let err = Payment::new(KP2, "-10", Asset::Native).validate().unwrap_err();
        assert_eq!(err.field, "Amount");
        assert_eq!(err.message, "amount can not be negative");
    }

    #[test]
    fn payment_rejects_bad_issuer() {
        let err = Payment::new(KP2, "10", Asset::credit("ABCD", "GXYZ"))
            .validate()
            .unwrap_err();
        assert_eq!(err.field, "Asset");
    }

    #[test]
    fn payment_decodes_credit_asset() {
        let op = Payment::new(KP2, "134", Asset::credit("XY", KP0));
        let back = Payment::from_xdr(&wire(op.to_xdr().unwrap())).unwrap();
        assert_eq!(back.amount, "134.0000000");
        assert_eq!(back.asset, Asset::credit("XY", KP0));
    }

    #[test]
    fn from_xdr_rejects_other_kind() {
        let body = CreateAccount::new(KP2, "1").to_xdr().unwrap();
        let err = Payment::from_xdr(&wire(body)).unwrap_err();
        assert_eq!(
            err,
            TransactionError::OperationMismatch {
                expected: OperationType::Payment,
                got: OperationType::CreateAccount,
            }
        );
    }

    #[test]
    fn path_payment_limits_path() {
        let mut op = PathPayment {
            send_asset: Asset::Native,
            send_max: "10".into(),
            destination: KP2.into(),
            dest_asset: Asset::credit("ABCD", KP0),
            dest_amount: "1".into(),
            path: vec![Asset::credit("ABCD", KP0)],
            source_account: None,
        };
        assert!(op.validate().is_ok());

        op.path = vec![Asset::Native; 6];
        assert_eq!(op.validate().unwrap_err().field, "Path");
    }

    #[test]
    fn strict_send_round_trip() {
        let op = PathPaymentStrictSend {
            send_asset: Asset::Native,
            send_amount: "10".into(),
            destination: KP2.into(),
            dest_asset: Asset::credit("ABCD", KP0),
            dest_min: "1".into(),
            path: vec![Asset::credit("ABCDE", KP0)],
            source_account: Some(KP0.into()),
        };
        let body = op.to_xdr().unwrap();
        let back = PathPaymentStrictSend::from_xdr(&xdr::Operation {
            source_account: Some(xdr::PublicKey::Ed25519(
                crate::strkey::decode_account_id(KP0).unwrap(),
            )),
            body,
        })
        .unwrap();
        assert_eq!(back.send_amount, "10.0000000");
        assert_eq!(back.dest_min, "1.0000000");
        assert_eq!(back.path, op.path);
        assert_eq!(back.source_account.as_deref(), Some(KP0));
    }
}
