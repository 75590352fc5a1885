//! Field-scoped validation shared by every operation payload.
//!
//! Each payload validates and converts in one pass through a [`Validator`]
//! tagged with its operation kind, so a failure always names the kind and
//! the offending field.

use thiserror::Error;

use crate::amount::{parse_amount, parse_price};
use crate::asset::Asset;
use crate::crypto::keys::decode_address;
use crate::xdr::{self, OperationType};

/// A single invalid field on an operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("validation failed for {kind} operation: Field: {field}, Error: {message}")]
pub struct ValidationError {
    pub kind: OperationType,
    pub field: &'static str,
    pub message: String,
}

/// Builds [`ValidationError`]s for one operation kind.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Validator {
    kind: OperationType,
}

impl Validator {
    pub(crate) fn new(kind: OperationType) -> Self {
        Self { kind }
    }

    pub(crate) fn error(&self, field: &'static str, message: impl Into<String>) -> ValidationError {
        ValidationError {
            kind: self.kind,
            field,
            message: message.into(),
        }
    }

    /// A `G...` address decoded to a wire account id.
    pub(crate) fn account(
        &self,
        field: &'static str,
        address: &str,
    ) -> Result<xdr::AccountId, ValidationError> {
        if address.is_empty() {
            return Err(self.error(field, "public key is undefined"));
        }
        decode_address(address)
            .map(xdr::PublicKey::Ed25519)
            .map_err(|_| self.error(field, format!("{address} is not a valid stellar public key")))
    }

    /// Optional per-operation source account.
    pub(crate) fn source(
        &self,
        address: Option<&str>,
    ) -> Result<Option<xdr::AccountId>, ValidationError> {
        address.map(|a| self.account("SourceAccount", a)).transpose()
    }

    /// A non-negative amount in stroops.
    pub(crate) fn amount(&self, field: &'static str, amount: &str) -> Result<i64, ValidationError> {
        let stroops = parse_amount(amount).map_err(|e| self.error(field, e.to_string()))?;
        if stroops < 0 {
            return Err(self.error(field, "amount can not be negative"));
        }
        Ok(stroops)
    }

    /// Any well-formed asset, native included.
    pub(crate) fn asset(&self, field: &'static str, asset: &Asset) -> Result<xdr::Asset, ValidationError> {
        if let Asset::Credit(credit) = asset {
            if credit.issuer.is_empty() {
                return Err(self.error(field, "asset issuer: public key is undefined"));
            }
            if decode_address(&credit.issuer).is_err() {
                return Err(self.error(
                    field,
                    format!("asset issuer: {} is not a valid stellar public key", credit.issuer),
                ));
            }
        }
        asset
            .to_xdr()
            .map_err(|e| self.error(field, format!("asset code: {e}")))
    }

    /// A credit asset; native is rejected.
    pub(crate) fn credit_asset(
        &self,
        field: &'static str,
        asset: &Asset,
    ) -> Result<xdr::Asset, ValidationError> {
        if asset.is_native() {
            return Err(self.error(field, "native (XLM) asset type is not allowed"));
        }
        self.asset(field, asset)
    }

    /// A price string as its wire fraction.
    pub(crate) fn price(&self, field: &'static str, price: &str) -> Result<xdr::Price, ValidationError> {
        parse_price(price).map_err(|e| self.error(field, e.to_string()))
    }

    pub(crate) fn non_negative(&self, field: &'static str, value: i64) -> Result<i64, ValidationError> {
        if value < 0 {
            return Err(self.error(field, format!("{field} can not be negative")));
        }
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ISSUER: &str = "GAS4V4O2B7DW5T7IQRPEEVCRXMDZESKISR7DVIGKZQYYV3OSQ5SH5LVP";

    #[test]
    fn message_names_kind_and_field() {
        let v = Validator::new(OperationType::Payment);
        let err = v.error("Asset", "asset is undefined");
        assert_eq!(
            err.to_string(),
            "validation failed for Payment operation: Field: Asset, Error: asset is undefined"
        );
    }

    #[test]
    fn bad_account_reports_address() {
        let v = Validator::new(OperationType::CreateAccount);
        let err = v.account("Destination", "GABC").unwrap_err();
        assert_eq!(err.field, "Destination");
        assert_eq!(err.message, "GABC is not a valid stellar public key");

        let err = v.account("Destination", "").unwrap_err();
        assert_eq!(err.message, "public key is undefined");
    }

    #[test]
    fn negative_amount_rejected() {
        let v = Validator::new(OperationType::Payment);
        assert_eq!(v.amount("Amount", "10").unwrap(), 100_000_000);
        assert_eq!(
            v.amount("Amount", "-1").unwrap_err().message,
            "amount can not be negative"
        );
        assert!(v.amount("Amount", "ten").is_err());
    }

    #[test]
    fn native_rejected_for_credit_fields() {
        let v = Validator::new(OperationType::ChangeTrust);
        let err = v.credit_asset("Line", &Asset::Native).unwrap_err();
        assert_eq!(
            err.to_string(),
            "validation failed for ChangeTrust operation: Field: Line, Error: native (XLM) asset type is not allowed"
        );
        assert!(v.credit_asset("Line", &Asset::credit("ABCD", ISSUER)).is_ok());
    }

    #[test]
    fn asset_issuer_must_parse() {
        let v = Validator::new(OperationType::Payment);
        let err = v.asset("Asset", &Asset::credit("ABCD", "GXXX")).unwrap_err();
        assert!(err.message.starts_with("asset issuer:"));
        let err = v.asset("Asset", &Asset::credit("TOOLONGCODE123", ISSUER)).unwrap_err();
        assert!(err.message.contains("invalid asset code length"));
    }
}
