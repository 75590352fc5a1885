//! Trustline operations.

use serde::{Deserialize, Serialize};

use super::validation::{ValidationError, Validator};
use super::OperationPayload;
use crate::amount::format_amount;
use crate::asset::{account_address, Asset};
use crate::config::MAX_AMOUNT;
use crate::xdr::{self, OperationBody, OperationType};

// ---------------------------------------------------------------------------
// ChangeTrust
// ---------------------------------------------------------------------------

/// Creates, updates or removes a trustline to a credit asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeTrust {
    pub line: Asset,
    /// Maximum balance the account will hold. `None` or an empty string
    /// means the largest representable amount; `"0"` removes the line.
    #[serde(default)]
    pub limit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_account: Option<String>,
}

impl ChangeTrust {
    /// Trusts `line` up to the maximum amount.
    pub fn new(line: Asset) -> Self {
        Self {
            line,
            limit: None,
            source_account: None,
        }
    }

    pub fn with_limit(line: Asset, limit: impl Into<String>) -> Self {
        Self {
            line,
            limit: Some(limit.into()),
            source_account: None,
        }
    }

    /// Removes the trustline. Fails on the ledger if the balance is not zero.
    pub fn remove_trustline(line: Asset) -> Self {
        Self::with_limit(line, "0")
    }

    fn effective_limit(&self) -> &str {
        match self.limit.as_deref() {
            None | Some("") => MAX_AMOUNT,
            Some(limit) => limit,
        }
    }
}

impl OperationPayload for ChangeTrust {
    const KIND: OperationType = OperationType::ChangeTrust;

    fn source_account(&self) -> Option<&str> {
        self.source_account.as_deref()
    }

    fn checked_body(&self) -> Result<OperationBody, ValidationError> {
        let v = Validator::new(Self::KIND);
        Ok(OperationBody::ChangeTrust(xdr::ChangeTrustOp {
            line: v.credit_asset("Line", &self.line)?,
            limit: v.amount("Limit", self.effective_limit())?,
        }))
    }

    fn from_body(body: &OperationBody, source_account: Option<String>) -> Option<Self> {
        match body {
            OperationBody::ChangeTrust(op) => Some(Self {
                line: Asset::from_xdr(&op.line),
                limit: Some(format_amount(op.limit)),
                source_account,
            }),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// AllowTrust
// ---------------------------------------------------------------------------

/// Authorizes or deauthorizes another account's trustline to an asset
/// issued by the operation source. Only the asset code is sent; the issuer
/// is implied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllowTrust {
    pub trustor: String,
    /// Credit asset whose code is authorized. The issuer may be left empty.
    pub asset: Asset,
    pub authorize: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_account: Option<String>,
}

impl AllowTrust {
    pub fn new(trustor: impl Into<String>, asset: Asset, authorize: bool) -> Self {
        Self {
            trustor: trustor.into(),
            asset,
            authorize,
            source_account: None,
        }
    }
}

impl OperationPayload for AllowTrust {
    const KIND: OperationType = OperationType::AllowTrust;

    fn source_account(&self) -> Option<&str> {
        self.source_account.as_deref()
    }

    fn checked_body(&self) -> Result<OperationBody, ValidationError> {
        let v = Validator::new(Self::KIND);
        let trustor = v.account("Trustor", &self.trustor)?;
        if self.asset.is_native() {
            return Err(v.error("Type", "native (XLM) asset type is not allowed"));
        }
        let asset = self
            .asset
            .to_allow_trust_xdr()
            .map_err(|e| v.error("Type", format!("asset code: {e}")))?;
        Ok(OperationBody::AllowTrust(xdr::AllowTrustOp {
            trustor,
            asset,
            authorize: self.authorize,
        }))
    }

    fn from_body(body: &OperationBody, source_account: Option<String>) -> Option<Self> {
        match body {
            OperationBody::AllowTrust(op) => Some(Self {
                trustor: account_address(&op.trustor),
                asset: Asset::from_allow_trust_xdr(&op.asset),
                authorize: op.authorize,
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

    const KP0: &str = "GDQNY3PBOJOKYZSRMK2S7LHHGWZIUISD4QORETLMXEWXBI7KFZZMKTL3";
    const KP1: &str = "GAS4V4O2B7DW5T7IQRPEEVCRXMDZESKISR7DVIGKZQYYV3OSQ5SH5LVP";

    fn wire(body: OperationBody) -> xdr::Operation {
        xdr::Operation {
            source_account: None,
            body,
        }
    }

    #[test]
    fn default_limit_is_max_amount() {
        let op = ChangeTrust::new(Asset::credit("ABCD", KP1));
        match op.to_xdr().unwrap() {
            OperationBody::ChangeTrust(b) => assert_eq!(b.limit, i64::MAX),
            other => panic!("unexpected {other:?}"),
        }
        let empty = ChangeTrust::with_limit(Asset::credit("ABCD", KP1), "");
        assert_eq!(empty.to_xdr().unwrap(), op.to_xdr().unwrap());
    }

    #[test]
    fn remove_trustline_sets_zero_limit() {
        let op = ChangeTrust::remove_trustline(Asset::credit("ABCD", KP1));
        match op.to_xdr().unwrap() {
            OperationBody::ChangeTrust(b) => assert_eq!(b.limit, 0),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn native_trustline_rejected() {
        let err = ChangeTrust::new(Asset::Native).validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "validation failed for ChangeTrust operation: Field: Line, Error: native (XLM) asset type is not allowed"
        );
    }

    #[test]
    fn change_trust_decodes_limit() {
        let op = ChangeTrust::with_limit(Asset::credit("ABCD", KP1), "10");
        let back = ChangeTrust::from_xdr(&wire(op.to_xdr().unwrap())).unwrap();
        assert_eq!(back.limit.as_deref(), Some("10.0000000"));
        assert_eq!(back.line, Asset::credit("ABCD", KP1));
    }

    #[test]
    fn allow_trust_ignores_issuer() {
        let with_issuer = AllowTrust::new(KP1, Asset::credit("ABCD", KP0), true);
        let without = AllowTrust::new(KP1, Asset::credit("ABCD", ""), true);
        assert_eq!(with_issuer.to_xdr().unwrap(), without.to_xdr().unwrap());

        let back = AllowTrust::from_xdr(&wire(without.to_xdr().unwrap())).unwrap();
        assert_eq!(back.asset, Asset::credit("ABCD", ""));
        assert!(back.authorize);
    }

    #[test]
    fn allow_trust_rejects_native_and_bad_trustor() {
        let err = AllowTrust::new(KP1, Asset::Native, true).validate().unwrap_err();
        assert_eq!(err.field, "Type");
        let err = AllowTrust::new("GBAD", Asset::credit("ABCD", ""), true)
            .validate()
            .unwrap_err();
        assert_eq!(err.field, "Trustor");
    }
}
