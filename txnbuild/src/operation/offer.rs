//! Offer management on the built-in order book.
//!
//! Prices are decimal strings (`"0.5"`, `"5"`); on the wire they become the
//! closest `n/d` fraction. An offer id of 0 creates a new offer, any other
//! id updates or (with amount 0) deletes an existing one.

use serde::{Deserialize, Serialize};

use super::validation::{ValidationError, Validator};
use super::OperationPayload;
use crate::amount::{format_amount, format_price};
use crate::asset::Asset;
use crate::xdr::{self, OperationBody, OperationType};

/// Placeholder pair used when deleting an offer. The ledger matches offers
/// by id and seller only, so the assets are ignored.
const DELETE_OFFER_ASSET_CODE: &str = "FAKE";
const DELETE_OFFER_ASSET_ISSUER: &str = "GBAQPADEYSKYMYXTMASBUIS5JI3LMOAWSTM2CHGDBJ3QDDPNCSO3DVAA";

// ---------------------------------------------------------------------------
// ManageSellOffer
// ---------------------------------------------------------------------------

/// Creates, updates or deletes an offer to sell `amount` of `selling`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManageSellOffer {
    pub selling: Asset,
    pub buying: Asset,
    pub amount: String,
    /// Units of `buying` per unit of `selling`.
    pub price: String,
    #[serde(default)]
    pub offer_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_account: Option<String>,
}

impl ManageSellOffer {
    /// A new offer (id 0).
    pub fn create(
        selling: Asset,
        buying: Asset,
        amount: impl Into<String>,
        price: impl Into<String>,
    ) -> Self {
        Self::update(selling, buying, amount, price, 0)
    }

    /// Replaces the terms of offer `offer_id`.
    pub fn update(
        selling: Asset,
        buying: Asset,
        amount: impl Into<String>,
        price: impl Into<String>,
        offer_id: i64,
    ) -> Self {
        Self {
            selling,
            buying,
            amount: amount.into(),
            price: price.into(),
            offer_id,
            source_account: None,
        }
    }

    /// Removes offer `offer_id`.
    pub fn delete(offer_id: i64) -> Self {
        Self::update(
            Asset::Native,
            Asset::credit(DELETE_OFFER_ASSET_CODE, DELETE_OFFER_ASSET_ISSUER),
            "0",
            "1",
            offer_id,
        )
    }
}

impl OperationPayload for ManageSellOffer {
    const KIND: OperationType = OperationType::ManageSellOffer;

    fn source_account(&self) -> Option<&str> {
        self.source_account.as_deref()
    }

    fn checked_body(&self) -> Result<OperationBody, ValidationError> {
        let v = Validator::new(Self::KIND);
        Ok(OperationBody::ManageSellOffer(xdr::ManageSellOfferOp {
            selling: v.asset("Selling", &self.selling)?,
            buying: v.asset("Buying", &self.buying)?,
            amount: v.amount("Amount", &self.amount)?,
            price: v.price("Price", &self.price)?,
            offer_id: v.non_negative("OfferID", self.offer_id)?,
        }))
    }

    fn from_body(body: &OperationBody, source_account: Option<String>) -> Option<Self> {
        match body {
            OperationBody::ManageSellOffer(op) => Some(Self {
                selling: Asset::from_xdr(&op.selling),
                buying: Asset::from_xdr(&op.buying),
                amount: format_amount(op.amount),
                price: format_price(&op.price),
                offer_id: op.offer_id,
                source_account,
            }),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// ManageBuyOffer
// ---------------------------------------------------------------------------

/// Creates, updates or deletes an offer to buy `amount` of `buying`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManageBuyOffer {
    pub selling: Asset,
    pub buying: Asset,
    /// Amount of `buying` wanted.
    pub amount: String,
    /// Units of `selling` per unit of `buying`.
    pub price: String,
    #[serde(default)]
    pub offer_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_account: Option<String>,
}

impl OperationPayload for ManageBuyOffer {
    const KIND: OperationType = OperationType::ManageBuyOffer;

    fn source_account(&self) -> Option<&str> {
        self.source_account.as_deref()
    }

    fn checked_body(&self) -> Result<OperationBody, ValidationError> {
        let v = Validator::new(Self::KIND);
        Ok(OperationBody::ManageBuyOffer(xdr::ManageBuyOfferOp {
            selling: v.asset("Selling", &self.selling)?,
            buying: v.asset("Buying", &self.buying)?,
            buy_amount: v.amount("Amount", &self.amount)?,
            price: v.price("Price", &self.price)?,
            offer_id: v.non_negative("OfferID", self.offer_id)?,
        }))
    }

    fn from_body(body: &OperationBody, source_account: Option<String>) -> Option<Self> {
        match body {
            OperationBody::ManageBuyOffer(op) => Some(Self {
                selling: Asset::from_xdr(&op.selling),
                buying: Asset::from_xdr(&op.buying),
                amount: format_amount(op.buy_amount),
                price: format_price(&op.price),
                offer_id: op.offer_id,
                source_account,
            }),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// CreatePassiveSellOffer
// ---------------------------------------------------------------------------

/// A sell offer that does not take existing offers at the same price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatePassiveSellOffer {
    pub selling: Asset,
    pub buying: Asset,
    pub amount: String,
    pub price: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_account: Option<String>,
}

impl OperationPayload for CreatePassiveSellOffer {
    const KIND: OperationType = OperationType::CreatePassiveSellOffer;

    fn source_account(&self) -> Option<&str> {
        self.source_account.as_deref()
    }

    fn checked_body(&self) -> Result<OperationBody, ValidationError> {
        let v = Validator::new(Self::KIND);
        Ok(OperationBody::CreatePassiveSellOffer(
            xdr::CreatePassiveSellOfferOp {
                selling: v.asset("Selling", &self.selling)?,
                buying: v.asset("Buying", &self.buying)?,
                amount: v.amount("Amount", &self.amount)?,
                price: v.price("Price", &self.price)?,
            },
        ))
    }

    fn from_body(body: &OperationBody, source_account: Option<String>) -> Option<Self> {
        match body {
            OperationBody::CreatePassiveSellOffer(op) => Some(Self {
                selling: Asset::from_xdr(&op.selling),
                buying: Asset::from_xdr(&op.buying),
                amount: format_amount(op.amount),
                price: format_price(&op.price),
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

    fn wire(body: OperationBody) -> xdr::Operation {
        xdr::Operation {
            source_account: None,
            body,
        }
    }

    #[test]
    fn create_uses_offer_id_zero() {
        let op = ManageSellOffer::create(Asset::Native, Asset::credit("ABCD", KP0), "100", "0.01");
        assert_eq!(op.offer_id, 0);
        match op.to_xdr().unwrap() {
            OperationBody::ManageSellOffer(b) => {
                assert_eq!(b.amount, 1_000_000_000);
                assert_eq!(b.price, xdr::Price { n: 1, d: 100 });
                assert_eq!(b.offer_id, 0);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn delete_uses_placeholder_pair() {
        let op = ManageSellOffer::delete(2921622);
        assert_eq!(op.amount, "0");
        assert_eq!(op.price, "1");
        assert!(op.selling.is_native());
        assert_eq!(op.buying.code(), "FAKE");
        match op.to_xdr().unwrap() {
            OperationBody::ManageSellOffer(b) => {
                assert_eq!(b.amount, 0);
                assert_eq!(b.price, xdr::Price { n: 1, d: 1 });
                assert_eq!(b.offer_id, 2921622);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn negative_offer_id_rejected() {
        let op = ManageSellOffer::update(Asset::Native, Asset::credit("ABCD", KP0), "1", "1", -1);
        assert_eq!(op.validate().unwrap_err().field, "OfferID");
    }

    #[test]
    fn bad_price_rejected() {
        let op = ManageSellOffer::create(Asset::Native, Asset::credit("ABCD", KP0), "1", "-2");
        assert_eq!(op.validate().unwrap_err().field, "Price");
        let op = ManageSellOffer::create(Asset::Native, Asset::credit("ABCD", KP0), "1", "abc");
        assert_eq!(op.validate().unwrap_err().field, "Price");
    }

    #[test]
    fn sell_offer_decodes_decimal_price() {
        let op = ManageSellOffer::create(Asset::Native, Asset::credit("ABCXYZ", KP0), "300", "5");
        let back = ManageSellOffer::from_xdr(&wire(op.to_xdr().unwrap())).unwrap();
        assert_eq!(back.amount, "300.0000000");
        assert_eq!(back.price, "5.0000000");
        assert_eq!(back.buying, Asset::credit("ABCXYZ", KP0));
    }

    #[test]
    fn buy_offer_round_trip() {
        let op = ManageBuyOffer {
            selling: Asset::Native,
            buying: Asset::credit("ABCXYZ", KP0),
            amount: "100".into(),
            price: "0.5".into(),
            offer_id: 0,
            source_account: None,
        };
        match op.to_xdr().unwrap() {
            OperationBody::ManageBuyOffer(b) => {
                assert_eq!(b.buy_amount, 1_000_000_000);
                assert_eq!(b.price, xdr::Price { n: 1, d: 2 });
            }
            other => panic!("unexpected {other:?}"),
        }
        let back = ManageBuyOffer::from_xdr(&wire(op.to_xdr().unwrap())).unwrap();
        assert_eq!(back.amount, "100.0000000");
        assert_eq!(back.price, "0.5000000");
    }

    #[test]
    fn passive_offer_round_trip() {
        let op = CreatePassiveSellOffer {
            selling: Asset::Native,
            buying: Asset::credit("ABCD", KP0),
            amount: "10".into(),
            price: "1.0".into(),
            source_account: None,
        };
        let back = CreatePassiveSellOffer::from_xdr(&wire(op.to_xdr().unwrap())).unwrap();
        assert_eq!(back.amount, "10.0000000");
        assert_eq!(back.price, "1.0000000");
    }
}
