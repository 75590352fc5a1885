//! Account administration: merge, sequence bump, inflation and data entries.

use serde::{Deserialize, Serialize};

use super::validation::{ValidationError, Validator};
use super::OperationPayload;
use crate::asset::account_address;
use crate::config::MAX_DATA_LENGTH;
use crate::xdr::{self, OperationBody, OperationType};

// ---------------------------------------------------------------------------
// AccountMerge
// ---------------------------------------------------------------------------

/// Deletes the source account and moves its native balance to `destination`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountMerge {
    pub destination: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_account: Option<String>,
}

impl AccountMerge {
    pub fn new(destination: impl Into<String>) -> Self {
        Self {
            destination: destination.into(),
            source_account: None,
        }
    }
}

impl OperationPayload for AccountMerge {
    const KIND: OperationType = OperationType::AccountMerge;

    fn source_account(&self) -> Option<&str> {
        self.source_account.as_deref()
    }

    fn checked_body(&self) -> Result<OperationBody, ValidationError> {
        let v = Validator::new(Self::KIND);
        Ok(OperationBody::AccountMerge(
            v.account("Destination", &self.destination)?,
        ))
    }

    fn from_body(body: &OperationBody, source_account: Option<String>) -> Option<Self> {
        match body {
            OperationBody::AccountMerge(dest) => Some(Self {
                destination: account_address(dest),
                source_account,
            }),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// BumpSequence
// ---------------------------------------------------------------------------

/// Raises the source account's sequence number to `bump_to`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BumpSequence {
    pub bump_to: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_account: Option<String>,
}

impl BumpSequence {
    pub fn new(bump_to: i64) -> Self {
        Self {
            bump_to,
            source_account: None,
        }
    }
}

impl OperationPayload for BumpSequence {
    const KIND: OperationType = OperationType::BumpSequence;

    fn source_account(&self) -> Option<&str> {
        self.source_account.as_deref()
    }

    fn checked_body(&self) -> Result<OperationBody, ValidationError> {
        let v = Validator::new(Self::KIND);
        Ok(OperationBody::BumpSequence(xdr::BumpSequenceOp {
            bump_to: v.non_negative("BumpTo", self.bump_to)?,
        }))
    }

    fn from_body(body: &OperationBody, source_account: Option<String>) -> Option<Self> {
        match body {
            OperationBody::BumpSequence(op) => Some(Self {
                bump_to: op.bump_to,
                source_account,
            }),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Inflation
// ---------------------------------------------------------------------------

/// Runs the weekly inflation payout. Carries no fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inflation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_account: Option<String>,
}

impl OperationPayload for Inflation {
    const KIND: OperationType = OperationType::Inflation;

    fn source_account(&self) -> Option<&str> {
        self.source_account.as_deref()
    }

    fn checked_body(&self) -> Result<OperationBody, ValidationError> {
        Ok(OperationBody::Inflation)
    }

    fn from_body(body: &OperationBody, source_account: Option<String>) -> Option<Self> {
        match body {
            OperationBody::Inflation => Some(Self { source_account }),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// ManageData
// ---------------------------------------------------------------------------

/// Sets, modifies or deletes a named data entry on the source account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManageData {
    pub name: String,
    /// `None` deletes the entry.
    #[serde(default)]
    pub value: Option<Vec<u8>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_account: Option<String>,
}

impl ManageData {
    pub fn new(name: impl Into<String>, value: Option<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            value,
            source_account: None,
        }
    }
}

impl OperationPayload for ManageData {
    const KIND: OperationType = OperationType::ManageData;

    fn source_account(&self) -> Option<&str> {
        self.source_account.as_deref()
    }

    fn checked_body(&self) -> Result<OperationBody, ValidationError> {
        let v = Validator::new(Self::KIND);
        if self.name.is_empty() || self.name.len() > MAX_DATA_LENGTH {
            return Err(v.error(
                "Name",
                format!("name must be between 1 and {MAX_DATA_LENGTH} bytes"),
            ));
        }
        if let Some(value) = &self.value {
            if value.len() > MAX_DATA_LENGTH {
                return Err(v.error(
                    "Value",
                    format!("value must be at most {MAX_DATA_LENGTH} bytes"),
                ));
            }
        }
        Ok(OperationBody::ManageData(xdr::ManageDataOp {
            data_name: self.name.clone(),
            data_value: self.value.clone(),
        }))
    }

    fn from_body(body: &OperationBody, source_account: Option<String>) -> Option<Self> {
        match body {
            OperationBody::ManageData(op) => Some(Self {
                name: op.data_name.clone(),
                value: op.data_value.clone(),
                source_account,
            }),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
