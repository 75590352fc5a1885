//! # Accounts
//!
//! The transaction assembler needs exactly three things from a source
//! account: its address, its current sequence number, and a way to consume
//! the next one. [`Account`] is that capability; [`SimpleAccount`] is the
//! in-memory implementation used when the caller already knows the sequence
//! (typically fetched from a ledger API out of band).

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccountError {
    #[error("sequence number overflow for account {0}")]
    SequenceOverflow(String),
}

/// Source of sequence numbers for a transaction.
pub trait Account {
    /// `G...` address.
    fn account_id(&self) -> &str;

    /// Current sequence number, i.e. the last one consumed on the ledger.
    fn sequence_number(&self) -> i64;

    /// Advances the sequence by one and returns the new value.
    fn increment_sequence_number(&mut self) -> Result<i64, AccountError>;

    /// Next sequence number without consuming it.
    fn next_sequence_number(&self) -> Result<i64, AccountError> {
        self.sequence_number()
            .checked_add(1)
            .ok_or_else(|| AccountError::SequenceOverflow(self.account_id().to_string()))
    }
}

/// An account identified by address with a locally tracked sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimpleAccount {
    pub account_id: String,
    pub sequence: i64,
}

impl SimpleAccount {
    pub fn new(account_id: impl Into<String>, sequence: i64) -> Self {
        Self {
            account_id: account_id.into(),
            sequence,
        }
    }
}

impl Account for SimpleAccount {
    fn account_id(&self) -> &str {
        &self.account_id
    }

    fn sequence_number(&self) -> i64 {
        self.sequence
    }

    fn increment_sequence_number(&mut self) -> Result<i64, AccountError> {
        self.sequence = self.next_sequence_number()?;
        Ok(self.sequence)
    }
}
