//! Transaction assembly via the builder pattern.
//!
//! A [`Transaction`] starts unbuilt: a source account, a list of operations
//! and some parameters. [`Transaction::build`] validates everything, consumes
//! the next sequence number and produces the wire envelope. Signing happens
//! in [`super::signing`] and is only possible once built.

use tracing::debug;

use super::error::{StateError, TransactionError};
use super::types::{Memo, TimeBounds};
use crate::account::{Account, SimpleAccount};
use crate::asset::account_address;
use crate::config::{DEFAULT_BASE_FEE, MAX_OPERATIONS};
use crate::crypto::hash::{network_id, sha256_array};
use crate::crypto::keys::decode_address;
use crate::operation::Operation;
use crate::xdr::{self, ReadXdr, WriteXdr};

// ---------------------------------------------------------------------------
// Transaction
// ---------------------------------------------------------------------------

/// A transaction and, once built, its wire envelope.
///
/// The transaction owns its source account. Building advances that
/// account's sequence by one; read it back with
/// [`source_account`](Self::source_account) to persist the new value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    source_account: SimpleAccount,
    operations: Vec<Operation>,
    base_fee: u32,
    memo: Option<Memo>,
    time_bounds: Option<TimeBounds>,
    network_passphrase: String,
    pub(super) envelope: Option<xdr::TransactionEnvelope>,
}

impl Transaction {
    pub fn source_account(&self) -> &SimpleAccount {
        &self.source_account
    }

    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    /// Per-operation fee. 0 means the default of 100 is applied at build.
    pub fn base_fee(&self) -> u32 {
        self.base_fee
    }

    pub fn memo(&self) -> Option<&Memo> {
        self.memo.as_ref()
    }

    pub fn time_bounds(&self) -> Option<&TimeBounds> {
        self.time_bounds.as_ref()
    }

    pub fn network_passphrase(&self) -> &str {
        &self.network_passphrase
    }

    pub fn is_built(&self) -> bool {
        self.envelope.is_some()
    }

    pub fn is_signed(&self) -> bool {
        self.envelope
            .as_ref()
            .is_some_and(|env| !env.signatures.is_empty())
    }

    /// Total fee in stroops, or 0 before the transaction is built.
    pub fn transaction_fee(&self) -> u32 {
        self.envelope.as_ref().map_or(0, |env| env.tx.fee)
    }

    /// Sequence number consumed by the built transaction.
    pub fn sequence_number(&self) -> Option<i64> {
        self.envelope.as_ref().map(|env| env.tx.seq_num)
    }

    /// Builds the wire envelope and returns the consumed sequence number.
    ///
    /// Runs again on an unsigned transaction, consuming another sequence
    /// number. Fails on a signed one. Nothing changes if any step fails.
    ///
    /// 1. Source address must decode.
    /// 2. Next sequence number is computed (committed only at the end).
    /// 3. Each operation is validated and encoded, in order.
    /// 4. Time bounds must be present and consistent; memo must fit.
    /// 5. fee = base_fee x operation count, checked for overflow.
    pub fn build(&mut self) -> Result<i64, TransactionError> {
        if self.is_signed() {
            return Err(StateError::AlreadySigned.into());
        }

        // 1.
        let source = xdr::PublicKey::Ed25519(decode_address(self.source_account.account_id())?);

        // 2.
        let seq_num = self.source_account.next_sequence_number()?;

        // 3.
        if self.operations.is_empty() {
            return Err(TransactionError::NoOperations);
        }
        if self.operations.len() > MAX_OPERATIONS {
            return Err(TransactionError::TooManyOperations(self.operations.len()));
        }
        let operations = self
            .operations
            .iter()
            .map(Operation::to_xdr)
            .collect::<Result<Vec<_>, _>>()?;

        // 4.
        let time_bounds = self
            .time_bounds
            .as_ref()
            .ok_or(TransactionError::InvalidTimeBounds(
                "transaction requires timebounds",
            ))?
            .to_xdr()?;
        if let Some(memo) = &self.memo {
            memo.validate()?;
        }

        // 5.
        let base_fee = if self.base_fee == 0 {
            DEFAULT_BASE_FEE
        } else {
            self.base_fee
        };
        let fee = u32::try_from(operations.len())
            .ok()
            .and_then(|count| base_fee.checked_mul(count))
            .ok_or(TransactionError::FeeOverflow {
                base_fee,
                op_count: operations.len(),
            })?;

        let tx = xdr::Transaction {
            source_account: source,
            fee,
            seq_num,
            time_bounds: Some(time_bounds),
            memo: Memo::to_xdr(self.memo.as_ref()),
            operations,
        };

        self.source_account.increment_sequence_number()?;
        self.base_fee = base_fee;
        self.envelope = Some(xdr::TransactionEnvelope {
            tx,
            signatures: Vec::new(),
        });

        debug!(
            source = %self.source_account.account_id,
            sequence = seq_num,
            fee,
            op_count = self.operations.len(),
            "built transaction"
        );
        Ok(seq_num)
    }

    /// The built envelope.
    pub fn envelope(&self) -> Result<&xdr::TransactionEnvelope, StateError> {
        self.envelope.as_ref().ok_or(StateError::NotBuilt)
    }

    pub fn signatures(&self) -> &[xdr::DecoratedSignature] {
        self.envelope
            .as_ref()
            .map_or(&[], |env| env.signatures.as_slice())
    }

    /// Network-bound hash that signers sign:
    /// `SHA256(SHA256(passphrase) || ENVELOPE_TYPE_TX || tx)`.
    pub fn hash(&self) -> Result<[u8; 32], TransactionError> {
        let env = self.envelope()?;
        if self.network_passphrase.is_empty() {
            return Err(StateError::EmptyNetwork.into());
        }
        let payload = xdr::TransactionSignaturePayload {
            network_id: network_id(&self.network_passphrase),
            tx: &env.tx,
        };
        Ok(sha256_array(&payload.to_xdr_bytes()?))
    }

    pub fn hash_hex(&self) -> Result<String, TransactionError> {
        Ok(hex::encode(self.hash()?))
    }

    /// Envelope bytes, signatures included.
    pub fn to_xdr_bytes(&self) -> Result<Vec<u8>, TransactionError> {
        Ok(self.envelope()?.to_xdr_bytes()?)
    }

    /// Envelope as standard base64, ready for submission.
    pub fn base64(&self) -> Result<String, TransactionError> {
        Ok(self.envelope()?.to_xdr_base64()?)
    }

    /// Reconstructs a built transaction from a base64 envelope.
    ///
    /// The base fee is recovered as `fee / operation count`, so a fee that
    /// was not an exact multiple loses its remainder if rebuilt.
    pub fn from_base64(envelope: &str, network_passphrase: &str) -> Result<Self, TransactionError> {
        let env = xdr::TransactionEnvelope::from_xdr_base64(envelope)?;
        Self::from_envelope(env, network_passphrase)
    }

    pub fn from_envelope(
        env: xdr::TransactionEnvelope,
        network_passphrase: &str,
    ) -> Result<Self, TransactionError> {
        let operations = env
            .tx
            .operations
            .iter()
            .map(Operation::from_xdr)
            .collect::<Result<Vec<_>, _>>()?;
        let op_count = u32::try_from(operations.len()).unwrap_or(u32::MAX).max(1);

        let tx = Self {
            source_account: SimpleAccount::new(
                account_address(&env.tx.source_account),
                env.tx.seq_num,
            ),
            operations,
            base_fee: env.tx.fee / op_count,
            memo: Memo::from_xdr(&env.tx.memo),
            time_bounds: env.tx.time_bounds.as_ref().map(TimeBounds::from_xdr),
            network_passphrase: network_passphrase.to_string(),
            envelope: Some(env),
        };
        debug!(
            source = %tx.source_account.account_id,
            sequence = tx.source_account.sequence,
            signatures = tx.signatures().len(),
            "decoded transaction"
        );
        Ok(tx)
    }
}

// ---------------------------------------------------------------------------
// TransactionBuilder
// ---------------------------------------------------------------------------

/// Fluent builder for [`Transaction`].
///
/// # Usage
///
/// ```rust,no_run
/// use txnbuild::account::SimpleAccount;
/// use txnbuild::asset::Asset;
/// use txnbuild::config::TEST_NETWORK_PASSPHRASE;
/// use txnbuild::operation::Payment;
/// use txnbuild::transaction::{TimeBounds, TransactionBuilder};
///
/// let source = SimpleAccount::new("GDQNY3PBOJOKYZSRMK2S7LHHGWZIUISD4QORETLMXEWXBI7KFZZMKTL3", 9605939170639897);
/// let tx = TransactionBuilder::new(source, TEST_NETWORK_PASSPHRASE)
///     .operation(Payment::new(
///         "GB7BDSZU2Y27LYNLALKKALB52WS2IZWYBDGY6EQBLEED3TJOCVMZRH7H",
///         "10",
///         Asset::Native,
///     ))
///     .time_bounds(TimeBounds::timeout(300))
///     .build()
///     .unwrap();
/// assert_eq!(tx.transaction_fee(), 100);
/// ```
#[derive(Debug, Clone)]
pub struct TransactionBuilder {
    tx: Transaction,
}

impl TransactionBuilder {
    pub fn new(source_account: SimpleAccount, network_passphrase: impl Into<String>) -> Self {
        Self {
            tx: Transaction {
                source_account,
                operations: Vec::new(),
                base_fee: 0,
                memo: None,
                time_bounds: None,
                network_passphrase: network_passphrase.into(),
                envelope: None,
            },
        }
    }

    pub fn operation(mut self, op: impl Into<Operation>) -> Self {
        self.tx.operations.push(op.into());
        self
    }

    pub fn operations(mut self, ops: impl IntoIterator<Item = Operation>) -> Self {
        self.tx.operations.extend(ops);
        self
    }

    /// Per-operation fee in stroops.
    pub fn base_fee(mut self, base_fee: u32) -> Self {
        self.tx.base_fee = base_fee;
        self
    }

    pub fn memo(mut self, memo: Memo) -> Self {
        self.tx.memo = Some(memo);
        self
    }

    pub fn time_bounds(mut self, time_bounds: TimeBounds) -> Self {
        self.tx.time_bounds = Some(time_bounds);
        self
    }

    /// The unbuilt transaction.
    pub fn finish(self) -> Transaction {
        self.tx
    }

    /// Builds the transaction.
    pub fn build(self) -> Result<Transaction, TransactionError> {
        let mut tx = self.tx;
        tx.build()?;
        Ok(tx)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
