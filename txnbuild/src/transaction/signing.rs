//! Transaction signing.
//!
//! Signing is a separate step from building because the keys may not be
//! available at construction time. Every scheme appends one decorated
//! signature over the network-bound [`Transaction::hash`]; the transaction
//! body never changes.

use tracing::debug;

use super::builder::Transaction;
use super::error::{StateError, TransactionError};
use crate::config::{MAX_SIGNATURES, MAX_SIGNATURE_LENGTH};
use crate::crypto::hash::sha256_array;
use crate::crypto::keys::{hint_for, Keypair};
use crate::xdr::{DecoratedSignature, EncodeError};

impl Transaction {
    /// Signs with each keypair in order, appending one signature per key.
    ///
    /// An empty key list is allowed. A pre-authorized transaction, for
    /// example, is valid with no signatures at all. A batch that would take
    /// the envelope past [`MAX_SIGNATURES`] is rejected as a whole.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use txnbuild::account::SimpleAccount;
    /// use txnbuild::config::TEST_NETWORK_PASSPHRASE;
    /// use txnbuild::crypto::Keypair;
    /// use txnbuild::operation::Inflation;
    /// use txnbuild::transaction::{TimeBounds, TransactionBuilder};
    ///
    /// let kp = Keypair::random();
    /// let mut tx = TransactionBuilder::new(SimpleAccount::new(kp.address(), 1), TEST_NETWORK_PASSPHRASE)
    ///     .operation(Inflation::default())
    ///     .time_bounds(TimeBounds::timeout(300))
    ///     .build()
    ///     .unwrap();
    /// tx.sign(&[&kp]).unwrap();
    /// assert!(tx.is_signed());
    /// ```
    pub fn sign(&mut self, keypairs: &[&Keypair]) -> Result<(), TransactionError> {
        let hash = self.hash()?;
        let signatures: Vec<DecoratedSignature> =
            keypairs.iter().map(|kp| kp.sign_decorated(&hash)).collect();
        self.append_signatures(signatures)
    }

    /// Signs by revealing a hash-x preimage. The signature is the preimage
    /// itself and the hint comes from its SHA-256.
    pub fn sign_hash_x(&mut self, preimage: &[u8]) -> Result<(), TransactionError> {
        if preimage.len() > MAX_SIGNATURE_LENGTH {
            return Err(TransactionError::PreimageTooLong(preimage.len()));
        }
        self.envelope()?;
        let signature = DecoratedSignature {
            hint: hint_for(&sha256_array(preimage)),
            signature: preimage.to_vec(),
        };
        self.append_signatures(vec![signature])
    }

    /// Signs with `S...` secret seeds.
    pub fn sign_with_key_string(&mut self, seeds: &[&str]) -> Result<(), TransactionError> {
        let keypairs = seeds
            .iter()
            .map(|seed| Keypair::from_seed(seed))
            .collect::<Result<Vec<_>, _>>()?;
        let refs: Vec<&Keypair> = keypairs.iter().collect();
        self.sign(&refs)
    }

    /// Builds, signs and returns the base64 envelope in one go.
    pub fn build_sign_encode(&mut self, keypairs: &[&Keypair]) -> Result<String, TransactionError> {
        self.build()?;
        self.sign(keypairs)?;
        self.base64()
    }

    fn append_signatures(
        &mut self,
        signatures: Vec<DecoratedSignature>,
    ) -> Result<(), TransactionError> {
        let env = self.envelope.as_mut().ok_or(StateError::NotBuilt)?;
        let added = signatures.len();
        let total = env.signatures.len() + added;
        if total > MAX_SIGNATURES {
            return Err(EncodeError::TooLong {
                what: "signatures",
                len: total,
                max: MAX_SIGNATURES,
            }
            .into());
        }
        env.signatures.extend(signatures);
        debug!(
            added,
            total = env.signatures.len(),
            "signed transaction"
        );
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::SimpleAccount;
    use crate::config::TEST_NETWORK_PASSPHRASE;
    use crate::operation::Inflation;
    use crate::transaction::{TimeBounds, TransactionBuilder};

    const SEED0: &str = "SBPQUZ6G4FZNWFHKUWC5BEYWF6R52E3SEP7R3GWYSM2XTKGF5LNTWW4R";
    const SEED1: &str = "SBMSVD4KKELKGZXHBUQTIROWUAPQASDX7KEJITARP4VMZ6KLUHOGPTYW";

    fn built() -> Transaction {
        let kp = Keypair::from_seed(SEED0).unwrap();
        TransactionBuilder::new(SimpleAccount::new(kp.address(), 1), TEST_NETWORK_PASSPHRASE)
            .operation(Inflation::default())
            .time_bounds(TimeBounds::infinite())
            .build()
            .unwrap()
    }

    #[test]
    fn sign_appends_in_order_with_hints() {
        let kp0 = Keypair::from_seed(SEED0).unwrap();
        let kp1 = Keypair::from_seed(SEED1).unwrap();
        let mut tx = built();
        tx.sign(&[&kp0, &kp1]).unwrap();

        let sigs = tx.signatures();
        assert_eq!(sigs.len(), 2);
        assert_eq!(sigs[0].hint, [0xea, 0x2e, 0x72, 0xc5]);
        assert_eq!(sigs[1].hint, [0xd2, 0x87, 0x64, 0x7e]);
        let hash = tx.hash().unwrap();
        assert!(kp0.verify(&hash, &sigs[0].signature));
        assert!(kp1.verify(&hash, &sigs[1].signature));
    }

    #[test]
    fn signing_does_not_change_hash() {
        let mut tx = built();
        let before = tx.hash().unwrap();
        tx.sign_with_key_string(&[SEED0]).unwrap();
        assert_eq!(tx.hash().unwrap(), before);
    }

    #[test]
    fn sign_before_build_fails() {
        let kp = Keypair::from_seed(SEED0).unwrap();
        let mut tx = TransactionBuilder::new(SimpleAccount::new(kp.address(), 1), TEST_NETWORK_PASSPHRASE)
            .operation(Inflation::default())
            .time_bounds(TimeBounds::infinite())
            .finish();
        assert_eq!(
            tx.sign(&[&kp]).unwrap_err(),
            TransactionError::State(StateError::NotBuilt)
        );
        assert_eq!(
            tx.sign_hash_x(b"x").unwrap_err(),
            TransactionError::State(StateError::NotBuilt)
        );
    }

    #[test]
    fn rebuild_after_sign_fails() {
        let mut tx = built();
        tx.sign_with_key_string(&[SEED0]).unwrap();
        let err = tx.build().unwrap_err();
        assert_eq!(
            err.to_string(),
            "transaction has already been signed, so cannot be rebuilt."
        );
    }

    #[test]
    fn empty_key_list_is_allowed() {
        let mut tx = built();
        tx.sign(&[]).unwrap();
        assert!(tx.signatures().is_empty());
        assert!(tx.base64().is_ok());
    }

    #[test]
    fn hash_x_signature_is_preimage() {
        let preimage = b"this is a preimage for hashx transactions on the stellar network";
        assert_eq!(preimage.len(), 64);
        let mut tx = built();
        tx.sign_hash_x(preimage).unwrap();
        let sig = &tx.signatures()[0];
        assert_eq!(sig.signature, preimage.to_vec());
        assert_eq!(sig.hint, hint_for(&sha256_array(preimage)));
    }

    #[test]
    fn hash_x_preimage_limit() {
        let mut tx = built();
        assert_eq!(
            tx.sign_hash_x(&[0u8; 65]).unwrap_err(),
            TransactionError::PreimageTooLong(65)
        );
    }

    #[test]
    fn bad_seed_rejected() {
        let mut tx = built();
        assert!(matches!(
            tx.sign_with_key_string(&["SBAD"]),
            Err(TransactionError::Key(_))
        ));
        assert!(tx.signatures().is_empty());
    }

    #[test]
    fn signature_limit_enforced_at_sign_time() {
        let kp = Keypair::from_seed(SEED0).unwrap();
        let mut tx = built();
        let twenty: Vec<&Keypair> = std::iter::repeat(&kp).take(20).collect();
        tx.sign(&twenty).unwrap();
        let before = tx.signatures().to_vec();

        assert_eq!(
            tx.sign(&[&kp]).unwrap_err(),
            TransactionError::Encode(EncodeError::TooLong {
                what: "signatures",
                len: 21,
                max: 20,
            })
        );
        assert!(matches!(
            tx.sign_hash_x(b"x"),
            Err(TransactionError::Encode(EncodeError::TooLong { .. }))
        ));
        assert_eq!(tx.signatures(), before.as_slice());
        assert!(tx.base64().is_ok());
    }

    #[test]
    fn oversized_batch_is_rejected_whole() {
        let kp = Keypair::from_seed(SEED0).unwrap();
        let mut tx = built();
        let keys: Vec<&Keypair> = std::iter::repeat(&kp).take(21).collect();
        assert!(tx.sign(&keys).is_err());
        assert!(tx.signatures().is_empty());
    }
}
