//! # Protocol Configuration & Constants
//!
//! Network passphrases, wire limits and defaults. Anything the ledger would
//! reject if it changed lives here, so keep it in one place.

use std::time::Duration;

// ---------------------------------------------------------------------------
// Network Passphrases
// ---------------------------------------------------------------------------

/// Passphrase of the public production network.
pub const PUBLIC_NETWORK_PASSPHRASE: &str = "Public Global Stellar Network ; September 2015";

/// Passphrase of the public test network.
pub const TEST_NETWORK_PASSPHRASE: &str = "Test SDF Network ; September 2015";

/// Resolves a short network name (`public`, `test`) to its passphrase.
///
/// Any other input is treated as a custom passphrase and returned as-is,
/// which is what private networks and standalone test setups need.
pub fn network_passphrase(name: &str) -> &str {
    match name.to_ascii_lowercase().as_str() {
        "public" | "pubnet" | "mainnet" => PUBLIC_NETWORK_PASSPHRASE,
        "test" | "testnet" => TEST_NETWORK_PASSPHRASE,
        _ => name,
    }
}

// ---------------------------------------------------------------------------
// Envelope & Transaction Limits
// ---------------------------------------------------------------------------

/// Envelope type tag mixed into the signature payload (`ENVELOPE_TYPE_TX`).
pub const ENVELOPE_TYPE_TX: i32 = 2;

/// Base fee per operation in stroops when the caller does not set one.
pub const DEFAULT_BASE_FEE: u32 = 100;

/// Maximum number of operations in one transaction.
pub const MAX_OPERATIONS: usize = 100;

/// Maximum number of decorated signatures on an envelope.
pub const MAX_SIGNATURES: usize = 20;

/// Maximum size of a signature (or hash-x preimage) in bytes.
pub const MAX_SIGNATURE_LENGTH: usize = 64;

/// Maximum number of intermediate assets in a path payment.
pub const MAX_PATH_LENGTH: usize = 5;

/// Maximum memo text length in bytes.
pub const MAX_MEMO_TEXT_LENGTH: usize = 28;

/// Maximum home domain length in bytes.
pub const MAX_HOME_DOMAIN_LENGTH: usize = 32;

/// Maximum data entry name and value length in bytes.
pub const MAX_DATA_LENGTH: usize = 64;

// ---------------------------------------------------------------------------
// Amounts
// ---------------------------------------------------------------------------

/// Stroops per whole unit. Amounts carry seven decimal places.
pub const STROOPS_PER_UNIT: i64 = 10_000_000;

/// Decimal places in an amount string.
pub const AMOUNT_DECIMALS: usize = 7;

/// Largest representable amount, `i64::MAX` stroops.
pub const MAX_AMOUNT: &str = "922337203685.4775807";

// ---------------------------------------------------------------------------
// Challenge Protocol
// ---------------------------------------------------------------------------

/// Raw nonce size in the challenge's manage data value.
pub const CHALLENGE_NONCE_BYTES: usize = 48;

/// Base64 length of the nonce. 48 bytes encode to 64 characters.
pub const CHALLENGE_NONCE_BASE64_LENGTH: usize = 64;

/// Fee used for challenge transactions. They are never submitted.
pub const CHALLENGE_BASE_FEE: u32 = 100;

/// Suggested validity window for challenges.
pub const RECOMMENDED_CHALLENGE_TIMEOUT: Duration = Duration::from_secs(300);

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_names_resolve() {
        assert_eq!(network_passphrase("test"), TEST_NETWORK_PASSPHRASE);
        assert_eq!(network_passphrase("PUBLIC"), PUBLIC_NETWORK_PASSPHRASE);
        let custom = "Standalone Network ; February 2017";
        assert_eq!(network_passphrase(custom), custom);
    }

    #[test]
    fn test_max_amount_matches_i64_max() {
        let whole = i64::MAX / STROOPS_PER_UNIT;
        let frac = i64::MAX % STROOPS_PER_UNIT;
        assert_eq!(format!("{}.{:07}", whole, frac), MAX_AMOUNT);
    }

    #[test]
    fn test_nonce_sizes_agree() {
        // 48 raw bytes are exactly 16 base64 quanta of 4 characters.
        assert_eq!(CHALLENGE_NONCE_BYTES / 3 * 4, CHALLENGE_NONCE_BASE64_LENGTH);
    }

    #[test]
    fn test_limits_sanity() {
        assert!(MAX_OPERATIONS > 0);
        assert!(MAX_SIGNATURES > 0);
        assert!(DEFAULT_BASE_FEE > 0);
        assert_eq!(ENVELOPE_TYPE_TX, 2);
    }
}
