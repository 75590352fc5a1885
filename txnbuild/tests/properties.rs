//! Property tests for the arithmetic and text encodings that every envelope
//! depends on.

use proptest::prelude::*;

use txnbuild::amount::{format_amount, parse_amount, parse_price};
use txnbuild::config::TEST_NETWORK_PASSPHRASE;
use txnbuild::strkey;
use txnbuild::{Asset, AssetType, Inflation, Operation, SimpleAccount, TimeBounds, TransactionBuilder};

const ISSUER: &str = "GDQNY3PBOJOKYZSRMK2S7LHHGWZIUISD4QORETLMXEWXBI7KFZZMKTL3";
const BASE32: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ234567";

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn amounts_survive_formatting(stroops in any::<i64>()) {
        let text = format_amount(stroops);
        prop_assert_eq!(text.split_once('.').map(|(_, frac)| frac.len()), Some(7));
        prop_assert_eq!(parse_amount(&text).unwrap(), stroops);
    }

    #[test]
    fn whole_prices_are_exact(k in 1i32..=i32::MAX) {
        let price = parse_price(&k.to_string()).unwrap();
        prop_assert_eq!((price.n, price.d), (k, 1));
    }

    #[test]
    fn asset_category_follows_code_length(code in "[A-Za-z0-9]{1,16}") {
        let asset = Asset::credit(code.clone(), ISSUER);
        match code.len() {
            1..=4 => prop_assert_eq!(asset.asset_type().unwrap(), AssetType::CreditAlphanum4),
            5..=12 => prop_assert_eq!(asset.asset_type().unwrap(), AssetType::CreditAlphanum12),
            _ => {
                prop_assert!(asset.asset_type().is_err());
                return Ok(());
            }
        }
        let back = Asset::from_xdr(&asset.to_xdr().unwrap());
        prop_assert_eq!(back.code(), code.as_str());
        prop_assert_eq!(back.issuer(), ISSUER);
    }

    #[test]
    fn fee_is_base_fee_times_operations(base_fee in 1u32..=100_000, op_count in 1usize..=100) {
        let ops: Vec<Operation> = (0..op_count).map(|_| Inflation::default().into()).collect();
        let tx = TransactionBuilder::new(SimpleAccount::new(ISSUER, 1), TEST_NETWORK_PASSPHRASE)
            .operations(ops)
            .base_fee(base_fee)
            .time_bounds(TimeBounds::infinite())
            .build()
            .unwrap();
        prop_assert_eq!(u64::from(tx.transaction_fee()), u64::from(base_fee) * op_count as u64);
        prop_assert_eq!(tx.sequence_number(), Some(2));
    }

    #[test]
    fn strkey_detects_any_single_character_change(
        key in prop::array::uniform32(any::<u8>()),
        pos in 0usize..56,
        replacement in 0usize..32,
    ) {
        let address = strkey::encode_account_id(&key);
        prop_assert_eq!(strkey::decode_account_id(&address).unwrap(), key);

        let mut bytes = address.into_bytes();
        prop_assume!(bytes[pos] != BASE32[replacement]);
        bytes[pos] = BASE32[replacement];
        let mutated = String::from_utf8(bytes).unwrap();
        prop_assert!(strkey::decode_account_id(&mutated).is_err());
    }
}
