//! # Amounts & Prices
//!
//! Amounts travel as decimal strings with up to seven fractional digits and
//! are stored on the wire as `i64` stroops (10,000,000 stroops = 1 unit).
//! Integer arithmetic only. No floating point anywhere near money.
//!
//! Prices travel as decimal strings too, but on the wire they are a fraction
//! `n / d` of two `i32`s. [`parse_price`] finds the best such fraction with a
//! continued-fraction expansion; [`format_price`] goes the other way.

use thiserror::Error;

use crate::config::{AMOUNT_DECIMALS, STROOPS_PER_UNIT};
use crate::xdr::Price;

/// Errors from parsing amounts and prices.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountError {
    #[error("invalid amount format: {0:?}")]
    InvalidFormat(String),

    #[error("invalid amount format: {0:?} has more than 7 decimal places")]
    TooPrecise(String),

    #[error("invalid amount format: {0:?} is out of range")]
    OutOfRange(String),

    #[error("invalid price {input:?}: {reason}")]
    InvalidPrice { input: String, reason: &'static str },
}

/// A decimal string split into sign, integer digits and fraction digits.
struct Decimal<'a> {
    negative: bool,
    whole: &'a str,
    frac: &'a str,
}

fn split_decimal(s: &str) -> Option<Decimal<'_>> {
    let (negative, rest) = match s.as_bytes().first()? {
        b'-' => (true, &s[1..]),
        b'+' => (false, &s[1..]),
        _ => (false, s),
    };
    let (whole, frac) = match rest.split_once('.') {
        Some((w, f)) => (w, f),
        None => (rest, ""),
    };
    if whole.is_empty() && frac.is_empty() {
        return None;
    }
    let digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
    if !digits(whole) || !digits(frac) {
        return None;
    }
    Some(Decimal {
        negative,
        whole,
        frac,
    })
}

/// Parses a decimal amount into stroops.
///
/// Extra fractional digits are accepted only when they are zeros, so
/// `"1.00000000"` parses but `"1.00000001"` does not.
pub fn parse_amount(s: &str) -> Result<i64, AmountError> {
    let dec = split_decimal(s).ok_or_else(|| AmountError::InvalidFormat(s.to_string()))?;

    let (kept, dropped) = dec.frac.split_at(dec.frac.len().min(AMOUNT_DECIMALS));
    if dropped.bytes().any(|b| b != b'0') {
        return Err(AmountError::TooPrecise(s.to_string()));
    }

    let out_of_range = || AmountError::OutOfRange(s.to_string());
    let mut stroops: i128 = 0;
    for b in dec.whole.bytes() {
        stroops = stroops
            .checked_mul(10)
            .and_then(|v| v.checked_add(i128::from(b - b'0')))
            .ok_or_else(out_of_range)?;
    }
    let mut frac: i128 = 0;
    for b in kept.bytes() {
        frac = frac * 10 + i128::from(b - b'0');
    }
    for _ in kept.len()..AMOUNT_DECIMALS {
        frac *= 10;
    }
    stroops = stroops
        .checked_mul(i128::from(STROOPS_PER_UNIT))
        .and_then(|v| v.checked_add(frac))
        .ok_or_else(out_of_range)?;
    if dec.negative {
        stroops = -stroops;
    }
    i64::try_from(stroops).map_err(|_| out_of_range())
}

/// Formats stroops as a decimal string with exactly seven fractional digits.
pub fn format_amount(stroops: i64) -> String {
    let sign = if stroops < 0 { "-" } else { "" };
    let abs = i128::from(stroops).abs();
    let unit = i128::from(STROOPS_PER_UNIT);
    format!(
        "{}{}.{:0width$}",
        sign,
        abs / unit,
        abs % unit,
        width = AMOUNT_DECIMALS
    )
}

// ---------------------------------------------------------------------------
// Prices
// ---------------------------------------------------------------------------

/// Fraction digits beyond this are not representable in the `u128` working
/// values and are rejected.
const MAX_PRICE_FRACTION_DIGITS: usize = 30;

/// Parses a decimal price into the closest `n / d` with both terms in
/// `1..=i32::MAX`, using a continued-fraction expansion.
pub fn parse_price(s: &str) -> Result<Price, AmountError> {
    let invalid = |reason| AmountError::InvalidPrice {
        input: s.to_string(),
        reason,
    };
    let dec = split_decimal(s).ok_or_else(|| invalid("not a decimal number"))?;
    if dec.negative {
        return Err(invalid("price can not be negative"));
    }
    if dec.frac.len() > MAX_PRICE_FRACTION_DIGITS {
        return Err(invalid("too many decimal places"));
    }

    // number = p / q, exact
    let mut q: u128 = 10u128.pow(dec.frac.len() as u32);
    let mut p: u128 = 0;
    for b in dec.whole.bytes().chain(dec.frac.bytes()) {
        p = p
            .checked_mul(10)
            .and_then(|v| v.checked_add(u128::from(b - b'0')))
            .ok_or_else(|| invalid("price is too large"))?;
    }

    let max = i32::MAX as u128;
    // convergents h/k, seeded with 0/1 and 1/0
    let (mut h2, mut k2): (u128, u128) = (0, 1);
    let (mut h1, mut k1): (u128, u128) = (1, 0);
    loop {
        if matches!(max.checked_mul(q), Some(limit) if p > limit) {
            break;
        }
        let a = p / q;
        let rem = p % q;
        let h = a * h1 + h2;
        let k = a * k1 + k2;
        if h > max || k > max {
            break;
        }
        (h2, k2, h1, k1) = (h1, k1, h, k);
        if rem == 0 {
            break;
        }
        p = q;
        q = rem;
    }

    if h1 == 0 || k1 == 0 {
        return Err(invalid("couldn't find approximation"));
    }
    Ok(Price {
        n: h1 as i32,
        d: k1 as i32,
    })
}

/// Formats a wire price as a decimal string with seven fractional digits,
/// rounded to nearest.
pub fn format_price(price: &Price) -> String {
    if price.d == 0 {
        return format_amount(0);
    }
    let unit = i128::from(STROOPS_PER_UNIT);
    let n = i128::from(price.n) * unit;
    let d = i128::from(price.d);
    let scaled = (2 * n + d) / (2 * d);
    format_amount(scaled as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MAX_AMOUNT;

    #[test]
    fn parses_whole_and_fractional_amounts() {
        assert_eq!(parse_amount("10").unwrap(), 100_000_000);
        assert_eq!(parse_amount("874.0000000").unwrap(), 8_740_000_000);
        assert_eq!(parse_amount("0.0000001").unwrap(), 1);
        assert_eq!(parse_amount(".5").unwrap(), 5_000_000);
        assert_eq!(parse_amount("0").unwrap(), 0);
    }

    #[test]
    fn parses_max_amount() {
        assert_eq!(parse_amount(MAX_AMOUNT).unwrap(), i64::MAX);
    }

    #[test]
    fn negative_amounts_parse() {
        assert_eq!(parse_amount("-1").unwrap(), -10_000_000);
    }

    #[test]
    fn rejects_garbage() {
        for bad in ["", "abc", "1.2.3", "1e7", "--1", "."] {
            assert!(
                matches!(parse_amount(bad), Err(AmountError::InvalidFormat(_))),
                "{bad:?} should not parse"
            );
        }
    }

    #[test]
    fn error_text_mentions_format() {
        let err = parse_amount("ten").unwrap_err();
        assert!(err.to_string().starts_with("invalid amount format"));
    }

    #[test]
    fn rejects_eighth_decimal() {
        assert!(matches!(
            parse_amount("1.00000001"),
            Err(AmountError::TooPrecise(_))
        ));
        assert_eq!(parse_amount("1.00000000").unwrap(), 10_000_000);
    }

    #[test]
    fn rejects_overflow() {
        assert!(matches!(
            parse_amount("922337203685.4775808"),
            Err(AmountError::OutOfRange(_))
        ));
    }

    #[test]
    fn formats_with_seven_decimals() {
        assert_eq!(format_amount(100_000_000), "10.0000000");
        assert_eq!(format_amount(1), "0.0000001");
        assert_eq!(format_amount(i64::MAX), MAX_AMOUNT);
        assert_eq!(format_amount(-5_000_000), "-0.5000000");
    }

    #[test]
    fn price_fractions() {
        assert_eq!(parse_price("0.01").unwrap(), Price { n: 1, d: 100 });
        assert_eq!(parse_price("0.02").unwrap(), Price { n: 1, d: 50 });
        assert_eq!(parse_price("1.0").unwrap(), Price { n: 1, d: 1 });
        assert_eq!(parse_price("5").unwrap(), Price { n: 5, d: 1 });
        assert_eq!(parse_price("0.5").unwrap(), Price { n: 1, d: 2 });
        assert_eq!(parse_price("1.25").unwrap(), Price { n: 5, d: 4 });
    }

    #[test]
    fn zero_price_has_no_approximation() {
        assert!(parse_price("0").is_err());
    }

    #[test]
    fn price_above_i32_max_is_rejected() {
        assert!(parse_price("2147483648").is_err());
        assert_eq!(
            parse_price("2147483647").unwrap(),
            Price {
                n: i32::MAX,
                d: 1
            }
        );
    }

    #[test]
    fn negative_price_is_rejected() {
        assert!(parse_price("-1").is_err());
    }

    #[test]
    fn formats_prices() {
        assert_eq!(format_price(&Price { n: 5, d: 1 }), "5.0000000");
        assert_eq!(format_price(&Price { n: 1, d: 2 }), "0.5000000");
        assert_eq!(format_price(&Price { n: 3, d: 5 }), "0.6000000");
        assert_eq!(format_price(&Price { n: 1, d: 3 }), "0.3333333");
        assert_eq!(format_price(&Price { n: 2, d: 3 }), "0.6666667");
    }
}
