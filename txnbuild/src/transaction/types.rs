//! Value types attached to a transaction: memo and time bounds.
//!
//! Both are small and `Copy`-friendly (apart from text memos) and convert
//! directly to their wire form.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::error::TransactionError;
use crate::config::MAX_MEMO_TEXT_LENGTH;
use crate::xdr::{self, EncodeError};

// ---------------------------------------------------------------------------
// Memo
// ---------------------------------------------------------------------------

/// Extra data attached to a transaction, typically used by the receiver to
/// route a payment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Memo {
    /// Up to 28 bytes of UTF-8.
    Text(String),
    /// Text memo whose bytes are not valid UTF-8. Only produced by decoding;
    /// kept so the envelope re-encodes unchanged.
    #[serde(with = "hex_bytes")]
    RawText(Vec<u8>),
    Id(u64),
    #[serde(with = "hex32")]
    Hash([u8; 32]),
    /// Hash of the transaction being refunded.
    #[serde(with = "hex32")]
    Return([u8; 32]),
}

impl Memo {
    pub fn text(text: impl Into<String>) -> Self {
        Memo::Text(text.into())
    }

    /// Checks limits the wire format enforces.
    pub fn validate(&self) -> Result<(), TransactionError> {
        match self {
            Memo::Text(text) => check_text_length(text.len()),
            Memo::RawText(bytes) => check_text_length(bytes.len()),
            _ => Ok(()),
        }
    }

    /// Wire memo; `None` becomes `MEMO_NONE`.
    pub fn to_xdr(memo: Option<&Memo>) -> xdr::Memo {
        match memo {
            None => xdr::Memo::None,
            Some(Memo::Text(t)) => xdr::Memo::Text(t.as_bytes().to_vec()),
            Some(Memo::RawText(b)) => xdr::Memo::Text(b.clone()),
            Some(Memo::Id(id)) => xdr::Memo::Id(*id),
            Some(Memo::Hash(h)) => xdr::Memo::Hash(*h),
            Some(Memo::Return(h)) => xdr::Memo::Return(*h),
        }
    }

    pub fn from_xdr(memo: &xdr::Memo) -> Option<Memo> {
        match memo {
            xdr::Memo::None => None,
            xdr::Memo::Text(b) => Some(match String::from_utf8(b.clone()) {
                Ok(text) => Memo::Text(text),
                Err(_) => Memo::RawText(b.clone()),
            }),
            xdr::Memo::Id(id) => Some(Memo::Id(*id)),
            xdr::Memo::Hash(h) => Some(Memo::Hash(*h)),
            xdr::Memo::Return(h) => Some(Memo::Return(*h)),
        }
    }
}

impl fmt::Display for Memo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(t) => write!(f, "text:{t}"),
            Self::RawText(b) => write!(f, "text:0x{}", hex::encode(b)),
            Self::Id(id) => write!(f, "id:{id}"),
            Self::Hash(h) => write!(f, "hash:{}", hex::encode(h)),
            Self::Return(h) => write!(f, "return:{}", hex::encode(h)),
        }
    }
}

fn check_text_length(len: usize) -> Result<(), TransactionError> {
    if len > MAX_MEMO_TEXT_LENGTH {
        return Err(EncodeError::TooLong {
            what: "memo text",
            len,
            max: MAX_MEMO_TEXT_LENGTH,
        }
        .into());
    }
    Ok(())
}

mod hex_bytes {
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&hex::encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(d)?;
        hex::decode(&s).map_err(D::Error::custom)
    }
}

mod hex32 {
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8; 32], s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&hex::encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<[u8; 32], D::Error> {
        let s = String::deserialize(d)?;
        let mut out = [0u8; 32];
        hex::decode_to_slice(&s, &mut out).map_err(D::Error::custom)?;
        Ok(out)
    }
}

// ---------------------------------------------------------------------------
// TimeBounds
// ---------------------------------------------------------------------------

/// Window, in unix seconds, in which a transaction is valid. A `max_time`
/// of 0 means no upper bound.
///
/// Fields are private: use [`TimeBounds::new`], [`TimeBounds::timeout`] or
/// [`TimeBounds::infinite`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawTimeBounds")]
pub struct TimeBounds {
    min_time: i64,
    max_time: i64,
}

#[derive(Deserialize)]
struct RawTimeBounds {
    min_time: i64,
    max_time: i64,
}

impl TryFrom<RawTimeBounds> for TimeBounds {
    type Error = TransactionError;

    fn try_from(raw: RawTimeBounds) -> Result<Self, Self::Error> {
        let tb = TimeBounds::new(raw.min_time, raw.max_time);
        tb.validate()?;
        Ok(tb)
    }
}

impl TimeBounds {
    pub fn new(min_time: i64, max_time: i64) -> Self {
        Self { min_time, max_time }
    }

    /// Valid from now-ish (no lower bound) until `seconds` from now.
    pub fn timeout(seconds: i64) -> Self {
        Self::new(0, Utc::now().timestamp().saturating_add(seconds))
    }

    /// Valid forever. Transactions built this way can sit around and be
    /// submitted much later, so prefer a timeout.
    pub fn infinite() -> Self {
        Self::new(0, 0)
    }

    pub fn min_time(&self) -> i64 {
        self.min_time
    }

    pub fn max_time(&self) -> i64 {
        self.max_time
    }

    pub fn is_unbounded(&self) -> bool {
        self.max_time == 0
    }

    /// Returns `true` if `now` falls inside the window.
    pub fn contains(&self, now: i64) -> bool {
        now >= self.min_time && (self.is_unbounded() || now <= self.max_time)
    }

    pub fn validate(&self) -> Result<(), TransactionError> {
        if self.min_time < 0 {
            return Err(TransactionError::InvalidTimeBounds("min_time can not be negative"));
        }
        if self.max_time < 0 {
            return Err(TransactionError::InvalidTimeBounds("max_time can not be negative"));
        }
        if !self.is_unbounded() && self.min_time > self.max_time {
            return Err(TransactionError::InvalidTimeBounds(
                "min_time can not be greater than max_time",
            ));
        }
        Ok(())
    }

    pub fn to_xdr(&self) -> Result<xdr::TimeBounds, TransactionError> {
        self.validate()?;
        // validate() guarantees both are non-negative
        Ok(xdr::TimeBounds {
            min_time: self.min_time.unsigned_abs(),
            max_time: self.max_time.unsigned_abs(),
        })
    }

    /// Wire values beyond `i64::MAX` saturate.
    pub fn from_xdr(tb: &xdr::TimeBounds) -> Self {
        let clamp = |t: u64| i64::try_from(t).unwrap_or(i64::MAX);
        Self::new(clamp(tb.min_time), clamp(tb.max_time))
    }
}

impl fmt::Display for TimeBounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_unbounded() {
            write!(f, "[{}, unbounded]", self.min_time)
        } else {
            write!(f, "[{}, {}]", self.min_time, self.max_time)
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memo_text_limit() {
        assert!(Memo::text("Twas brillig").validate().is_ok());
        assert!(Memo::text("x".repeat(28)).validate().is_ok());
        let err = Memo::text("x".repeat(29)).validate().unwrap_err();
        assert!(matches!(
            err,
            TransactionError::Encode(EncodeError::TooLong { len: 29, .. })
        ));
    }

    #[test]
    fn absent_memo_is_memo_none() {
        assert_eq!(Memo::to_xdr(None), xdr::Memo::None);
        assert_eq!(Memo::from_xdr(&xdr::Memo::None), None);
    }

    #[test]
    fn memo_wire_round_trip() {
        for memo in [
            Memo::text("newtx"),
            Memo::Id(314159),
            Memo::Hash([0x11; 32]),
            Memo::Return([0x22; 32]),
        ] {
            let wire = Memo::to_xdr(Some(&memo));
            assert_eq!(Memo::from_xdr(&wire), Some(memo));
        }
    }

    #[test]
    fn non_utf8_memo_text_is_kept_verbatim() {
        let wire = xdr::Memo::Text(vec![b'a', b'b', b'c', 0xff]);
        let memo = Memo::from_xdr(&wire).unwrap();
        assert_eq!(memo, Memo::RawText(vec![b'a', b'b', b'c', 0xff]));
        assert_eq!(Memo::to_xdr(Some(&memo)), wire);
        assert_eq!(memo.to_string(), "text:0x616263ff");
        assert!(Memo::RawText(vec![0xff; 29]).validate().is_err());
    }

    #[test]
    fn memo_hash_serializes_as_hex() {
        let json = serde_json::to_value(Memo::Hash([0xab; 32])).unwrap();
        assert_eq!(json["type"], "hash");
        assert_eq!(json["value"], "ab".repeat(32));
        let back: Memo = serde_json::from_value(json).unwrap();
        assert_eq!(back, Memo::Hash([0xab; 32]));
    }

    #[test]
    fn deserialized_timebounds_are_validated() {
        let tb: TimeBounds = serde_json::from_str(r#"{"min_time":10,"max_time":20}"#).unwrap();
        assert_eq!(tb, TimeBounds::new(10, 20));
        assert!(serde_json::from_str::<TimeBounds>(r#"{"min_time":20,"max_time":10}"#).is_err());
        assert!(serde_json::from_str::<TimeBounds>(r#"{"min_time":-1,"max_time":0}"#).is_err());
    }

    #[test]
    fn timebounds_validation() {
        assert!(TimeBounds::infinite().validate().is_ok());
        assert!(TimeBounds::new(10, 20).validate().is_ok());
        assert!(TimeBounds::new(10, 0).validate().is_ok());
        assert!(TimeBounds::new(20, 10).validate().is_err());
        assert!(TimeBounds::new(-1, 10).validate().is_err());
        assert!(TimeBounds::new(0, -1).validate().is_err());
    }

    #[test]
    fn timeout_sets_upper_bound_only() {
        let now = Utc::now().timestamp();
        let tb = TimeBounds::timeout(300);
        assert_eq!(tb.min_time(), 0);
        assert!(tb.max_time() >= now + 300);
        assert!(tb.max_time() <= now + 302);
    }

    #[test]
    fn contains_respects_unbounded_max() {
        let tb = TimeBounds::new(100, 0);
        assert!(tb.contains(100));
        assert!(tb.contains(i64::MAX));
        assert!(!tb.contains(99));

        let tb = TimeBounds::new(100, 200);
        assert!(tb.contains(200));
        assert!(!tb.contains(201));
    }
}
