//! # Strkey Addresses
//!
//! Human-facing encoding of keys and hashes:
//!
//! ```text
//! version_byte (1) || payload (32) || crc16_xmodem(version || payload) as LE (2)
//!     -> base32 (RFC 4648 alphabet, no padding) -> 56 characters
//! ```
//!
//! The version byte is chosen so the first character tells you what you
//! are looking at: `G` account, `S` seed, `T` pre-authorized transaction,
//! `X` hash-x.

use thiserror::Error;

/// Alphabet of RFC 4648 base32.
const BASE32_ALPHABET: &[u8; 32] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ234567";

/// Reverse lookup table: ASCII byte -> 5-bit value (0xFF = invalid).
const BASE32_DECODE: [u8; 128] = {
    let mut table = [0xFFu8; 128];
    let mut i = 0;
    while i < 32 {
        table[BASE32_ALPHABET[i] as usize] = i as u8;
        i += 1;
    }
    table
};

/// Raw size of a version byte, 32-byte payload and checksum.
const RAW_LEN: usize = 1 + 32 + 2;

/// Encoded length: 35 bytes is exactly 56 base32 characters.
pub const STRKEY_LEN: usize = 56;

/// What a strkey holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VersionByte {
    /// `G...` Ed25519 public key.
    AccountId,
    /// `S...` Ed25519 secret seed.
    Seed,
    /// `T...` hash of a pre-authorized transaction.
    PreAuthTx,
    /// `X...` SHA-256 hash of a preimage.
    HashX,
}

impl VersionByte {
    fn byte(self) -> u8 {
        match self {
            VersionByte::AccountId => 6 << 3,
            VersionByte::Seed => 18 << 3,
            VersionByte::PreAuthTx => 19 << 3,
            VersionByte::HashX => 23 << 3,
        }
    }

    fn from_byte(b: u8) -> Option<Self> {
        match b {
            b if b == 6 << 3 => Some(VersionByte::AccountId),
            b if b == 18 << 3 => Some(VersionByte::Seed),
            b if b == 19 << 3 => Some(VersionByte::PreAuthTx),
            b if b == 23 << 3 => Some(VersionByte::HashX),
            _ => None,
        }
    }
}

/// Errors that can occur while decoding a strkey.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StrkeyError {
    #[error("invalid strkey length: expected 56 characters, got {0}")]
    InvalidLength(usize),

    #[error("invalid base32 character in strkey")]
    InvalidBase32,

    #[error("unknown version byte {0:#04x}")]
    UnknownVersion(u8),

    #[error("strkey version mismatch: expected {expected:?}, got {got:?}")]
    VersionMismatch {
        expected: VersionByte,
        got: VersionByte,
    },

    #[error("invalid strkey checksum")]
    InvalidChecksum,
}

/// CRC16-XModem: polynomial 0x1021, initial value 0, no reflection.
fn crc16_xmodem(data: &[u8]) -> u16 {
    let mut crc: u16 = 0;
    for &byte in data {
        crc ^= u16::from(byte) << 8;
        for _ in 0..8 {
            crc = if crc & 0x8000 != 0 {
                (crc << 1) ^ 0x1021
            } else {
                crc << 1
            };
        }
    }
    crc
}

fn encode_base32(bytes: &[u8]) -> String {
    let mut result = String::with_capacity((bytes.len() * 8).div_ceil(5));
    let mut buffer: u64 = 0;
    let mut bits_in_buffer = 0;

    for &byte in bytes {
        buffer = (buffer << 8) | u64::from(byte);
        bits_in_buffer += 8;
        while bits_in_buffer >= 5 {
            bits_in_buffer -= 5;
            let idx = ((buffer >> bits_in_buffer) & 0x1F) as usize;
            result.push(BASE32_ALPHABET[idx] as char);
        }
    }
    if bits_in_buffer > 0 {
        let idx = ((buffer << (5 - bits_in_buffer)) & 0x1F) as usize;
        result.push(BASE32_ALPHABET[idx] as char);
    }
    result
}

fn decode_base32_fixed<const N: usize>(s: &str) -> Option<[u8; N]> {
    let mut buffer: u64 = 0;
    let mut bits_in_buffer = 0;
    let mut result = [0u8; N];
    let mut pos = 0;

    for c in s.bytes() {
        let val = *BASE32_DECODE.get(c as usize)?;
        if val == 0xFF {
            return None;
        }
        buffer = (buffer << 5) | u64::from(val);
        bits_in_buffer += 5;
        if bits_in_buffer >= 8 {
            bits_in_buffer -= 8;
            if pos == N {
                return None;
            }
            result[pos] = (buffer >> bits_in_buffer) as u8;
            pos += 1;
        }
    }

    if pos < N {
        return None;
    }
    Some(result)
}

/// Encodes a 32-byte payload under the given version.
pub fn encode(version: VersionByte, payload: &[u8; 32]) -> String {
    let mut raw = [0u8; RAW_LEN];
    raw[0] = version.byte();
    raw[1..33].copy_from_slice(payload);
    let crc = crc16_xmodem(&raw[..33]);
    raw[33..].copy_from_slice(&crc.to_le_bytes());
    encode_base32(&raw)
}

/// Decodes any strkey, returning its version and payload.
pub fn decode_any(s: &str) -> Result<(VersionByte, [u8; 32]), StrkeyError> {
    if s.len() != STRKEY_LEN {
        return Err(StrkeyError::InvalidLength(s.len()));
    }
    let raw: [u8; RAW_LEN] = decode_base32_fixed(s).ok_or(StrkeyError::InvalidBase32)?;
    let version = VersionByte::from_byte(raw[0]).ok_or(StrkeyError::UnknownVersion(raw[0]))?;

    let expected = crc16_xmodem(&raw[..33]);
    if u16::from_le_bytes([raw[33], raw[34]]) != expected {
        return Err(StrkeyError::InvalidChecksum);
    }

    let mut payload = [0u8; 32];
    payload.copy_from_slice(&raw[1..33]);
    Ok((version, payload))
}

/// Decodes a strkey and checks that it carries the expected version.
pub fn decode(expected: VersionByte, s: &str) -> Result<[u8; 32], StrkeyError> {
    let (got, payload) = decode_any(s)?;
    if got != expected {
        return Err(StrkeyError::VersionMismatch { expected, got });
    }
    Ok(payload)
}

/// Decodes a `G...` account address into its raw public key.
pub fn decode_account_id(address: &str) -> Result<[u8; 32], StrkeyError> {
    decode(VersionByte::AccountId, address)
}

/// Encodes a raw public key as a `G...` account address.
pub fn encode_account_id(key: &[u8; 32]) -> String {
    encode(VersionByte::AccountId, key)
}
