//! Primitive XDR reader and writer.
//!
//! XDR is big-endian and 4-byte aligned. Every primitive occupies a multiple
//! of four bytes: integers are written as-is, booleans as a full `u32`, and
//! opaque data is zero padded up to the next boundary.
//!
//! Variable-length fields and arrays carry a declared maximum. The writer
//! refuses to emit anything longer and the reader refuses to allocate for a
//! length prefix above it, so a hostile length can never make us reserve
//! gigabytes before noticing the input is short.

use super::error::{DecodeError, EncodeError};
use super::{ReadXdr, WriteXdr};

/// Number of zero bytes needed to pad `len` up to a multiple of four.
fn padding_for(len: usize) -> usize {
    (4 - len % 4) % 4
}

// ---------------------------------------------------------------------------
// XdrWriter
// ---------------------------------------------------------------------------

/// Append-only buffer for XDR output.
#[derive(Debug, Default)]
pub struct XdrWriter {
    buf: Vec<u8>,
}

impl XdrWriter {
    /// Creates an empty writer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bytes written so far.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Returns `true` if nothing has been written.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Consumes the writer and returns the encoded bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    pub fn write_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_be_bytes());
    }

    pub fn write_i32(&mut self, v: i32) {
        self.buf.extend_from_slice(&v.to_be_bytes());
    }

    pub fn write_u64(&mut self, v: u64) {
        self.buf.extend_from_slice(&v.to_be_bytes());
    }

    pub fn write_i64(&mut self, v: i64) {
        self.buf.extend_from_slice(&v.to_be_bytes());
    }

    pub fn write_bool(&mut self, v: bool) {
        self.write_u32(u32::from(v));
    }

    /// Writes a union discriminant.
    pub fn write_discriminant(&mut self, v: i32) {
        self.write_i32(v);
    }

    /// Writes fixed-size opaque data: no length prefix, padded only when the
    /// size is not already a multiple of four.
    pub fn write_fixed_opaque(&mut self, data: &[u8]) {
        self.buf.extend_from_slice(data);
        self.buf.resize(self.buf.len() + padding_for(data.len()), 0);
    }

    /// Writes variable-length opaque data: `u32` length, bytes, padding.
    pub fn write_var_opaque(
        &mut self,
        data: &[u8],
        max: usize,
        what: &'static str,
    ) -> Result<(), EncodeError> {
        self.write_len(data.len(), max, what)?;
        self.write_fixed_opaque(data);
        Ok(())
    }

    /// Writes a bounded string. XDR strings are opaque bytes on the wire.
    pub fn write_string(&mut self, s: &str, max: usize, what: &'static str) -> Result<(), EncodeError> {
        self.write_var_opaque(s.as_bytes(), max, what)
    }

    /// Writes an array length prefix after checking it against `max`.
    pub fn write_len(&mut self, len: usize, max: usize, what: &'static str) -> Result<(), EncodeError> {
        if len > max {
            return Err(EncodeError::TooLong { what, len, max });
        }
        // max is always a small protocol constant, so this cannot truncate.
        self.write_u32(len as u32);
        Ok(())
    }

    /// Writes a length-prefixed array of values.
    pub fn write_array<T: WriteXdr>(
        &mut self,
        items: &[T],
        max: usize,
        what: &'static str,
    ) -> Result<(), EncodeError> {
        self.write_len(items.len(), max, what)?;
        for item in items {
            item.write_xdr(self)?;
        }
        Ok(())
    }

    /// Writes an optional value as a presence flag followed by the value.
    pub fn write_option<T: WriteXdr>(&mut self, value: Option<&T>) -> Result<(), EncodeError> {
        match value {
            Some(v) => {
                self.write_bool(true);
                v.write_xdr(self)
            }
            None => {
                self.write_bool(false);
                Ok(())
            }
        }
    }
}

// ---------------------------------------------------------------------------
// XdrReader
// ---------------------------------------------------------------------------

/// Cursor over XDR input.
///
/// All reads are bounds checked and report the offset at which they failed.
pub struct XdrReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> XdrReader<'a> {
    /// Creates a reader positioned at the start of `data`.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Fails unless the whole input has been consumed.
    pub fn finish(&self) -> Result<(), DecodeError> {
        match self.remaining() {
            0 => Ok(()),
            remaining => Err(DecodeError::TrailingBytes {
                offset: self.pos,
                remaining,
            }),
        }
    }

    /// Reads `n` raw bytes and advances the cursor.
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8], DecodeError> {
        if n > self.remaining() {
            return Err(DecodeError::UnexpectedEof {
                offset: self.pos,
                needed: n - self.remaining(),
            });
        }
        let slice = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    fn read_array4(&mut self) -> Result<[u8; 4], DecodeError> {
        let mut out = [0u8; 4];
        out.copy_from_slice(self.read_bytes(4)?);
        Ok(out)
    }

    fn read_array8(&mut self) -> Result<[u8; 8], DecodeError> {
        let mut out = [0u8; 8];
        out.copy_from_slice(self.read_bytes(8)?);
        Ok(out)
    }

    pub fn read_u32(&mut self) -> Result<u32, DecodeError> {
        Ok(u32::from_be_bytes(self.read_array4()?))
    }

    pub fn read_i32(&mut self) -> Result<i32, DecodeError> {
        Ok(i32::from_be_bytes(self.read_array4()?))
    }

    pub fn read_u64(&mut self) -> Result<u64, DecodeError> {
        Ok(u64::from_be_bytes(self.read_array8()?))
    }

    pub fn read_i64(&mut self) -> Result<i64, DecodeError> {
        Ok(i64::from_be_bytes(self.read_array8()?))
    }

    /// Reads a boolean. Only 0 and 1 are accepted.
    pub fn read_bool(&mut self) -> Result<bool, DecodeError> {
        let offset = self.pos;
        match self.read_u32()? {
            0 => Ok(false),
            1 => Ok(true),
            value => Err(DecodeError::InvalidBool { value, offset }),
        }
    }

    /// Reads a union discriminant, returning it with its offset so callers
    /// can report an unknown arm precisely.
    pub fn read_discriminant(&mut self) -> Result<(i32, usize), DecodeError> {
        let offset = self.pos;
        Ok((self.read_i32()?, offset))
    }

    fn skip_padding(&mut self, len: usize) -> Result<(), DecodeError> {
        let offset = self.pos;
        let pad = self.read_bytes(padding_for(len))?;
        if pad.iter().any(|b| *b != 0) {
            return Err(DecodeError::NonZeroPadding { offset });
        }
        Ok(())
    }

    /// Reads `N` bytes of fixed opaque data plus any padding.
    pub fn read_fixed_opaque<const N: usize>(&mut self) -> Result<[u8; N], DecodeError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N)?);
        self.skip_padding(N)?;
        Ok(out)
    }

    /// Reads an array length prefix and checks it against `max`.
    pub fn read_len(&mut self, max: usize, what: &'static str) -> Result<usize, DecodeError> {
        let offset = self.pos;
        let len = self.read_u32()? as usize;
        if len > max {
            return Err(DecodeError::LengthExceeded {
                what,
                len,
                max,
                offset,
            });
        }
        Ok(len)
    }

    /// Reads variable-length opaque data.
    pub fn read_var_opaque(&mut self, max: usize, what: &'static str) -> Result<Vec<u8>, DecodeError> {
        let len = self.read_len(max, what)?;
        let data = self.read_bytes(len)?.to_vec();
        self.skip_padding(len)?;
        Ok(data)
    }

    /// Reads a bounded UTF-8 string.
    pub fn read_string(&mut self, max: usize, what: &'static str) -> Result<String, DecodeError> {
        let offset = self.pos + 4;
        let bytes = self.read_var_opaque(max, what)?;
        String::from_utf8(bytes).map_err(|_| DecodeError::InvalidUtf8 { what, offset })
    }

    /// Reads a length-prefixed array of values.
    pub fn read_array<T: ReadXdr>(&mut self, max: usize, what: &'static str) -> Result<Vec<T>, DecodeError> {
        let len = self.read_len(max, what)?;
        let mut items = Vec::with_capacity(len);
        for _ in 0..len {
            items.push(T::read_xdr(self)?);
        }
        Ok(items)
    }

    /// Reads an optional value.
    pub fn read_option<T: ReadXdr>(&mut self) -> Result<Option<T>, DecodeError> {
        if self.read_bool()? {
            Ok(Some(T::read_xdr(self)?))
        } else {
            Ok(None)
        }
    }
}

// ---------------------------------------------------------------------------
// Primitive impls
// ---------------------------------------------------------------------------

impl WriteXdr for u32 {
    fn write_xdr(&self, w: &mut XdrWriter) -> Result<(), EncodeError> {
        w.write_u32(*self);
        Ok(())
    }
}

impl ReadXdr for u32 {
    fn read_xdr(r: &mut XdrReader<'_>) -> Result<Self, DecodeError> {
        r.read_u32()
    }
}

impl WriteXdr for [u8; 32] {
    fn write_xdr(&self, w: &mut XdrWriter) -> Result<(), EncodeError> {
        w.write_fixed_opaque(self);
        Ok(())
    }
}

impl ReadXdr for [u8; 32] {
    fn read_xdr(r: &mut XdrReader<'_>) -> Result<Self, DecodeError> {
        r.read_fixed_opaque::<32>()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
