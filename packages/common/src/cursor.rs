//! Sequential decoder for tightly packed command and query streams.
//!
//! All integers are big-endian. Two read modes are offered:
//!
//! - checked reads (`read_*`) validate every access against the buffer bounds
//! - unchecked reads (`read_*_unchecked`) trust a preceding
//!   [`ByteCursor::ensure_remaining`] call covering the whole fixed-size region
//!
//! A stream is only valid when it is consumed completely, which callers assert
//! with [`ByteCursor::check_exhausted`].

use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CursorError {
    #[error("Read out of bounds: {requested} bytes at offset {offset}, buffer length {length}")]
    OutOfBounds {
        offset: usize,
        requested: usize,
        length: usize,
    },

    #[error("Length mismatch: expected {expected} bytes, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },
}

/// Cursor over an immutable byte buffer.
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    buf: &'a [u8],
    offset: usize,
}

impl<'a> ByteCursor<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, offset: 0 }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn remaining(&self) -> usize {
        self.buf.len() - self.offset
    }

    pub fn is_exhausted(&self) -> bool {
        self.offset == self.buf.len()
    }

    /// Fails unless the whole buffer has been consumed.
    pub fn check_exhausted(&self) -> Result<(), CursorError> {
        if self.offset != self.buf.len() {
            return Err(CursorError::LengthMismatch {
                expected: self.offset,
                actual: self.buf.len(),
            });
        }
        Ok(())
    }

    /// Outer bound check for a run of unchecked reads totalling `n` bytes.
    pub fn ensure_remaining(&self, n: usize) -> Result<(), CursorError> {
        if n > self.remaining() {
            return Err(CursorError::OutOfBounds {
                offset: self.offset,
                requested: n,
                length: self.buf.len(),
            });
        }
        Ok(())
    }

    // ========================================================================
    // Checked reads
    // ========================================================================

    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8], CursorError> {
        self.ensure_remaining(n)?;
        Ok(self.read_bytes_unchecked(n))
    }

    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N], CursorError> {
        self.ensure_remaining(N)?;
        Ok(self.read_array_unchecked())
    }

    pub fn read_u8(&mut self) -> Result<u8, CursorError> {
        Ok(self.read_array::<1>()?[0])
    }

    pub fn read_u16(&mut self) -> Result<u16, CursorError> {
        Ok(u16::from_be_bytes(self.read_array()?))
    }

    pub fn read_u32(&mut self) -> Result<u32, CursorError> {
        Ok(u32::from_be_bytes(self.read_array()?))
    }

    pub fn read_u64(&mut self) -> Result<u64, CursorError> {
        Ok(u64::from_be_bytes(self.read_array()?))
    }

    pub fn read_u128(&mut self) -> Result<u128, CursorError> {
        Ok(u128::from_be_bytes(self.read_array()?))
    }

    /// Blob prefixed by a one-byte length.
    pub fn read_blob_u8(&mut self) -> Result<&'a [u8], CursorError> {
        let len = self.read_u8()? as usize;
        self.read_bytes(len)
    }

    /// Blob prefixed by a two-byte length.
    pub fn read_blob_u16(&mut self) -> Result<&'a [u8], CursorError> {
        let len = self.read_u16()? as usize;
        self.read_bytes(len)
    }

    // ========================================================================
    // Unchecked reads
    // ========================================================================
    //
    // These index the buffer directly. A caller that skipped the outer
    // `ensure_remaining` check gets a panic, which aborts the whole call.

    pub fn read_bytes_unchecked(&mut self, n: usize) -> &'a [u8] {
        let start = self.offset;
        self.offset += n;
        &self.buf[start..self.offset]
    }

    pub fn read_array_unchecked<const N: usize>(&mut self) -> [u8; N] {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes_unchecked(N));
        out
    }

    pub fn read_u8_unchecked(&mut self) -> u8 {
        self.read_array_unchecked::<1>()[0]
    }

    pub fn read_u16_unchecked(&mut self) -> u16 {
        u16::from_be_bytes(self.read_array_unchecked())
    }

    pub fn read_u64_unchecked(&mut self) -> u64 {
        u64::from_be_bytes(self.read_array_unchecked())
    }

    pub fn read_u128_unchecked(&mut self) -> u128 {
        u128::from_be_bytes(self.read_array_unchecked())
    }
}
