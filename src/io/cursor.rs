//! Bounds-checked reading over an in-memory byte buffer.
//!
//! Every read either succeeds completely and advances the position, or fails
//! with [`IoError::OutOfBounds`] and leaves the position untouched. Nothing
//! in here panics on malformed input.

use crate::error::IoError;

use super::endian::{read_u16_be, ByteOrder};

/// A read position over a fixed byte buffer.
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteCursor<'a> {
    /// Create a cursor positioned at the start of `data`.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Current absolute position.
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Total size of the underlying buffer.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the underlying buffer is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Bytes left between the position and the end of the buffer.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// The whole underlying buffer.
    #[inline]
    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    /// Reposition to an absolute offset.
    ///
    /// Seeking to exactly `len()` is allowed and leaves nothing to read.
    pub fn seek(&mut self, offset: usize) -> Result<(), IoError> {
        if offset > self.data.len() {
            return Err(self.out_of_bounds(offset, 0));
        }
        self.pos = offset;
        Ok(())
    }

    /// Advance by `n` bytes.
    pub fn skip(&mut self, n: usize) -> Result<(), IoError> {
        self.ensure(n)?;
        self.pos += n;
        Ok(())
    }

    /// Return the next two bytes as a big-endian marker code without advancing.
    pub fn peek_marker(&self) -> Result<u16, IoError> {
        let bytes = self.peek(2)?;
        Ok(read_u16_be(bytes))
    }

    /// Read one byte.
    pub fn read_u8(&mut self) -> Result<u8, IoError> {
        Ok(self.read_bytes(1)?[0])
    }

    /// Read a u16 in the given byte order.
    pub fn read_u16(&mut self, order: ByteOrder) -> Result<u16, IoError> {
        let bytes = self.read_bytes(2)?;
        Ok(order.read_u16(bytes))
    }

    /// Read a u32 in the given byte order.
    pub fn read_u32(&mut self, order: ByteOrder) -> Result<u32, IoError> {
        let bytes = self.read_bytes(4)?;
        Ok(order.read_u32(bytes))
    }

    /// Borrow the next `len` bytes and advance past them.
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8], IoError> {
        let bytes = self.peek(len)?;
        self.pos += len;
        Ok(bytes)
    }

    /// Borrow the next `len` bytes without advancing.
    pub fn peek(&self, len: usize) -> Result<&'a [u8], IoError> {
        self.ensure(len)?;
        Ok(&self.data[self.pos..self.pos + len])
    }

    fn ensure(&self, len: usize) -> Result<(), IoError> {
        if len > self.remaining() {
            return Err(self.out_of_bounds(self.pos, len));
        }
        Ok(())
    }

    fn out_of_bounds(&self, offset: usize, requested: usize) -> IoError {
        IoError::OutOfBounds {
            offset,
            requested,
            size: self.data.len(),
        }
    }
}
