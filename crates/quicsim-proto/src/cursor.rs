//! Positioned big-endian byte cursor.
//!
//! Every header and frame is serialized through a [`Cursor`]. The cursor owns
//! (or borrows) a byte buffer and a position; each fixed-width `put_*` or
//! `get_*` works at the current position and advances it by the width.
//!
//! Reads only need `AsRef<[u8]>`, so a cursor can decode straight out of a
//! `&[u8]` or `Bytes`. Writes additionally need `AsMut<[u8]>`.
//!
//! # Bounds
//!
//! A read or write that would run past the end of the buffer fails with
//! [`ProtocolError::BufferTooShort`] and leaves the position untouched.
//! Structure encoders call [`Cursor::ensure`] with their full size before the
//! first field, so a failed encode never leaves a half-written structure.

use crate::errors::{ProtocolError, Result};

/// Byte cursor with an absolute position into `B`.
#[derive(Debug, Clone)]
pub struct Cursor<B> {
    buf: B,
    position: usize,
}

impl<B: AsRef<[u8]>> Cursor<B> {
    /// Create a cursor positioned at the start of `buf`.
    #[must_use]
    pub fn new(buf: B) -> Self {
        Self { buf, position: 0 }
    }

    /// Create a cursor positioned at an absolute offset into `buf`.
    ///
    /// The offset is not checked here; the first read or write past the end
    /// reports [`ProtocolError::BufferTooShort`].
    #[must_use]
    pub fn at(buf: B, position: usize) -> Self {
        Self { buf, position }
    }

    /// Current absolute position
    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    /// Bytes between the position and the end of the buffer
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.buf.as_ref().len().saturating_sub(self.position)
    }

    /// Check that `needed` bytes are available without moving.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::BufferTooShort`] if fewer than `needed` bytes
    /// remain.
    pub fn ensure(&self, needed: usize) -> Result<()> {
        let available = self.remaining();
        if available < needed {
            return Err(ProtocolError::BufferTooShort { needed, available });
        }
        Ok(())
    }

    /// Move past `len` bytes without reading or writing them.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::BufferTooShort`] if fewer than `len` bytes
    /// remain; the position is left unchanged.
    pub fn skip(&mut self, len: usize) -> Result<()> {
        self.ensure(len)?;
        self.position += len;
        Ok(())
    }

    /// Give back the underlying buffer.
    pub fn into_inner(self) -> B {
        self.buf
    }

    fn peek<const N: usize>(&self, offset: usize) -> Result<[u8; N]> {
        self.ensure(offset.saturating_add(N))?;
        let start = self.position + offset;
        let mut out = [0u8; N];
        out.copy_from_slice(&self.buf.as_ref()[start..start + N]);
        Ok(out)
    }

    fn take<const N: usize>(&mut self) -> Result<[u8; N]> {
        let out = self.peek::<N>(0)?;
        self.position += N;
        Ok(out)
    }

    /// Read the byte at the position without moving.
    ///
    /// # Errors
    ///
    /// [`ProtocolError::BufferTooShort`] when the buffer is exhausted.
    pub fn peek_u8(&self) -> Result<u8> {
        self.peek::<1>(0).map(u8::from_be_bytes)
    }

    /// Read a network-order `u16` located `offset` bytes past the position,
    /// without moving.
    ///
    /// # Errors
    ///
    /// [`ProtocolError::BufferTooShort`] when the field lies past the end.
    pub fn peek_u16(&self, offset: usize) -> Result<u16> {
        self.peek::<2>(offset).map(u16::from_be_bytes)
    }

    /// Read one byte.
    ///
    /// # Errors
    ///
    /// [`ProtocolError::BufferTooShort`] when the buffer is exhausted.
    pub fn get_u8(&mut self) -> Result<u8> {
        self.take::<1>().map(u8::from_be_bytes)
    }

    /// Read a network-order `u16`.
    ///
    /// # Errors
    ///
    /// [`ProtocolError::BufferTooShort`] when fewer than 2 bytes remain.
    pub fn get_u16(&mut self) -> Result<u16> {
        self.take::<2>().map(u16::from_be_bytes)
    }

    /// Read a network-order `u32`.
    ///
    /// # Errors
    ///
    /// [`ProtocolError::BufferTooShort`] when fewer than 4 bytes remain.
    pub fn get_u32(&mut self) -> Result<u32> {
        self.take::<4>().map(u32::from_be_bytes)
    }

    /// Read a network-order `u64`.
    ///
    /// # Errors
    ///
    /// [`ProtocolError::BufferTooShort`] when fewer than 8 bytes remain.
    pub fn get_u64(&mut self) -> Result<u64> {
        self.take::<8>().map(u64::from_be_bytes)
    }
}

impl<B: AsRef<[u8]> + AsMut<[u8]>> Cursor<B> {
    fn put<const N: usize>(&mut self, bytes: [u8; N]) -> Result<()> {
        self.ensure(N)?;
        self.buf.as_mut()[self.position..self.position + N].copy_from_slice(&bytes);
        self.position += N;
        Ok(())
    }

    /// Write one byte.
    ///
    /// # Errors
    ///
    /// [`ProtocolError::BufferTooShort`] when the buffer is exhausted.
    pub fn put_u8(&mut self, value: u8) -> Result<()> {
        self.put(value.to_be_bytes())
    }

    /// Write a `u16` in network order.
    ///
    /// # Errors
    ///
    /// [`ProtocolError::BufferTooShort`] when fewer than 2 bytes remain.
    pub fn put_u16(&mut self, value: u16) -> Result<()> {
        self.put(value.to_be_bytes())
    }

    /// Write a `u32` in network order.
    ///
    /// # Errors
    ///
    /// [`ProtocolError::BufferTooShort`] when fewer than 4 bytes remain.
    pub fn put_u32(&mut self, value: u32) -> Result<()> {
        self.put(value.to_be_bytes())
    }

    /// Write a `u64` in network order.
    ///
    /// # Errors
    ///
    /// [`ProtocolError::BufferTooShort`] when fewer than 8 bytes remain.
    pub fn put_u64(&mut self, value: u64) -> Result<()> {
        self.put(value.to_be_bytes())
    }
}
