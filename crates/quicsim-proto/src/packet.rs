//! Packet buffer with stack-ordered headers and frames.
//!
//! Structures are prepended: the last header pushed is the first one a
//! receiver pops. A typical data packet is built payload first, then frame,
//! then header:
//!
//! ```text
//! push_frame(stream)   [stream frame][payload]
//! push_header(short)   [short header][stream frame][payload]
//! ```
//!
//! Each push reserves exactly `serialized_size()` zeroed bytes at the front
//! and serializes into them, so a structure that writes fewer bytes than it
//! occupies (the base frame) leaves zeros behind. Each pop removes exactly
//! the number of bytes the decoder reports.

use bytes::{Buf, Bytes, BytesMut};

use crate::{
    BaseFrame, Cursor, Frame, Header, LongHeader, ShortHeader, StreamFrame,
    codec::WireFormat,
    errors::{ProtocolError, Result},
};

/// Simulated datagram under construction or being taken apart.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Packet {
    buf: BytesMut,
}

impl Packet {
    /// Largest packet that fits in one UDP datagram
    pub const MAX_SIZE: usize = 65_507;

    /// Create an empty packet
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a packet holding `len` zero bytes of application payload.
    #[must_use]
    pub fn with_payload(len: usize) -> Self {
        Self { buf: BytesMut::zeroed(len) }
    }

    /// Wrap received bytes.
    #[must_use]
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self { buf: BytesMut::from(bytes) }
    }

    /// Total size in bytes
    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// `true` once every byte has been popped
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// View the wire bytes
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Convert into immutable bytes for sending.
    #[must_use]
    pub fn freeze(self) -> Bytes {
        self.buf.freeze()
    }

    /// Prepend a header.
    ///
    /// # Errors
    ///
    /// [`ProtocolError::PayloadTooLarge`] if the packet would exceed
    /// [`Packet::MAX_SIZE`].
    pub fn push_header(&mut self, header: impl Into<Header>) -> Result<()> {
        self.push(&header.into())
    }

    /// Prepend a frame.
    ///
    /// # Errors
    ///
    /// [`ProtocolError::PayloadTooLarge`] if the packet would exceed
    /// [`Packet::MAX_SIZE`].
    pub fn push_frame(&mut self, frame: impl Into<Frame>) -> Result<()> {
        self.push(&frame.into())
    }

    /// Decode the header at the front without removing it.
    ///
    /// # Errors
    ///
    /// - [`ProtocolError::PacketTooShort`] if the packet ends inside the
    ///   header
    /// - [`ProtocolError::InvalidHeaderForm`] if the form field is unknown
    pub fn peek_header(&self) -> Result<Header> {
        self.decode::<Header>().map(|(header, _)| header)
    }

    /// Remove the header at the front, picking the variant from its form
    /// field.
    ///
    /// # Errors
    ///
    /// Same as [`Packet::peek_header`].
    pub fn pop_header(&mut self) -> Result<Header> {
        self.pop()
    }

    /// Remove a long header from the front without checking its form.
    ///
    /// # Errors
    ///
    /// [`ProtocolError::PacketTooShort`] if fewer than
    /// [`LongHeader::SIZE`] bytes remain.
    pub fn pop_long_header(&mut self) -> Result<LongHeader> {
        self.pop()
    }

    /// Remove a short header from the front without checking its form.
    ///
    /// # Errors
    ///
    /// [`ProtocolError::PacketTooShort`] if fewer than
    /// [`ShortHeader::SIZE`] bytes remain.
    pub fn pop_short_header(&mut self) -> Result<ShortHeader> {
        self.pop()
    }

    /// Remove the frame at the front, picking the variant from its type
    /// byte.
    ///
    /// # Errors
    ///
    /// [`ProtocolError::PacketTooShort`] if the packet ends inside the frame.
    pub fn pop_frame(&mut self) -> Result<Frame> {
        self.pop()
    }

    /// Remove a STREAM frame from the front without checking its type.
    ///
    /// # Errors
    ///
    /// [`ProtocolError::PacketTooShort`] if fewer than
    /// [`StreamFrame::SIZE`] bytes remain.
    pub fn pop_stream_frame(&mut self) -> Result<StreamFrame> {
        self.pop()
    }

    /// Remove a base frame (and its reserved bytes) from the front.
    ///
    /// # Errors
    ///
    /// [`ProtocolError::PacketTooShort`] if fewer than [`BaseFrame::SIZE`]
    /// bytes remain.
    pub fn pop_base_frame(&mut self) -> Result<BaseFrame> {
        self.pop()
    }

    fn push<T: WireFormat>(&mut self, value: &T) -> Result<()> {
        let size = value.serialized_size();
        let total = self.buf.len() + size;
        if total > Self::MAX_SIZE {
            return Err(ProtocolError::PayloadTooLarge { size: total, max: Self::MAX_SIZE });
        }

        let mut front = BytesMut::zeroed(size);
        value.serialize(&mut Cursor::new(&mut front[..]))?;
        front.unsplit(std::mem::take(&mut self.buf));
        self.buf = front;

        tracing::trace!(size, total, "pushed {value}");
        Ok(())
    }

    fn decode<T: WireFormat>(&self) -> Result<(T, usize)> {
        T::deserialize(&mut Cursor::new(&self.buf[..])).map_err(|err| match err {
            ProtocolError::BufferTooShort { needed, available } => {
                ProtocolError::PacketTooShort { expected: needed, actual: available }
            },
            other => other,
        })
    }

    fn pop<T: WireFormat>(&mut self) -> Result<T> {
        let (value, consumed) = self.decode::<T>()?;
        self.buf.advance(consumed);

        tracing::trace!(consumed, remaining = self.buf.len(), "popped {value}");
        Ok(value)
    }
}

impl From<Bytes> for Packet {
    fn from(bytes: Bytes) -> Self {
        Self::from_bytes(&bytes)
    }
}
