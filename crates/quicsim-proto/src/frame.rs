//! Frames carried in a packet payload.
//!
//! Every frame starts with a one-byte type. The type byte keeps its wire
//! position for all frame kinds so new kinds can be added without moving it.
//!
//! ```text
//! Base   (42 bytes): frame_type u8 | 41 reserved bytes
//! Stream (17 bytes): frame_type u8 | stream_id u32 | offset u64
//!                    | data_length u16 | stream_data u16
//! ```

use std::fmt;

use crate::{
    Cursor,
    codec::WireFormat,
    errors::Result,
};

/// Type bits shared by every STREAM frame type (`0b11xx_xxxx`)
pub const STREAM_FRAME_TYPE_MASK: u8 = 0xC0;

/// STREAM frame type used by the simulated endpoints (`0xC1`)
pub const STREAM_FRAME_TYPE: u8 = 0xC1;

/// `true` if `frame_type` falls in the STREAM frame range.
#[must_use]
pub const fn is_stream_frame_type(frame_type: u8) -> bool {
    frame_type & STREAM_FRAME_TYPE_MASK == STREAM_FRAME_TYPE_MASK
}

/// A frame known only by its type byte.
///
/// Occupies [`BaseFrame::SIZE`] bytes of which only the first is written or
/// read; the rest are left as reserved (zero in a fresh packet).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct BaseFrame {
    frame_type: u8,
}

impl BaseFrame {
    /// Placeholder size. Not derived from the fields, but it sets the
    /// simulated packet size.
    pub const SIZE: usize = 42;

    /// Create a frame with the given type byte
    #[must_use]
    pub fn new(frame_type: u8) -> Self {
        Self { frame_type }
    }

    /// Get the frame type
    #[must_use]
    pub fn frame_type(&self) -> u8 {
        self.frame_type
    }
}

impl WireFormat for BaseFrame {
    fn serialized_size(&self) -> usize {
        Self::SIZE
    }

    fn serialize<B: AsRef<[u8]> + AsMut<[u8]>>(&self, cursor: &mut Cursor<B>) -> Result<()> {
        cursor.ensure(Self::SIZE)?;
        cursor.put_u8(self.frame_type)?;
        // Reserved bytes are left as they are
        cursor.skip(Self::SIZE - 1)
    }

    fn deserialize<B: AsRef<[u8]>>(cursor: &mut Cursor<B>) -> Result<(Self, usize)> {
        cursor.ensure(Self::SIZE)?;
        let frame_type = cursor.get_u8()?;
        cursor.skip(Self::SIZE - 1)?;
        Ok((Self { frame_type }, Self::SIZE))
    }
}

impl fmt::Display for BaseFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "frame: type={:#04x}", self.frame_type)
    }
}

/// STREAM frame describing a segment of one stream.
///
/// No field is validated: any stream id, offset or length is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StreamFrame {
    frame_type: u8,
    stream_id: u32,
    offset: u64,
    data_length: u16,
    stream_data: u16,
}

impl StreamFrame {
    /// Serialized size: 1 + 4 + 8 + 2 + 2
    pub const SIZE: usize = 17;

    /// Create a frame of type [`STREAM_FRAME_TYPE`] with no data.
    #[must_use]
    pub fn new(stream_id: u32, offset: u64) -> Self {
        Self { frame_type: STREAM_FRAME_TYPE, stream_id, offset, data_length: 0, stream_data: 0 }
    }

    /// Get the frame type
    #[must_use]
    pub fn frame_type(&self) -> u8 {
        self.frame_type
    }

    /// Set the frame type
    pub fn set_frame_type(&mut self, frame_type: u8) {
        self.frame_type = frame_type;
    }

    /// Get the stream ID
    #[must_use]
    pub fn stream_id(&self) -> u32 {
        self.stream_id
    }

    /// Set the stream ID
    pub fn set_stream_id(&mut self, stream_id: u32) {
        self.stream_id = stream_id;
    }

    /// Get the byte offset of this segment within the stream
    #[must_use]
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Set the offset
    pub fn set_offset(&mut self, offset: u64) {
        self.offset = offset;
    }

    /// Get the declared data length
    #[must_use]
    pub fn data_length(&self) -> u16 {
        self.data_length
    }

    /// Set the declared data length
    pub fn set_data_length(&mut self, data_length: u16) {
        self.data_length = data_length;
    }

    /// Stream data field. A count of bytes allocated for the segment, not
    /// the bytes themselves.
    #[must_use]
    pub fn stream_data(&self) -> u16 {
        self.stream_data
    }

    /// Set the stream data count
    pub fn set_stream_data(&mut self, stream_data: u16) {
        self.stream_data = stream_data;
    }
}

impl Default for StreamFrame {
    fn default() -> Self {
        Self::new(0, 0)
    }
}

impl WireFormat for StreamFrame {
    fn serialized_size(&self) -> usize {
        Self::SIZE
    }

    fn serialize<B: AsRef<[u8]> + AsMut<[u8]>>(&self, cursor: &mut Cursor<B>) -> Result<()> {
        cursor.ensure(Self::SIZE)?;
        cursor.put_u8(self.frame_type)?;
        cursor.put_u32(self.stream_id)?;
        cursor.put_u64(self.offset)?;
        cursor.put_u16(self.data_length)?;
        cursor.put_u16(self.stream_data)
    }

    fn deserialize<B: AsRef<[u8]>>(cursor: &mut Cursor<B>) -> Result<(Self, usize)> {
        cursor.ensure(Self::SIZE)?;
        let frame = Self {
            frame_type: cursor.get_u8()?,
            stream_id: cursor.get_u32()?,
            offset: cursor.get_u64()?,
            data_length: cursor.get_u16()?,
            stream_data: cursor.get_u16()?,
        };
        Ok((frame, Self::SIZE))
    }
}

impl fmt::Display for StreamFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "stream frame: type={:#04x} stream_id={} offset={} data_length={} stream_data={}",
            self.frame_type, self.stream_id, self.offset, self.data_length, self.stream_data
        )
    }
}

/// Any frame, selected by its type byte on decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Frame {
    /// Frame kind with no dedicated layout
    Base(BaseFrame),
    /// STREAM frame
    Stream(StreamFrame),
}

impl Frame {
    /// Get the frame type byte
    #[must_use]
    pub fn frame_type(&self) -> u8 {
        match self {
            Self::Base(frame) => frame.frame_type(),
            Self::Stream(frame) => frame.frame_type(),
        }
    }
}

impl From<BaseFrame> for Frame {
    fn from(frame: BaseFrame) -> Self {
        Self::Base(frame)
    }
}

impl From<StreamFrame> for Frame {
    fn from(frame: StreamFrame) -> Self {
        Self::Stream(frame)
    }
}

impl WireFormat for Frame {
    fn serialized_size(&self) -> usize {
        match self {
            Self::Base(frame) => frame.serialized_size(),
            Self::Stream(frame) => frame.serialized_size(),
        }
    }

    fn serialize<B: AsRef<[u8]> + AsMut<[u8]>>(&self, cursor: &mut Cursor<B>) -> Result<()> {
        match self {
            Self::Base(frame) => frame.serialize(cursor),
            Self::Stream(frame) => frame.serialize(cursor),
        }
    }

    fn deserialize<B: AsRef<[u8]>>(cursor: &mut Cursor<B>) -> Result<(Self, usize)> {
        if is_stream_frame_type(cursor.peek_u8()?) {
            let (frame, consumed) = StreamFrame::deserialize(cursor)?;
            Ok((Self::Stream(frame), consumed))
        } else {
            let (frame, consumed) = BaseFrame::deserialize(cursor)?;
            Ok((Self::Base(frame), consumed))
        }
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Base(frame) => fmt::Display::fmt(frame, f),
            Self::Stream(frame) => fmt::Display::fmt(frame, f),
        }
    }
}
