//! Error types for the quicsim wire codec.
//!
//! The codec itself never rejects field values (out-of-range packet types are
//! normalized instead). Every error here is either a buffer boundary or a
//! discriminator that the dispatching decoders cannot map to a variant.

use thiserror::Error;

/// Protocol-level errors raised while encoding or decoding packets.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// Cursor ran out of room for a fixed-width read or write
    #[error("buffer too short: need {needed} bytes, {available} available")]
    BufferTooShort {
        /// Bytes required by the operation
        needed: usize,
        /// Bytes left between the cursor position and the end of the buffer
        available: usize,
    },

    /// Header form field is neither 0 (short) nor 1 (long)
    #[error("invalid header form: {0:#06x}")]
    InvalidHeaderForm(u16),

    /// Packet holds fewer bytes than the structure at its front declares
    #[error("packet too short: structure occupies {expected} bytes, packet has {actual}")]
    PacketTooShort {
        /// Serialized size of the structure being removed
        expected: usize,
        /// Bytes left in the packet
        actual: usize,
    },

    /// Packet would exceed the maximum datagram size
    #[error("packet too large: {size} bytes exceeds maximum {max}")]
    PayloadTooLarge {
        /// Packet size after the push
        size: usize,
        /// Maximum allowed size
        max: usize,
    },
}

/// Convenient Result type alias for codec operations
pub type Result<T> = std::result::Result<T, ProtocolError>;
