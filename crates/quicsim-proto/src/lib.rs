//! # quicsim-proto: packet wire codec
//!
//! Header and frame codec for a QUIC-like transport running inside a
//! discrete-event network simulator. The simulator needs packets of the right
//! size with a recoverable envelope; it does not need byte-level
//! interoperability with a real QUIC stack. The layouts here are therefore
//! fixed-size and deliberately simple.
//!
//! ## Structures
//!
//! | Structure | Size | Selected by |
//! |---|---|---|
//! | [`LongHeader`] | 20 | header form field = 1 |
//! | [`ShortHeader`] | 20 | header form field = 0 |
//! | [`StreamFrame`] | 17 | frame type `0xC0..=0xFF` |
//! | [`BaseFrame`] | 42 (placeholder) | any other frame type |
//!
//! All integers are big-endian. Each structure implements [`WireFormat`]
//! (serialize, deserialize, size) and `Display` (describe).
//!
//! ## Variant selection
//!
//! The concrete types decode whatever bytes they are given, so a caller that
//! already knows the variant can use them directly. [`Header`] and [`Frame`]
//! are closed sum types that read the discriminator first and pick the
//! variant, with exhaustive matches everywhere else.
//!
//! ## Packets
//!
//! [`Packet`] owns a datagram buffer. Headers and frames are pushed onto the
//! front and popped back off in reverse order.
#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod codec;
pub mod cursor;
pub mod errors;
pub mod frame;
pub mod header;
pub mod packet;
pub mod packet_type;

pub use codec::WireFormat;
pub use cursor::Cursor;
pub use errors::{ProtocolError, Result};
pub use frame::{BaseFrame, Frame, STREAM_FRAME_TYPE, StreamFrame};
pub use header::{Header, LongHeader, ShortHeader};
pub use packet::Packet;
pub use packet_type::{LongPacketType, ShortPacketType};
