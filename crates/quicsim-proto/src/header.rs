//! Packet headers: long form and short form.
//!
//! Both forms share a 14-byte prefix followed by variant fields. Every
//! integer is big-endian. Flags and packet types are logically one bit or one
//! byte but are widened to 16-bit wire slots; reads and writes use the same
//! width for each field so the codec round-trips against its own output.
//!
//! ```text
//! Long  (20 bytes): connection_id u64 | packet_number u32 | form u16 = 1
//!                   | protocol_version u32 | long_packet_type u16
//! Short (20 bytes): connection_id u64 | packet_number u32 | form u16 = 0
//!                   | connection_id_flag u16 | key_phase_bit u16
//!                   | short_packet_type u16
//! ```
//!
//! Sizes are fixed per variant. The simulator only needs correctly sized
//! packets for queueing and timing, so sizes must never be derived from the
//! packet type (a compliant short header would shrink with a 1-octet packet
//! number; this one does not).

use std::fmt;

use crate::{
    Cursor, LongPacketType, ShortPacketType,
    codec::{WireFormat, flag_from_wire, flag_to_wire},
    errors::{ProtocolError, Result},
};

/// Wire value of the header form field for long headers
pub const HEADER_FORM_LONG: u16 = 1;

/// Wire value of the header form field for short headers
pub const HEADER_FORM_SHORT: u16 = 0;

/// Offset of the header form field from the start of any header
pub const HEADER_FORM_OFFSET: usize = 8 + 4;

/// Long-form header, used while a connection is being established.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LongHeader {
    connection_id: u64,
    packet_number: u32,
    protocol_version: u32,
    long_packet_type: u8,
}

impl LongHeader {
    /// Serialized size: 8 + 4 + 2 + 4 + 2
    pub const SIZE: usize = 20;

    /// Protocol version written when none is set
    pub const DEFAULT_VERSION: u32 = 0x0000_0001;

    /// Create a header with the default version and an unset packet type.
    #[must_use]
    pub fn new(connection_id: u64, packet_number: u32) -> Self {
        Self {
            connection_id,
            packet_number,
            protocol_version: Self::DEFAULT_VERSION,
            long_packet_type: 0,
        }
    }

    /// Builder-style packet type assignment.
    #[must_use]
    pub fn with_packet_type(mut self, packet_type: LongPacketType) -> Self {
        self.long_packet_type = packet_type.to_u8();
        self
    }

    /// Get the connection ID
    #[must_use]
    pub fn connection_id(&self) -> u64 {
        self.connection_id
    }

    /// Set the connection ID
    pub fn set_connection_id(&mut self, connection_id: u64) {
        self.connection_id = connection_id;
    }

    /// Get the packet number
    #[must_use]
    pub fn packet_number(&self) -> u32 {
        self.packet_number
    }

    /// Set the packet number
    pub fn set_packet_number(&mut self, packet_number: u32) {
        self.packet_number = packet_number;
    }

    /// Always `true`: the variant fixes the header form.
    #[must_use]
    pub fn header_form(&self) -> bool {
        true
    }

    /// Get the protocol version
    #[must_use]
    pub fn protocol_version(&self) -> u32 {
        self.protocol_version
    }

    /// Set the protocol version
    pub fn set_protocol_version(&mut self, protocol_version: u32) {
        self.protocol_version = protocol_version;
    }

    /// Raw packet type code, `0` when unset or normalized
    #[must_use]
    pub fn long_packet_type(&self) -> u8 {
        self.long_packet_type
    }

    /// Packet type as an enum (if set)
    #[must_use]
    pub fn packet_type(&self) -> Option<LongPacketType> {
        LongPacketType::from_u8(self.long_packet_type)
    }

    /// Set the raw packet type code.
    ///
    /// Codes outside `1..=9` are stored as `0`. Callers cannot tell an
    /// explicit `0` from a coerced invalid value.
    pub fn set_long_packet_type(&mut self, long_packet_type: u8) {
        self.long_packet_type = LongPacketType::from_u8(long_packet_type).map_or(0, LongPacketType::to_u8);
    }
}

impl Default for LongHeader {
    fn default() -> Self {
        Self::new(0, 0)
    }
}

impl WireFormat for LongHeader {
    fn serialized_size(&self) -> usize {
        Self::SIZE
    }

    fn serialize<B: AsRef<[u8]> + AsMut<[u8]>>(&self, cursor: &mut Cursor<B>) -> Result<()> {
        cursor.ensure(Self::SIZE)?;
        cursor.put_u64(self.connection_id)?;
        cursor.put_u32(self.packet_number)?;
        cursor.put_u16(HEADER_FORM_LONG)?;
        cursor.put_u32(self.protocol_version)?;
        cursor.put_u16(u16::from(self.long_packet_type))
    }

    fn deserialize<B: AsRef<[u8]>>(cursor: &mut Cursor<B>) -> Result<(Self, usize)> {
        cursor.ensure(Self::SIZE)?;
        let connection_id = cursor.get_u64()?;
        let packet_number = cursor.get_u32()?;
        let form = cursor.get_u16()?;
        let protocol_version = cursor.get_u32()?;
        let raw_type = cursor.get_u16()?;

        if form != HEADER_FORM_LONG {
            tracing::trace!(form, "long header decoded over a non-long form field");
        }

        let mut header = Self { connection_id, packet_number, protocol_version, long_packet_type: 0 };
        header.set_long_packet_type(u8::try_from(raw_type).unwrap_or(0));

        Ok((header, Self::SIZE))
    }
}

impl fmt::Display for LongHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "long header: connection_id={:#018x} packet_number={} version={:#010x} type=",
            self.connection_id, self.packet_number, self.protocol_version
        )?;
        match self.packet_type() {
            Some(kind) => write!(f, "{kind}"),
            None => f.write_str("unset"),
        }
    }
}

/// Short-form header, used once a connection is established.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ShortHeader {
    connection_id: u64,
    packet_number: u32,
    connection_id_flag: bool,
    key_phase_bit: bool,
    short_packet_type: u8,
}

impl ShortHeader {
    /// Serialized size: 8 + 4 + 2 + 2 + 2 + 2
    pub const SIZE: usize = 20;

    /// Create a header with both flags clear and an unset packet type.
    #[must_use]
    pub fn new(connection_id: u64, packet_number: u32) -> Self {
        Self { connection_id, packet_number, ..Self::default() }
    }

    /// Builder-style packet type assignment.
    #[must_use]
    pub fn with_packet_type(mut self, packet_type: ShortPacketType) -> Self {
        self.short_packet_type = packet_type.to_u8();
        self
    }

    /// Get the connection ID
    #[must_use]
    pub fn connection_id(&self) -> u64 {
        self.connection_id
    }

    /// Set the connection ID
    pub fn set_connection_id(&mut self, connection_id: u64) {
        self.connection_id = connection_id;
    }

    /// Get the packet number
    #[must_use]
    pub fn packet_number(&self) -> u32 {
        self.packet_number
    }

    /// Set the packet number
    pub fn set_packet_number(&mut self, packet_number: u32) {
        self.packet_number = packet_number;
    }

    /// Always `false`: the variant fixes the header form.
    #[must_use]
    pub fn header_form(&self) -> bool {
        false
    }

    /// Whether the logical packet carries a connection ID.
    ///
    /// Transmitted only; the connection ID is always encoded.
    #[must_use]
    pub fn connection_id_flag(&self) -> bool {
        self.connection_id_flag
    }

    /// Set the connection ID flag
    pub fn set_connection_id_flag(&mut self, connection_id_flag: bool) {
        self.connection_id_flag = connection_id_flag;
    }

    /// Which of the two rotating key sets protects the packet
    #[must_use]
    pub fn key_phase_bit(&self) -> bool {
        self.key_phase_bit
    }

    /// Set the key phase bit
    pub fn set_key_phase_bit(&mut self, key_phase_bit: bool) {
        self.key_phase_bit = key_phase_bit;
    }

    /// Raw packet type code
    #[must_use]
    pub fn short_packet_type(&self) -> u8 {
        self.short_packet_type
    }

    /// Packet type as an enum (if known)
    #[must_use]
    pub fn packet_type(&self) -> Option<ShortPacketType> {
        ShortPacketType::from_u8(self.short_packet_type)
    }

    /// Set the raw packet type code. Stored as given.
    pub fn set_short_packet_type(&mut self, short_packet_type: u8) {
        self.short_packet_type = short_packet_type;
    }
}

impl WireFormat for ShortHeader {
    fn serialized_size(&self) -> usize {
        Self::SIZE
    }

    fn serialize<B: AsRef<[u8]> + AsMut<[u8]>>(&self, cursor: &mut Cursor<B>) -> Result<()> {
        cursor.ensure(Self::SIZE)?;
        cursor.put_u64(self.connection_id)?;
        cursor.put_u32(self.packet_number)?;
        cursor.put_u16(HEADER_FORM_SHORT)?;
        cursor.put_u16(flag_to_wire(self.connection_id_flag))?;
        cursor.put_u16(flag_to_wire(self.key_phase_bit))?;
        cursor.put_u16(u16::from(self.short_packet_type))
    }

    fn deserialize<B: AsRef<[u8]>>(cursor: &mut Cursor<B>) -> Result<(Self, usize)> {
        cursor.ensure(Self::SIZE)?;
        let connection_id = cursor.get_u64()?;
        let packet_number = cursor.get_u32()?;
        let form = cursor.get_u16()?;
        let connection_id_flag = flag_from_wire(cursor.get_u16()?);
        let key_phase_bit = flag_from_wire(cursor.get_u16()?);
        let raw_type = cursor.get_u16()?;

        if form != HEADER_FORM_SHORT {
            tracing::trace!(form, "short header decoded over a non-short form field");
        }

        let header = Self {
            connection_id,
            packet_number,
            connection_id_flag,
            key_phase_bit,
            // Codes that do not fit the logical byte fall back to unset.
            short_packet_type: u8::try_from(raw_type).unwrap_or(0),
        };

        Ok((header, Self::SIZE))
    }
}

impl fmt::Display for ShortHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "short header: connection_id={:#018x} packet_number={} connection_id_flag={} key_phase_bit={} type=",
            self.connection_id,
            self.packet_number,
            self.connection_id_flag,
            self.key_phase_bit
        )?;
        match self.packet_type() {
            Some(kind) => write!(f, "{kind}"),
            None => write!(f, "{}", self.short_packet_type),
        }
    }
}

/// Any packet header.
///
/// Decoding through this type reads the header form field and picks the
/// variant, so the caller does not need to know the form in advance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Header {
    /// Connection establishment
    Long(LongHeader),
    /// Established connection
    Short(ShortHeader),
}

impl Header {
    /// Get the connection ID
    #[must_use]
    pub fn connection_id(&self) -> u64 {
        match self {
            Self::Long(header) => header.connection_id(),
            Self::Short(header) => header.connection_id(),
        }
    }

    /// Get the packet number
    #[must_use]
    pub fn packet_number(&self) -> u32 {
        match self {
            Self::Long(header) => header.packet_number(),
            Self::Short(header) => header.packet_number(),
        }
    }

    /// `true` for long headers
    #[must_use]
    pub fn header_form(&self) -> bool {
        match self {
            Self::Long(header) => header.header_form(),
            Self::Short(header) => header.header_form(),
        }
    }

    /// Read the header form at the cursor without consuming anything.
    ///
    /// # Errors
    ///
    /// - [`ProtocolError::BufferTooShort`] if the form field is past the end
    /// - [`ProtocolError::InvalidHeaderForm`] for values other than 0 and 1
    pub fn peek_form<B: AsRef<[u8]>>(cursor: &Cursor<B>) -> Result<bool> {
        match cursor.peek_u16(HEADER_FORM_OFFSET)? {
            HEADER_FORM_LONG => Ok(true),
            HEADER_FORM_SHORT => Ok(false),
            other => Err(ProtocolError::InvalidHeaderForm(other)),
        }
    }
}

impl From<LongHeader> for Header {
    fn from(header: LongHeader) -> Self {
        Self::Long(header)
    }
}

impl From<ShortHeader> for Header {
    fn from(header: ShortHeader) -> Self {
        Self::Short(header)
    }
}

impl WireFormat for Header {
    fn serialized_size(&self) -> usize {
        match self {
            Self::Long(header) => header.serialized_size(),
            Self::Short(header) => header.serialized_size(),
        }
    }

    fn serialize<B: AsRef<[u8]> + AsMut<[u8]>>(&self, cursor: &mut Cursor<B>) -> Result<()> {
        match self {
            Self::Long(header) => header.serialize(cursor),
            Self::Short(header) => header.serialize(cursor),
        }
    }

    fn deserialize<B: AsRef<[u8]>>(cursor: &mut Cursor<B>) -> Result<(Self, usize)> {
        // Both forms occupy the same size, so a short buffer reports the
        // whole header rather than the form field
        cursor.ensure(LongHeader::SIZE)?;
        if Self::peek_form(cursor)? {
            let (header, consumed) = LongHeader::deserialize(cursor)?;
            Ok((Self::Long(header), consumed))
        } else {
            let (header, consumed) = ShortHeader::deserialize(cursor)?;
            Ok((Self::Short(header), consumed))
        }
    }
}

impl fmt::Display for Header {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Long(header) => fmt::Display::fmt(header, f),
            Self::Short(header) => fmt::Display::fmt(header, f),
        }
    }
}
