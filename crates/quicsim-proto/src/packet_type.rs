//! Packet type codes carried by long and short headers.
//!
//! Both enums occupy one logical byte but travel in a 16-bit wire slot (see
//! [`crate::header`]). The headers store the raw `u8` so that an unset or
//! normalized value (`0`) can be represented; these enums are the typed view
//! over the known codes.

use std::fmt;

use serde_repr::{Deserialize_repr, Serialize_repr};

/// Long header packet types (draft-ietf-quic-transport-03)
///
/// Values outside `1..=9` have no variant. [`crate::LongHeader`] normalizes
/// them to `0` on assignment and on decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize_repr, Deserialize_repr)]
#[repr(u8)]
pub enum LongPacketType {
    /// Version negotiation
    VersionNegotiation = 1,
    /// Client initial
    ClientInitial = 2,
    /// Server stateless retry
    ServerStatelessRetry = 3,
    /// Server cleartext
    ServerCleartext = 4,
    /// Client cleartext
    ClientCleartext = 5,
    /// 0-RTT protected
    ZeroRttProtected = 6,
    /// 1-RTT protected, key phase 0
    OneRttProtectedPhase0 = 7,
    /// 1-RTT protected, key phase 1
    OneRttProtectedPhase1 = 8,
    /// Public reset
    PublicReset = 9,
}

impl LongPacketType {
    /// Convert to raw u8 value
    #[must_use]
    pub const fn to_u8(self) -> u8 {
        self as u8
    }

    /// Convert from raw u8 value
    ///
    /// Returns `None` for `0` (unset) and anything above `9`.
    #[must_use]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            1 => Some(Self::VersionNegotiation),
            2 => Some(Self::ClientInitial),
            3 => Some(Self::ServerStatelessRetry),
            4 => Some(Self::ServerCleartext),
            5 => Some(Self::ClientCleartext),
            6 => Some(Self::ZeroRttProtected),
            7 => Some(Self::OneRttProtectedPhase0),
            8 => Some(Self::OneRttProtectedPhase1),
            9 => Some(Self::PublicReset),
            _ => None,
        }
    }
}

impl fmt::Display for LongPacketType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::VersionNegotiation => "VERN",
            Self::ClientInitial => "CLIN",
            Self::ServerStatelessRetry => "SSRT",
            Self::ServerCleartext => "SCLT",
            Self::ClientCleartext => "CCLT",
            Self::ZeroRttProtected => "ZRPR",
            Self::OneRttProtectedPhase0 => "ORPZ",
            Self::OneRttProtectedPhase1 => "ORPO",
            Self::PublicReset => "PURS",
        };
        f.write_str(name)
    }
}

/// Short header packet types.
///
/// Each names the width of the packet number field a fully compliant encoder
/// would use. The fixed-size encoding in this crate always writes 32 bits, so
/// the value is carried but never enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize_repr, Deserialize_repr)]
#[repr(u8)]
pub enum ShortPacketType {
    /// 1-octet packet number
    OneOctet = 1,
    /// 2-octet packet number
    TwoOctets = 2,
    /// 4-octet packet number
    FourOctets = 3,
}

impl ShortPacketType {
    /// Convert to raw u8 value
    #[must_use]
    pub const fn to_u8(self) -> u8 {
        self as u8
    }

    /// Convert from raw u8 value
    #[must_use]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            1 => Some(Self::OneOctet),
            2 => Some(Self::TwoOctets),
            3 => Some(Self::FourOctets),
            _ => None,
        }
    }

    /// Packet number width in bytes this type selects
    #[must_use]
    pub const fn packet_number_len(self) -> usize {
        match self {
            Self::OneOctet => 1,
            Self::TwoOctets => 2,
            Self::FourOctets => 4,
        }
    }
}

impl fmt::Display for ShortPacketType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::OneOctet => "OOCT",
            Self::TwoOctets => "TOCT",
            Self::FourOctets => "FOCT",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_packet_type_round_trip() {
        for value in 1..=9u8 {
            let kind = LongPacketType::from_u8(value).unwrap();
            assert_eq!(kind.to_u8(), value);
        }
    }

    #[test]
    fn long_packet_type_unknown() {
        assert_eq!(LongPacketType::from_u8(0), None);
        assert_eq!(LongPacketType::from_u8(10), None);
        assert_eq!(LongPacketType::from_u8(u8::MAX), None);
    }

    #[test]
    fn short_packet_type_widths() {
        assert_eq!(ShortPacketType::OneOctet.packet_number_len(), 1);
        assert_eq!(ShortPacketType::TwoOctets.packet_number_len(), 2);
        assert_eq!(ShortPacketType::FourOctets.packet_number_len(), 4);
        assert_eq!(ShortPacketType::from_u8(4), None);
    }

    #[test]
    fn display_uses_draft_mnemonics() {
        assert_eq!(LongPacketType::ClientCleartext.to_string(), "CCLT");
        assert_eq!(ShortPacketType::FourOctets.to_string(), "FOCT");
    }

    #[test]
    fn deserialize_from_wire_code() {
        use serde::{
            Deserialize,
            de::{IntoDeserializer, value::Error},
        };

        let code = |value: u8| IntoDeserializer::<Error>::into_deserializer(value);

        assert_eq!(LongPacketType::deserialize(code(5)), Ok(LongPacketType::ClientCleartext));
        assert!(LongPacketType::deserialize(code(0)).is_err());
        assert!(LongPacketType::deserialize(code(10)).is_err());
        assert_eq!(ShortPacketType::deserialize(code(3)), Ok(ShortPacketType::FourOctets));
        assert!(ShortPacketType::deserialize(code(4)).is_err());
    }
}
