//! Exhaustive positive space fuzzer for header and frame encoding.
//!
//! Unlike random fuzzing (packet_decode.rs), this fuzzer walks every
//! combination of:
//! - All long packet type wire values, valid or not
//! - Edge-case values for connection IDs, packet numbers and offsets
//! - Flag slots and short packet types
//!
//! libFuzzer picks the starting combination; each run then sweeps the
//! remaining field.

#![no_main]

use libfuzzer_sys::fuzz_target;
use quicsim_proto::{
    BaseFrame, Frame, Header, LongHeader, Packet, ShortHeader, StreamFrame, WireFormat,
};

// Edge-case values for 64-bit fields (connection_id, offset)
const U64_EDGES: &[u64] = &[0, 1, 0x1000, u32::MAX as u64, u64::MAX / 2, u64::MAX - 1, u64::MAX];

// Edge-case values for 32-bit fields (packet_number, version, stream_id)
const U32_EDGES: &[u32] = &[0, 1, 0x1000, u16::MAX as u32, u32::MAX / 2, u32::MAX - 1, u32::MAX];

// Edge-case values for 16-bit fields (data_length, stream_data)
const U16_EDGES: &[u16] = &[0, 1, 0xFF, 0x100, u16::MAX - 1, u16::MAX];

fn round_trip<T: WireFormat + Into<Header> + Copy>(header: T) -> Header {
    let mut packet = Packet::new();
    packet.push_header(header).expect("header fits");
    assert_eq!(packet.len(), header.serialized_size());
    packet.pop_header().expect("decode should succeed for valid encoding")
}

fuzz_target!(|data: &[u8]| {
    if data.len() < 4 {
        return;
    }

    let connection_id = U64_EDGES[data[0] as usize % U64_EDGES.len()];
    let packet_number = U32_EDGES[data[1] as usize % U32_EDGES.len()];
    let version = U32_EDGES[data[2] as usize % U32_EDGES.len()];
    let frame_type = data[3];

    // INVARIANT 1: long packet types outside 1..=9 normalize to 0
    for long_type in 0..=u8::MAX {
        let mut long = LongHeader::new(connection_id, packet_number);
        long.set_protocol_version(version);
        long.set_long_packet_type(long_type);

        let expected = if (1..=9).contains(&long_type) { long_type } else { 0 };
        assert_eq!(long.long_packet_type(), expected);

        let Header::Long(decoded) = round_trip(long) else {
            panic!("long header decoded as short");
        };
        assert_eq!(decoded, long);
    }

    // INVARIANT 2: short headers keep every field, flags included
    for short_type in 0..=u8::MAX {
        for (cid_flag, key_phase) in [(false, false), (true, false), (false, true), (true, true)] {
            let mut short = ShortHeader::new(connection_id, packet_number);
            short.set_connection_id_flag(cid_flag);
            short.set_key_phase_bit(key_phase);
            short.set_short_packet_type(short_type);

            assert_eq!(round_trip(short), Header::Short(short));
        }
    }

    // INVARIANT 3: frames dispatch on the type byte and keep their size
    for &offset in U64_EDGES {
        for &length in U16_EDGES {
            let mut stream = StreamFrame::new(version, offset);
            stream.set_frame_type(frame_type | 0xC0);
            stream.set_data_length(length);
            stream.set_stream_data(length.rotate_left(8));

            let mut packet = Packet::with_payload(data.len() - 4);
            packet.push_frame(stream).expect("frame fits");
            assert_eq!(packet.pop_frame(), Ok(Frame::Stream(stream)));
            assert_eq!(packet.len(), data.len() - 4);
        }
    }

    let base = BaseFrame::new(frame_type & 0x3F);
    let mut packet = Packet::new();
    packet.push_frame(base).expect("frame fits");
    assert_eq!(packet.len(), BaseFrame::SIZE);
    assert_eq!(packet.pop_frame(), Ok(Frame::Base(base)));
});
