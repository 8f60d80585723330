//! Snapshot tests for wire format stability.
//!
//! Each structure is encoded to hex and compared against a checked-in
//! snapshot. A layout change (field order, width, byte order) fails here
//! before it can silently change simulated packet sizes.

use insta::assert_snapshot;
use quicsim_proto::{
    BaseFrame, LongHeader, LongPacketType, Packet, ShortHeader, ShortPacketType, StreamFrame,
};

fn packet_to_hex(packet: &Packet) -> String {
    hex::encode(packet.as_bytes())
}

fn handshake_stream_frame(stream_id: u32) -> StreamFrame {
    let mut frame = StreamFrame::new(stream_id, 0);
    frame.set_frame_type(193);
    frame.set_data_length(1);
    frame.set_stream_data(1);
    frame
}

#[test]
fn snapshot_stream_frame() {
    let mut packet = Packet::new();
    packet.push_frame(handshake_stream_frame(2)).expect("push should succeed");

    assert_snapshot!("stream_frame", packet_to_hex(&packet));
}

#[test]
fn snapshot_long_header() {
    let header = LongHeader::new(0x1122_3344_5566_7788, 0xAABB_CCDD)
        .with_packet_type(LongPacketType::ClientCleartext);
    let mut packet = Packet::new();
    packet.push_header(header).expect("push should succeed");

    assert_snapshot!("long_header", packet_to_hex(&packet));
}

#[test]
fn snapshot_short_header() {
    let mut header = ShortHeader::new(0x42, 7).with_packet_type(ShortPacketType::FourOctets);
    header.set_connection_id_flag(true);
    let mut packet = Packet::new();
    packet.push_header(header).expect("push should succeed");

    assert_snapshot!("short_header", packet_to_hex(&packet));
}

#[test]
fn snapshot_base_frame() {
    let mut packet = Packet::new();
    packet.push_frame(BaseFrame::new(0x07)).expect("push should succeed");

    assert_snapshot!("base_frame", packet_to_hex(&packet));
}

#[test]
fn snapshot_client_initial_packet() {
    let mut packet = Packet::new();
    packet.push_frame(handshake_stream_frame(0)).expect("push should succeed");
    packet
        .push_header(LongHeader::new(0x42, 0).with_packet_type(LongPacketType::ClientInitial))
        .expect("push should succeed");

    assert_snapshot!("client_initial_packet", packet_to_hex(&packet));
}
