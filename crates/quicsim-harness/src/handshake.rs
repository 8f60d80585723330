//! Builders for the packets simulated endpoints exchange.
//!
//! A client opens with a single hello: a STREAM frame on stream 0 under a
//! long header. The server answers with data packets: `send_size` bytes of
//! payload behind a STREAM frame on stream 2 and a short header.

use quicsim_proto::{
    LongHeader, LongPacketType, Packet, Result, STREAM_FRAME_TYPE, ShortHeader, StreamFrame,
};

/// Stream the client's hello travels on
pub const CLIENT_STREAM_ID: u32 = 0;

/// Stream the server's data travels on
pub const SERVER_STREAM_ID: u32 = 2;

/// Bytes of envelope in front of every server data packet's payload
pub const SERVER_DATA_OVERHEAD: usize = ShortHeader::SIZE + StreamFrame::SIZE;

fn single_byte_stream_frame(stream_id: u32) -> StreamFrame {
    let mut frame = StreamFrame::new(stream_id, 0);
    frame.set_frame_type(STREAM_FRAME_TYPE);
    frame.set_data_length(1);
    frame.set_stream_data(1);
    frame
}

/// Build the client's opening packet.
///
/// `hello_type` is [`LongPacketType::ClientInitial`] for a full handshake
/// and [`LongPacketType::ClientCleartext`] for 0-RTT.
///
/// # Errors
///
/// Never fails in practice; the packet is far below the datagram limit.
pub fn client_hello(connection_id: u64, hello_type: LongPacketType) -> Result<Packet> {
    let header = LongHeader::new(connection_id, 0).with_packet_type(hello_type);

    let mut packet = Packet::new();
    packet.push_frame(single_byte_stream_frame(CLIENT_STREAM_ID))?;
    packet.push_header(header)?;

    tracing::debug!(connection_id, %hello_type, "built client hello");
    Ok(packet)
}

/// Build one server data packet carrying `payload_len` zero bytes.
///
/// # Errors
///
/// [`quicsim_proto::ProtocolError::PayloadTooLarge`] if the payload plus
/// envelope exceeds [`Packet::MAX_SIZE`].
pub fn server_data(connection_id: u64, packet_number: u32, payload_len: usize) -> Result<Packet> {
    let mut packet = Packet::with_payload(payload_len);
    packet.push_frame(single_byte_stream_frame(SERVER_STREAM_ID))?;
    packet.push_header(ShortHeader::new(connection_id, packet_number))?;
    Ok(packet)
}
