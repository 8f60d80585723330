//! Client and server drivers for a single simulated transfer.
//!
//! The client sends one hello to `server` and then reads data packets until
//! the configured budget has arrived. The server waits for a hello, then
//! answers with the data packets [`SimConfig::payload_sizes`] describes.
//!
//! ```text
//! client                          server
//!   | -- long header + stream 0 --> |
//!   | <-- short header + stream 2 - |  x N
//! ```

use std::{io, net::SocketAddr};

use quicsim_proto::{Frame, Header, LongHeader, Packet};

use crate::{
    SimConfig, SimEnv, SimSocket,
    config::MAX_SEND_SIZE,
    handshake::{self, CLIENT_STREAM_ID, SERVER_STREAM_ID},
    sim_socket::invalid_data,
};

/// What one side of a transfer saw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transfer {
    /// Connection the packets belonged to
    pub connection_id: u64,
    /// Data packets sent or received
    pub packets: u32,
    /// Application payload bytes, excluding headers and frames
    pub payload_bytes: u64,
}

/// Check that a transfer ends and that every data packet fits a datagram.
fn require_budget(config: &SimConfig) -> io::Result<()> {
    if config.max_bytes == 0 || config.send_size == 0 {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "a transfer needs a non-zero send_size and max_bytes",
        ));
    }
    if config.send_size > MAX_SEND_SIZE {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("send_size {} exceeds {MAX_SEND_SIZE}", config.send_size),
        ));
    }
    Ok(())
}

fn protocol_violation(message: String) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, message)
}

/// Validate a hello and return its header.
fn accept_hello(mut packet: Packet) -> io::Result<LongHeader> {
    let header = match packet.pop_header().map_err(invalid_data)? {
        Header::Long(header) => header,
        Header::Short(header) => {
            return Err(protocol_violation(format!("expected hello, got {header}")));
        },
    };

    match packet.pop_frame().map_err(invalid_data)? {
        Frame::Stream(frame) if frame.stream_id() == CLIENT_STREAM_ID => Ok(header),
        other => Err(protocol_violation(format!("unexpected hello frame: {other}"))),
    }
}

/// Serve one transfer on `config.server_port`.
///
/// # Errors
///
/// Returns error if the socket fails, the budget is unbounded or does not fit
/// a datagram, or the first datagram is not a client hello.
pub async fn server(config: SimConfig) -> io::Result<Transfer> {
    require_budget(&config)?;

    let mut socket = SimSocket::bind(&format!("0.0.0.0:{}", config.server_port)).await?;
    let (hello, client) = socket.recv_packet().await?;
    let header = accept_hello(hello)?;
    let connection_id = header.connection_id();

    tracing::info!(connection_id, %client, hello = %header, "accepted connection");

    let mut transfer = Transfer { connection_id, packets: 0, payload_bytes: 0 };
    for (packet_number, payload_len) in (1u32..).zip(config.payload_sizes()) {
        let packet = handshake::server_data(connection_id, packet_number, payload_len)
            .map_err(invalid_data)?;
        socket.send_packet(&packet, client).await?;

        transfer.packets += 1;
        transfer.payload_bytes += payload_len as u64;
    }

    tracing::info!(packets = transfer.packets, bytes = transfer.payload_bytes, "transfer sent");
    Ok(transfer)
}

/// Open a connection to `server` and receive one transfer.
///
/// # Errors
///
/// Returns error if the socket fails, the budget is unbounded or does not fit
/// a datagram, or a reply is not a data packet for this connection.
pub async fn client(config: SimConfig, server: SocketAddr) -> io::Result<Transfer> {
    require_budget(&config)?;

    let env = SimEnv::with_seed(config.seed);
    let connection_id = env.random_connection_id();

    let mut socket = SimSocket::bind("0.0.0.0:0").await?;
    let hello = handshake::client_hello(connection_id, config.hello_type).map_err(invalid_data)?;
    socket.send_packet(&hello, server).await?;

    let started = env.now();
    let mut transfer = Transfer { connection_id, packets: 0, payload_bytes: 0 };
    while transfer.payload_bytes < config.max_bytes {
        let (mut packet, _) = socket.recv_packet().await?;

        let header = packet.pop_short_header().map_err(invalid_data)?;
        if header.connection_id() != connection_id {
            return Err(protocol_violation(format!("packet for another connection: {header}")));
        }
        let frame = packet.pop_stream_frame().map_err(invalid_data)?;
        if frame.stream_id() != SERVER_STREAM_ID {
            return Err(protocol_violation(format!("unexpected data frame: {frame}")));
        }

        transfer.packets += 1;
        transfer.payload_bytes += packet.len() as u64;
    }

    tracing::info!(
        packets = transfer.packets,
        bytes = transfer.payload_bytes,
        elapsed = ?env.now().duration_since(started),
        "transfer received"
    );
    Ok(transfer)
}
