//! Turmoil UDP socket carrying one packet per datagram.

use std::{io, net::SocketAddr};

use quicsim_proto::{Packet, ProtocolError};
use turmoil::net::UdpSocket;

/// Map a codec failure onto the I/O error type sockets report.
#[must_use]
pub fn invalid_data(err: ProtocolError) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, err)
}

/// Simulated UDP endpoint for quicsim packets.
///
/// Datagram boundaries are packet boundaries: each `send_packet` emits one
/// datagram and each `recv_packet` returns one packet.
pub struct SimSocket {
    socket: UdpSocket,
    /// Reused for every datagram; sized for the largest packet
    recv_buf: Box<[u8]>,
}

impl SimSocket {
    /// Binds to the specified address (e.g. `"0.0.0.0:443"`).
    ///
    /// # Errors
    ///
    /// Returns error if the address is in use or malformed.
    pub async fn bind(address: &str) -> io::Result<Self> {
        let socket = UdpSocket::bind(address).await?;
        Ok(Self { socket, recv_buf: vec![0u8; Packet::MAX_SIZE].into_boxed_slice() })
    }

    /// Address this socket is bound to
    ///
    /// # Errors
    ///
    /// Propagates the socket's error.
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.socket.local_addr()
    }

    /// Send a packet as a single datagram.
    ///
    /// Returns the number of bytes sent.
    ///
    /// # Errors
    ///
    /// Returns error if the datagram could not be sent or was cut short.
    pub async fn send_packet(&self, packet: &Packet, target: SocketAddr) -> io::Result<usize> {
        let sent = self.socket.send_to(packet.as_bytes(), target).await?;
        if sent != packet.len() {
            return Err(io::Error::new(
                io::ErrorKind::WriteZero,
                format!("sent {sent} of {} bytes", packet.len()),
            ));
        }

        tracing::debug!(bytes = sent, %target, "sent packet");
        Ok(sent)
    }

    /// Receive the next datagram as a packet.
    ///
    /// # Errors
    ///
    /// Returns error if the socket fails.
    pub async fn recv_packet(&mut self) -> io::Result<(Packet, SocketAddr)> {
        let (len, from) = self.socket.recv_from(&mut self.recv_buf).await?;

        tracing::debug!(bytes = len, %from, "received packet");
        Ok((Packet::from_bytes(&self.recv_buf[..len]), from))
    }
}
