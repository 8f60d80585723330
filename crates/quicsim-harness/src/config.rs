//! Harness configuration.

use quicsim_proto::{LongPacketType, Packet};
use serde::Deserialize;

use crate::handshake::SERVER_DATA_OVERHEAD;

/// Largest `send_size` whose data packets still fit in one datagram
pub const MAX_SEND_SIZE: usize = Packet::MAX_SIZE - SERVER_DATA_OVERHEAD;

/// Parameters of a simulated transfer.
///
/// Every field has a default, so a partial document (or none at all) is
/// enough:
///
/// ```
/// use quicsim_proto::LongPacketType;
///
/// let config = quicsim_harness::SimConfig {
///     hello_type: LongPacketType::ClientCleartext,
///     ..Default::default()
/// };
/// assert_eq!(config.server_port, 443);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// UDP port the server binds
    pub server_port: u16,
    /// Application payload bytes per data packet
    pub send_size: usize,
    /// Total payload bytes the server sends; `0` means unlimited
    pub max_bytes: u64,
    /// Long packet type of the client's opening packet: `ClientInitial`
    /// (2) for a full handshake, `ClientCleartext` (5) for 0-RTT
    pub hello_type: LongPacketType,
    /// Seed for the client's connection ID
    pub seed: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            server_port: 443,
            send_size: 512,
            max_bytes: 4096,
            hello_type: LongPacketType::ClientInitial,
            seed: 0,
        }
    }
}

impl SimConfig {
    /// Payload size of each data packet the server sends, in order.
    ///
    /// Packets are `send_size` bytes until the budget runs out; the last one
    /// carries the remainder. Unbounded when `max_bytes` is `0`, and empty
    /// when `send_size` is `0`.
    pub fn payload_sizes(&self) -> impl Iterator<Item = usize> + use<> {
        let send_size = self.send_size;
        let max_bytes = self.max_bytes;
        let mut sent: u64 = 0;

        std::iter::from_fn(move || {
            if send_size == 0 || (max_bytes > 0 && sent >= max_bytes) {
                return None;
            }
            let mut next = send_size as u64;
            if max_bytes > 0 {
                next = next.min(max_bytes - sent);
            }
            sent += next;
            usize::try_from(next).ok()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn budget_splits_evenly() {
        let config = SimConfig { send_size: 512, max_bytes: 2048, ..Default::default() };
        assert_eq!(config.payload_sizes().collect::<Vec<_>>(), vec![512; 4]);
    }

    #[test]
    fn last_packet_carries_remainder() {
        let config = SimConfig { send_size: 512, max_bytes: 1100, ..Default::default() };
        assert_eq!(config.payload_sizes().collect::<Vec<_>>(), vec![512, 512, 76]);
    }

    #[test]
    fn zero_max_bytes_is_unbounded() {
        let config = SimConfig { send_size: 10, max_bytes: 0, ..Default::default() };
        assert_eq!(config.payload_sizes().take(1000).count(), 1000);
    }

    #[test]
    fn partial_document_keeps_defaults() {
        use serde::de::value::{Error, MapDeserializer};

        let fields = [("send_size", 1000u64), ("max_bytes", 2500), ("hello_type", 5)];
        let config = SimConfig::deserialize(MapDeserializer::<_, Error>::new(fields.into_iter()))
            .unwrap();
        assert_eq!(
            config,
            SimConfig {
                send_size: 1000,
                max_bytes: 2500,
                hello_type: LongPacketType::ClientCleartext,
                ..Default::default()
            }
        );
    }

    #[test]
    fn unknown_hello_type_is_rejected() {
        use serde::de::value::{Error, MapDeserializer};

        let fields = [("hello_type", 10u64)];
        let result = SimConfig::deserialize(MapDeserializer::<_, Error>::new(fields.into_iter()));
        assert!(result.is_err());
    }

    #[test]
    fn zero_send_size_sends_nothing() {
        let config = SimConfig { send_size: 0, ..Default::default() };
        assert_eq!(config.payload_sizes().next(), None);
    }
}
