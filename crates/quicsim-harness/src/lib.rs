//! Deterministic simulation harness for quicsim packets.
//!
//! This crate moves [`quicsim_proto::Packet`]s between Turmoil hosts over
//! simulated UDP, with virtual time and seeded randomness, so packet sizes
//! and the header/frame envelope can be checked end to end under
//! reproducible network conditions.
//!
//! It builds the same packets the simulated QUIC endpoints exchange (see
//! [`handshake`]) but does not reproduce the protocol engine behind them.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod handshake;
pub mod scenario;
pub mod sim_env;
pub mod sim_socket;

pub use config::SimConfig;
pub use sim_env::SimEnv;
pub use sim_socket::SimSocket;
