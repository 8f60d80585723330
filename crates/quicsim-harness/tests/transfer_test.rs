//! End-to-end transfers between a simulated client and server.
//!
//! These tests validate:
//! - The hello reaches the server as a long header + STREAM frame
//! - Data packets arrive with the configured payload sizes
//! - Both sides agree on the connection and byte count, even with latency

use std::{
    io,
    net::SocketAddr,
    sync::{Arc, Mutex},
    time::Duration,
};

use quicsim_harness::{
    SimConfig, SimSocket,
    handshake::{self, SERVER_DATA_OVERHEAD},
    config::MAX_SEND_SIZE,
    scenario::{self, Transfer},
    sim_socket::invalid_data,
};
use quicsim_proto::{LongPacketType, Packet};

fn server_addr(config: &SimConfig) -> SocketAddr {
    SocketAddr::new(turmoil::lookup("server"), config.server_port)
}

/// Run one transfer and return what the server sent and the client saw.
fn run_transfer(mut sim: turmoil::Sim<'_>, config: SimConfig) -> (Transfer, Transfer) {
    let served = Arc::new(Mutex::new(None));
    let received = Arc::new(Mutex::new(None));

    let server_config = config.clone();
    let served_slot = Arc::clone(&served);
    sim.host("server", move || {
        let config = server_config.clone();
        let slot = Arc::clone(&served_slot);
        async move {
            let transfer = scenario::server(config).await?;
            *slot.lock().unwrap() = Some(transfer);
            Ok(())
        }
    });

    let received_slot = Arc::clone(&received);
    sim.client("client", async move {
        let server = server_addr(&config);
        let transfer = scenario::client(config, server).await?;
        *received_slot.lock().unwrap() = Some(transfer);
        Ok(())
    });

    sim.run().expect("simulation failed");

    let served = served.lock().unwrap().expect("server finished");
    let received = received.lock().unwrap().expect("client finished");
    (served, received)
}

#[test]
fn default_transfer_delivers_budget() {
    let sim = turmoil::Builder::new().build();
    let (served, received) = run_transfer(sim, SimConfig::default());

    assert_eq!(served, received);
    assert_eq!(received.packets, 8);
    assert_eq!(received.payload_bytes, 4096);
}

#[test]
fn last_packet_is_truncated() {
    let sim = turmoil::Builder::new().build();
    let config = SimConfig { send_size: 1000, max_bytes: 2500, ..Default::default() };
    let (served, received) = run_transfer(sim, config);

    assert_eq!(served, received);
    assert_eq!(received.packets, 3);
    assert_eq!(received.payload_bytes, 2500);
}

#[test]
fn transfer_survives_latency() {
    let sim = turmoil::Builder::new()
        .min_message_latency(Duration::from_millis(5))
        .max_message_latency(Duration::from_millis(50))
        .rng_seed(7)
        .build();
    let config = SimConfig {
        server_port: 4433,
        hello_type: LongPacketType::ClientCleartext,
        ..Default::default()
    };
    let (served, received) = run_transfer(sim, config);

    assert_eq!(served, received);
    assert_eq!(received.payload_bytes, 4096);
}

#[test]
fn zero_rtt_hello_is_client_cleartext() {
    let mut sim = turmoil::Builder::new().build();
    let config = SimConfig {
        hello_type: LongPacketType::ClientCleartext,
        send_size: 64,
        max_bytes: 64,
        ..Default::default()
    };

    sim.host("server", || async {
        let mut socket = SimSocket::bind("0.0.0.0:443").await?;
        let (mut hello, from) = socket.recv_packet().await?;

        let header = hello.pop_long_header().map_err(invalid_data)?;
        assert_eq!(header.packet_type(), Some(LongPacketType::ClientCleartext));
        assert_eq!(header.packet_number(), 0);

        let reply = handshake::server_data(header.connection_id(), 1, 64).map_err(invalid_data)?;
        let sent = socket.send_packet(&reply, from).await?;
        assert_eq!(sent, 64 + SERVER_DATA_OVERHEAD);
        Ok(())
    });

    sim.client("client", async move {
        let server = server_addr(&config);
        let transfer = scenario::client(config, server).await?;
        assert_eq!(transfer.packets, 1);
        assert_eq!(transfer.payload_bytes, 64);
        Ok(())
    });

    sim.run().expect("simulation failed");
}

#[test]
fn server_rejects_data_packet_as_hello() {
    let mut sim = turmoil::Builder::new().build();

    sim.host("server", || async {
        let result = scenario::server(SimConfig::default()).await;
        let err = result.expect_err("short header is not a hello");
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
        Ok(())
    });

    sim.client("client", async {
        let mut socket = SimSocket::bind("0.0.0.0:0").await?;
        let packet = handshake::server_data(1, 1, 16).map_err(invalid_data)?;
        socket.send_packet(&packet, server_addr(&SimConfig::default())).await?;
        // Give the server time to read the datagram before the run ends
        tokio::time::sleep(Duration::from_secs(1)).await;
        Ok(())
    });

    sim.run().expect("simulation failed");
}

#[test]
fn unbounded_budget_is_rejected() {
    let mut sim = turmoil::Builder::new().build();

    sim.client("client", async {
        let config = SimConfig { max_bytes: 0, ..Default::default() };
        let server = SocketAddr::from(([127, 0, 0, 1], config.server_port));
        let err = scenario::client(config, server).await.expect_err("needs a budget");
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
        Ok(())
    });

    sim.run().expect("simulation failed");
}

#[test]
fn undersized_datagram_is_invalid_data() {
    let mut sim = turmoil::Builder::new().build();

    sim.host("server", || async {
        let mut socket = SimSocket::bind("0.0.0.0:443").await?;
        let (_, from) = socket.recv_packet().await?;
        socket.send_packet(&Packet::with_payload(3), from).await?;
        Ok(())
    });

    sim.client("client", async {
        let config = SimConfig::default();
        let server = server_addr(&config);
        let err = scenario::client(config, server).await.expect_err("3 bytes is no header");
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
        Ok(())
    });

    sim.run().expect("simulation failed");
}

#[test]
fn same_seed_same_connection_id() {
    let run = |seed: u64| {
        let sim = turmoil::Builder::new().rng_seed(42).build();
        let config = SimConfig { seed, send_size: 256, max_bytes: 512, ..Default::default() };
        run_transfer(sim, config)
    };

    let (first_served, first) = run(7);
    let (_, second) = run(7);
    let (_, other) = run(8);

    assert_eq!(first_served.connection_id, first.connection_id);
    assert_eq!(first, second);
    assert_ne!(first.connection_id, other.connection_id);
}

#[test]
fn oversized_send_size_is_rejected_by_both_sides() {
    let config = SimConfig { send_size: MAX_SEND_SIZE + 1, ..Default::default() };
    let mut sim = turmoil::Builder::new().build();

    let server_config = config.clone();
    sim.host("server", move || {
        let config = server_config.clone();
        async move {
            let err = scenario::server(config).await.expect_err("packets would not fit");
            assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
            Ok(())
        }
    });

    sim.client("client", async move {
        let server = server_addr(&config);
        let err = scenario::client(config, server).await.expect_err("packets would not fit");
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
        Ok(())
    });

    sim.run().expect("simulation failed");
}
