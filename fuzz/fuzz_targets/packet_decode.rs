//! Random-input fuzzer for packet decoding.
//!
//! Arbitrary bytes must never panic the decoders. Whatever decodes must
//! re-encode to the same number of bytes it consumed.

#![no_main]

use libfuzzer_sys::fuzz_target;
use quicsim_proto::{Frame, Packet, ProtocolError};

fuzz_target!(|data: &[u8]| {
    let mut packet = Packet::from_bytes(data);

    let header = match packet.pop_header() {
        Ok(header) => header,
        Err(ProtocolError::PacketTooShort { actual, .. }) => {
            assert_eq!(actual, data.len());
            return;
        },
        Err(ProtocolError::InvalidHeaderForm(form)) => {
            assert!(form > 1);
            return;
        },
        Err(other) => panic!("unexpected header error: {other}"),
    };
    assert_eq!(packet.len(), data.len() - 20);

    let mut rebuilt = Packet::new();
    rebuilt.push_header(header).expect("header fits");
    assert_eq!(Packet::from_bytes(rebuilt.as_bytes()).pop_header(), Ok(header));

    // Each frame either decodes and is removed, or the rest is too short
    while !packet.is_empty() {
        let before = packet.len();
        match packet.pop_frame() {
            Ok(Frame::Stream(_)) => assert_eq!(packet.len(), before - 17),
            Ok(Frame::Base(_)) => assert_eq!(packet.len(), before - 42),
            Err(ProtocolError::PacketTooShort { .. }) => break,
            Err(other) => panic!("unexpected frame error: {other}"),
        }
    }
});
