//! Tests for greeting validation and reflection

use super::*;
use crate::domain::{PublicKey, RejectReason};
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr, SocketAddrV4};

fn make_request(version: u32, port: u16) -> GreetingRequest {
    GreetingRequest {
        version,
        port,
        public_key: PublicKey::new([0xAA; 32], [0xBB; 32]),
    }
}

fn response(ip: [u8; 4], port: u16) -> GreetingResponse {
    GreetingResponse {
        observed_address: Ipv4Addr::from(ip),
        observed_port: port,
        visible: true,
    }
}

// =============================================================================
// TEST GROUP 1: Validation
// =============================================================================

#[test]
fn test_current_version_accepted() {
    let config = HandshakeConfig::default();
    assert_eq!(validate_greeting(&make_request(PROTOCOL_VERSION, 40000), &config), Ok(()));
}

#[test]
fn test_newer_version_accepted() {
    let config = HandshakeConfig::default();
    assert_eq!(validate_greeting(&make_request(PROTOCOL_VERSION + 5, 1), &config), Ok(()));
}

#[test]
fn test_old_version_rejected() {
    let config = HandshakeConfig {
        min_protocol_version: 2,
        ..HandshakeConfig::default()
    };
    assert_eq!(
        validate_greeting(&make_request(1, 40000), &config),
        Err(RejectReason::UnsupportedVersion { theirs: 1, min: 2 })
    );
}

#[test]
fn test_port_zero_is_valid() {
    let config = HandshakeConfig::default();
    assert_eq!(validate_greeting(&make_request(PROTOCOL_VERSION, 0), &config), Ok(()));
}

// =============================================================================
// TEST GROUP 2: Response construction
// =============================================================================

#[test]
fn test_response_uses_socket_address_and_claimed_port() {
    let source = SocketAddr::new(IpAddr::V4(Ipv4Addr::new(198, 51, 100, 7)), 51234);
    let resp = build_response(&make_request(PROTOCOL_VERSION, 40000), source).unwrap();

    assert_eq!(resp.observed_address, Ipv4Addr::new(198, 51, 100, 7));
    assert_eq!(resp.observed_port, 40000);
    assert!(resp.visible);
}

#[test]
fn test_ipv4_mapped_source_is_unwrapped() {
    let mapped = Ipv4Addr::new(203, 0, 113, 9).to_ipv6_mapped();
    let source = SocketAddr::new(IpAddr::V6(mapped), 1);
    let resp = build_response(&make_request(PROTOCOL_VERSION, 7), source).unwrap();

    assert_eq!(resp.observed_address, Ipv4Addr::new(203, 0, 113, 9));
}

#[test]
fn test_native_ipv6_source_rejected() {
    let source = SocketAddr::new(IpAddr::V6(Ipv6Addr::LOCALHOST), 1);
    assert_eq!(
        build_response(&make_request(PROTOCOL_VERSION, 7), source),
        Err(RejectReason::NonIpv4Source)
    );
}

// =============================================================================
// TEST GROUP 3: Reflection tally
// =============================================================================

#[test]
fn test_empty_tally_has_no_consensus() {
    assert_eq!(ReflectionTally::new().consensus(), None);
}

#[test]
fn test_majority_endpoint_wins() {
    let mut tally = ReflectionTally::new();
    tally.record(&response([1, 1, 1, 1], 4000));
    tally.record(&response([2, 2, 2, 2], 4000));
    tally.record(&response([2, 2, 2, 2], 4000));

    assert_eq!(tally.reports(), 3);
    assert_eq!(
        tally.consensus(),
        Some(SocketAddrV4::new(Ipv4Addr::new(2, 2, 2, 2), 4000))
    );
}

#[test]
fn test_tie_goes_to_first_report() {
    let mut tally = ReflectionTally::new();
    tally.record(&response([9, 9, 9, 9], 1));
    tally.record(&response([8, 8, 8, 8], 1));

    assert_eq!(
        tally.consensus(),
        Some(SocketAddrV4::new(Ipv4Addr::new(9, 9, 9, 9), 1))
    );
}
