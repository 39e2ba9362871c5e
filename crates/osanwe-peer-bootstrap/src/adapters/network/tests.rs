//! Tests for Network Adapters

use super::*;
use crate::domain::{HandshakeConfig, SeedDefinition, TransportError};
use crate::ports::{ConfigProvider, TimeSource, Transport};
use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

#[test]
fn test_system_time_source_returns_nanoseconds() {
    let source = SystemTimeSource::new();
    let now = source.now();
    // After ~2024, and clearly not seconds
    assert!(now.as_secs() > 1_700_000_000);
    assert!(now.as_nanos() > 1_700_000_000_000_000_000);
}

#[test]
fn test_system_time_source_is_monotonic() {
    let source = SystemTimeSource::new();
    let t1 = source.now();
    let t2 = source.now();
    assert!(t2 >= t1);
}

#[test]
fn test_discovered_addresses_are_usable() {
    let discovered = discover_local_ipv4();
    for ip in &discovered {
        assert!(!ip.is_loopback(), "loopback {ip} discovered");
        assert!(!ip.is_unspecified(), "wildcard {ip} discovered");
    }
    let unique: std::collections::HashSet<_> = discovered.iter().collect();
    assert_eq!(unique.len(), discovered.len());
}

#[test]
fn test_interface_filter_keeps_order_and_drops_loopback() {
    use std::net::{IpAddr, Ipv6Addr};

    let eth0 = Ipv4Addr::new(192, 168, 1, 20);
    let wlan0 = Ipv4Addr::new(10, 0, 0, 7);
    let addresses = [
        IpAddr::V4(Ipv4Addr::LOCALHOST),
        IpAddr::V4(eth0),
        IpAddr::V6(Ipv6Addr::LOCALHOST),
        IpAddr::V4(Ipv4Addr::UNSPECIFIED),
        IpAddr::V4(wlan0),
        IpAddr::V4(eth0),
    ];

    assert_eq!(interfaces::usable_ipv4(addresses), vec![eth0, wlan0]);
}

#[test]
fn test_static_config_provider_defaults() {
    let provider = StaticConfigProvider::new();
    assert_eq!(provider.seed(), SeedDefinition::default());
    assert_eq!(provider.handshake_config(), HandshakeConfig::default());
    assert!(provider.bind_addresses().is_empty());
    assert_eq!(provider.port_override(), None);
}

#[test]
fn test_toml_config_full() {
    let toml = r#"
        [seed]
        address = "10.1.2.3:4000"
        x = "01"
        y = "02"

        [handshake]
        min_protocol_version = 2
        timeout_secs = 3
        register_inbound = false

        [network]
        bind = ["192.168.1.10", "10.0.0.5"]
        port = 12345
    "#;

    let provider = TomlConfigProvider::parse(toml).unwrap();
    assert_eq!(provider.seed().address.to_string(), "10.1.2.3:4000");

    let hs = provider.handshake_config();
    assert_eq!(hs.min_protocol_version, 2);
    assert_eq!(hs.protocol_version, 1);
    assert_eq!(hs.timeout, Duration::from_secs(3));
    assert!(!hs.register_inbound);

    assert_eq!(
        provider.bind_addresses(),
        vec![Ipv4Addr::new(192, 168, 1, 10), Ipv4Addr::new(10, 0, 0, 5)]
    );
    assert_eq!(provider.port_override(), Some(12345));
}

#[test]
fn test_toml_config_empty_uses_defaults() {
    let provider = TomlConfigProvider::parse("").unwrap();
    assert_eq!(provider.seed(), SeedDefinition::default());
    assert_eq!(provider.handshake_config(), HandshakeConfig::default());
}

#[test]
fn test_toml_config_rejects_bad_values() {
    assert!(matches!(
        TomlConfigProvider::parse("[network]\nbind = [\"::1\"]"),
        Err(ConfigError::Invalid(_))
    ));
    assert!(matches!(
        TomlConfigProvider::parse("[seed]\naddress = \"x\"\nx = \"01\"\ny = \"02\""),
        Err(ConfigError::Invalid(_))
    ));
    assert!(matches!(
        TomlConfigProvider::parse("[handshake\n"),
        Err(ConfigError::Parse(_))
    ));
}

#[test]
fn test_toml_config_missing_file() {
    let result = TomlConfigProvider::load("/nonexistent/osanwe.toml");
    assert!(matches!(result, Err(ConfigError::Io { .. })));
}

// =============================================================================
// TCP transport
// =============================================================================

fn loopback() -> SocketAddr {
    SocketAddr::from((Ipv4Addr::LOCALHOST, 0))
}

#[tokio::test]
async fn test_tcp_frames_round_trip_over_loopback() {
    let transport = TcpTransport::new();
    let mut acceptor = transport.listen(loopback()).await.unwrap();
    let server_addr = acceptor.local_addr();
    assert_ne!(server_addr.port(), 0);

    let server = tokio::spawn(async move {
        let mut conn = acceptor.accept().await.unwrap();
        let frame = conn.recv_frame().await.unwrap();
        conn.send_frame(&frame).await.unwrap();
        conn.peer_addr()
    });

    let mut client = transport.connect(server_addr).await.unwrap();
    client.send_frame(b"hello").await.unwrap();
    assert_eq!(client.recv_frame().await.unwrap(), b"hello".to_vec());

    let observed = server.await.unwrap();
    assert_eq!(observed, client.local_addr());
}

#[tokio::test]
async fn test_tcp_oversized_frame_rejected() {
    let small = TcpTransport::with_max_frame_size(8);
    let mut acceptor = small.listen(loopback()).await.unwrap();
    let server_addr = acceptor.local_addr();

    let server = tokio::spawn(async move {
        let mut conn = acceptor.accept().await.unwrap();
        conn.recv_frame().await
    });

    let mut client = TcpTransport::new().connect(server_addr).await.unwrap();
    client.send_frame(&[0u8; 32]).await.unwrap();

    assert_eq!(
        server.await.unwrap(),
        Err(TransportError::FrameTooLarge { size: 32, max: 8 })
    );
}

#[tokio::test]
async fn test_tcp_oversized_send_rejected_locally() {
    let small = TcpTransport::with_max_frame_size(8);
    let acceptor = small.listen(loopback()).await.unwrap();

    let mut client = small.connect(acceptor.local_addr()).await.unwrap();
    assert_eq!(
        client.send_frame(&[0u8; 9]).await,
        Err(TransportError::FrameTooLarge { size: 9, max: 8 })
    );
}

#[tokio::test]
async fn test_tcp_closed_connection() {
    let transport = TcpTransport::new();
    let mut acceptor = transport.listen(loopback()).await.unwrap();
    let server_addr = acceptor.local_addr();

    let server = tokio::spawn(async move {
        let mut conn = acceptor.accept().await.unwrap();
        conn.recv_frame().await
    });

    let client = transport.connect(server_addr).await.unwrap();
    drop(client);

    assert_eq!(server.await.unwrap(), Err(TransportError::Closed));
}

#[tokio::test]
async fn test_tcp_bind_conflict_reports_bind_error() {
    let transport = TcpTransport::new();
    let first = transport.listen(loopback()).await.unwrap();
    let taken = first.local_addr();

    let second = transport.listen(taken).await;
    assert!(matches!(second, Err(TransportError::Bind { addr, .. }) if addr == taken));
}
