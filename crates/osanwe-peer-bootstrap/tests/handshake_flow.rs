//! # Greeting Handshake over TCP
//!
//! Two in-process nodes on 127.0.0.1, each with its own in-memory store,
//! registry and listener, exchanging real greetings.

use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use std::sync::Arc;

use osanwe_peer_bootstrap::adapters::{BincodeCodec, InMemoryKvStore, TcpTransport};
use osanwe_peer_bootstrap::test_utils::FixedTimeSource;
use osanwe_peer_bootstrap::{
    HandshakeConfig, HandshakeHandler, IdentityManager, Listener, ListenerHandle, NodeId,
    PeerRecord, PeerRegistry, PeerRegistryApi, Timestamp, Transport,
};

struct TestNode {
    identity: Arc<IdentityManager>,
    registry: Arc<PeerRegistry>,
    handler: Arc<HandshakeHandler>,
    handle: ListenerHandle,
}

impl TestNode {
    async fn start(now_secs: u64) -> Self {
        let store = Arc::new(InMemoryKvStore::new());
        let codec = Arc::new(BincodeCodec::new());
        let time = Arc::new(FixedTimeSource::from_secs(now_secs));
        let transport = Arc::new(TcpTransport::new());

        let identity = Arc::new(
            IdentityManager::restore(
                store.clone(),
                codec.clone(),
                time.as_ref(),
                vec![Ipv4Addr::LOCALHOST],
            )
            .unwrap(),
        );
        let registry = Arc::new(PeerRegistry::new(store, codec.clone()));

        let bound = Listener::start(transport.as_ref(), &[Ipv4Addr::LOCALHOST], 0, &identity)
            .await
            .unwrap();
        let port = bound.local_addr().port();

        let handler = Arc::new(HandshakeHandler::new(
            Arc::clone(&identity),
            registry.clone(),
            codec,
            transport,
            time,
            HandshakeConfig::for_testing(),
            port,
        ));
        let handle = bound.serve(Arc::clone(&handler));

        Self {
            identity,
            registry,
            handler,
            handle,
        }
    }

    fn addr(&self) -> SocketAddr {
        self.handle.local_addr()
    }

    fn port(&self) -> u16 {
        self.addr().port()
    }

    fn as_peer(&self) -> PeerRecord {
        PeerRecord::new(
            self.identity.public_key(),
            vec![Ipv4Addr::LOCALHOST],
            self.port(),
            Timestamp::ZERO,
            false,
        )
    }
}

#[tokio::test]
async fn test_greeting_reflects_caller_and_registers_it() {
    let server = TestNode::start(1_000).await;
    let client = TestNode::start(2_000).await;

    let response = client.handler.greet(server.addr()).await.unwrap();

    assert_eq!(response.observed_address, Ipv4Addr::LOCALHOST);
    assert_eq!(response.observed_port, client.port());
    assert!(response.visible);

    let registered = server
        .registry
        .lookup_by_id(&client.identity.node_id())
        .expect("caller registered before response");
    assert_eq!(registered.addresses, vec![Ipv4Addr::LOCALHOST]);
    assert_eq!(registered.port, client.port());
    assert!(registered.active);
    assert_eq!(registered.last_activity, Timestamp::from_secs(1_000));

    server.handle.shutdown().await;
    client.handle.shutdown().await;
}

#[tokio::test]
async fn test_listener_persists_ephemeral_port() {
    let node = TestNode::start(1).await;
    assert_ne!(node.port(), 0);
    assert_eq!(node.identity.preferred_port().unwrap(), node.port());
    node.handle.shutdown().await;
}

#[tokio::test]
async fn test_reflection_pass_over_known_peers() {
    let a = TestNode::start(10).await;
    let b = TestNode::start(20).await;
    let c = TestNode::start(30).await;

    c.registry.upsert(a.as_peer()).unwrap();
    c.registry.upsert(b.as_peer()).unwrap();
    // Unreachable entry: port nobody listens on.
    let ghost = PeerRecord::new(
        osanwe_peer_bootstrap::NodeIdentity::generate().public_key(),
        vec![Ipv4Addr::LOCALHOST],
        1,
        Timestamp::ZERO,
        true,
    );
    c.registry.upsert(ghost.clone()).unwrap();

    let report = c.handler.greet_known_peers().await;

    assert_eq!(report.contacted, 2);
    assert_eq!(report.failed, 1);
    assert_eq!(
        report.external_address,
        Some(SocketAddrV4::new(Ipv4Addr::LOCALHOST, c.port()))
    );

    let seen_a = c.registry.lookup_by_id(&a.identity.node_id()).unwrap();
    assert!(seen_a.active);
    assert_eq!(seen_a.last_activity, Timestamp::from_secs(30));
    assert!(!c.registry.lookup_by_id(&ghost.id()).unwrap().active);

    // Both peers learned about c.
    assert!(a.registry.lookup_by_id(&c.identity.node_id()).is_some());
    assert!(b.registry.lookup_by_id(&c.identity.node_id()).is_some());

    for node in [a, b, c] {
        node.handle.shutdown().await;
    }
}

#[tokio::test]
async fn test_garbage_does_not_stop_accept_loop() {
    let server = TestNode::start(1).await;
    let client = TestNode::start(2).await;

    let transport = TcpTransport::new();
    let mut junk = transport.connect(server.addr()).await.unwrap();
    junk.send_frame(b"definitely not a greeting").await.unwrap();
    drop(junk);

    let response = client.handler.greet(server.addr()).await.unwrap();
    assert_eq!(response.observed_port, client.port());
    assert_eq!(server.registry.len(), 1);
    assert!(server
        .registry
        .lookup_by_id(&NodeId::from_public_key(&client.identity.public_key()))
        .is_some());

    server.handle.shutdown().await;
    client.handle.shutdown().await;
}
