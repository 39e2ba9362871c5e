//! # Driven Ports (Outbound SPI)
//!
//! These are the interfaces this subsystem **requires** the host application to implement:
//! durable storage, a binary codec, a connection-oriented transport, a clock
//! and a configuration source.

use async_trait::async_trait;
use std::net::{Ipv4Addr, SocketAddr};

use crate::domain::{
    GreetingRequest, GreetingResponse, HandshakeConfig, PeerRecord, SeedDefinition, Timestamp,
};

pub use crate::domain::{CodecError, StoreError, TransportError};

/// Logical partitions of the durable store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Namespace {
    /// Local node state (`mynodekeys`, `mynodeindb`, `portindb`).
    Settings,
    /// Address book, keyed by node id.
    PeerRecords,
}

impl Namespace {
    /// Every namespace, in a stable order.
    pub const ALL: [Namespace; 2] = [Namespace::Settings, Namespace::PeerRecords];

    /// Stable on-disk name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Namespace::Settings => "settings",
            Namespace::PeerRecords => "peer_records",
        }
    }
}

/// All `(key, value)` pairs of one namespace.
pub type ScanResult = Vec<(Vec<u8>, Vec<u8>)>;

/// Abstract interface for the embedded key-value store.
///
/// # Durability
///
/// `put` is transactional per call: when it returns `Ok`, the value is
/// durable; when it fails or the process crashes mid-call, the previous value
/// is still readable. Nothing is torn.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`; the registry calls `put` while
/// holding its write lock and handshake tasks read concurrently.
pub trait KeyValueStore: Send + Sync {
    /// Read a value.
    fn get(&self, namespace: Namespace, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError>;

    /// Write a value, replacing any previous one.
    fn put(&self, namespace: Namespace, key: &[u8], value: &[u8]) -> Result<(), StoreError>;

    /// Read every entry of a namespace.
    fn scan(&self, namespace: Namespace) -> Result<ScanResult, StoreError>;
}

/// Binary codec for everything that is stored or sent.
pub trait RecordCodec: Send + Sync {
    /// Serialize an address book record.
    fn encode_record(&self, record: &PeerRecord) -> Result<Vec<u8>, CodecError>;
    /// Deserialize an address book record.
    fn decode_record(&self, bytes: &[u8]) -> Result<PeerRecord, CodecError>;
    /// Serialize a greeting request.
    fn encode_request(&self, request: &GreetingRequest) -> Result<Vec<u8>, CodecError>;
    /// Deserialize a greeting request.
    fn decode_request(&self, bytes: &[u8]) -> Result<GreetingRequest, CodecError>;
    /// Serialize a greeting response.
    fn encode_response(&self, response: &GreetingResponse) -> Result<Vec<u8>, CodecError>;
    /// Deserialize a greeting response.
    fn decode_response(&self, bytes: &[u8]) -> Result<GreetingResponse, CodecError>;
}

/// One established, message-framed connection.
#[async_trait]
pub trait Connection: Send {
    /// Network-layer address of the remote side. Authoritative.
    fn peer_addr(&self) -> SocketAddr;

    /// Local side of the connection.
    fn local_addr(&self) -> SocketAddr;

    /// Send one framed message.
    async fn send_frame(&mut self, payload: &[u8]) -> Result<(), TransportError>;

    /// Receive one framed message.
    async fn recv_frame(&mut self) -> Result<Vec<u8>, TransportError>;
}

/// A bound listening endpoint.
#[async_trait]
pub trait Acceptor: Send {
    /// Address actually bound (port resolved if 0 was requested).
    fn local_addr(&self) -> SocketAddr;

    /// Wait for the next inbound connection.
    async fn accept(&mut self) -> Result<Box<dyn Connection>, TransportError>;
}

/// Connection-oriented transport. The handshake is written once against this.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Dial a remote endpoint.
    async fn connect(&self, addr: SocketAddr) -> Result<Box<dyn Connection>, TransportError>;

    /// Bind a local endpoint.
    async fn listen(&self, addr: SocketAddr) -> Result<Box<dyn Acceptor>, TransportError>;
}

/// Abstract interface for time-related operations.
///
/// Enables deterministic testing by injecting controllable time sources.
/// Production implementations use system time; tests use fixed timestamps.
pub trait TimeSource: Send + Sync {
    /// Get the current timestamp.
    fn now(&self) -> Timestamp;
}

/// Abstract interface for configuration loading.
///
/// Allows different configuration sources (file, environment, etc.)
pub trait ConfigProvider: Send + Sync {
    /// Bootstrap contact for an empty address book.
    fn seed(&self) -> SeedDefinition;

    /// Greeting parameters.
    fn handshake_config(&self) -> HandshakeConfig;

    /// Explicit bind addresses; empty means "derive from the node".
    fn bind_addresses(&self) -> Vec<Ipv4Addr>;

    /// Port to use instead of the persisted one.
    fn port_override(&self) -> Option<u16>;
}
