//! Core Domain Entities for Peer Bootstrap

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::Hash;
use std::net::{Ipv4Addr, SocketAddrV4};

/// Public key of a peer: canonical, fixed-width P-256 (X, Y) coordinates.
pub use shared_crypto::P256PublicKey as PublicKey;

/// 256-bit node identifier: `SHA-256(X || Y)` of the node's public key.
///
/// # Security
///
/// This type implements constant-time comparison to prevent timing attacks.
/// Standard `PartialEq` for byte arrays short-circuits on first difference.
// SAFETY: derived_hash_with_manual_eq is intentionally allowed here.
// Equal NodeIds (same bytes) hash identically; only the comparison is
// made constant-time.
#[allow(clippy::derived_hash_with_manual_eq)]
#[derive(Clone, Copy, Hash, Serialize, Deserialize)]
pub struct NodeId(pub [u8; 32]);

impl PartialEq for NodeId {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        let mut result = 0u8;
        for (a, b) in self.0.iter().zip(other.0.iter()) {
            result |= a ^ b;
        }
        result == 0
    }
}

impl Eq for NodeId {}

impl NodeId {
    /// Create a NodeId from raw 32-byte array.
    pub fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Derive the NodeId of a public key.
    pub fn from_public_key(public_key: &PublicKey) -> Self {
        Self(public_key.to_node_id())
    }

    /// Get the underlying bytes (also the durable store key).
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Short hex prefix for log lines.
    pub fn short(&self) -> String {
        hex::encode(&self.0[..8])
    }
}

impl AsRef<[u8]> for NodeId {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.short())
    }
}

/// Wall-clock timestamp in nanoseconds since the Unix epoch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(u64);

impl Timestamp {
    /// The epoch; used for "never seen".
    pub const ZERO: Timestamp = Timestamp(0);

    /// Create from nanoseconds since the epoch.
    pub fn from_nanos(nanos: u64) -> Self {
        Self(nanos)
    }

    /// Create from whole seconds since the epoch (saturating).
    pub fn from_secs(secs: u64) -> Self {
        Self(secs.saturating_mul(1_000_000_000))
    }

    /// Nanoseconds since the epoch.
    pub fn as_nanos(&self) -> u64 {
        self.0
    }

    /// Whole seconds since the epoch.
    pub fn as_secs(&self) -> u64 {
        self.0 / 1_000_000_000
    }
}

/// One entry of the address book.
///
/// `id` is derived from `public_key` and never assigned independently: two
/// records with the same key are the same peer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeerRecord {
    id: NodeId,
    /// Peer's public key.
    pub public_key: PublicKey,
    /// IPv4 addresses in preference order.
    pub addresses: Vec<Ipv4Addr>,
    /// Listening port; 0 means not yet known.
    pub port: u16,
    /// Last successful interaction.
    pub last_activity: Timestamp,
    /// Liveness flag.
    pub active: bool,
}

impl PeerRecord {
    /// Create a record, deriving its id from the public key.
    pub fn new(
        public_key: PublicKey,
        addresses: Vec<Ipv4Addr>,
        port: u16,
        last_activity: Timestamp,
        active: bool,
    ) -> Self {
        Self {
            id: NodeId::from_public_key(&public_key),
            public_key,
            addresses,
            port,
            last_activity,
            active,
        }
    }

    /// Content-addressed primary key.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Whether the stored id matches the one derived from the public key.
    ///
    /// Only false for records decoded from foreign bytes.
    pub fn has_canonical_id(&self) -> bool {
        self.id == NodeId::from_public_key(&self.public_key)
    }

    /// Re-derive the id from the public key.
    #[must_use]
    pub fn with_canonical_id(mut self) -> Self {
        self.id = NodeId::from_public_key(&self.public_key);
        self
    }

    /// Dialable endpoints, in preference order. Empty while the port is unknown.
    pub fn endpoints(&self) -> Vec<SocketAddrV4> {
        if self.port == 0 {
            return Vec::new();
        }
        self.addresses
            .iter()
            .map(|ip| SocketAddrV4::new(*ip, self.port))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(val: u8) -> PublicKey {
        PublicKey::new([val; 32], [val.wrapping_add(1); 32])
    }

    #[test]
    fn test_node_id_equality() {
        let id1 = NodeId::new([1u8; 32]);
        let id2 = NodeId::new([1u8; 32]);
        let id3 = NodeId::new([2u8; 32]);

        assert_eq!(id1, id2);
        assert_ne!(id1, id3);
    }

    #[test]
    fn test_record_id_is_derived_from_key() {
        let record = PeerRecord::new(key(7), vec![], 0, Timestamp::ZERO, false);
        assert_eq!(record.id(), NodeId::from_public_key(&key(7)));
        assert!(record.has_canonical_id());
    }

    #[test]
    fn test_same_key_collapses_to_same_id() {
        let a = PeerRecord::new(key(3), vec![Ipv4Addr::new(10, 0, 0, 1)], 1, Timestamp::ZERO, true);
        let b = PeerRecord::new(key(3), vec![Ipv4Addr::new(10, 0, 0, 2)], 2, Timestamp::from_secs(5), false);
        assert_eq!(a.id(), b.id());
    }

    #[test]
    fn test_endpoints_require_known_port() {
        let mut record = PeerRecord::new(
            key(1),
            vec![Ipv4Addr::new(10, 0, 0, 1), Ipv4Addr::new(10, 0, 0, 2)],
            0,
            Timestamp::ZERO,
            true,
        );
        assert!(record.endpoints().is_empty());

        record.port = 9000;
        assert_eq!(
            record.endpoints(),
            vec![
                SocketAddrV4::new(Ipv4Addr::new(10, 0, 0, 1), 9000),
                SocketAddrV4::new(Ipv4Addr::new(10, 0, 0, 2), 9000),
            ]
        );
    }

    #[test]
    fn test_timestamp_units() {
        let ts = Timestamp::from_secs(3);
        assert_eq!(ts.as_nanos(), 3_000_000_000);
        assert_eq!(ts.as_secs(), 3);
        assert_eq!(Timestamp::from_secs(u64::MAX).as_nanos(), u64::MAX);
    }
}
