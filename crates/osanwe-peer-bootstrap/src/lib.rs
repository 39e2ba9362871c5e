//! # Osanwe Peer Bootstrap
//!
//! The bootstrap layer of the Osanwe overlay: everything a node needs before
//! it can talk to anyone.
//!
//! - a durable P-256 identity whose node id is `SHA-256(X || Y)` of the public key
//! - an address book that survives restarts, deduplicated by node id and
//!   indexed by IPv4
//! - a listener that prefers the same port across restarts
//! - a greeting handshake that tells a caller its externally visible endpoint
//!   and lets the acceptor learn live contacts
//!
//! ## Architecture
//!
//! The crate follows Hexagonal Architecture with:
//! - **Domain Layer:** Entities, identity, address book indices, greeting validation
//! - **Ports Layer:** Trait definitions for storage, codec, transport, clock, config
//! - **Service Layer:** Wires domain to ports
//! - **Adapters Layer:** Concrete implementations (TCP and TOML behind `network`)
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use osanwe_peer_bootstrap::adapters::{BincodeCodec, InMemoryKvStore, SystemTimeSource};
//! use osanwe_peer_bootstrap::ports::PeerRegistryApi;
//! use osanwe_peer_bootstrap::{IdentityManager, PeerRegistry, SeedDefinition};
//!
//! let store = Arc::new(InMemoryKvStore::new());
//! let codec = Arc::new(BincodeCodec::new());
//!
//! let identity = IdentityManager::restore(
//!     store.clone(),
//!     codec.clone(),
//!     &SystemTimeSource::new(),
//!     vec![],
//! )
//! .unwrap();
//!
//! let (registry, _report) = PeerRegistry::open(store, codec).unwrap();
//! registry.ensure_seeded(&SeedDefinition::default()).unwrap();
//!
//! assert_eq!(registry.all().len(), 1);
//! assert_eq!(identity.self_record().id(), identity.node_id());
//! ```

// =============================================================================
// CORE MODULES
// =============================================================================

pub mod domain;
pub mod ports;
pub mod service;

/// Adapters for storage, encoding and networking.
/// TCP transport and TOML config require feature: `network`
pub mod adapters;

/// Test utilities (FixedTimeSource, FailingKvStore, ScriptedConnection)
/// Requires feature: `test-utils`
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

// =============================================================================
// CORE RE-EXPORTS (Always Available)
// =============================================================================

// Domain entities
pub use domain::{NodeId, PeerRecord, PublicKey, Timestamp};

// Identity, handshake and seed
pub use domain::{
    build_response, derive_node_id, validate_greeting, GreetingRequest, GreetingResponse,
    HandshakeConfig, NodeIdentity, ReflectionTally, SeedDefinition, PROTOCOL_VERSION,
};

// Errors
pub use domain::{
    CodecError, HandshakeError, IdentityError, ListenerError, RegistryError, RejectReason,
    SeedError, StoreError, TransportError,
};

// Port traits
pub use ports::{
    Acceptor, ConfigProvider, Connection, KeyValueStore, Namespace, PeerRegistryApi, RecordCodec,
    TimeSource, Transport,
};

// Services
pub use service::{
    restore_identity, BoundListener, HandshakeHandler, IdentityManager, Listener, ListenerHandle,
    LoadReport, PeerRegistry, ReflectionReport,
};
