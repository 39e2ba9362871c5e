//! # Adapters Layer
//!
//! Concrete implementations of the outbound ports.
//!
//! - `storage` - In-memory and file-backed key-value stores
//! - `codec` - Versioned bincode encoding
//! - `network` - TCP transport, clock, configuration, local address discovery

pub mod codec;
pub mod network;
pub mod storage;

pub use codec::{BincodeCodec, CODEC_VERSION};
pub use network::{discover_local_ipv4, StaticConfigProvider, SystemTimeSource};
pub use storage::{FileBackedKvStore, InMemoryKvStore};

#[cfg(feature = "network")]
pub use network::{ConfigError, TcpTransport, TomlConfigProvider};
