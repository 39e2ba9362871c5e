//! # Network Adapters
//!
//! Production adapters for talking to other nodes.
//!
//! ## Adapters Provided
//!
//! - `SystemTimeSource` - Production time source using system clock
//! - `StaticConfigProvider` - In-code configuration
//! - `TcpTransport` - Length-prefixed TCP frames (requires "network" feature)
//! - `TomlConfigProvider` - Config file loading (requires "network" feature)
//! - `discover_local_ipv4` - Non-loopback IPv4 addresses of every interface
//!
//! ## Feature Flags
//!
//! - `network` - Enables the TCP transport and config file parsing

// Semantic submodules
/// Configuration providers
pub mod config;
/// Local address discovery
pub mod interfaces;
/// Time source adapters
pub mod time;
/// Transport adapters
pub mod transport;

// Re-export public API
pub use config::StaticConfigProvider;
pub use interfaces::discover_local_ipv4;
pub use time::SystemTimeSource;

#[cfg(feature = "network")]
pub use config::{ConfigError, TomlConfigProvider};

#[cfg(feature = "network")]
pub use transport::{TcpAcceptor, TcpConnection, TcpTransport, DEFAULT_MAX_FRAME_SIZE};

#[cfg(test)]
mod tests;
