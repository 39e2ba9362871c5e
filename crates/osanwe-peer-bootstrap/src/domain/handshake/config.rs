//! Handshake configuration.

use std::time::Duration;

/// Configuration for both greeting roles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandshakeConfig {
    /// Version we put in outgoing requests.
    pub protocol_version: u32,
    /// Oldest caller version we answer.
    pub min_protocol_version: u32,
    /// Upper bound on one exchange, either role.
    pub timeout: Duration,
    /// Add inbound callers to the address book.
    pub register_inbound: bool,
    /// Largest frame accepted from a peer, in bytes.
    pub max_frame_size: usize,
}

impl Default for HandshakeConfig {
    fn default() -> Self {
        Self {
            protocol_version: super::PROTOCOL_VERSION,
            min_protocol_version: 1,
            timeout: Duration::from_secs(10),
            register_inbound: true,
            max_frame_size: 64 * 1024,
        }
    }
}

impl HandshakeConfig {
    /// Testing config
    #[cfg(any(test, feature = "test-utils"))]
    pub fn for_testing() -> Self {
        Self {
            timeout: Duration::from_secs(2),
            ..Self::default()
        }
    }
}
