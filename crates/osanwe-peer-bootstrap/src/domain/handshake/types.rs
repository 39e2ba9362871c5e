//! Greeting message types.

use serde::{Deserialize, Serialize};
use std::net::{Ipv4Addr, SocketAddrV4};

use crate::domain::PublicKey;

/// Protocol version this build speaks.
pub const PROTOCOL_VERSION: u32 = 1;

/// Caller -> acceptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GreetingRequest {
    /// Caller's protocol version.
    pub version: u32,
    /// Port the caller listens on (0 = not listening).
    pub port: u16,
    /// Caller's public key.
    pub public_key: PublicKey,
}

impl GreetingRequest {
    /// Request at the current protocol version.
    pub fn new(port: u16, public_key: PublicKey) -> Self {
        Self {
            version: PROTOCOL_VERSION,
            port,
            public_key,
        }
    }
}

/// Acceptor -> caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GreetingResponse {
    /// Network-layer source address of the caller's connection.
    pub observed_address: Ipv4Addr,
    /// Port the caller claimed to listen on.
    pub observed_port: u16,
    /// Whether the acceptor considers the caller reachable.
    pub visible: bool,
}

impl GreetingResponse {
    /// The caller's externally visible endpoint.
    pub fn observed_endpoint(&self) -> SocketAddrV4 {
        SocketAddrV4::new(self.observed_address, self.observed_port)
    }
}
