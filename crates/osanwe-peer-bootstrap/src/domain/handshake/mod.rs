//! # Greeting Handshake
//!
//! One request/response exchange per connection:
//!
//! 1. Caller sends `GreetingRequest { version, port, public_key }`
//! 2. Acceptor answers `GreetingResponse { observed_address, observed_port, visible }`
//!
//! The observed address always comes from the accepted socket, never from
//! the caller. Only the claimed port is taken on trust. The caller learns its
//! externally visible `ip:port`; the acceptor learns a live contact.

// Semantic submodules
mod config;
mod reflection;
mod security;
mod types;

// Re-export public API
pub use config::HandshakeConfig;
pub use reflection::ReflectionTally;
pub use security::{build_response, validate_greeting};
pub use types::{GreetingRequest, GreetingResponse, PROTOCOL_VERSION};

#[cfg(test)]
mod tests;
