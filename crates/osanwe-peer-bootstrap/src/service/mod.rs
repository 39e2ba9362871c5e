//! # Peer Bootstrap Services
//!
//! Components wired together at startup, in this order:
//!
//! 1. [`IdentityManager`] restores the node key and self-record
//! 2. [`PeerRegistry`] loads the address book and seeds it when empty
//! 3. [`Listener`] binds a local endpoint and persists the chosen port
//! 4. [`HandshakeHandler`] answers greetings on every accepted connection
//!    and greets known peers
//!
//! Each component is constructed once and receives its collaborators
//! explicitly; there is no global state.

// Semantic submodules
mod handshake;
mod identity;
mod listener;
mod registry;

// Re-export public API
pub use handshake::{HandshakeHandler, ReflectionReport};
pub use identity::{restore_identity, IdentityManager, KEY_NODE_KEYS, KEY_PORT, KEY_SELF_RECORD};
pub use listener::{BoundListener, Listener, ListenerHandle};
pub use registry::{LoadReport, PeerRegistry};
