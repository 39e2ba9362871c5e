//! Error taxonomy for peer bootstrap.
//!
//! Fatal at startup: [`StoreError`] while opening, [`IdentityError`],
//! [`ListenerError::NoBindableAddress`]. Everything else is handled where
//! it occurs (skip the record, drop the connection, try the next peer),
//! except durability failures inside an upsert, which always reach the
//! caller as [`RegistryError::Store`].

use shared_crypto::CryptoError;
use std::net::SocketAddr;
use thiserror::Error;

use super::entities::NodeId;

/// Durable key-value store failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The store could not be opened or its contents could not be read.
    #[error("failed to open store at {path}: {message}")]
    Open {
        /// Location of the store.
        path: String,
        /// Underlying cause.
        message: String,
    },
    /// A read or write failed.
    #[error("store I/O error: {message}")]
    Io {
        /// Underlying cause.
        message: String,
    },
}

/// Binary codec failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// Value could not be encoded.
    #[error("encode failed: {0}")]
    Encode(String),
    /// Bytes could not be decoded.
    #[error("decode failed: {0}")]
    Decode(String),
    /// Encoded value carries a format version this build does not know.
    #[error("unsupported format version {found} (expected {expected})")]
    UnsupportedVersion {
        /// Version byte found on the wire.
        found: u8,
        /// Version this build writes.
        expected: u8,
    },
    /// Zero-length input.
    #[error("empty input")]
    Empty,
}

/// Connection-level transport failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// Binding a local address failed.
    #[error("bind {addr} failed: {message}")]
    Bind {
        /// Address we tried to bind.
        addr: SocketAddr,
        /// Underlying cause.
        message: String,
    },
    /// Dialing a remote address failed.
    #[error("connect {addr} failed: {message}")]
    Connect {
        /// Address we tried to dial.
        addr: SocketAddr,
        /// Underlying cause.
        message: String,
    },
    /// Read/write on an established connection failed.
    #[error("I/O error: {0}")]
    Io(String),
    /// Peer announced a frame larger than we accept.
    #[error("frame of {size} bytes exceeds limit of {max}")]
    FrameTooLarge {
        /// Announced size.
        size: usize,
        /// Configured limit.
        max: usize,
    },
    /// Peer closed the connection.
    #[error("connection closed by peer")]
    Closed,
}

/// Node identity could not be restored. Always fatal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityError {
    /// Settings namespace unreadable or unwritable.
    #[error("identity storage failed: {0}")]
    Store(#[from] StoreError),
    /// Stored secret scalar is not a valid P-256 scalar.
    #[error("stored node key is malformed: {0}")]
    MalformedKey(CryptoError),
    /// Stored self-record could not be decoded.
    #[error("stored self-record is corrupt: {0}")]
    CorruptSelfRecord(CodecError),
    /// Self-record could not be encoded.
    #[error("self-record encoding failed: {0}")]
    Codec(CodecError),
}

/// Address book failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// Durable write or scan failed; in-memory state is unchanged.
    #[error("address book storage failed: {0}")]
    Store(#[from] StoreError),
    /// Record could not be encoded.
    #[error("address book encoding failed: {0}")]
    Codec(#[from] CodecError),
    /// No record with this id.
    #[error("unknown peer {0}")]
    UnknownPeer(NodeId),
    /// The blocking task running the write panicked or was cancelled.
    #[error("address book task failed: {0}")]
    TaskFailed(String),
}

/// Listener could not be brought up.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ListenerError {
    /// No candidate addresses were supplied.
    #[error("no candidate addresses to bind")]
    NoCandidates,
    /// Every candidate failed; carries the last failure.
    #[error("no bindable local address (last error: {last})")]
    NoBindableAddress {
        /// Error from the final attempt.
        last: TransportError,
    },
}

/// Seed definition could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SeedError {
    /// Not an `ip:port` IPv4 endpoint.
    #[error("invalid seed address: {0}")]
    InvalidAddress(String),
    /// Coordinates are not valid hex or exceed 32 bytes.
    #[error("invalid seed public key: {0}")]
    InvalidKey(String),
}

/// Why a greeting was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RejectReason {
    /// Caller speaks an older protocol than we accept.
    #[error("protocol version {theirs} below minimum {min}")]
    UnsupportedVersion {
        /// Caller's version.
        theirs: u32,
        /// Our minimum.
        min: u32,
    },
    /// Connection source is not an IPv4 address.
    #[error("source address is not IPv4")]
    NonIpv4Source,
}

/// Greeting exchange failures (either role).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HandshakeError {
    /// Transport failed.
    #[error(transparent)]
    Transport(#[from] TransportError),
    /// Message could not be encoded/decoded.
    #[error(transparent)]
    Codec(#[from] CodecError),
    /// Request was refused.
    #[error("greeting rejected: {0}")]
    Rejected(#[from] RejectReason),
    /// The exchange did not finish in time.
    #[error("greeting timed out")]
    Timeout,
    /// Record has no dialable endpoint.
    #[error("peer {0} has no dialable endpoint")]
    NoEndpoint(NodeId),
}
