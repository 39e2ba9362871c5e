//! # Shared Crypto - Node Identity Primitives
//!
//! ## Components
//!
//! | Module | Algorithm | Use Case |
//! |--------|-----------|----------|
//! | `ecdsa` | NIST P-256 ECDSA | Node signing key pair, public key coordinates |
//! | `hashing` | SHA-256 | Content-addressed node identifiers |
//!
//! ## Canonical Encoding
//!
//! Public key coordinates are always held at the curve's fixed field width
//! (32 bytes, big-endian, left-padded with zeros). Node identifiers are
//! `SHA-256(X || Y)` over that canonical encoding, so a coordinate with a
//! leading zero byte yields the same identifier whether it arrived trimmed
//! or padded.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod errors;
pub mod hashing;
pub mod ecdsa;

// Re-exports
pub use errors::CryptoError;
pub use hashing::{sha256, sha256_concat, Hash};
pub use ecdsa::{P256KeyPair, P256PublicKey, P256Signature, COORDINATE_LEN};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
