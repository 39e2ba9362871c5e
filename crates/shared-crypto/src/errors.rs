//! Crypto error types.

use thiserror::Error;

/// Cryptographic operation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CryptoError {
    /// Invalid key length
    #[error("Invalid key length: expected at most {expected}, got {actual}")]
    InvalidKeyLength {
        /// Maximum key length in bytes
        expected: usize,
        /// Actual key length in bytes
        actual: usize,
    },

    /// Coordinate wider than the curve's field
    #[error("Invalid coordinate length: expected at most {expected}, got {actual}")]
    InvalidCoordinateLength {
        /// Field width in bytes
        expected: usize,
        /// Actual coordinate length in bytes
        actual: usize,
    },

    /// Signature verification failed
    #[error("Signature verification failed")]
    SignatureVerificationFailed,

    /// Invalid public key
    #[error("Invalid public key")]
    InvalidPublicKey,

    /// Invalid private key (zero, or not below the group order)
    #[error("Invalid private key")]
    InvalidPrivateKey,

    /// Invalid signature
    #[error("Invalid signature")]
    InvalidSignature,
}
