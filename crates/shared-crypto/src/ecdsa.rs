//! # ECDSA Key Pairs (NIST P-256)
//!
//! Node identity keys on the P-256 curve.
//!
//! ## Security Properties
//!
//! - RFC 6979 deterministic nonces (no RNG dependency for signing)
//! - Secret scalar zeroized on drop by `SigningKey` itself; transient
//!   copies made while restoring are wiped here
//! - Public point is always re-derived from the secret scalar, never stored
//!
//! ## Canonical Coordinates
//!
//! `P256PublicKey` stores X and Y as fixed 32-byte big-endian arrays.
//! Shorter inputs (minimal big-endian integers, as some encoders emit) are
//! left-padded on the way in; longer inputs are rejected.

use crate::hashing::sha256_concat;
use crate::CryptoError;
use p256::ecdsa::{
    signature::{Signer, Verifier},
    Signature, SigningKey, VerifyingKey,
};
use p256::elliptic_curve::sec1::ToEncodedPoint;
use p256::{EncodedPoint, FieldBytes};
use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

/// Width in bytes of a P-256 field element (coordinate or scalar).
pub const COORDINATE_LEN: usize = 32;

/// Left-pad a big-endian integer to the fixed field width.
fn pad_to_field(bytes: &[u8]) -> Option<[u8; COORDINATE_LEN]> {
    if bytes.len() > COORDINATE_LEN {
        return None;
    }
    let mut out = [0u8; COORDINATE_LEN];
    out[COORDINATE_LEN - bytes.len()..].copy_from_slice(bytes);
    Some(out)
}

/// Uncompressed P-256 public key as canonical (X, Y) coordinates.
///
/// The type does not require the point to lie on the curve: peer records
/// can carry keys that were never validated (e.g. a hardcoded seed). Use
/// [`P256PublicKey::verifying_key_check`] where a usable key is required.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct P256PublicKey {
    x: [u8; COORDINATE_LEN],
    y: [u8; COORDINATE_LEN],
}

impl P256PublicKey {
    /// Create from already canonical coordinates.
    pub fn new(x: [u8; COORDINATE_LEN], y: [u8; COORDINATE_LEN]) -> Self {
        Self { x, y }
    }

    /// Create from big-endian coordinates of up to 32 bytes each.
    pub fn from_coordinates(x: &[u8], y: &[u8]) -> Result<Self, CryptoError> {
        let too_long = |actual| CryptoError::InvalidCoordinateLength {
            expected: COORDINATE_LEN,
            actual,
        };
        let x = pad_to_field(x).ok_or_else(|| too_long(x.len()))?;
        let y = pad_to_field(y).ok_or_else(|| too_long(y.len()))?;
        Ok(Self { x, y })
    }

    /// X coordinate (32 bytes, big-endian).
    pub fn x(&self) -> &[u8; COORDINATE_LEN] {
        &self.x
    }

    /// Y coordinate (32 bytes, big-endian).
    pub fn y(&self) -> &[u8; COORDINATE_LEN] {
        &self.y
    }

    /// Derive the node identifier: `SHA-256(X || Y)` over padded coordinates.
    pub fn to_node_id(&self) -> [u8; 32] {
        sha256_concat(&[&self.x, &self.y])
    }

    /// Parse into a verifying key, failing if the point is not on the curve.
    pub fn verifying_key_check(&self) -> Result<(), CryptoError> {
        self.verifying_key().map(|_| ())
    }

    fn verifying_key(&self) -> Result<VerifyingKey, CryptoError> {
        let point = EncodedPoint::from_affine_coordinates(
            &FieldBytes::clone_from_slice(&self.x),
            &FieldBytes::clone_from_slice(&self.y),
            false,
        );
        VerifyingKey::from_encoded_point(&point).map_err(|_| CryptoError::InvalidPublicKey)
    }

    /// Verify a signature.
    pub fn verify(&self, message: &[u8], signature: &P256Signature) -> Result<(), CryptoError> {
        let verifying_key = self.verifying_key()?;
        let sig = Signature::from_slice(&signature.0).map_err(|_| CryptoError::InvalidSignature)?;

        verifying_key
            .verify(message, &sig)
            .map_err(|_| CryptoError::SignatureVerificationFailed)
    }
}

/// ECDSA signature (64 bytes, r||s format).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct P256Signature([u8; 64]);

impl P256Signature {
    /// Create from bytes (64 bytes).
    pub fn from_bytes(bytes: [u8; 64]) -> Self {
        Self(bytes)
    }

    /// Get raw bytes.
    pub fn as_bytes(&self) -> &[u8; 64] {
        &self.0
    }
}

/// P-256 ECDSA keypair.
///
/// The scalar lives only inside `SigningKey`, which zeroizes on drop.
pub struct P256KeyPair {
    signing_key: SigningKey,
}

impl P256KeyPair {
    /// Generate random keypair.
    pub fn generate() -> Self {
        let signing_key = SigningKey::random(&mut rand::rngs::OsRng);
        Self { signing_key }
    }

    /// Restore from a big-endian secret scalar.
    ///
    /// Accepts minimal encodings shorter than 32 bytes (left-padded). Fails
    /// for over-long input, zero, or values not below the group order.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        let mut padded = pad_to_field(bytes).ok_or(CryptoError::InvalidKeyLength {
            expected: COORDINATE_LEN,
            actual: bytes.len(),
        })?;
        let result = SigningKey::from_bytes(&FieldBytes::clone_from_slice(&padded))
            .map_err(|_| CryptoError::InvalidPrivateKey);
        padded.zeroize();
        Ok(Self {
            signing_key: result?,
        })
    }

    /// Public key, recomputed as `scalar · G`.
    pub fn public_key(&self) -> P256PublicKey {
        let point = self.signing_key.verifying_key().to_encoded_point(false);
        // Uncompressed encoding of a non-identity point always carries both
        // coordinates; a valid signing key never maps to the identity.
        let x = point.x().map(|x| x.as_slice()).unwrap_or(&[]);
        let y = point.y().map(|y| y.as_slice()).unwrap_or(&[]);
        let mut public = P256PublicKey::new([0u8; COORDINATE_LEN], [0u8; COORDINATE_LEN]);
        public.x[COORDINATE_LEN - x.len()..].copy_from_slice(x);
        public.y[COORDINATE_LEN - y.len()..].copy_from_slice(y);
        public
    }

    /// Sign a message (deterministic RFC 6979, SHA-256 digest).
    pub fn sign(&self, message: &[u8]) -> P256Signature {
        let sig: Signature = self.signing_key.sign(message);
        let mut bytes = [0u8; 64];
        bytes.copy_from_slice(&sig.to_bytes());
        P256Signature(bytes)
    }

    /// Get secret scalar bytes (32 bytes, big-endian, for persistence).
    pub fn to_bytes(&self) -> [u8; 32] {
        self.signing_key.to_bytes().into()
    }
}

impl std::fmt::Debug for P256KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("P256KeyPair")
            .field("public_key", &self.public_key())
            .finish_non_exhaustive()
    }
}
