//! # Node Identity
//!
//! The node's P-256 signing key pair and the identifier derived from it.
//!
//! The public point is never stored: it is recomputed from the secret scalar
//! every time an identity is restored, so the two cannot drift apart.

use shared_crypto::{P256KeyPair, P256Signature};

use crate::domain::{IdentityError, NodeId, PublicKey};

/// Derive a node identifier: `SHA-256(X || Y)`, each coordinate zero-padded
/// to 32 bytes.
pub fn derive_node_id(public_key: &PublicKey) -> NodeId {
    NodeId::from_public_key(public_key)
}

/// The local node's key pair plus cached public key and id.
#[derive(Debug)]
pub struct NodeIdentity {
    keypair: P256KeyPair,
    public_key: PublicKey,
    node_id: NodeId,
}

impl NodeIdentity {
    /// Fresh random identity.
    pub fn generate() -> Self {
        Self::from_keypair(P256KeyPair::generate())
    }

    /// Restore from a stored big-endian secret scalar.
    ///
    /// Scalars shorter than 32 bytes are left-padded.
    pub fn from_secret_bytes(bytes: &[u8]) -> Result<Self, IdentityError> {
        let keypair = P256KeyPair::from_bytes(bytes).map_err(IdentityError::MalformedKey)?;
        Ok(Self::from_keypair(keypair))
    }

    fn from_keypair(keypair: P256KeyPair) -> Self {
        let public_key = keypair.public_key();
        let node_id = derive_node_id(&public_key);
        Self {
            keypair,
            public_key,
            node_id,
        }
    }

    /// Public key (`scalar · G`).
    pub fn public_key(&self) -> PublicKey {
        self.public_key
    }

    /// Derived node id.
    pub fn node_id(&self) -> NodeId {
        self.node_id
    }

    /// Secret scalar, 32 bytes big-endian, as persisted.
    pub fn secret_bytes(&self) -> [u8; 32] {
        self.keypair.to_bytes()
    }

    /// Sign with the node key.
    pub fn sign(&self, message: &[u8]) -> P256Signature {
        self.keypair.sign(message)
    }
}

#[cfg(test)]
mod tests;
