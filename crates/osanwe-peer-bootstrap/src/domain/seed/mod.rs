//! Hardcoded bootstrap contact.
//!
//! A fresh node with an empty address book gets exactly one record: the
//! seed. Its liveness is unknown until greeted, so it starts inactive with
//! a zero activity timestamp.

use std::net::SocketAddrV4;

use crate::domain::{PeerRecord, PublicKey, SeedError, Timestamp};

/// Default seed endpoint.
pub const DEFAULT_SEED_ADDRESS: &str = "5.187.6.75:12345";

/// Default seed X coordinate (the default seed uses the same bytes for Y).
pub const DEFAULT_SEED_COORDINATE: [u8; 32] = [
    0xc9, 0x4b, 0x30, 0x97, 0x97, 0x0d, 0x59, 0xfa, 0xc8, 0xac, 0x56, 0x5c, 0x3e, 0xe5, 0xdf, 0xbb,
    0x07, 0x64, 0x25, 0x8f, 0x3a, 0x1b, 0x97, 0xf9, 0xc1, 0x8c, 0x64, 0xfb, 0x19, 0x1f, 0x9c, 0x62,
];

/// A bootstrap contact known before any network activity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedDefinition {
    /// Where the seed listens.
    pub address: SocketAddrV4,
    /// Seed's public key.
    pub public_key: PublicKey,
}

impl Default for SeedDefinition {
    fn default() -> Self {
        Self {
            address: SocketAddrV4::new(std::net::Ipv4Addr::new(5, 187, 6, 75), 12345),
            public_key: PublicKey::new(DEFAULT_SEED_COORDINATE, DEFAULT_SEED_COORDINATE),
        }
    }
}

impl SeedDefinition {
    /// Build a seed from configuration strings (`ip:port`, hex X, hex Y).
    ///
    /// Coordinates shorter than 32 bytes are left-padded.
    pub fn parse(address: &str, x_hex: &str, y_hex: &str) -> Result<Self, SeedError> {
        let address: SocketAddrV4 = address
            .parse()
            .map_err(|_| SeedError::InvalidAddress(address.to_string()))?;
        let x = hex::decode(x_hex).map_err(|e| SeedError::InvalidKey(e.to_string()))?;
        let y = hex::decode(y_hex).map_err(|e| SeedError::InvalidKey(e.to_string()))?;
        let public_key =
            PublicKey::from_coordinates(&x, &y).map_err(|e| SeedError::InvalidKey(e.to_string()))?;

        Ok(Self {
            address,
            public_key,
        })
    }

    /// The record inserted into an empty address book.
    pub fn to_record(&self) -> PeerRecord {
        PeerRecord::new(
            self.public_key,
            vec![*self.address.ip()],
            self.address.port(),
            Timestamp::ZERO,
            false,
        )
    }
}
