//! Domain Layer - Pure business logic with no I/O
//!
//! This module contains the core bootstrap logic including:
//! - Node identifiers, public keys and peer records
//! - Node identity (P-256 key pair, content-addressed node id)
//! - Address book indices (primary by node id, secondary by IPv4)
//! - Greeting handshake messages, validation and address reflection
//! - The hardcoded seed contact

pub mod address_book;
pub mod handshake;
pub mod identity;
pub mod seed;
/// Core domain types (entities, errors)
pub mod types;

pub use address_book::*;
pub use handshake::*;
pub use identity::*;
pub use seed::*;
pub use types::*;
