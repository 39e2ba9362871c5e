//! # Ports Layer - Hexagonal Architecture Boundaries
//!
//! This module defines the port interfaces (traits) for peer bootstrap.
//!
//! ## Architecture
//!
//! - **Driving Ports (Inbound):** APIs this subsystem exposes to consumers
//! - **Driven Ports (Outbound):** SPIs this subsystem requires from adapters

pub mod inbound;
pub mod outbound;

pub use inbound::PeerRegistryApi;
pub use outbound::{
    Acceptor, ConfigProvider, Connection, KeyValueStore, Namespace, RecordCodec, ScanResult,
    TimeSource, Transport,
};
