//! # Node Container
//!
//! Holds the long-lived bootstrap components, constructed exactly once in
//! dependency order:
//!
//! 1. Durable store (fatal on failure)
//! 2. Identity and self-record (fatal on failure)
//! 3. Address book, seeded when empty (seed failure is logged)

pub mod config;

pub use config::{ConfigError, NodeConfig};

use anyhow::{Context, Result};
use std::net::Ipv4Addr;
use std::sync::Arc;

use osanwe_peer_bootstrap::adapters::{BincodeCodec, SystemTimeSource};
use osanwe_peer_bootstrap::{
    ConfigProvider, IdentityManager, KeyValueStore, PeerRegistry, RecordCodec, TimeSource,
};

use crate::adapters::open_store;

/// Components shared by the listener, the handshake handler and callers.
pub struct NodeContainer {
    /// Durable store.
    pub store: Arc<dyn KeyValueStore>,
    /// Record and message codec.
    pub codec: Arc<dyn RecordCodec>,
    /// Wall clock.
    pub time: Arc<dyn TimeSource>,
    /// Node identity and self-record.
    pub identity: Arc<IdentityManager>,
    /// Address book.
    pub registry: Arc<PeerRegistry>,
}

impl NodeContainer {
    /// Run startup steps (a) to (c).
    ///
    /// `local_addresses` seeds a newly created self-record.
    pub fn build(config: &NodeConfig, local_addresses: Vec<Ipv4Addr>) -> Result<Self> {
        let store = open_store(&config.storage).with_context(|| {
            format!(
                "opening durable store in {}",
                config.storage.data_dir.display()
            )
        })?;
        let codec: Arc<dyn RecordCodec> = Arc::new(BincodeCodec::new());
        let time: Arc<dyn TimeSource> = Arc::new(SystemTimeSource::new());

        let identity = IdentityManager::restore(
            Arc::clone(&store),
            Arc::clone(&codec),
            time.as_ref(),
            local_addresses,
        )
        .context("restoring node identity")?;

        let (registry, _report) = PeerRegistry::open(Arc::clone(&store), Arc::clone(&codec))
            .context("loading address book")?;
        if let Err(e) = registry.ensure_seeded(&config.seed()) {
            tracing::error!(error = %e, "[osanwe] ❌ Failed to seed address book");
        }

        Ok(Self {
            store,
            codec,
            time,
            identity: Arc::new(identity),
            registry: Arc::new(registry),
        })
    }
}
