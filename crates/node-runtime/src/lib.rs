//! # Osanwe Node Runtime
//!
//! Brings up one Osanwe node:
//!
//! 1. Open the durable store
//! 2. Restore or create the node identity
//! 3. Load the address book, seeding it when empty
//! 4. Bind the listener on the first usable candidate address
//! 5. Accept greetings
//! 6. Optionally greet every known peer once to learn the node's external address
//!
//! Steps 1, 2 and 4 abort startup on failure; everything else is logged.

pub mod adapters;
pub mod container;

pub use container::{ConfigError, NodeConfig, NodeContainer};

use anyhow::{Context, Result};
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use osanwe_peer_bootstrap::adapters::{discover_local_ipv4, TcpTransport};
use osanwe_peer_bootstrap::{
    ConfigProvider, HandshakeHandler, IdentityManager, Listener, ListenerHandle, NodeId,
    PeerRegistry, ReflectionReport, Transport,
};

/// Ordered bind candidates.
///
/// An explicit `configured` list is used as is. Otherwise the self-record
/// addresses are preferred over freshly discovered ones, with the wildcard
/// address as the last resort.
pub fn resolve_candidates(
    configured: &[Ipv4Addr],
    self_record: &[Ipv4Addr],
    discovered: &[Ipv4Addr],
) -> Vec<Ipv4Addr> {
    if !configured.is_empty() {
        return configured.to_vec();
    }

    let mut candidates: Vec<Ipv4Addr> = if self_record.is_empty() {
        discovered.to_vec()
    } else {
        self_record.to_vec()
    };
    if !candidates.contains(&Ipv4Addr::UNSPECIFIED) {
        candidates.push(Ipv4Addr::UNSPECIFIED);
    }
    candidates
}

/// A running node.
pub struct NodeRuntime {
    container: NodeContainer,
    handler: Arc<HandshakeHandler>,
    listener: ListenerHandle,
    reflection: Option<JoinHandle<ReflectionReport>>,
}

impl NodeRuntime {
    /// Start a node.
    pub async fn start(config: NodeConfig) -> Result<Self> {
        info!("[osanwe] ===========================================");
        info!("[osanwe]   Osanwe Node v{}", env!("CARGO_PKG_VERSION"));
        info!("[osanwe] ===========================================");

        let discovered = discover_local_ipv4();
        let container = NodeContainer::build(&config, discovered.clone())?;
        let identity = Arc::clone(&container.identity);
        info!(node_id = %identity.node_id(), "[osanwe] 🆔 Node identity ready");

        if identity.self_record().addresses.is_empty() && !discovered.is_empty() {
            if let Err(e) = identity.save_addresses(discovered.clone()) {
                warn!(error = %e, "[osanwe] ⚠️ Could not record local addresses");
            }
        }

        let handshake = config.handshake_config();
        let transport: Arc<dyn Transport> =
            Arc::new(TcpTransport::with_max_frame_size(handshake.max_frame_size));

        let candidates = resolve_candidates(
            &config.bind_addresses(),
            &identity.self_record().addresses,
            &discovered,
        );
        let port = match config.port_override() {
            Some(port) => port,
            None => identity
                .preferred_port()
                .context("reading persisted listener port")?,
        };

        let bound = Listener::start(transport.as_ref(), &candidates, port, &identity)
            .await
            .with_context(|| format!("binding listener on {:?} port {}", candidates, port))?;
        let local_port = bound.local_addr().port();

        let handler = Arc::new(HandshakeHandler::new(
            Arc::clone(&identity),
            container.registry.clone(),
            Arc::clone(&container.codec),
            transport,
            Arc::clone(&container.time),
            handshake,
            local_port,
        ));
        let listener = bound.serve(Arc::clone(&handler));
        info!(addr = %listener.local_addr(), "[osanwe] ✅ Node ready");

        let reflection = config.greet_on_startup.then(|| {
            let handler = Arc::clone(&handler);
            tokio::spawn(async move { handler.greet_known_peers().await })
        });

        Ok(Self {
            container,
            handler,
            listener,
            reflection,
        })
    }

    /// Address the node accepts greetings on.
    pub fn local_addr(&self) -> SocketAddr {
        self.listener.local_addr()
    }

    /// This node's id.
    pub fn node_id(&self) -> NodeId {
        self.container.identity.node_id()
    }

    /// Identity and self-record.
    pub fn identity(&self) -> &Arc<IdentityManager> {
        &self.container.identity
    }

    /// Address book.
    pub fn registry(&self) -> &Arc<PeerRegistry> {
        &self.container.registry
    }

    /// Greeting handler, for on-demand greetings.
    pub fn handler(&self) -> &Arc<HandshakeHandler> {
        &self.handler
    }

    /// Greet every known peer now.
    pub async fn reflect(&self) -> ReflectionReport {
        self.handler.greet_known_peers().await
    }

    /// Stop accepting and abandon any startup reflection still running.
    pub async fn shutdown(self) {
        info!("[osanwe] Initiating shutdown...");
        if let Some(task) = self.reflection {
            task.abort();
        }
        self.listener.shutdown().await;
        info!("[osanwe] Shutdown complete");
    }
}
