use std::net::SocketAddr;
use std::sync::Arc;

use super::identity::IdentityManager;
use crate::domain::{
    build_response, validate_greeting, GreetingRequest, GreetingResponse, HandshakeConfig,
    HandshakeError, NodeId, PeerRecord, ReflectionTally, RegistryError,
};
use crate::ports::{Connection, PeerRegistryApi, RecordCodec, TimeSource, Transport};

/// Result of greeting every known peer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReflectionReport {
    /// Peers that answered.
    pub contacted: usize,
    /// Peers that could not be greeted.
    pub failed: usize,
    /// Most commonly reported external endpoint of this node.
    pub external_address: Option<std::net::SocketAddrV4>,
}

/// Both roles of the greeting exchange, written once against [`Transport`].
pub struct HandshakeHandler {
    identity: Arc<IdentityManager>,
    registry: Arc<dyn PeerRegistryApi>,
    codec: Arc<dyn RecordCodec>,
    transport: Arc<dyn Transport>,
    time: Arc<dyn TimeSource>,
    config: HandshakeConfig,
    advertised_port: u16,
}

impl HandshakeHandler {
    /// Create a handler. `advertised_port` is the port sent in outgoing greetings.
    pub fn new(
        identity: Arc<IdentityManager>,
        registry: Arc<dyn PeerRegistryApi>,
        codec: Arc<dyn RecordCodec>,
        transport: Arc<dyn Transport>,
        time: Arc<dyn TimeSource>,
        config: HandshakeConfig,
        advertised_port: u16,
    ) -> Self {
        Self {
            identity,
            registry,
            codec,
            transport,
            time,
            config,
            advertised_port,
        }
    }

    /// Handshake settings in use.
    pub fn config(&self) -> &HandshakeConfig {
        &self.config
    }

    // =========================================================================
    // Server role
    // =========================================================================

    /// Handle one inbound connection. Never fails: problems are logged and
    /// only this connection is dropped.
    pub async fn serve(&self, mut conn: Box<dyn Connection>) {
        let peer = conn.peer_addr();
        match tokio::time::timeout(self.config.timeout, self.respond(conn.as_mut())).await {
            Ok(Ok(response)) => {
                tracing::debug!(
                    peer = %peer,
                    observed = %response.observed_endpoint(),
                    "[osanwe] 🤝 Answered greeting"
                );
            }
            Ok(Err(e)) => {
                tracing::warn!(peer = %peer, error = %e, "[osanwe] ⚠️ Dropping greeting");
            }
            Err(_) => {
                tracing::warn!(
                    peer = %peer,
                    error = %HandshakeError::Timeout,
                    "[osanwe] ⚠️ Dropping greeting"
                );
            }
        }
    }

    /// Read one request, register the caller and write the response.
    ///
    /// The observed address comes from `conn.peer_addr()`; only the port is
    /// taken from the request. No timeout is applied here.
    pub async fn respond(
        &self,
        conn: &mut dyn Connection,
    ) -> Result<GreetingResponse, HandshakeError> {
        let frame = conn.recv_frame().await?;
        let request = self.codec.decode_request(&frame)?;
        validate_greeting(&request, &self.config)?;

        let response = build_response(&request, conn.peer_addr())?;
        self.register_caller(&request, &response).await;

        let bytes = self.codec.encode_response(&response)?;
        conn.send_frame(&bytes).await?;
        Ok(response)
    }

    async fn register_caller(&self, request: &GreetingRequest, response: &GreetingResponse) {
        if !self.config.register_inbound || request.port == 0 {
            return;
        }
        let caller_id = NodeId::from_public_key(&request.public_key);
        if caller_id == self.identity.node_id() {
            return;
        }

        let record = PeerRecord::new(
            request.public_key,
            vec![response.observed_address],
            request.port,
            self.time.now(),
            true,
        );
        match self.write_registry(move |registry| registry.upsert(record)).await {
            Ok(stored) => tracing::info!(
                id = %stored.id().short(),
                endpoint = %response.observed_endpoint(),
                "[osanwe] 📇 Registered inbound peer"
            ),
            Err(e) => tracing::warn!(
                id = %caller_id.short(),
                error = %e,
                "[osanwe] ⚠️ Failed to register inbound peer"
            ),
        }
    }

    /// Run a registry write on the blocking pool. Durable stores fsync
    /// under the registry lock, which must not stall the async workers.
    async fn write_registry<T, F>(&self, write: F) -> Result<T, RegistryError>
    where
        F: FnOnce(&dyn PeerRegistryApi) -> Result<T, RegistryError> + Send + 'static,
        T: Send + 'static,
    {
        let registry = Arc::clone(&self.registry);
        tokio::task::spawn_blocking(move || write(registry.as_ref()))
            .await
            .map_err(|e| RegistryError::TaskFailed(e.to_string()))?
    }

    // =========================================================================
    // Client role
    // =========================================================================

    /// Greet one endpoint and return what it observed about us.
    pub async fn greet(&self, addr: SocketAddr) -> Result<GreetingResponse, HandshakeError> {
        tokio::time::timeout(self.config.timeout, self.exchange(addr))
            .await
            .map_err(|_| HandshakeError::Timeout)?
    }

    async fn exchange(&self, addr: SocketAddr) -> Result<GreetingResponse, HandshakeError> {
        let mut conn = self.transport.connect(addr).await?;
        let request = GreetingRequest {
            version: self.config.protocol_version,
            port: self.advertised_port,
            public_key: self.identity.public_key(),
        };
        conn.send_frame(&self.codec.encode_request(&request)?).await?;
        let frame = conn.recv_frame().await?;
        Ok(self.codec.decode_response(&frame)?)
    }

    /// Greet a peer on each of its addresses in order; first success wins.
    pub async fn greet_peer(&self, record: &PeerRecord) -> Result<GreetingResponse, HandshakeError> {
        let mut last_error = HandshakeError::NoEndpoint(record.id());
        for endpoint in record.endpoints() {
            match self.greet(SocketAddr::V4(endpoint)).await {
                Ok(response) => return Ok(response),
                Err(e) => {
                    tracing::debug!(
                        endpoint = %endpoint,
                        error = %e,
                        "[osanwe] Greeting attempt failed"
                    );
                    last_error = e;
                }
            }
        }
        Err(last_error)
    }

    /// Greet every known peer except ourselves and update their liveness.
    ///
    /// Returns the endpoint most peers observed us at.
    pub async fn greet_known_peers(&self) -> ReflectionReport {
        let own_id = self.identity.node_id();
        let mut tally = ReflectionTally::new();
        let mut report = ReflectionReport::default();

        for record in self.registry.all() {
            if record.id() == own_id {
                continue;
            }

            let outcome = self.greet_peer(&record).await;
            let (active, seen_at) = match &outcome {
                Ok(response) => {
                    tally.record(response);
                    report.contacted += 1;
                    (true, Some(self.time.now()))
                }
                Err(e) => {
                    tracing::warn!(
                        id = %record.id().short(),
                        error = %e,
                        "[osanwe] ⚠️ Could not greet peer"
                    );
                    report.failed += 1;
                    (false, None)
                }
            };
            let id = record.id();
            let marked = self
                .write_registry(move |registry| registry.mark_activity(&id, active, seen_at))
                .await;
            if let Err(e) = marked {
                tracing::warn!(
                    id = %record.id().short(),
                    error = %e,
                    "[osanwe] ⚠️ Failed to update peer liveness"
                );
            }
        }

        report.external_address = tally.consensus();
        tracing::info!(
            contacted = report.contacted,
            failed = report.failed,
            external = ?report.external_address,
            "[osanwe] 🪞 Reflection pass complete"
        );
        report
    }
}
