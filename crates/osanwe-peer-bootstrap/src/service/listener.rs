use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use super::handshake::HandshakeHandler;
use super::identity::IdentityManager;
use crate::domain::ListenerError;
use crate::ports::{Acceptor, Transport};

/// Pause after a failed `accept` so a persistent error does not spin.
const ACCEPT_BACKOFF: Duration = Duration::from_millis(50);

/// Ordered bind over candidate local addresses.
pub struct Listener;

impl Listener {
    /// Bind the first candidate that accepts `preferred_port` (0 = ephemeral).
    ///
    /// Candidates after the first success are not attempted. When the bound
    /// port differs from `preferred_port` it is persisted through `identity`
    /// so the next start reuses it.
    ///
    /// # Errors
    ///
    /// - [`ListenerError::NoCandidates`] for an empty list
    /// - [`ListenerError::NoBindableAddress`] when every candidate fails
    pub async fn start(
        transport: &dyn Transport,
        candidates: &[Ipv4Addr],
        preferred_port: u16,
        identity: &IdentityManager,
    ) -> Result<BoundListener, ListenerError> {
        let mut last_error = None;

        for ip in candidates {
            let addr = SocketAddr::from((*ip, preferred_port));
            match transport.listen(addr).await {
                Ok(acceptor) => {
                    let local_addr = acceptor.local_addr();
                    tracing::info!(addr = %local_addr, "[osanwe] 👂 Listener bound");

                    if local_addr.port() != preferred_port {
                        if let Err(e) = identity.save_port(local_addr.port()) {
                            tracing::error!(
                                port = local_addr.port(),
                                error = %e,
                                "[osanwe] ❌ Failed to persist listener port"
                            );
                        }
                    }

                    return Ok(BoundListener {
                        acceptor,
                        local_addr,
                    });
                }
                Err(e) => {
                    tracing::warn!(addr = %addr, error = %e, "[osanwe] ⚠️ Bind failed, trying next address");
                    last_error = Some(e);
                }
            }
        }

        match last_error {
            Some(last) => Err(ListenerError::NoBindableAddress { last }),
            None => Err(ListenerError::NoCandidates),
        }
    }
}

/// A bound, not yet accepting, listener.
pub struct BoundListener {
    acceptor: Box<dyn Acceptor>,
    local_addr: SocketAddr,
}

impl BoundListener {
    /// Address actually bound.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Start the accept loop. Each connection runs on its own task.
    ///
    /// Accept errors are logged and the loop continues. The loop stops on
    /// [`ListenerHandle::shutdown`] or when the handle is dropped.
    pub fn serve(self, handler: Arc<HandshakeHandler>) -> ListenerHandle {
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
        let mut acceptor = self.acceptor;
        let local_addr = self.local_addr;

        let task = tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = shutdown_rx.changed() => break,
                    accepted = acceptor.accept() => match accepted {
                        Ok(conn) => {
                            let handler = Arc::clone(&handler);
                            tokio::spawn(async move {
                                handler.serve(conn).await;
                            });
                        }
                        Err(e) => {
                            tracing::warn!(error = %e, "[osanwe] ⚠️ Accept failed");
                            tokio::time::sleep(ACCEPT_BACKOFF).await;
                        }
                    },
                }
            }
            tracing::info!(addr = %local_addr, "[osanwe] 🛑 Accept loop stopped");
        });

        ListenerHandle {
            local_addr,
            shutdown: shutdown_tx,
            task,
        }
    }
}

/// Control handle for a running accept loop.
pub struct ListenerHandle {
    local_addr: SocketAddr,
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl ListenerHandle {
    /// Address the loop accepts on.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Stop accepting and wait for the loop to exit.
    ///
    /// Connections already handed off finish on their own tasks.
    pub async fn shutdown(self) {
        let _ = self.shutdown.send(true);
        if let Err(e) = self.task.await {
            tracing::warn!(error = %e, "[osanwe] ⚠️ Accept loop ended abnormally");
        }
    }
}
