//! # Driving Ports (Inbound API)
//!
//! These are the public APIs this subsystem exposes to the application node.

use std::net::Ipv4Addr;
use std::sync::Arc;

use crate::domain::{NodeId, PeerRecord, RegistryError, Timestamp};

/// Primary API for the address book.
///
/// Implemented by [`crate::service::PeerRegistry`]; the handshake handler
/// depends on it so tests can swap the registry.
///
/// # Concurrency
///
/// All methods take `&self`. Writers are linearizable: a reader sees either
/// the state before an `upsert` or the state after it, never a mix.
///
/// # Example
///
/// ```rust,ignore
/// use osanwe_peer_bootstrap::ports::PeerRegistryApi;
///
/// fn count_live<R: PeerRegistryApi>(registry: &R) -> usize {
///     registry.all().iter().filter(|r| r.active).count()
/// }
/// ```
pub trait PeerRegistryApi: Send + Sync {
    /// Persist and index a record, replacing any record with the same key.
    ///
    /// The id is recomputed from the public key. The durable write completes
    /// before the in-memory indices change; on failure neither changes.
    fn upsert(&self, record: PeerRecord) -> Result<Arc<PeerRecord>, RegistryError>;

    /// Look up by node id.
    fn lookup_by_id(&self, id: &NodeId) -> Option<Arc<PeerRecord>>;

    /// Look up the last peer indexed under an IPv4 address.
    fn lookup_by_ip(&self, ip: &Ipv4Addr) -> Option<Arc<PeerRecord>>;

    /// Snapshot of every known record.
    fn all(&self) -> Vec<Arc<PeerRecord>>;

    /// Update liveness of an existing record.
    ///
    /// `seen_at` replaces `last_activity` when given; a failed contact passes
    /// `None` and keeps the previous timestamp.
    fn mark_activity(
        &self,
        id: &NodeId,
        active: bool,
        seen_at: Option<Timestamp>,
    ) -> Result<Arc<PeerRecord>, RegistryError>;
}
