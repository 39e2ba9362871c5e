use parking_lot::RwLock;
use std::net::Ipv4Addr;
use std::sync::Arc;

use crate::domain::{IdentityError, NodeId, NodeIdentity, PeerRecord, PublicKey};
use crate::ports::{KeyValueStore, Namespace, RecordCodec, TimeSource};

/// Settings key holding the node's secret scalar.
pub const KEY_NODE_KEYS: &[u8] = b"mynodekeys";
/// Settings key holding the encoded self-record.
pub const KEY_SELF_RECORD: &[u8] = b"mynodeindb";
/// Settings key holding the last bound listener port (u32 little-endian).
pub const KEY_PORT: &[u8] = b"portindb";

/// Load the node identity from Settings, generating and persisting one if absent.
///
/// The public point is always re-derived from the stored scalar.
pub fn restore_identity(store: &dyn KeyValueStore) -> Result<NodeIdentity, IdentityError> {
    match store.get(Namespace::Settings, KEY_NODE_KEYS)? {
        Some(secret) => {
            let identity = NodeIdentity::from_secret_bytes(&secret)?;
            tracing::info!(
                node_id = %identity.node_id(),
                "[osanwe] 🔑 Restored node identity"
            );
            Ok(identity)
        }
        None => {
            let identity = NodeIdentity::generate();
            store.put(Namespace::Settings, KEY_NODE_KEYS, &identity.secret_bytes())?;
            tracing::info!(
                node_id = %identity.node_id(),
                "[osanwe] 🔑 Generated new node identity"
            );
            Ok(identity)
        }
    }
}

/// Owner of the node identity and the self-record.
///
/// Constructed once at startup; everything that needs the local key, id or
/// listener port goes through it.
pub struct IdentityManager {
    identity: NodeIdentity,
    self_record: RwLock<PeerRecord>,
    store: Arc<dyn KeyValueStore>,
    codec: Arc<dyn RecordCodec>,
}

impl IdentityManager {
    /// Restore identity and self-record from Settings.
    ///
    /// `local_addresses` seeds the self-record when none is stored yet.
    ///
    /// # Errors
    ///
    /// Every error is a startup abort: the node cannot run without a stable identity.
    pub fn restore(
        store: Arc<dyn KeyValueStore>,
        codec: Arc<dyn RecordCodec>,
        time: &dyn TimeSource,
        local_addresses: Vec<Ipv4Addr>,
    ) -> Result<Self, IdentityError> {
        let identity = restore_identity(store.as_ref())?;
        let public_key = identity.public_key();

        let self_record = match store.get(Namespace::Settings, KEY_SELF_RECORD)? {
            Some(bytes) => {
                let stored = codec
                    .decode_record(&bytes)
                    .map_err(IdentityError::CorruptSelfRecord)?;
                if stored.public_key == public_key && stored.has_canonical_id() {
                    stored
                } else {
                    tracing::warn!(
                        stored_id = %stored.id(),
                        node_id = %identity.node_id(),
                        "[osanwe] ⚠️ Self-record does not match node identity, rebuilding"
                    );
                    let rebuilt = PeerRecord::new(
                        public_key,
                        stored.addresses,
                        stored.port,
                        time.now(),
                        true,
                    );
                    persist_self(store.as_ref(), codec.as_ref(), &rebuilt)?;
                    rebuilt
                }
            }
            None => {
                let created = PeerRecord::new(public_key, local_addresses, 0, time.now(), true);
                persist_self(store.as_ref(), codec.as_ref(), &created)?;
                tracing::info!(
                    addresses = ?created.addresses,
                    "[osanwe] 📝 Created self-record"
                );
                created
            }
        };

        Ok(Self {
            identity,
            self_record: RwLock::new(self_record),
            store,
            codec,
        })
    }

    /// The node's key pair and id.
    pub fn identity(&self) -> &NodeIdentity {
        &self.identity
    }

    /// The node's public key.
    pub fn public_key(&self) -> PublicKey {
        self.identity.public_key()
    }

    /// The node's id.
    pub fn node_id(&self) -> NodeId {
        self.identity.node_id()
    }

    /// Current self-record.
    pub fn self_record(&self) -> PeerRecord {
        self.self_record.read().clone()
    }

    /// Port to bind first: `portindb` if usable, else the self-record port.
    pub fn preferred_port(&self) -> Result<u16, IdentityError> {
        if let Some(bytes) = self.store.get(Namespace::Settings, KEY_PORT)? {
            let decoded = <[u8; 4]>::try_from(bytes.as_slice())
                .ok()
                .map(u32::from_le_bytes)
                .and_then(|port| u16::try_from(port).ok());
            match decoded {
                Some(port) => return Ok(port),
                None => tracing::warn!(
                    raw = %hex::encode(&bytes),
                    "[osanwe] ⚠️ Ignoring unusable stored port"
                ),
            }
        }
        Ok(self.self_record.read().port)
    }

    /// Persist the bound port to `portindb` and the self-record.
    pub fn save_port(&self, port: u16) -> Result<(), IdentityError> {
        self.store
            .put(Namespace::Settings, KEY_PORT, &u32::from(port).to_le_bytes())?;
        self.update_self(|record| record.port = port)?;
        tracing::info!(port, "[osanwe] 💾 Saved listener port");
        Ok(())
    }

    /// Replace the self-record addresses.
    pub fn save_addresses(&self, addresses: Vec<Ipv4Addr>) -> Result<(), IdentityError> {
        self.update_self(|record| record.addresses = addresses)
    }

    fn update_self(&self, change: impl FnOnce(&mut PeerRecord)) -> Result<(), IdentityError> {
        let mut current = self.self_record.write();
        let mut next = current.clone();
        change(&mut next);
        persist_self(self.store.as_ref(), self.codec.as_ref(), &next)?;
        *current = next;
        Ok(())
    }
}

fn persist_self(
    store: &dyn KeyValueStore,
    codec: &dyn RecordCodec,
    record: &PeerRecord,
) -> Result<(), IdentityError> {
    let bytes = codec.encode_record(record).map_err(IdentityError::Codec)?;
    store.put(Namespace::Settings, KEY_SELF_RECORD, &bytes)?;
    Ok(())
}
