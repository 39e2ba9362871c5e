use parking_lot::RwLock;
use std::net::Ipv4Addr;
use std::sync::Arc;

use crate::domain::{
    AddressBookIndex, NodeId, PeerRecord, RegistryError, SeedDefinition, Timestamp,
};
use crate::ports::{KeyValueStore, Namespace, PeerRegistryApi, RecordCodec};

/// Outcome of loading the durable address book.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Records decoded and indexed.
    pub loaded: usize,
    /// Entries that failed to decode.
    pub skipped: usize,
}

/// Durable + in-memory address book.
///
/// # Concurrency
///
/// A single reader/writer lock guards the indices. `upsert` holds the write
/// lock across the durable write and the index update, so upserts are
/// linearizable and readers never observe a half-applied change.
pub struct PeerRegistry {
    index: RwLock<AddressBookIndex>,
    store: Arc<dyn KeyValueStore>,
    codec: Arc<dyn RecordCodec>,
}

impl PeerRegistry {
    /// Empty registry over a store. Call [`load`](Self::load) to populate.
    pub fn new(store: Arc<dyn KeyValueStore>, codec: Arc<dyn RecordCodec>) -> Self {
        Self {
            index: RwLock::new(AddressBookIndex::new()),
            store,
            codec,
        }
    }

    /// Construct and load in one step.
    pub fn open(
        store: Arc<dyn KeyValueStore>,
        codec: Arc<dyn RecordCodec>,
    ) -> Result<(Self, LoadReport), RegistryError> {
        let registry = Self::new(store, codec);
        let report = registry.load()?;
        Ok((registry, report))
    }

    /// Index every record in the `PeerRecords` namespace.
    ///
    /// Undecodable entries are logged with their raw key and skipped. Only
    /// a failing scan is an error.
    pub fn load(&self) -> Result<LoadReport, RegistryError> {
        let entries = self.store.scan(Namespace::PeerRecords)?;
        let mut report = LoadReport::default();
        let mut index = self.index.write();

        for (key, value) in entries {
            let record = match self.codec.decode_record(&value) {
                Ok(record) => record.with_canonical_id(),
                Err(e) => {
                    tracing::warn!(
                        key = %hex::encode(&key),
                        error = %e,
                        "[osanwe] ⚠️ Skipping corrupt address book entry"
                    );
                    report.skipped += 1;
                    continue;
                }
            };

            if key.as_slice() != record.id().as_bytes() {
                tracing::warn!(
                    key = %hex::encode(&key),
                    id = %record.id(),
                    "[osanwe] ⚠️ Address book key differs from record id, indexing by id"
                );
            }

            index.insert(record);
            report.loaded += 1;
        }

        tracing::info!(
            loaded = report.loaded,
            skipped = report.skipped,
            "[osanwe] 📖 Address book loaded"
        );
        Ok(report)
    }

    /// Insert the seed if the address book is empty. Returns whether it did.
    ///
    /// The emptiness check and the insert share one write section.
    pub fn ensure_seeded(&self, seed: &SeedDefinition) -> Result<bool, RegistryError> {
        let mut index = self.index.write();
        if !index.is_empty() {
            return Ok(false);
        }
        let record = self.upsert_locked(&mut index, seed.to_record())?;
        tracing::info!(
            seed = %seed.address,
            id = %record.id().short(),
            "[osanwe] 🌱 Seeded empty address book"
        );
        Ok(true)
    }

    /// Number of known peers.
    pub fn len(&self) -> usize {
        self.index.read().len()
    }

    /// Whether no peer is known.
    pub fn is_empty(&self) -> bool {
        self.index.read().is_empty()
    }

    /// Persist then index. Caller holds the write lock.
    fn upsert_locked(
        &self,
        index: &mut AddressBookIndex,
        record: PeerRecord,
    ) -> Result<Arc<PeerRecord>, RegistryError> {
        let record = record.with_canonical_id();
        let bytes = self.codec.encode_record(&record)?;
        self.store
            .put(Namespace::PeerRecords, record.id().as_bytes(), &bytes)?;
        Ok(index.insert(record))
    }
}

impl PeerRegistryApi for PeerRegistry {
    fn upsert(&self, record: PeerRecord) -> Result<Arc<PeerRecord>, RegistryError> {
        let mut index = self.index.write();
        self.upsert_locked(&mut index, record)
    }

    fn lookup_by_id(&self, id: &NodeId) -> Option<Arc<PeerRecord>> {
        self.index.read().get_by_id(id)
    }

    fn lookup_by_ip(&self, ip: &Ipv4Addr) -> Option<Arc<PeerRecord>> {
        self.index.read().get_by_ip(ip)
    }

    fn all(&self) -> Vec<Arc<PeerRecord>> {
        self.index.read().snapshot()
    }

    fn mark_activity(
        &self,
        id: &NodeId,
        active: bool,
        seen_at: Option<Timestamp>,
    ) -> Result<Arc<PeerRecord>, RegistryError> {
        let mut index = self.index.write();
        let current = index
            .get_by_id(id)
            .ok_or(RegistryError::UnknownPeer(*id))?;

        let mut next = PeerRecord::clone(&current);
        next.active = active;
        if let Some(ts) = seen_at {
            next.last_activity = ts;
        }
        self.upsert_locked(&mut index, next)
    }
}
