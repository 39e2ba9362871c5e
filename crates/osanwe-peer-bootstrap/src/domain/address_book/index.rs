//! Primary/secondary index pair.

use std::collections::HashMap;
use std::net::Ipv4Addr;
use std::sync::Arc;

use crate::domain::{NodeId, PeerRecord};

/// Id and IP indices over shared, immutable record snapshots.
#[derive(Debug, Default)]
pub struct AddressBookIndex {
    by_id: HashMap<NodeId, Arc<PeerRecord>>,
    by_ip: HashMap<Ipv4Addr, Arc<PeerRecord>>,
}

impl AddressBookIndex {
    /// Empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a record, keyed by `record.id()`.
    ///
    /// IP entries that pointed at the replaced version of the same peer are
    /// dropped first, so an address the peer no longer lists stops resolving
    /// to it. Returns the stored snapshot.
    pub fn insert(&mut self, record: PeerRecord) -> Arc<PeerRecord> {
        let id = record.id();
        let record = Arc::new(record);

        if let Some(previous) = self.by_id.insert(id, Arc::clone(&record)) {
            for ip in &previous.addresses {
                if self.by_ip.get(ip).is_some_and(|owner| owner.id() == id) {
                    self.by_ip.remove(ip);
                }
            }
        }

        for ip in &record.addresses {
            self.by_ip.insert(*ip, Arc::clone(&record));
        }

        record
    }

    /// Lookup by node id.
    pub fn get_by_id(&self, id: &NodeId) -> Option<Arc<PeerRecord>> {
        self.by_id.get(id).cloned()
    }

    /// Lookup by IPv4 address.
    pub fn get_by_ip(&self, ip: &Ipv4Addr) -> Option<Arc<PeerRecord>> {
        self.by_ip.get(ip).cloned()
    }

    /// Number of distinct peers.
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    /// True when no peer is indexed.
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// Number of indexed IPv4 addresses.
    pub fn ip_count(&self) -> usize {
        self.by_ip.len()
    }

    /// Cheap snapshot: clones the `Arc`s, not the records.
    pub fn snapshot(&self) -> Vec<Arc<PeerRecord>> {
        self.by_id.values().cloned().collect()
    }
}
