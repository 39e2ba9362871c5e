use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};

use crate::domain::StoreError;
use crate::ports::{KeyValueStore, Namespace, ScanResult};

/// In-memory key-value store for tests and ephemeral nodes.
#[derive(Debug, Default)]
pub struct InMemoryKvStore {
    data: RwLock<HashMap<Namespace, BTreeMap<Vec<u8>, Vec<u8>>>>,
}

impl InMemoryKvStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries in a namespace.
    pub fn len(&self, namespace: Namespace) -> usize {
        self.data.read().get(&namespace).map_or(0, BTreeMap::len)
    }

    /// Whether a namespace holds no entries.
    pub fn is_empty(&self, namespace: Namespace) -> bool {
        self.len(namespace) == 0
    }
}

impl KeyValueStore for InMemoryKvStore {
    fn get(&self, namespace: Namespace, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self
            .data
            .read()
            .get(&namespace)
            .and_then(|ns| ns.get(key).cloned()))
    }

    fn put(&self, namespace: Namespace, key: &[u8], value: &[u8]) -> Result<(), StoreError> {
        self.data
            .write()
            .entry(namespace)
            .or_default()
            .insert(key.to_vec(), value.to_vec());
        Ok(())
    }

    fn scan(&self, namespace: Namespace) -> Result<ScanResult, StoreError> {
        Ok(self
            .data
            .read()
            .get(&namespace)
            .map(|ns| ns.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
            .unwrap_or_default())
    }
}
