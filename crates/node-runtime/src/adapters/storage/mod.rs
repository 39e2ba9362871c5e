//! # Storage Backends
//!
//! Selects the durable store named in the configuration.
//!
//! ## Usage
//!
//! Enable the `rocksdb` feature to use RocksDB:
//!
//! ```toml
//! node-runtime = { path = "...", features = ["rocksdb"] }
//! ```

#[cfg(feature = "rocksdb")]
pub mod rocksdb_adapter;

#[cfg(feature = "rocksdb")]
pub use rocksdb_adapter::{RocksDbConfig, RocksDbStore};

use std::sync::Arc;

use osanwe_peer_bootstrap::adapters::FileBackedKvStore;
use osanwe_peer_bootstrap::{KeyValueStore, StoreError};

use crate::container::config::{StorageBackend, StorageConfig};

/// File name of the file-backed store inside the data directory.
pub const FILE_STORE_NAME: &str = "osanwe.db";

/// Directory name of the RocksDB store inside the data directory.
pub const ROCKSDB_DIR_NAME: &str = "rocksdb";

/// Open the configured store.
pub fn open_store(config: &StorageConfig) -> Result<Arc<dyn KeyValueStore>, StoreError> {
    match config.backend {
        StorageBackend::File => {
            let store = FileBackedKvStore::open(config.data_dir.join(FILE_STORE_NAME))?;
            Ok(Arc::new(store))
        }
        #[cfg(feature = "rocksdb")]
        StorageBackend::Rocksdb => {
            let rocks = RocksDbConfig {
                sync_writes: config.sync_writes,
                ..RocksDbConfig::new(config.data_dir.join(ROCKSDB_DIR_NAME))
            };
            Ok(Arc::new(RocksDbStore::open(rocks)?))
        }
        #[cfg(not(feature = "rocksdb"))]
        StorageBackend::Rocksdb => Err(StoreError::Open {
            path: config.data_dir.join(ROCKSDB_DIR_NAME).display().to_string(),
            message: "node-runtime was built without the `rocksdb` feature".into(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use osanwe_peer_bootstrap::ports::Namespace;
    use tempfile::TempDir;

    #[test]
    fn test_file_backend_opens_in_data_dir() {
        let dir = TempDir::new().unwrap();
        let config = StorageConfig {
            data_dir: dir.path().to_path_buf(),
            ..StorageConfig::default()
        };

        let store = open_store(&config).unwrap();
        store.put(Namespace::Settings, b"k", b"v").unwrap();
        assert!(dir.path().join(FILE_STORE_NAME).exists());
    }

    #[cfg(not(feature = "rocksdb"))]
    #[test]
    fn test_rocksdb_backend_requires_feature() {
        let dir = TempDir::new().unwrap();
        let config = StorageConfig {
            data_dir: dir.path().to_path_buf(),
            backend: StorageBackend::Rocksdb,
            sync_writes: true,
        };
        assert!(matches!(open_store(&config), Err(StoreError::Open { .. })));
    }
}
