//! # RocksDB Storage Adapter
//!
//! RocksDB implementation of the bootstrap `KeyValueStore` port.
//!
//! ## Column Families
//!
//! - `settings` - Local node state (identity key, self-record, port)
//! - `peer_records` - Address book
//!
//! Each `put` is a single RocksDB write, atomic on its own; with
//! `sync_writes` it is fsynced before returning.

use osanwe_peer_bootstrap::ports::{KeyValueStore, Namespace, ScanResult};
use osanwe_peer_bootstrap::StoreError;
use rocksdb::{ColumnFamilyDescriptor, IteratorMode, Options, WriteOptions, DB};
use std::path::PathBuf;

/// RocksDB configuration.
#[derive(Debug, Clone)]
pub struct RocksDbConfig {
    /// Path to the database directory
    pub path: PathBuf,
    /// Write buffer size in bytes (default: 4MB)
    pub write_buffer_size: usize,
    /// Enable fsync after each write (default: true for durability)
    pub sync_writes: bool,
}

impl RocksDbConfig {
    /// Durable config at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_buffer_size: 4 * 1024 * 1024,
            sync_writes: true,
        }
    }

    /// Create config for testing (no sync)
    pub fn for_testing(path: impl Into<PathBuf>) -> Self {
        Self {
            sync_writes: false,
            ..Self::new(path)
        }
    }
}

/// RocksDB-backed key-value store, one column family per namespace.
pub struct RocksDbStore {
    db: DB,
    config: RocksDbConfig,
}

impl RocksDbStore {
    /// Open or create a RocksDB database
    pub fn open(config: RocksDbConfig) -> Result<Self, StoreError> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);
        opts.set_write_buffer_size(config.write_buffer_size);
        opts.set_compression_type(rocksdb::DBCompressionType::Snappy);

        let cf_descriptors: Vec<ColumnFamilyDescriptor> = Namespace::ALL
            .iter()
            .map(|ns| {
                let mut cf_opts = Options::default();
                cf_opts.set_compression_type(rocksdb::DBCompressionType::Snappy);
                ColumnFamilyDescriptor::new(ns.as_str(), cf_opts)
            })
            .collect();

        let db = DB::open_cf_descriptors(&opts, &config.path, cf_descriptors).map_err(|e| {
            StoreError::Open {
                path: config.path.display().to_string(),
                message: format!("Failed to open RocksDB: {}", e),
            }
        })?;

        Ok(Self { db, config })
    }

    fn cf(&self, namespace: Namespace) -> Result<&rocksdb::ColumnFamily, StoreError> {
        self.db
            .cf_handle(namespace.as_str())
            .ok_or_else(|| StoreError::Io {
                message: format!("missing column family {}", namespace.as_str()),
            })
    }
}

impl KeyValueStore for RocksDbStore {
    fn get(&self, namespace: Namespace, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        self.db
            .get_cf(self.cf(namespace)?, key)
            .map_err(|e| StoreError::Io {
                message: format!("RocksDB get failed: {}", e),
            })
    }

    fn put(&self, namespace: Namespace, key: &[u8], value: &[u8]) -> Result<(), StoreError> {
        let mut write_opts = WriteOptions::default();
        write_opts.set_sync(self.config.sync_writes);

        self.db
            .put_cf_opt(self.cf(namespace)?, key, value, &write_opts)
            .map_err(|e| StoreError::Io {
                message: format!("RocksDB put failed: {}", e),
            })
    }

    fn scan(&self, namespace: Namespace) -> Result<ScanResult, StoreError> {
        let mut results = Vec::new();
        for item in self.db.iterator_cf(self.cf(namespace)?, IteratorMode::Start) {
            let (key, value) = item.map_err(|e| StoreError::Io {
                message: format!("RocksDB scan failed: {}", e),
            })?;
            results.push((key.to_vec(), value.to_vec()));
        }
        Ok(results)
    }
}
