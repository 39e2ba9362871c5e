use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::domain::StoreError;
use crate::ports::{KeyValueStore, Namespace, ScanResult};

type Tables = HashMap<Namespace, BTreeMap<Vec<u8>, Vec<u8>>>;

/// File-backed key-value store for nodes built without RocksDB.
///
/// The whole store lives in one file, rewritten on every `put` through a
/// temp file, `fsync` and rename, so a crash leaves either the old or the
/// new contents.
///
/// Format: repeated `[namespace:u8][key_len:u32 LE][key][value_len:u32 LE][value]`.
pub struct FileBackedKvStore {
    data: RwLock<Tables>,
    path: PathBuf,
}

impl FileBackedKvStore {
    /// Open the store at `path`, creating parent directories.
    ///
    /// A missing file is an empty store. An unreadable or truncated file is
    /// an error: silently starting empty would discard the node identity.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| open_error(&path, e))?;
        }

        let data = match std::fs::read(&path) {
            Ok(bytes) => {
                tracing::info!(
                    "[osanwe] 💾 Found existing storage file: {} ({} bytes)",
                    path.display(),
                    bytes.len()
                );
                decode_tables(&bytes).map_err(|message| StoreError::Open {
                    path: path.display().to_string(),
                    message,
                })?
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("[osanwe] 📁 No existing storage file at {}", path.display());
                Tables::new()
            }
            Err(e) => return Err(open_error(&path, e)),
        };

        Ok(Self {
            data: RwLock::new(data),
            path,
        })
    }

    /// Location of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self, tables: &Tables) -> Result<(), StoreError> {
        let bytes = encode_tables(tables);

        let temp_path = self.path.with_extension("tmp");
        let mut file = std::fs::File::create(&temp_path).map_err(io_error)?;
        file.write_all(&bytes).map_err(io_error)?;
        file.sync_all().map_err(io_error)?;
        std::fs::rename(&temp_path, &self.path).map_err(io_error)?;

        Ok(())
    }
}

impl KeyValueStore for FileBackedKvStore {
    fn get(&self, namespace: Namespace, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self
            .data
            .read()
            .get(&namespace)
            .and_then(|ns| ns.get(key).cloned()))
    }

    fn put(&self, namespace: Namespace, key: &[u8], value: &[u8]) -> Result<(), StoreError> {
        let mut tables = self.data.write();
        let previous = tables
            .entry(namespace)
            .or_default()
            .insert(key.to_vec(), value.to_vec());

        if let Err(e) = self.save(&tables) {
            let table = tables.entry(namespace).or_default();
            match previous {
                Some(old) => {
                    table.insert(key.to_vec(), old);
                }
                None => {
                    table.remove(key);
                }
            }
            return Err(e);
        }

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

fn namespace_tag(namespace: Namespace) -> u8 {
    match namespace {
        Namespace::Settings => 0,
        Namespace::PeerRecords => 1,
    }
}

fn namespace_from_tag(tag: u8) -> Option<Namespace> {
    match tag {
        0 => Some(Namespace::Settings),
        1 => Some(Namespace::PeerRecords),
        _ => None,
    }
}

fn encode_tables(tables: &Tables) -> Vec<u8> {
    let mut bytes = Vec::new();
    for namespace in Namespace::ALL {
        let Some(table) = tables.get(&namespace) else {
            continue;
        };
        for (key, value) in table {
            bytes.push(namespace_tag(namespace));
            bytes.extend_from_slice(&(key.len() as u32).to_le_bytes());
            bytes.extend_from_slice(key);
            bytes.extend_from_slice(&(value.len() as u32).to_le_bytes());
            bytes.extend_from_slice(value);
        }
    }
    bytes
}

fn decode_tables(bytes: &[u8]) -> Result<Tables, String> {
    let mut tables = Tables::new();
    let mut cursor = 0;

    while cursor < bytes.len() {
        let tag = bytes[cursor];
        cursor += 1;
        let namespace =
            namespace_from_tag(tag).ok_or_else(|| format!("unknown namespace tag {tag}"))?;
        let key = read_chunk(bytes, &mut cursor)?;
        let value = read_chunk(bytes, &mut cursor)?;
        tables.entry(namespace).or_default().insert(key, value);
    }

    Ok(tables)
}

fn read_chunk(bytes: &[u8], cursor: &mut usize) -> Result<Vec<u8>, String> {
    let len_end = *cursor + 4;
    let len_bytes: [u8; 4] = bytes
        .get(*cursor..len_end)
        .and_then(|b| b.try_into().ok())
        .ok_or_else(|| format!("truncated length at offset {}", *cursor))?;
    let len = u32::from_le_bytes(len_bytes) as usize;

    let end = len_end
        .checked_add(len)
        .filter(|end| *end <= bytes.len())
        .ok_or_else(|| format!("truncated entry at offset {len_end}"))?;
    *cursor = end;
    Ok(bytes[len_end..end].to_vec())
}

fn open_error(path: &Path, e: std::io::Error) -> StoreError {
    StoreError::Open {
        path: path.display().to_string(),
        message: e.to_string(),
    }
}

fn io_error(e: std::io::Error) -> StoreError {
    StoreError::Io {
        message: e.to_string(),
    }
}
