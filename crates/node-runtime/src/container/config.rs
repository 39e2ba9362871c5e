//! # Node Configuration
//!
//! Sources, lowest to highest precedence:
//!
//! 1. Built-in defaults
//! 2. TOML file named by `OSANWE_CONFIG`
//! 3. Environment overrides (`OSANWE_DATA_DIR`, `OSANWE_PORT`, `OSANWE_BIND`,
//!    `OSANWE_HANDSHAKE_TIMEOUT_SECS`)

use serde::Deserialize;
use std::net::Ipv4Addr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use osanwe_peer_bootstrap::domain::{DEFAULT_SEED_ADDRESS, DEFAULT_SEED_COORDINATE};
use osanwe_peer_bootstrap::{ConfigProvider, HandshakeConfig, SeedDefinition};

/// Environment variable naming the config file.
pub const ENV_CONFIG: &str = "OSANWE_CONFIG";
/// Environment override for `storage.data_dir`.
pub const ENV_DATA_DIR: &str = "OSANWE_DATA_DIR";
/// Environment override for `network.port`.
pub const ENV_PORT: &str = "OSANWE_PORT";
/// Environment override for `network.bind` (comma-separated IPv4).
pub const ENV_BIND: &str = "OSANWE_BIND";
/// Environment override for `handshake.timeout_secs`.
pub const ENV_HANDSHAKE_TIMEOUT: &str = "OSANWE_HANDSHAKE_TIMEOUT_SECS";

/// Complete node configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    /// Storage configuration.
    pub storage: StorageConfig,
    /// Network configuration.
    pub network: NetworkConfig,
    /// Greeting handshake configuration.
    pub handshake: HandshakeSettings,
    /// Bootstrap seed.
    pub seed: SeedConfig,
    /// Run one reflection pass over known peers after startup.
    pub greet_on_startup: bool,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            storage: StorageConfig::default(),
            network: NetworkConfig::default(),
            handshake: HandshakeSettings::default(),
            seed: SeedConfig::default(),
            greet_on_startup: true,
        }
    }
}

/// Durable store backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Single file, rewritten atomically on every write.
    #[default]
    File,
    /// RocksDB (requires the `rocksdb` feature).
    Rocksdb,
}

/// Storage configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding the node database.
    pub data_dir: PathBuf,
    /// Which store implementation to open.
    pub backend: StorageBackend,
    /// fsync every RocksDB write.
    pub sync_writes: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            backend: StorageBackend::File,
            sync_writes: true,
        }
    }
}

/// Network configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Bind exactly these addresses instead of the derived candidates.
    pub bind: Vec<Ipv4Addr>,
    /// Listen on this port instead of the persisted one.
    pub port: Option<u16>,
}

/// Handshake configuration as written in the config file.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HandshakeSettings {
    /// Version sent in outgoing greetings.
    pub protocol_version: u32,
    /// Oldest caller version answered.
    pub min_protocol_version: u32,
    /// Per-exchange timeout.
    pub timeout_secs: u64,
    /// Add inbound callers to the address book.
    pub register_inbound: bool,
    /// Largest accepted frame in bytes.
    pub max_frame_size: usize,
}

impl Default for HandshakeSettings {
    fn default() -> Self {
        let defaults = HandshakeConfig::default();
        Self {
            protocol_version: defaults.protocol_version,
            min_protocol_version: defaults.min_protocol_version,
            timeout_secs: defaults.timeout.as_secs(),
            register_inbound: defaults.register_inbound,
            max_frame_size: defaults.max_frame_size,
        }
    }
}

/// Seed contact as written in the config file.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SeedConfig {
    /// `ip:port`.
    pub address: String,
    /// Hex X coordinate.
    pub x: String,
    /// Hex Y coordinate.
    pub y: String,
}

impl Default for SeedConfig {
    fn default() -> Self {
        let coordinate = hex::encode(DEFAULT_SEED_COORDINATE);
        Self {
            address: DEFAULT_SEED_ADDRESS.to_string(),
            x: coordinate.clone(),
            y: coordinate,
        }
    }
}

impl NodeConfig {
    /// Defaults, then the `OSANWE_CONFIG` file if set, then environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match std::env::var(ENV_CONFIG) {
            Ok(path) => Self::from_file(path)?,
            Err(_) => Self::default(),
        };
        config.apply_env(|name| std::env::var(name).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML file. Missing sections keep their defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io {
            path: path.as_ref().display().to_string(),
            error: e.to_string(),
        })?;
        Self::from_toml(&content)
    }

    /// Parse TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Apply environment overrides read through `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup(ENV_DATA_DIR) {
            self.storage.data_dir = PathBuf::from(dir);
        }
        if let Some(port) = lookup(ENV_PORT) {
            self.network.port = Some(parse_env(ENV_PORT, &port)?);
        }
        if let Some(bind) = lookup(ENV_BIND) {
            self.network.bind = bind
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|s| parse_env(ENV_BIND, s))
                .collect::<Result<_, _>>()?;
        }
        if let Some(secs) = lookup(ENV_HANDSHAKE_TIMEOUT) {
            self.handshake.timeout_secs = parse_env(ENV_HANDSHAKE_TIMEOUT, &secs)?;
        }
        Ok(())
    }

    /// Reject values that would only fail later.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.parsed_seed()?;
        if self.handshake.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "handshake.timeout_secs must be positive".into(),
            ));
        }
        Ok(())
    }

    fn parsed_seed(&self) -> Result<SeedDefinition, ConfigError> {
        SeedDefinition::parse(&self.seed.address, &self.seed.x, &self.seed.y)
            .map_err(|e| ConfigError::Invalid(e.to_string()))
    }
}

fn parse_env<T: std::str::FromStr>(var: &'static str, value: &str) -> Result<T, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidEnv {
        var,
        value: value.to_string(),
    })
}

impl ConfigProvider for NodeConfig {
    fn seed(&self) -> SeedDefinition {
        self.parsed_seed().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "[osanwe] ⚠️ Invalid seed config, using default seed");
            SeedDefinition::default()
        })
    }

    fn handshake_config(&self) -> HandshakeConfig {
        HandshakeConfig {
            protocol_version: self.handshake.protocol_version,
            min_protocol_version: self.handshake.min_protocol_version,
            timeout: Duration::from_secs(self.handshake.timeout_secs),
            register_inbound: self.handshake.register_inbound,
            max_frame_size: self.handshake.max_frame_size,
        }
    }

    fn bind_addresses(&self) -> Vec<Ipv4Addr> {
        self.network.bind.clone()
    }

    fn port_override(&self) -> Option<u16> {
        self.network.port
    }
}

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// Config file unreadable.
    #[error("Failed to read {path}: {error}")]
    Io {
        /// Path of the file that failed to load.
        path: String,
        /// Error message from the I/O operation.
        error: String,
    },
    /// Config file is not valid TOML for this schema.
    #[error("Failed to parse config: {0}")]
    Parse(String),
    /// Environment variable holds an unusable value.
    #[error("Invalid value {value:?} in {var}")]
    InvalidEnv {
        /// Variable name.
        var: &'static str,
        /// Raw value.
        value: String,
    },
    /// Well-formed but unusable setting.
    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = NodeConfig::default();
        assert_eq!(config.storage.backend, StorageBackend::File);
        assert_eq!(config.handshake_config(), HandshakeConfig::default());
        assert_eq!(config.seed(), SeedDefinition::default());
        assert!(config.bind_addresses().is_empty());
        assert!(config.greet_on_startup);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_toml_sections_override_defaults() {
        let config = NodeConfig::from_toml(
            r#"
            greet_on_startup = false

            [storage]
            data_dir = "/var/lib/osanwe"
            backend = "rocksdb"

            [network]
            bind = ["127.0.0.1"]
            port = 12345

            [handshake]
            timeout_secs = 3
            "#,
        )
        .unwrap();

        assert!(!config.greet_on_startup);
        assert_eq!(config.storage.data_dir, PathBuf::from("/var/lib/osanwe"));
        assert_eq!(config.storage.backend, StorageBackend::Rocksdb);
        assert!(config.storage.sync_writes);
        assert_eq!(config.bind_addresses(), vec![Ipv4Addr::LOCALHOST]);
        assert_eq!(config.port_override(), Some(12345));
        assert_eq!(config.handshake_config().timeout, Duration::from_secs(3));
        assert_eq!(config.handshake_config().min_protocol_version, 1);
    }

    #[test]
    fn test_env_overrides_file() {
        let mut config = NodeConfig::from_toml("[network]\nport = 1").unwrap();
        config
            .apply_env(env(&[
                (ENV_PORT, "2"),
                (ENV_BIND, "10.0.0.1, 10.0.0.2"),
                (ENV_DATA_DIR, "/tmp/osanwe"),
                (ENV_HANDSHAKE_TIMEOUT, "7"),
            ]))
            .unwrap();

        assert_eq!(config.network.port, Some(2));
        assert_eq!(
            config.network.bind,
            vec![Ipv4Addr::new(10, 0, 0, 1), Ipv4Addr::new(10, 0, 0, 2)]
        );
        assert_eq!(config.storage.data_dir, PathBuf::from("/tmp/osanwe"));
        assert_eq!(config.handshake.timeout_secs, 7);
    }

    #[test]
    fn test_bad_env_value_rejected() {
        let mut config = NodeConfig::default();
        let result = config.apply_env(env(&[(ENV_PORT, "seventy")]));
        assert_eq!(
            result,
            Err(ConfigError::InvalidEnv {
                var: ENV_PORT,
                value: "seventy".into()
            })
        );
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(matches!(
            NodeConfig::from_toml("[storage]\nbackend = \"tape\""),
            Err(ConfigError::Parse(_))
        ));

        let mut config = NodeConfig::default();
        config.seed.address = "nowhere".into();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = NodeConfig::default();
        config.handshake.timeout_secs = 0;
        assert!(config.validate().is_err());
    }
}
