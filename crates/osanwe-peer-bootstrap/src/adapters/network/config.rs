use std::net::Ipv4Addr;

use crate::domain::{HandshakeConfig, SeedDefinition};
use crate::ports::ConfigProvider;

// ============================================================================
// StaticConfigProvider - Hardcoded config for testing/development
// ============================================================================

/// Static configuration provider with hardcoded values.
///
/// Useful for testing and development. For production, use `TomlConfigProvider`.
#[derive(Debug, Clone, Default)]
pub struct StaticConfigProvider {
    seed: SeedDefinition,
    handshake: HandshakeConfig,
    bind_addresses: Vec<Ipv4Addr>,
    port: Option<u16>,
}

impl StaticConfigProvider {
    /// Create with the default seed and handshake settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the bootstrap seed.
    #[must_use]
    pub fn with_seed(mut self, seed: SeedDefinition) -> Self {
        self.seed = seed;
        self
    }

    /// Replace the handshake settings.
    #[must_use]
    pub fn with_handshake(mut self, handshake: HandshakeConfig) -> Self {
        self.handshake = handshake;
        self
    }

    /// Pin the listener to these addresses.
    #[must_use]
    pub fn with_bind_addresses(mut self, addresses: Vec<Ipv4Addr>) -> Self {
        self.bind_addresses = addresses;
        self
    }

    /// Override the persisted listener port.
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }
}

impl ConfigProvider for StaticConfigProvider {
    fn seed(&self) -> SeedDefinition {
        self.seed.clone()
    }

    fn handshake_config(&self) -> HandshakeConfig {
        self.handshake.clone()
    }

    fn bind_addresses(&self) -> Vec<Ipv4Addr> {
        self.bind_addresses.clone()
    }

    fn port_override(&self) -> Option<u16> {
        self.port
    }
}

// ============================================================================
// TomlConfigProvider - Production Config Loading (requires "network" feature)
// ============================================================================

#[cfg(feature = "network")]
mod toml_config {
    use super::*;
    use serde::Deserialize;
    use std::fs;
    use std::path::Path;
    use std::time::Duration;

    /// Configuration file structure.
    #[derive(Debug, Deserialize)]
    struct ConfigFile {
        #[serde(default)]
        seed: Option<SeedFile>,
        #[serde(default)]
        handshake: HandshakeFile,
        #[serde(default)]
        network: NetworkFile,
    }

    #[derive(Debug, Deserialize)]
    struct SeedFile {
        address: String,
        x: String,
        y: String,
    }

    #[derive(Debug, Deserialize, Default)]
    struct HandshakeFile {
        protocol_version: Option<u32>,
        min_protocol_version: Option<u32>,
        timeout_secs: Option<u64>,
        register_inbound: Option<bool>,
        max_frame_size: Option<usize>,
    }

    #[derive(Debug, Deserialize, Default)]
    struct NetworkFile {
        #[serde(default)]
        bind: Vec<String>,
        port: Option<u16>,
    }

    /// TOML-based configuration provider.
    ///
    /// # Config File Format
    ///
    /// ```toml
    /// [seed]
    /// address = "5.187.6.75:12345"
    /// x = "c94b3097970d59fac8ac565c3ee5dfbb0764258f3a1b97f9c18c64fb191f9c62"
    /// y = "c94b3097970d59fac8ac565c3ee5dfbb0764258f3a1b97f9c18c64fb191f9c62"
    ///
    /// [handshake]
    /// protocol_version = 1
    /// min_protocol_version = 1
    /// timeout_secs = 10
    /// register_inbound = true
    /// max_frame_size = 65536
    ///
    /// [network]
    /// bind = ["192.168.1.10"]
    /// port = 12345
    /// ```
    ///
    /// Every section and key is optional.
    #[derive(Debug, Clone)]
    pub struct TomlConfigProvider {
        inner: StaticConfigProvider,
    }

    impl TomlConfigProvider {
        /// Load configuration from a TOML file.
        ///
        /// # Errors
        ///
        /// Returns error if file cannot be read or parsed.
        pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
            let content = fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io {
                path: path.as_ref().display().to_string(),
                error: e.to_string(),
            })?;

            Self::parse(&content)
        }

        /// Parse configuration from a TOML string.
        pub fn parse(content: &str) -> Result<Self, ConfigError> {
            let file: ConfigFile =
                toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;

            let seed = match file.seed {
                Some(s) => SeedDefinition::parse(&s.address, &s.x, &s.y)
                    .map_err(|e| ConfigError::Invalid(e.to_string()))?,
                None => SeedDefinition::default(),
            };

            let defaults = HandshakeConfig::default();
            let hs = file.handshake;
            let handshake = HandshakeConfig {
                protocol_version: hs.protocol_version.unwrap_or(defaults.protocol_version),
                min_protocol_version: hs
                    .min_protocol_version
                    .unwrap_or(defaults.min_protocol_version),
                timeout: hs
                    .timeout_secs
                    .map(Duration::from_secs)
                    .unwrap_or(defaults.timeout),
                register_inbound: hs.register_inbound.unwrap_or(defaults.register_inbound),
                max_frame_size: hs.max_frame_size.unwrap_or(defaults.max_frame_size),
            };

            let bind_addresses = file
                .network
                .bind
                .iter()
                .map(|s| {
                    s.parse::<Ipv4Addr>()
                        .map_err(|_| ConfigError::Invalid(format!("bind address {s:?}")))
                })
                .collect::<Result<Vec<_>, _>>()?;

            let mut inner = StaticConfigProvider::new()
                .with_seed(seed)
                .with_handshake(handshake)
                .with_bind_addresses(bind_addresses);
            if let Some(port) = file.network.port {
                inner = inner.with_port(port);
            }

            Ok(Self { inner })
        }
    }

    impl ConfigProvider for TomlConfigProvider {
        fn seed(&self) -> SeedDefinition {
            self.inner.seed()
        }

        fn handshake_config(&self) -> HandshakeConfig {
            self.inner.handshake_config()
        }

        fn bind_addresses(&self) -> Vec<Ipv4Addr> {
            self.inner.bind_addresses()
        }

        fn port_override(&self) -> Option<u16> {
            self.inner.port_override()
        }
    }

    /// Errors that can occur during config loading.
    #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
    pub enum ConfigError {
        /// File I/O error.
        #[error("Failed to read {path}: {error}")]
        Io {
            /// Path of the file that failed to load.
            path: String,
            /// Error message from the I/O operation.
            error: String,
        },
        /// TOML parsing error.
        #[error("Failed to parse config: {0}")]
        Parse(String),
        /// Well-formed TOML with an unusable value.
        #[error("Invalid config value: {0}")]
        Invalid(String),
    }
}

#[cfg(feature = "network")]
pub use toml_config::{ConfigError, TomlConfigProvider};
