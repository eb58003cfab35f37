//! # Runtime Configuration
//!
//! Loaded from environment variables. Every value has a default so the
//! runtime starts with no configuration at all.
//!
//! | Variable | Default |
//! |----------|---------|
//! | `MC_APP` | `kvstore` |
//! | `MC_CHAIN_ID` | `test-chain` |
//! | `MC_SERIAL` | `false` |
//! | `MC_STORAGE` | `memory` |
//! | `MC_DATA_DIR` | `./data` |
//! | `MC_SYNC_WRITES` | `true` |
//! | `MC_LOG_LEVEL` / `RUST_LOG` | `info` |

use mc_02_chain_state::WriteMode;
use mc_05_dispatch::{AppKind, DispatchConfig, UnknownAppKind};
use shared_types::{AppError, ChainId};
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

/// Chain id used when a request does not name one.
pub const DEFAULT_CHAIN_ID: &str = "test-chain";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    UnknownApp(#[from] UnknownAppKind),

    #[error("unknown storage backend {0:?}, expected memory, file or rocksdb")]
    UnknownStorage(String),

    #[error("invalid default chain id: {0}")]
    InvalidChainId(#[source] AppError),
}

/// Where chain data is kept.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StorageBackend {
    #[default]
    Memory,
    File,
    RocksDb,
}

impl FromStr for StorageBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "memory" | "mem" => Ok(StorageBackend::Memory),
            "file" => Ok(StorageBackend::File),
            "rocksdb" => Ok(StorageBackend::RocksDb),
            _ => Err(ConfigError::UnknownStorage(s.to_string())),
        }
    }
}

/// Complete runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Active application variant.
    pub app: AppKind,
    /// Default chain id; empty disables the default.
    pub chain_id: String,
    /// Default `serial` flag for counter chains.
    pub serial: bool,
    /// Storage backend.
    pub storage: StorageBackend,
    /// Directory for the file and RocksDB backends.
    pub data_dir: PathBuf,
    /// Commit state records with synchronous writes.
    pub sync_writes: bool,
    /// Tracing filter directive.
    pub log_level: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            app: AppKind::KvStore,
            chain_id: DEFAULT_CHAIN_ID.to_string(),
            serial: false,
            storage: StorageBackend::Memory,
            data_dir: PathBuf::from("./data"),
            sync_writes: true,
            log_level: "info".to_string(),
        }
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(value.to_ascii_lowercase().as_str(), "true" | "1" | "on" | "yes")
}

impl RuntimeConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through `lookup`, falling back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(app) = lookup("MC_APP") {
            config.app = app.parse()?;
        }
        if let Some(chain_id) = lookup("MC_CHAIN_ID") {
            config.chain_id = chain_id;
        }
        if let Some(serial) = lookup("MC_SERIAL") {
            config.serial = parse_flag(&serial);
        }
        if let Some(storage) = lookup("MC_STORAGE") {
            config.storage = storage.parse()?;
        }
        if let Some(dir) = lookup("MC_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }
        if let Some(sync) = lookup("MC_SYNC_WRITES") {
            config.sync_writes = parse_flag(&sync);
        }
        if let Some(level) = lookup("MC_LOG_LEVEL").or_else(|| lookup("RUST_LOG")) {
            config.log_level = level;
        }

        Ok(config)
    }

    /// Validate the configuration.
    ///
    /// # Returns
    ///
    /// Returns `Err` if the default chain id contains the namespace sentinel.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.default_chain_id().map(|_| ())
    }

    /// The validated default chain id, `None` if disabled.
    pub fn default_chain_id(&self) -> Result<Option<ChainId>, ConfigError> {
        if self.chain_id.is_empty() {
            return Ok(None);
        }
        ChainId::new(self.chain_id.as_str())
            .map(Some)
            .map_err(ConfigError::InvalidChainId)
    }

    pub fn write_mode(&self) -> WriteMode {
        if self.sync_writes {
            WriteMode::Sync
        } else {
            WriteMode::Async
        }
    }

    /// Settings handed to the dispatch layer.
    pub fn dispatch_config(&self) -> Result<DispatchConfig, ConfigError> {
        Ok(DispatchConfig {
            default_chain_id: self.default_chain_id()?,
            serial: self.serial,
            write_mode: self.write_mode(),
        })
    }
}
