//! Storage backend selection.

use crate::config::{RuntimeConfig, StorageBackend};
use anyhow::{Context, Result};
use mc_01_chain_store::{FileBackedKVStore, InMemoryKVStore, KeyValueStore};
use std::sync::Arc;

/// Snapshot file of the file backend, inside the data directory.
pub const FILE_STORE_NAME: &str = "chains.db";

/// Open the backend selected by `config`.
pub fn open_store(config: &RuntimeConfig) -> Result<Arc<dyn KeyValueStore>> {
    match config.storage {
        StorageBackend::Memory => {
            tracing::info!("using in-memory storage");
            Ok(Arc::new(InMemoryKVStore::new()))
        }
        StorageBackend::File => {
            let path = config.data_dir.join(FILE_STORE_NAME);
            let store = FileBackedKVStore::open(&path)
                .with_context(|| format!("failed to open {}", path.display()))?;
            Ok(Arc::new(store))
        }
        StorageBackend::RocksDb => open_rocksdb(config),
    }
}

#[cfg(feature = "rocksdb")]
fn open_rocksdb(config: &RuntimeConfig) -> Result<Arc<dyn KeyValueStore>> {
    use mc_01_chain_store::{RocksDbConfig, RocksDbStore};

    let rocks_config = RocksDbConfig {
        path: config.data_dir.join("rocksdb").to_string_lossy().to_string(),
        ..Default::default()
    };
    let store = RocksDbStore::open(rocks_config).context("failed to open RocksDB")?;
    Ok(Arc::new(store))
}

#[cfg(not(feature = "rocksdb"))]
fn open_rocksdb(_config: &RuntimeConfig) -> Result<Arc<dyn KeyValueStore>> {
    anyhow::bail!("RocksDB storage requires the `rocksdb` feature")
}
