//! # RocksDB Storage Adapter
//!
//! Production implementation of the `KeyValueStore` trait.
//!
//! - Atomic batch writes (`WriteBatch`)
//! - Snappy compression
//! - Bloom filters for read optimization
//! - `WriteOptions::set_sync` for the durable write variants

use crate::ports::{BatchOperation, Direction, KeyValueStore, KvPair, StoreIterator, StoreStats};
use parking_lot::RwLock;
use rocksdb::{IteratorMode, Options, WriteBatch, WriteOptions, DB};
use shared_types::KVStoreError;
use std::path::Path;

/// RocksDB configuration.
#[derive(Debug, Clone)]
pub struct RocksDbConfig {
    /// Path to the database directory
    pub path: String,
    /// Block cache size in bytes (default: 256MB)
    pub block_cache_size: usize,
    /// Write buffer size in bytes (default: 64MB)
    pub write_buffer_size: usize,
    /// Enable statistics collection
    pub enable_statistics: bool,
}

impl Default for RocksDbConfig {
    fn default() -> Self {
        Self {
            path: "./data/rocksdb".to_string(),
            block_cache_size: 256 * 1024 * 1024,
            write_buffer_size: 64 * 1024 * 1024,
            enable_statistics: false,
        }
    }
}

impl RocksDbConfig {
    /// Create config for testing (smaller buffers)
    pub fn for_testing(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            block_cache_size: 8 * 1024 * 1024,
            write_buffer_size: 4 * 1024 * 1024,
            enable_statistics: false,
        }
    }
}

fn io_error(op: &str, e: rocksdb::Error) -> KVStoreError {
    KVStoreError::IOError {
        message: format!("RocksDB {} failed: {}", op, e),
    }
}

/// RocksDB-backed key-value store.
pub struct RocksDbStore {
    /// `None` once closed.
    db: RwLock<Option<DB>>,
    config: RocksDbConfig,
}

impl RocksDbStore {
    /// Open or create a RocksDB database
    pub fn open(config: RocksDbConfig) -> Result<Self, KVStoreError> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.set_write_buffer_size(config.write_buffer_size);
        opts.set_compression_type(rocksdb::DBCompressionType::Snappy);
        if config.enable_statistics {
            opts.enable_statistics();
        }

        let mut block_opts = rocksdb::BlockBasedOptions::default();
        block_opts.set_bloom_filter(10.0, false);
        block_opts.set_block_cache(&rocksdb::Cache::new_lru_cache(config.block_cache_size));
        opts.set_block_based_table_factory(&block_opts);

        let db = DB::open(&opts, &config.path).map_err(|e| io_error("open", e))?;
        tracing::info!(path = %config.path, "opened RocksDB store");

        Ok(Self {
            db: RwLock::new(Some(db)),
            config,
        })
    }

    /// Open with default tuning at `path`.
    pub fn open_default(path: impl AsRef<Path>) -> Result<Self, KVStoreError> {
        let config = RocksDbConfig {
            path: path.as_ref().to_string_lossy().to_string(),
            ..Default::default()
        };
        Self::open(config)
    }

    fn write_opts(sync: bool) -> WriteOptions {
        let mut write_opts = WriteOptions::default();
        write_opts.set_sync(sync);
        write_opts
    }

    fn write(&self, batch: WriteBatch, sync: bool) -> Result<(), KVStoreError> {
        let guard = self.db.read();
        let db = guard.as_ref().ok_or(KVStoreError::Closed)?;
        db.write_opt(batch, &Self::write_opts(sync))
            .map_err(|e| io_error("write", e))
    }

    fn open_range(
        &self,
        start: Option<&[u8]>,
        end: Option<&[u8]>,
        direction: Direction,
    ) -> Result<StoreIterator, KVStoreError> {
        let guard = self.db.read();
        let db = guard.as_ref().ok_or(KVStoreError::Closed)?;

        let mode = match (direction, start, end) {
            (Direction::Forward, Some(start), _) => {
                IteratorMode::From(start, rocksdb::Direction::Forward)
            }
            (Direction::Forward, None, _) => IteratorMode::Start,
            (Direction::Reverse, _, Some(end)) => IteratorMode::From(end, rocksdb::Direction::Reverse),
            (Direction::Reverse, _, None) => IteratorMode::End,
        };

        let mut items: Vec<KvPair> = Vec::new();
        for item in db.iterator(mode) {
            let (key, value) = item.map_err(|e| io_error("scan", e))?;
            let below_start = start.is_some_and(|s| &*key < s);
            let at_or_past_end = end.is_some_and(|e| &*key >= e);
            match direction {
                Direction::Forward if at_or_past_end => break,
                Direction::Reverse if below_start => break,
                // Seeking in reverse lands on `end` itself when it exists.
                Direction::Reverse if at_or_past_end => continue,
                _ => items.push((key.to_vec(), value.to_vec())),
            }
        }

        Ok(StoreIterator::new(start, end, direction, items))
    }
}

impl KeyValueStore for RocksDbStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, KVStoreError> {
        let guard = self.db.read();
        let db = guard.as_ref().ok_or(KVStoreError::Closed)?;
        db.get(key).map_err(|e| io_error("get", e))
    }

    fn has(&self, key: &[u8]) -> Result<bool, KVStoreError> {
        let guard = self.db.read();
        let db = guard.as_ref().ok_or(KVStoreError::Closed)?;
        db.get_pinned(key)
            .map(|v| v.is_some())
            .map_err(|e| io_error("exists check", e))
    }

    fn set(&self, key: &[u8], value: &[u8]) -> Result<(), KVStoreError> {
        self.write_batch(vec![BatchOperation::put(key, value)], false)
    }

    fn set_sync(&self, key: &[u8], value: &[u8]) -> Result<(), KVStoreError> {
        self.write_batch(vec![BatchOperation::put(key, value)], true)
    }

    fn delete(&self, key: &[u8]) -> Result<(), KVStoreError> {
        self.write_batch(vec![BatchOperation::delete(key)], false)
    }

    fn delete_sync(&self, key: &[u8]) -> Result<(), KVStoreError> {
        self.write_batch(vec![BatchOperation::delete(key)], true)
    }

    fn iterator(
        &self,
        start: Option<&[u8]>,
        end: Option<&[u8]>,
    ) -> Result<StoreIterator, KVStoreError> {
        self.open_range(start, end, Direction::Forward)
    }

    fn reverse_iterator(
        &self,
        start: Option<&[u8]>,
        end: Option<&[u8]>,
    ) -> Result<StoreIterator, KVStoreError> {
        self.open_range(start, end, Direction::Reverse)
    }

    fn write_batch(&self, operations: Vec<BatchOperation>, sync: bool) -> Result<(), KVStoreError> {
        let mut batch = WriteBatch::default();
        for op in operations {
            match op {
                BatchOperation::Put { key, value } => batch.put(&key, &value),
                BatchOperation::Delete { key } => batch.delete(&key),
            }
        }
        self.write(batch, sync)
    }

    fn close(&self) -> Result<(), KVStoreError> {
        if let Some(db) = self.db.write().take() {
            db.flush().map_err(|e| io_error("flush", e))?;
            tracing::info!(path = %self.config.path, "closed RocksDB store");
        }
        Ok(())
    }

    fn stats(&self) -> StoreStats {
        let mut stats = StoreStats::new();
        stats.insert("database.type".to_string(), "rocksDB".to_string());
        stats.insert("database.path".to_string(), self.config.path.clone());
        if let Some(db) = self.db.read().as_ref() {
            if let Ok(Some(value)) = db.property_value("rocksdb.estimate-num-keys") {
                stats.insert("database.size".to_string(), value);
            }
        }
        stats
    }
}
