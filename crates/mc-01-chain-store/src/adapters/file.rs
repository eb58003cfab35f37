use super::{apply_batch, collect_range};
use crate::ports::{BatchOperation, Direction, KeyValueStore, StoreIterator, StoreStats};
use parking_lot::RwLock;
use shared_types::KVStoreError;
use std::collections::BTreeMap;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

struct Inner {
    data: BTreeMap<Vec<u8>, Vec<u8>>,
    /// Async writes not yet flushed to disk.
    dirty: bool,
    closed: bool,
}

/// File-backed ordered key-value store.
///
/// Keeps the whole keyspace in memory and persists it as one snapshot file.
/// Sync writes flush the snapshot before returning; async writes only mark
/// the store dirty until the next sync write, `flush` or `close`.
pub struct FileBackedKVStore {
    inner: RwLock<Inner>,
    path: PathBuf,
}

impl FileBackedKVStore {
    /// Open the store at `path`, loading the existing snapshot if present.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, KVStoreError> {
        let path = path.as_ref().to_path_buf();

        let data = if path.exists() {
            let data = Self::load_from_file(&path)?;
            tracing::info!(path = %path.display(), keys = data.len(), "loaded storage snapshot");
            data
        } else {
            tracing::info!(path = %path.display(), "no existing storage snapshot");
            BTreeMap::new()
        };

        Ok(Self {
            inner: RwLock::new(Inner {
                data,
                dirty: false,
                closed: false,
            }),
            path,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Persist pending async writes.
    pub fn flush(&self) -> Result<(), KVStoreError> {
        let mut inner = self.inner.write();
        if inner.closed {
            return Err(KVStoreError::Closed);
        }
        if inner.dirty {
            self.save_to_file(&inner.data)?;
            inner.dirty = false;
        }
        Ok(())
    }

    fn load_from_file(path: &Path) -> Result<BTreeMap<Vec<u8>, Vec<u8>>, KVStoreError> {
        let mut bytes = Vec::new();
        std::fs::File::open(path)
            .and_then(|mut file| file.read_to_end(&mut bytes))
            .map_err(|e| KVStoreError::IOError {
                message: e.to_string(),
            })?;

        // Format: [key_len:u32][key][value_len:u32][value]...
        let mut data = BTreeMap::new();
        let mut cursor = 0;
        while cursor < bytes.len() {
            let key = Self::read_chunk(&bytes, &mut cursor)?;
            let value = Self::read_chunk(&bytes, &mut cursor)?;
            data.insert(key, value);
        }
        Ok(data)
    }

    fn read_chunk(bytes: &[u8], cursor: &mut usize) -> Result<Vec<u8>, KVStoreError> {
        let truncated = || KVStoreError::CorruptionError {
            message: format!("snapshot truncated at offset {}", cursor),
        };

        let len_bytes: [u8; 4] = bytes
            .get(*cursor..*cursor + 4)
            .and_then(|s| s.try_into().ok())
            .ok_or_else(truncated)?;
        let len = u32::from_le_bytes(len_bytes) as usize;
        let chunk = bytes
            .get(*cursor + 4..*cursor + 4 + len)
            .ok_or_else(truncated)?
            .to_vec();
        *cursor += 4 + len;
        Ok(chunk)
    }

    fn save_to_file(&self, data: &BTreeMap<Vec<u8>, Vec<u8>>) -> Result<(), KVStoreError> {
        let io_err = |e: std::io::Error| KVStoreError::IOError {
            message: e.to_string(),
        };

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }

        let mut bytes = Vec::new();
        for (key, value) in data {
            bytes.extend_from_slice(&(key.len() as u32).to_le_bytes());
            bytes.extend_from_slice(key);
            bytes.extend_from_slice(&(value.len() as u32).to_le_bytes());
            bytes.extend_from_slice(value);
        }

        // Write atomically via temp file
        let temp_path = self.path.with_extension("tmp");
        let mut file = std::fs::File::create(&temp_path).map_err(io_err)?;
        file.write_all(&bytes).map_err(io_err)?;
        file.sync_all().map_err(io_err)?;
        std::fs::rename(&temp_path, &self.path).map_err(io_err)?;

        Ok(())
    }

    fn write_entries(&self, operations: Vec<BatchOperation>, sync: bool) -> Result<(), KVStoreError> {
        let mut inner = self.inner.write();
        if inner.closed {
            return Err(KVStoreError::Closed);
        }
        if !sync {
            apply_batch(&mut inner.data, operations);
            inner.dirty = true;
            return Ok(());
        }

        // Readers only see the batch once the snapshot holding it is on disk.
        let mut staged = inner.data.clone();
        apply_batch(&mut staged, operations);
        self.save_to_file(&staged)?;
        inner.data = staged;
        inner.dirty = false;
        Ok(())
    }

    fn open_range(
        &self,
        start: Option<&[u8]>,
        end: Option<&[u8]>,
        direction: Direction,
    ) -> Result<StoreIterator, KVStoreError> {
        let inner = self.inner.read();
        if inner.closed {
            return Err(KVStoreError::Closed);
        }
        let items = collect_range(&inner.data, start, end, direction);
        Ok(StoreIterator::new(start, end, direction, items))
    }
}

impl KeyValueStore for FileBackedKVStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, KVStoreError> {
        let inner = self.inner.read();
        if inner.closed {
            return Err(KVStoreError::Closed);
        }
        Ok(inner.data.get(key).cloned())
    }

    fn set(&self, key: &[u8], value: &[u8]) -> Result<(), KVStoreError> {
        self.write_entries(vec![BatchOperation::put(key, value)], false)
    }

    fn set_sync(&self, key: &[u8], value: &[u8]) -> Result<(), KVStoreError> {
        self.write_entries(vec![BatchOperation::put(key, value)], true)
    }

    fn delete(&self, key: &[u8]) -> Result<(), KVStoreError> {
        self.write_entries(vec![BatchOperation::delete(key)], false)
    }

    fn delete_sync(&self, key: &[u8]) -> Result<(), KVStoreError> {
        self.write_entries(vec![BatchOperation::delete(key)], true)
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
        self.write_entries(operations, sync)
    }

    fn close(&self) -> Result<(), KVStoreError> {
        let mut inner = self.inner.write();
        if inner.closed {
            return Ok(());
        }
        if inner.dirty {
            self.save_to_file(&inner.data)?;
            inner.dirty = false;
        }
        inner.closed = true;
        tracing::info!(path = %self.path.display(), "storage closed");
        Ok(())
    }

    fn stats(&self) -> StoreStats {
        let inner = self.inner.read();
        let mut stats = StoreStats::new();
        stats.insert("database.type".to_string(), "fileDB".to_string());
        stats.insert("database.size".to_string(), inner.data.len().to_string());
        stats.insert("database.path".to_string(), self.path.display().to_string());
        stats.insert("database.dirty".to_string(), inner.dirty.to_string());
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_sync_write_survives_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.db");

        {
            let store = FileBackedKVStore::open(&path).unwrap();
            store.set_sync(b"k", b"v").unwrap();
        }

        let reopened = FileBackedKVStore::open(&path).unwrap();
        assert_eq!(reopened.get(b"k").unwrap(), Some(b"v".to_vec()));
    }

    #[test]
    fn test_async_write_needs_flush() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.db");

        let store = FileBackedKVStore::open(&path).unwrap();
        store.set(b"k", b"v").unwrap();
        assert!(!path.exists());

        store.flush().unwrap();
        let reopened = FileBackedKVStore::open(&path).unwrap();
        assert_eq!(reopened.get(b"k").unwrap(), Some(b"v".to_vec()));
    }

    #[test]
    fn test_close_flushes_pending_writes() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("store.db");

        let store = FileBackedKVStore::open(&path).unwrap();
        store
            .write_batch(
                vec![
                    BatchOperation::put(b"a".to_vec(), b"1".to_vec()),
                    BatchOperation::put(b"b".to_vec(), b"2".to_vec()),
                ],
                false,
            )
            .unwrap();
        store.delete(b"a").unwrap();
        store.close().unwrap();

        assert_eq!(store.get(b"b"), Err(KVStoreError::Closed));

        let reopened = FileBackedKVStore::open(&path).unwrap();
        assert_eq!(reopened.get(b"a").unwrap(), None);
        assert_eq!(reopened.get(b"b").unwrap(), Some(b"2".to_vec()));
    }

    #[test]
    fn test_failed_sync_write_leaves_store_unchanged() {
        let dir = TempDir::new().unwrap();
        // A regular file where the snapshot's parent directory should be.
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, b"").unwrap();

        let store = FileBackedKVStore::open(blocker.join("store.db")).unwrap();

        assert!(matches!(
            store.set_sync(b"k", b"v"),
            Err(KVStoreError::IOError { .. })
        ));
        assert_eq!(store.get(b"k").unwrap(), None);
        assert_eq!(
            store.stats().get("database.dirty").map(String::as_str),
            Some("false")
        );

        let result = store.write_batch(
            vec![
                BatchOperation::put(b"a".to_vec(), b"1".to_vec()),
                BatchOperation::delete(b"b".to_vec()),
            ],
            true,
        );
        assert!(result.is_err());
        assert_eq!(store.get(b"a").unwrap(), None);
    }

    #[test]
    fn test_failed_sync_write_keeps_pending_async_writes() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, b"").unwrap();

        let store = FileBackedKVStore::open(blocker.join("store.db")).unwrap();
        store.set(b"pending", b"1").unwrap();

        assert!(store.delete_sync(b"pending").is_err());
        assert_eq!(store.get(b"pending").unwrap(), Some(b"1".to_vec()));
        assert_eq!(
            store.stats().get("database.dirty").map(String::as_str),
            Some("true")
        );
        assert!(store.flush().is_err());
    }

    #[test]
    fn test_truncated_snapshot_is_corruption() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.db");
        std::fs::write(&path, [5u8, 0, 0, 0, b'a']).unwrap();

        let result = FileBackedKVStore::open(&path);
        assert!(matches!(result, Err(KVStoreError::CorruptionError { .. })));
    }
}
