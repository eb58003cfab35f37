use super::{apply_batch, collect_range};
use crate::ports::{BatchOperation, Direction, KeyValueStore, StoreIterator, StoreStats};
use parking_lot::RwLock;
use shared_types::KVStoreError;
use std::collections::BTreeMap;

#[derive(Default)]
struct Inner {
    data: BTreeMap<Vec<u8>, Vec<u8>>,
    closed: bool,
}

/// In-memory ordered key-value store.
///
/// Sync and async writes are identical: nothing outlives the process.
#[derive(Default)]
pub struct InMemoryKVStore {
    inner: RwLock<Inner>,
}

impl InMemoryKVStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.inner.read().data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn write_entry(&self, key: &[u8], value: Option<&[u8]>) -> Result<(), KVStoreError> {
        let mut inner = self.inner.write();
        if inner.closed {
            return Err(KVStoreError::Closed);
        }
        match value {
            Some(value) => {
                inner.data.insert(key.to_vec(), value.to_vec());
            }
            None => {
                inner.data.remove(key);
            }
        }
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

impl KeyValueStore for InMemoryKVStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, KVStoreError> {
        let inner = self.inner.read();
        if inner.closed {
            return Err(KVStoreError::Closed);
        }
        Ok(inner.data.get(key).cloned())
    }

    fn set(&self, key: &[u8], value: &[u8]) -> Result<(), KVStoreError> {
        self.write_entry(key, Some(value))
    }

    fn set_sync(&self, key: &[u8], value: &[u8]) -> Result<(), KVStoreError> {
        self.write_entry(key, Some(value))
    }

    fn delete(&self, key: &[u8]) -> Result<(), KVStoreError> {
        self.write_entry(key, None)
    }

    fn delete_sync(&self, key: &[u8]) -> Result<(), KVStoreError> {
        self.write_entry(key, None)
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

    fn write_batch(&self, operations: Vec<BatchOperation>, _sync: bool) -> Result<(), KVStoreError> {
        // The write lock is held for the whole batch, so readers never see half of it.
        let mut inner = self.inner.write();
        if inner.closed {
            return Err(KVStoreError::Closed);
        }
        apply_batch(&mut inner.data, operations);
        Ok(())
    }

    fn close(&self) -> Result<(), KVStoreError> {
        self.inner.write().closed = true;
        Ok(())
    }

    fn stats(&self) -> StoreStats {
        let inner = self.inner.read();
        let mut stats = StoreStats::new();
        stats.insert("database.type".to_string(), "memDB".to_string());
        stats.insert("database.size".to_string(), inner.data.len().to_string());
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_memory_kv_store() {
        let store = InMemoryKVStore::new();

        store.set(b"key1", b"value1").unwrap();
        store.set_sync(b"key2", b"value2").unwrap();

        assert_eq!(store.get(b"key1").unwrap(), Some(b"value1".to_vec()));
        assert_eq!(store.get(b"key2").unwrap(), Some(b"value2".to_vec()));
        assert_eq!(store.get(b"key3").unwrap(), None);

        assert!(store.has(b"key1").unwrap());
        assert!(!store.has(b"key3").unwrap());
    }

    #[test]
    fn test_in_memory_kv_batch_write() {
        let store = InMemoryKVStore::new();
        store.set(b"d", b"old").unwrap();

        let ops = vec![
            BatchOperation::put(b"a".to_vec(), b"1".to_vec()),
            BatchOperation::put(b"b".to_vec(), b"2".to_vec()),
            BatchOperation::delete(b"d".to_vec()),
        ];

        store.write_batch(ops, true).unwrap();

        assert_eq!(store.get(b"a").unwrap(), Some(b"1".to_vec()));
        assert_eq!(store.get(b"b").unwrap(), Some(b"2".to_vec()));
        assert_eq!(store.get(b"d").unwrap(), None);
    }

    #[test]
    fn test_range_iteration_order() {
        let store = InMemoryKVStore::new();
        for key in [&b"b"[..], b"a", b"d", b"c"] {
            store.set(key, b"v").unwrap();
        }

        let forward: Vec<_> = store
            .iterator(Some(&b"b"[..]), Some(&b"d"[..]))
            .unwrap()
            .map(|(k, _)| k)
            .collect();
        assert_eq!(forward, vec![b"b".to_vec(), b"c".to_vec()]);

        let reverse: Vec<_> = store
            .reverse_iterator(None, None)
            .unwrap()
            .map(|(k, _)| k)
            .collect();
        assert_eq!(
            reverse,
            vec![b"d".to_vec(), b"c".to_vec(), b"b".to_vec(), b"a".to_vec()]
        );
    }

    #[test]
    fn test_closed_store_rejects_calls() {
        let store = InMemoryKVStore::new();
        store.set(b"k", b"v").unwrap();
        store.close().unwrap();

        assert_eq!(store.get(b"k"), Err(KVStoreError::Closed));
        assert_eq!(store.set(b"k", b"v"), Err(KVStoreError::Closed));
        assert!(store.iterator(None, None).is_err());
        assert_eq!(store.stats().get("database.size").map(String::as_str), Some("1"));
    }
}
