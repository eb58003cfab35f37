//! # Chain-Scoped Store View
//!
//! `ChainDb` rewrites every logical key into the physical keyspace of one
//! chain. It adds no error kinds of its own: primitive errors propagate
//! unchanged.

use crate::keys::{chain_prefix, prefix_end_bound};
use crate::ports::{BatchOperation, Direction, KeyValueStore, KvPair, StoreIterator, StoreStats};
use shared_types::{ChainId, KVStoreError};
use std::fmt;
use std::sync::Arc;

/// View of the shared store restricted to one chain.
///
/// Cheap to clone. Safe to use concurrently with views of other chains;
/// writers on the same chain must be serialized by the caller.
#[derive(Clone)]
pub struct ChainDb {
    chain_id: ChainId,
    prefix: Vec<u8>,
    db: Arc<dyn KeyValueStore>,
}

impl fmt::Debug for ChainDb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChainDb")
            .field("chain_id", &self.chain_id)
            .finish_non_exhaustive()
    }
}

impl ChainDb {
    pub fn new(chain_id: ChainId, db: Arc<dyn KeyValueStore>) -> Self {
        let prefix = chain_prefix(&chain_id);
        Self {
            chain_id,
            prefix,
            db,
        }
    }

    pub fn chain_id(&self) -> &ChainId {
        &self.chain_id
    }

    fn physical_key(&self, key: &[u8]) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.prefix.len() + key.len());
        out.extend_from_slice(&self.prefix);
        out.extend_from_slice(key);
        out
    }

    pub fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, KVStoreError> {
        self.db.get(&self.physical_key(key))
    }

    pub fn has(&self, key: &[u8]) -> Result<bool, KVStoreError> {
        self.db.has(&self.physical_key(key))
    }

    pub fn set(&self, key: &[u8], value: &[u8]) -> Result<(), KVStoreError> {
        self.db.set(&self.physical_key(key), value)
    }

    pub fn set_sync(&self, key: &[u8], value: &[u8]) -> Result<(), KVStoreError> {
        self.db.set_sync(&self.physical_key(key), value)
    }

    pub fn delete(&self, key: &[u8]) -> Result<(), KVStoreError> {
        self.db.delete(&self.physical_key(key))
    }

    pub fn delete_sync(&self, key: &[u8]) -> Result<(), KVStoreError> {
        self.db.delete_sync(&self.physical_key(key))
    }

    /// Iterate this chain's keys in `[start, end)`, ascending.
    ///
    /// A `None` or empty `start` begins at the chain's first key; a `None` or
    /// empty `end` runs through the chain's last key. The result is empty if
    /// `start >= end`.
    ///
    /// The whole range is copied into memory when the iterator opens, so an
    /// unbounded scan of a large chain costs memory proportional to its size.
    /// Later writes are not observed.
    pub fn iterator(
        &self,
        start: Option<&[u8]>,
        end: Option<&[u8]>,
    ) -> Result<ChainIterator, KVStoreError> {
        self.open_range(start, end, Direction::Forward)
    }

    /// Iterate this chain's keys in `[start, end)`, descending.
    ///
    /// Materializes the range up front, like [`ChainDb::iterator`].
    pub fn reverse_iterator(
        &self,
        start: Option<&[u8]>,
        end: Option<&[u8]>,
    ) -> Result<ChainIterator, KVStoreError> {
        self.open_range(start, end, Direction::Reverse)
    }

    fn open_range(
        &self,
        start: Option<&[u8]>,
        end: Option<&[u8]>,
        direction: Direction,
    ) -> Result<ChainIterator, KVStoreError> {
        let start = start.filter(|s| !s.is_empty());
        let end = end.filter(|e| !e.is_empty());

        let physical_start = self.physical_key(start.unwrap_or_default());
        // The prefix ends with the sentinel byte, so the bound always exists.
        let physical_end = match end {
            Some(end) => Some(self.physical_key(end)),
            None => prefix_end_bound(&self.prefix),
        };

        let inner = match direction {
            Direction::Forward => self
                .db
                .iterator(Some(&physical_start), physical_end.as_deref())?,
            Direction::Reverse => self
                .db
                .reverse_iterator(Some(&physical_start), physical_end.as_deref())?,
        };

        Ok(ChainIterator {
            inner,
            prefix_len: self.prefix.len(),
            start: start.map(<[u8]>::to_vec),
            end: end.map(<[u8]>::to_vec),
        })
    }

    /// Start a batch of writes scoped to this chain.
    pub fn new_batch(&self) -> ChainBatch {
        ChainBatch {
            db: self.clone(),
            operations: Vec::new(),
        }
    }

    /// Close the underlying shared store.
    ///
    /// This closes the store for every chain, not only this one.
    pub fn close(&self) -> Result<(), KVStoreError> {
        self.db.close()
    }

    pub fn stats(&self) -> StoreStats {
        self.db.stats()
    }
}

/// Iterator over one chain's entries, yielding logical keys.
#[derive(Debug)]
pub struct ChainIterator {
    inner: StoreIterator,
    prefix_len: usize,
    start: Option<Vec<u8>>,
    end: Option<Vec<u8>>,
}

impl ChainIterator {
    /// The logical `[start, end)` range this iterator was opened over.
    pub fn domain(&self) -> (Option<&[u8]>, Option<&[u8]>) {
        (self.start.as_deref(), self.end.as_deref())
    }

    pub fn direction(&self) -> Direction {
        self.inner.direction()
    }
}

impl Iterator for ChainIterator {
    type Item = KvPair;

    fn next(&mut self) -> Option<Self::Item> {
        let (mut key, value) = self.inner.next()?;
        // Range bounds guarantee every key carries the chain prefix.
        let logical = key.split_off(self.prefix_len);
        Some((logical, value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

/// Accumulates writes for one chain and commits them atomically.
///
/// Dropping an unwritten batch discards it.
#[must_use = "a batch has no effect until it is written"]
pub struct ChainBatch {
    db: ChainDb,
    operations: Vec<BatchOperation>,
}

impl ChainBatch {
    pub fn set(&mut self, key: &[u8], value: &[u8]) -> &mut Self {
        let key = self.db.physical_key(key);
        self.operations.push(BatchOperation::put(key, value));
        self
    }

    pub fn delete(&mut self, key: &[u8]) -> &mut Self {
        let key = self.db.physical_key(key);
        self.operations.push(BatchOperation::delete(key));
        self
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    pub fn write(self) -> Result<(), KVStoreError> {
        self.db.db.write_batch(self.operations, false)
    }

    pub fn write_sync(self) -> Result<(), KVStoreError> {
        self.db.db.write_batch(self.operations, true)
    }
}
