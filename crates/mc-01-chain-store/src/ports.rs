//! # Outbound Ports (Driven Ports)
//!
//! The ordered key-value primitive this crate multiplexes. Adapters live in
//! `crate::adapters`; production deployments may supply their own.

use shared_types::KVStoreError;
use std::collections::BTreeMap;
use std::ops::Bound;

/// A key/value pair yielded by iteration.
pub type KvPair = (Vec<u8>, Vec<u8>);

/// Named statistics reported by a store.
pub type StoreStats = BTreeMap<String, String>;

/// Abstract interface for an ordered, byte-keyed store.
///
/// Implementations synchronize internally: one instance is shared by every
/// chain through `Arc<dyn KeyValueStore>`.
pub trait KeyValueStore: Send + Sync {
    /// Get a value by key.
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, KVStoreError>;

    /// Check if a key exists.
    fn has(&self, key: &[u8]) -> Result<bool, KVStoreError> {
        Ok(self.get(key)?.is_some())
    }

    /// Put a single key-value pair.
    fn set(&self, key: &[u8], value: &[u8]) -> Result<(), KVStoreError>;

    /// Put a single key-value pair, durable before returning.
    fn set_sync(&self, key: &[u8], value: &[u8]) -> Result<(), KVStoreError>;

    /// Delete a key.
    fn delete(&self, key: &[u8]) -> Result<(), KVStoreError>;

    /// Delete a key, durable before returning.
    fn delete_sync(&self, key: &[u8]) -> Result<(), KVStoreError>;

    /// Iterate `[start, end)` in ascending key order.
    ///
    /// `None` start means the first key of the store, `None` end means
    /// through the last key.
    fn iterator(&self, start: Option<&[u8]>, end: Option<&[u8]>)
        -> Result<StoreIterator, KVStoreError>;

    /// Iterate `[start, end)` in descending key order.
    fn reverse_iterator(
        &self,
        start: Option<&[u8]>,
        end: Option<&[u8]>,
    ) -> Result<StoreIterator, KVStoreError>;

    /// Execute an atomic batch write.
    ///
    /// Either ALL operations in the batch are applied, or NONE are.
    fn write_batch(&self, operations: Vec<BatchOperation>, sync: bool)
        -> Result<(), KVStoreError>;

    /// Flush and release the store. Later calls fail with `Closed`.
    fn close(&self) -> Result<(), KVStoreError>;

    /// Backend statistics.
    fn stats(&self) -> StoreStats;
}

/// Batch operation for atomic writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOperation {
    /// Put a key-value pair.
    Put { key: Vec<u8>, value: Vec<u8> },
    /// Delete a key.
    Delete { key: Vec<u8> },
}

impl BatchOperation {
    /// Create a Put operation.
    pub fn put(key: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) -> Self {
        BatchOperation::Put {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Create a Delete operation.
    pub fn delete(key: impl Into<Vec<u8>>) -> Self {
        BatchOperation::Delete { key: key.into() }
    }

    pub fn key(&self) -> &[u8] {
        match self {
            BatchOperation::Put { key, .. } | BatchOperation::Delete { key } => key,
        }
    }
}

/// Iteration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Reverse,
}

/// Iterator over a key range of a store.
///
/// The range is materialized when the iterator is opened, holding every pair
/// in memory until it is consumed or dropped. Writes into the range while an
/// iterator is open are a caller error and are not observed.
#[derive(Debug)]
pub struct StoreIterator {
    start: Option<Vec<u8>>,
    end: Option<Vec<u8>>,
    direction: Direction,
    items: std::vec::IntoIter<KvPair>,
}

impl StoreIterator {
    /// Wrap pairs already ordered according to `direction`.
    pub fn new(
        start: Option<&[u8]>,
        end: Option<&[u8]>,
        direction: Direction,
        items: Vec<KvPair>,
    ) -> Self {
        Self {
            start: start.map(<[u8]>::to_vec),
            end: end.map(<[u8]>::to_vec),
            direction,
            items: items.into_iter(),
        }
    }

    /// The `[start, end)` range this iterator was opened over.
    pub fn domain(&self) -> (Option<&[u8]>, Option<&[u8]>) {
        (self.start.as_deref(), self.end.as_deref())
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }
}

impl Iterator for StoreIterator {
    type Item = KvPair;

    fn next(&mut self) -> Option<Self::Item> {
        self.items.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.items.size_hint()
    }
}

/// Range bounds for `[start, end)`, or `None` when the range is empty.
///
/// `BTreeMap::range` panics on inverted bounds, so adapters go through this.
pub(crate) fn range_bounds<'a>(
    start: Option<&'a [u8]>,
    end: Option<&'a [u8]>,
) -> Option<(Bound<&'a [u8]>, Bound<&'a [u8]>)> {
    if let (Some(s), Some(e)) = (start, end) {
        if s > e {
            return None;
        }
    }
    let lower = start.map_or(Bound::Unbounded, Bound::Included);
    let upper = end.map_or(Bound::Unbounded, Bound::Excluded);
    Some((lower, upper))
}
