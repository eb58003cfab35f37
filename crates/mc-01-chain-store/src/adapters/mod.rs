//! Storage Adapters
//!
//! Implementations of the `KeyValueStore` trait.

mod file;
mod memory;
#[cfg(feature = "rocksdb")]
mod rocks;

pub use file::FileBackedKVStore;
pub use memory::InMemoryKVStore;
#[cfg(feature = "rocksdb")]
pub use rocks::{RocksDbConfig, RocksDbStore};

use crate::ports::{range_bounds, BatchOperation, Direction, KvPair};
use std::collections::BTreeMap;

/// Collect `[start, end)` from an ordered map in the requested direction.
pub(crate) fn collect_range(
    data: &BTreeMap<Vec<u8>, Vec<u8>>,
    start: Option<&[u8]>,
    end: Option<&[u8]>,
    direction: Direction,
) -> Vec<KvPair> {
    let Some(bounds) = range_bounds(start, end) else {
        return Vec::new();
    };
    let range = data
        .range::<[u8], _>(bounds)
        .map(|(k, v)| (k.clone(), v.clone()));
    match direction {
        Direction::Forward => range.collect(),
        Direction::Reverse => range.rev().collect(),
    }
}

/// Apply a batch to an ordered map.
pub(crate) fn apply_batch(data: &mut BTreeMap<Vec<u8>, Vec<u8>>, operations: Vec<BatchOperation>) {
    for op in operations {
        match op {
            BatchOperation::Put { key, value } => {
                data.insert(key, value);
            }
            BatchOperation::Delete { key } => {
                data.remove(&key);
            }
        }
    }
}
