//! # Chain Store (mc-01)
//!
//! Multiplexes the keyspaces of many chains onto one shared, ordered
//! key-value primitive.
//!
//! ## Physical Layout
//!
//! ```text
//! 0x00 ‖ chain-id ‖ 0x00 ‖ logical-key
//! └──── chain prefix ───┘
//! ```
//!
//! Chain ids never contain `0x00`, so the chain prefix of one chain is never
//! a prefix of another chain's keys, and the range
//! `[prefix, prefix_end_bound(prefix))` holds exactly one chain's keys.
//!
//! ## Domain Invariants
//!
//! | ID | Invariant | Enforcement |
//! |----|-----------|-------------|
//! | 1 | Isolation | `keys::chain_prefix_key` is the only key constructor |
//! | 2 | Ordered iteration | logical order == physical order within a prefix |
//! | 3 | Atomic batches | `ChainBatch::write` issues one `write_batch` |
//!
//! ## Crate Structure
//!
//! - `ports` - the `KeyValueStore` primitive consumed by this crate
//! - `keys` - physical key construction and range bounds
//! - `chain_db` - the per-chain view (`ChainDb`, `ChainBatch`, `ChainIterator`)
//! - `adapters` - in-memory, file-backed and (feature `rocksdb`) RocksDB stores

pub mod adapters;
pub mod chain_db;
pub mod keys;
pub mod ports;

pub use adapters::{FileBackedKVStore, InMemoryKVStore};
#[cfg(feature = "rocksdb")]
pub use adapters::{RocksDbConfig, RocksDbStore};
pub use chain_db::{ChainBatch, ChainDb, ChainIterator};
pub use keys::{chain_prefix, chain_prefix_key, prefix_end_bound};
pub use ports::{BatchOperation, Direction, KeyValueStore, KvPair, StoreIterator, StoreStats};
