//! # Key-Value Store Application (mc-04)
//!
//! Applies `key=value` transactions to a per-chain keyspace and commits a
//! deterministic app hash derived from the number of applied transactions.
//!
//! ## Logical Layout (per chain)
//!
//! | Logical key | Value |
//! |-------------|-------|
//! | `stateKey:` | JSON [`PersistentState`](mc_02_chain_state::PersistentState) |
//! | `kvPairKey:` ‖ key | raw value |
//!
//! ## Domain Invariants
//!
//! | ID | Invariant | Enforcement Location |
//! |----|-----------|---------------------|
//! | 1 | `size` grows by one per `DeliverTx`, duplicates included | `service.rs` - `deliver_tx()` |
//! | 2 | State record written only on `Commit` | `service.rs` - `commit()` |
//! | 3 | Same transaction history → same app hashes | `mc_02_chain_state::app_hash_for_size` |

pub mod domain;
pub mod service;

pub use domain::{entry_key, parse_tx, KvChainState, KV_PAIR_PREFIX};
pub use service::{KVStoreApplication, EVENT_CREATOR, EVENT_TYPE};
