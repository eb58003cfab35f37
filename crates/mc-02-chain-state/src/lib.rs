//! # Chain State (mc-02)
//!
//! The per-chain metadata record (`size`, `height`, `app_hash`) that survives
//! restarts, and the deterministic app hash derived from `size`.
//!
//! ## Storage
//!
//! The record is stored as JSON under the logical key [`STATE_KEY`] of the
//! chain's [`ChainDb`](mc_01_chain_store::ChainDb):
//!
//! ```text
//! stateKey: → {"size":3,"height":2,"app_hash":"0600000000000000"}
//! ```
//!
//! ## Lifecycle
//!
//! - created lazily: absent record loads as all-zero
//! - mutated only by `Commit`
//! - never deleted

pub mod app_hash;
pub mod record;

pub use app_hash::{app_hash_for_size, APP_HASH_LEN};
pub use record::{load_state, save_state, PersistentState, WriteMode, STATE_KEY};
