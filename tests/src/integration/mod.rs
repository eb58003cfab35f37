//! Cross-crate integration flows.

pub mod determinism;
pub mod multi_chain;
pub mod persistence;

use mc_01_chain_store::{InMemoryKVStore, KeyValueStore};
use mc_02_chain_state::WriteMode;
use mc_05_dispatch::{build_application, AppKind, DispatchConfig};
use shared_types::{Application, ChainId};
use std::sync::Arc;

/// Fresh in-memory store shared by every chain.
pub fn memory_store() -> Arc<dyn KeyValueStore> {
    Arc::new(InMemoryKVStore::new())
}

/// Build `kind` over `store` with `default_chain` as the default chain id.
pub fn build(kind: AppKind, store: Arc<dyn KeyValueStore>, default_chain: &str) -> Box<dyn Application> {
    let config = DispatchConfig {
        default_chain_id: ChainId::new(default_chain).ok(),
        serial: true,
        write_mode: WriteMode::Sync,
    };
    build_application(kind, store, &config)
}
