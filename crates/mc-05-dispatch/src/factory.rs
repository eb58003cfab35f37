//! Construction of the active application from configuration.

use crate::dispatcher::ChainDispatcher;
use mc_01_chain_store::KeyValueStore;
use mc_02_chain_state::WriteMode;
use mc_03_counter::CounterApplication;
use mc_04_kvstore::KVStoreApplication;
use shared_types::{Application, ChainId};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;

/// The state machine variants that can be served.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AppKind {
    #[default]
    KvStore,
    Counter,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown application {0:?}, expected kvstore or counter")]
pub struct UnknownAppKind(pub String);

impl FromStr for AppKind {
    type Err = UnknownAppKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "kvstore" => Ok(AppKind::KvStore),
            "counter" => Ok(AppKind::Counter),
            _ => Err(UnknownAppKind(s.to_string())),
        }
    }
}

impl fmt::Display for AppKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppKind::KvStore => f.write_str("kvstore"),
            AppKind::Counter => f.write_str("counter"),
        }
    }
}

/// Settings shared by every variant.
#[derive(Debug, Clone, Default)]
pub struct DispatchConfig {
    /// Substituted for empty request chain ids.
    pub default_chain_id: Option<ChainId>,
    /// Default `serial` flag of new counter chains.
    pub serial: bool,
    /// Durability of kvstore commits.
    pub write_mode: WriteMode,
}

/// Build `kind` behind a [`ChainDispatcher`].
///
/// The counter keeps its state in memory and ignores `store`.
pub fn build_application(
    kind: AppKind,
    store: Arc<dyn KeyValueStore>,
    config: &DispatchConfig,
) -> Box<dyn Application> {
    tracing::info!(
        app = %kind,
        default_chain_id = ?config.default_chain_id.as_ref().map(ChainId::as_str),
        "building application"
    );

    match kind {
        AppKind::KvStore => Box::new(ChainDispatcher::new(
            KVStoreApplication::new(store, config.write_mode),
            config.default_chain_id.clone(),
        )),
        AppKind::Counter => Box::new(ChainDispatcher::new(
            CounterApplication::new(config.serial),
            config.default_chain_id.clone(),
        )),
    }
}
