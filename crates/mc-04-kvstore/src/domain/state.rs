use mc_01_chain_store::ChainDb;
use mc_02_chain_state::PersistentState;

/// In-memory state of one chain: its store view and metadata record.
#[derive(Debug, Clone)]
pub struct KvChainState {
    pub db: ChainDb,
    pub record: PersistentState,
}

impl KvChainState {
    pub fn new(db: ChainDb, record: PersistentState) -> Self {
        Self { db, record }
    }

    /// `{"size":N}`
    pub fn info_json(&self) -> String {
        serde_json::json!({ "size": self.record.size }).to_string()
    }
}
