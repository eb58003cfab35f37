pub mod state;
pub mod tx;

pub use state::KvChainState;
pub use tx::{entry_key, parse_tx, KV_PAIR_PREFIX};
