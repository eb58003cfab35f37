//! # Persistent State Record

use mc_01_chain_store::ChainDb;
use serde::{Deserialize, Serialize};
use shared_types::AppError;

/// Reserved logical key of the state record inside a chain's namespace.
pub const STATE_KEY: &[u8] = b"stateKey:";

/// Durability policy for state writes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WriteMode {
    /// Durable before the call returns.
    #[default]
    Sync,
    /// Buffered by the storage primitive.
    Async,
}

/// Per-chain metadata that survives process restarts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistentState {
    /// Number of applied transactions.
    pub size: i64,
    /// Number of commits.
    pub height: i64,
    /// State root returned by the last commit.
    #[serde(with = "hex_bytes")]
    pub app_hash: Vec<u8>,
}

mod hex_bytes {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(deserializer)?;
        hex::decode(s).map_err(serde::de::Error::custom)
    }
}

/// Read the state record of the chain behind `db`.
///
/// An absent record yields the zero record.
///
/// # Errors
///
/// - [`AppError::Storage`] if the read fails
/// - [`AppError::CorruptState`] if the stored bytes are not a valid record
pub fn load_state(db: &ChainDb) -> Result<PersistentState, AppError> {
    let Some(bytes) = db.get(STATE_KEY)? else {
        tracing::debug!(chain_id = %db.chain_id(), "no stored state, starting from zero");
        return Ok(PersistentState::default());
    };

    let state: PersistentState =
        serde_json::from_slice(&bytes).map_err(|e| AppError::CorruptState {
            chain_id: db.chain_id().to_string(),
            message: e.to_string(),
        })?;

    tracing::info!(
        chain_id = %db.chain_id(),
        size = state.size,
        height = state.height,
        "loaded chain state"
    );
    Ok(state)
}

/// Write `state` back under [`STATE_KEY`].
pub fn save_state(db: &ChainDb, state: &PersistentState, mode: WriteMode) -> Result<(), AppError> {
    let bytes = serde_json::to_vec(state).map_err(|e| AppError::Serialization(e.to_string()))?;
    match mode {
        WriteMode::Sync => db.set_sync(STATE_KEY, &bytes)?,
        WriteMode::Async => db.set(STATE_KEY, &bytes)?,
    }
    Ok(())
}
