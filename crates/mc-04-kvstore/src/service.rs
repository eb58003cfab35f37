//! # Key-Value Service
//!
//! [`ChainApplication`] implementation over a shared [`KeyValueStore`].

use crate::domain::{entry_key, parse_tx, KvChainState};
use mc_01_chain_store::{ChainDb, KeyValueStore};
use mc_02_chain_state::{app_hash_for_size, load_state, save_state, WriteMode};
use shared_types::{
    AppError, ChainApplication, ChainId, Event, EventAttribute, RequestCheckTx,
    RequestDeliverTx, RequestInfo, RequestQuery, ResponseCheckTx, ResponseCode, ResponseCommit,
    ResponseDeliverTx, ResponseInfo, ResponseQuery, ABCI_VERSION, PROTOCOL_VERSION,
};
use std::fmt;
use std::sync::Arc;

/// Event type emitted by `DeliverTx`.
pub const EVENT_TYPE: &str = "app";

/// Value of the `creator` event attribute.
pub const EVENT_CREATOR: &str = "Cosmoshi Netowoko";

/// Key-value state machine over one shared store.
#[derive(Clone)]
pub struct KVStoreApplication {
    db: Arc<dyn KeyValueStore>,
    write_mode: WriteMode,
}

impl fmt::Debug for KVStoreApplication {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KVStoreApplication")
            .field("write_mode", &self.write_mode)
            .finish_non_exhaustive()
    }
}

impl KVStoreApplication {
    /// Build over `db`, persisting state records with `write_mode`.
    pub fn new(db: Arc<dyn KeyValueStore>, write_mode: WriteMode) -> Self {
        Self { db, write_mode }
    }

    pub fn write_mode(&self) -> WriteMode {
        self.write_mode
    }
}

impl ChainApplication for KVStoreApplication {
    type State = KvChainState;

    fn load_state(&self, chain_id: &ChainId) -> Result<KvChainState, AppError> {
        let db = ChainDb::new(chain_id.clone(), Arc::clone(&self.db));
        let record = load_state(&db)?;
        Ok(KvChainState::new(db, record))
    }

    fn info(
        &self,
        _chain_id: &ChainId,
        state: &KvChainState,
        _req: &RequestInfo,
    ) -> Result<ResponseInfo, AppError> {
        Ok(ResponseInfo {
            data: state.info_json(),
            version: ABCI_VERSION.to_string(),
            app_version: PROTOCOL_VERSION,
            last_block_height: state.record.height,
            last_block_app_hash: state.record.app_hash.clone(),
        })
    }

    fn check_tx(
        &self,
        _chain_id: &ChainId,
        _state: &KvChainState,
        _req: &RequestCheckTx,
    ) -> Result<ResponseCheckTx, AppError> {
        Ok(ResponseCheckTx {
            code: ResponseCode::Ok.as_u32(),
            gas_wanted: 1,
            ..Default::default()
        })
    }

    fn deliver_tx(
        &self,
        chain_id: &ChainId,
        state: &mut KvChainState,
        req: &RequestDeliverTx,
    ) -> Result<ResponseDeliverTx, AppError> {
        let (key, value) = parse_tx(&req.tx);

        state.db.set(&entry_key(key), value)?;
        state.record.size += 1;
        tracing::debug!(
            chain_id = %chain_id,
            key = %String::from_utf8_lossy(key),
            size = state.record.size,
            "delivered tx"
        );

        let event = Event::new(
            EVENT_TYPE,
            vec![
                EventAttribute::new(b"creator".to_vec(), EVENT_CREATOR.as_bytes().to_vec()),
                EventAttribute::new(b"key".to_vec(), key.to_vec()),
            ],
        );

        Ok(ResponseDeliverTx {
            code: ResponseCode::Ok.as_u32(),
            events: vec![event],
            ..Default::default()
        })
    }

    fn commit(
        &self,
        chain_id: &ChainId,
        state: &mut KvChainState,
    ) -> Result<ResponseCommit, AppError> {
        let app_hash = app_hash_for_size(state.record.size)?;

        // The in-memory record only advances once the write succeeded.
        let mut next = state.record.clone();
        next.app_hash = app_hash.clone();
        next.height += 1;
        save_state(&state.db, &next, self.write_mode)?;
        state.record = next;

        tracing::info!(
            chain_id = %chain_id,
            height = state.record.height,
            app_hash = %hex::encode(&app_hash),
            "committed"
        );
        Ok(ResponseCommit { data: app_hash })
    }

    fn query(
        &self,
        _chain_id: &ChainId,
        state: &KvChainState,
        req: &RequestQuery,
    ) -> Result<ResponseQuery, AppError> {
        let value = state.db.get(&entry_key(&req.data))?;
        let log = if value.is_some() { "exists" } else { "does not exist" };

        Ok(ResponseQuery {
            code: ResponseCode::Ok.as_u32(),
            log: log.to_string(),
            // Proofs are not built; -1 marks the placeholder index.
            index: if req.prove { -1 } else { 0 },
            key: req.data.clone(),
            value: value.unwrap_or_default(),
            height: state.record.height,
        })
    }
}
