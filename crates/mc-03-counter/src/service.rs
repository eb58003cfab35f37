//! # Counter Service
//!
//! [`ChainApplication`] implementation driving [`CounterState`].

use crate::domain::nonce::{expect_at_least, expect_exact};
use crate::domain::CounterState;
use shared_types::{
    AppError, ChainApplication, ChainId, RequestCheckTx, RequestDeliverTx, RequestInfo,
    RequestInitChain, RequestQuery, RequestSetOption, ResponseCheckTx, ResponseCode,
    ResponseCommit, ResponseDeliverTx, ResponseInfo, ResponseInitChain, ResponseQuery,
    ResponseSetOption,
};

/// Option key that turns serial mode on.
pub const SERIAL_OPTION: &str = "serial";

/// Serial-counter state machine.
///
/// Holds only the process-wide default for `serial`; per-chain counters live
/// in [`CounterState`].
#[derive(Debug, Clone, Default)]
pub struct CounterApplication {
    default_serial: bool,
}

impl CounterApplication {
    pub fn new(default_serial: bool) -> Self {
        Self { default_serial }
    }

    pub fn default_serial(&self) -> bool {
        self.default_serial
    }
}

impl ChainApplication for CounterApplication {
    type State = CounterState;

    fn load_state(&self, chain_id: &ChainId) -> Result<CounterState, AppError> {
        tracing::debug!(chain_id = %chain_id, serial = self.default_serial, "new counter chain");
        Ok(CounterState::new(self.default_serial))
    }

    fn info(
        &self,
        _chain_id: &ChainId,
        state: &CounterState,
        _req: &RequestInfo,
    ) -> Result<ResponseInfo, AppError> {
        Ok(ResponseInfo {
            data: state.info_json(),
            ..Default::default()
        })
    }

    fn set_option(
        &self,
        chain_id: &ChainId,
        state: &mut CounterState,
        req: &RequestSetOption,
    ) -> Result<ResponseSetOption, AppError> {
        if req.key == SERIAL_OPTION && req.value == "on" {
            state.serial = true;
            tracing::info!(chain_id = %chain_id, "serial mode enabled");
        } else {
            tracing::warn!(
                chain_id = %chain_id,
                key = %req.key,
                value = %req.value,
                "ignoring unknown option"
            );
        }
        Ok(ResponseSetOption::default())
    }

    fn init_chain(
        &self,
        _chain_id: &ChainId,
        state: &mut CounterState,
        _req: &RequestInitChain,
    ) -> Result<ResponseInitChain, AppError> {
        state.serial = self.default_serial;
        Ok(ResponseInitChain::default())
    }

    fn check_tx(
        &self,
        chain_id: &ChainId,
        state: &CounterState,
        req: &RequestCheckTx,
    ) -> Result<ResponseCheckTx, AppError> {
        if state.serial {
            if let Err(err) = expect_at_least(&req.tx, state.tx_count) {
                tracing::debug!(chain_id = %chain_id, reason = %err.log(), "check_tx rejected");
                return Ok(ResponseCheckTx::reject(err.code(), err.log()));
            }
        }
        Ok(ResponseCheckTx::default())
    }

    fn deliver_tx(
        &self,
        chain_id: &ChainId,
        state: &mut CounterState,
        req: &RequestDeliverTx,
    ) -> Result<ResponseDeliverTx, AppError> {
        if state.serial {
            if let Err(err) = expect_exact(&req.tx, state.tx_count) {
                tracing::debug!(chain_id = %chain_id, reason = %err.log(), "deliver_tx rejected");
                return Ok(ResponseDeliverTx::reject(err.code(), err.log()));
            }
        }
        state.record_tx();
        Ok(ResponseDeliverTx {
            code: ResponseCode::Ok.as_u32(),
            ..Default::default()
        })
    }

    fn commit(
        &self,
        chain_id: &ChainId,
        state: &mut CounterState,
    ) -> Result<ResponseCommit, AppError> {
        let data = state.record_commit();
        tracing::info!(
            chain_id = %chain_id,
            hashes = state.hash_count,
            txs = state.tx_count,
            "committed"
        );
        Ok(ResponseCommit { data })
    }

    fn query(
        &self,
        chain_id: &ChainId,
        state: &CounterState,
        req: &RequestQuery,
    ) -> Result<ResponseQuery, AppError> {
        let response = match req.path.as_str() {
            "hash" => ResponseQuery {
                value: state.hash_count.to_string().into_bytes(),
                ..Default::default()
            },
            "tx" => ResponseQuery {
                value: state.tx_count.to_string().into_bytes(),
                ..Default::default()
            },
            other => {
                tracing::warn!(chain_id = %chain_id, path = %other, "invalid query path");
                ResponseQuery {
                    log: format!("Invalid query path. Expected hash or tx, got {}", other),
                    ..Default::default()
                }
            }
        };
        Ok(response)
    }
}
