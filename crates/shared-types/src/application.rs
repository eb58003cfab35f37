//! # Application Ports
//!
//! ## Inbound (driving) port
//!
//! [`Application`] is the lifecycle surface a caller drives: one method per
//! lifecycle call, each request carrying a raw chain id. It is object safe
//! so a runtime can hold `Box<dyn Application>` over whichever variant is
//! active.
//!
//! ## Per-chain port
//!
//! [`ChainApplication`] is what a state machine variant implements. It never
//! sees a raw chain id: the dispatch façade resolves the id, looks up (or
//! lazily loads) the chain's state, and hands both to the variant.
//!
//! ```text
//! caller ──Request{chain_id}──→ [Application: dispatch façade]
//!                                      │ resolve ChainId
//!                                      │ registry[ChainId] (load_state on miss)
//!                                      ↓
//!                          [ChainApplication: variant]
//! ```

use crate::chain_id::ChainId;
use crate::errors::AppError;
use crate::types::*;

/// Lifecycle call surface, polymorphic over the active application.
///
/// Calls for one chain must be issued in delivery order.
pub trait Application: Send {
    fn echo(&mut self, req: RequestEcho) -> ResponseEcho {
        ResponseEcho {
            message: req.message,
        }
    }

    fn flush(&mut self) -> Result<(), AppError> {
        Ok(())
    }

    fn info(&mut self, req: RequestInfo) -> Result<ResponseInfo, AppError>;

    fn set_option(&mut self, req: RequestSetOption) -> Result<ResponseSetOption, AppError>;

    fn init_chain(&mut self, req: RequestInitChain) -> Result<ResponseInitChain, AppError>;

    fn check_tx(&mut self, req: RequestCheckTx) -> Result<ResponseCheckTx, AppError>;

    fn deliver_tx(&mut self, req: RequestDeliverTx) -> Result<ResponseDeliverTx, AppError>;

    fn commit(&mut self, req: RequestCommit) -> Result<ResponseCommit, AppError>;

    fn query(&mut self, req: RequestQuery) -> Result<ResponseQuery, AppError>;

    fn begin_block(&mut self, req: RequestBeginBlock) -> Result<ResponseBeginBlock, AppError>;

    fn end_block(&mut self, req: RequestEndBlock) -> Result<ResponseEndBlock, AppError>;
}

/// A deterministic state machine operating on the state of one chain.
///
/// Implementations hold only process-wide configuration; everything that
/// belongs to a chain lives in [`ChainApplication::State`].
pub trait ChainApplication: Send {
    /// Per-chain in-memory state owned by the dispatch façade.
    type State: Send;

    /// Build the state of a chain seen for the first time in this process.
    fn load_state(&self, chain_id: &ChainId) -> Result<Self::State, AppError>;

    fn info(
        &self,
        chain_id: &ChainId,
        state: &Self::State,
        req: &RequestInfo,
    ) -> Result<ResponseInfo, AppError>;

    /// Options are tolerated by default: unknown input yields an empty result.
    fn set_option(
        &self,
        _chain_id: &ChainId,
        _state: &mut Self::State,
        _req: &RequestSetOption,
    ) -> Result<ResponseSetOption, AppError> {
        Ok(ResponseSetOption::default())
    }

    fn init_chain(
        &self,
        _chain_id: &ChainId,
        _state: &mut Self::State,
        _req: &RequestInitChain,
    ) -> Result<ResponseInitChain, AppError> {
        Ok(ResponseInitChain::default())
    }

    /// Admission check. Must not mutate the chain state.
    fn check_tx(
        &self,
        chain_id: &ChainId,
        state: &Self::State,
        req: &RequestCheckTx,
    ) -> Result<ResponseCheckTx, AppError>;

    fn deliver_tx(
        &self,
        chain_id: &ChainId,
        state: &mut Self::State,
        req: &RequestDeliverTx,
    ) -> Result<ResponseDeliverTx, AppError>;

    fn commit(&self, chain_id: &ChainId, state: &mut Self::State)
        -> Result<ResponseCommit, AppError>;

    fn query(
        &self,
        chain_id: &ChainId,
        state: &Self::State,
        req: &RequestQuery,
    ) -> Result<ResponseQuery, AppError>;

    fn begin_block(
        &self,
        _chain_id: &ChainId,
        _state: &mut Self::State,
        _req: &RequestBeginBlock,
    ) -> Result<ResponseBeginBlock, AppError> {
        Ok(ResponseBeginBlock::default())
    }

    fn end_block(
        &self,
        _chain_id: &ChainId,
        _state: &mut Self::State,
        _req: &RequestEndBlock,
    ) -> Result<ResponseEndBlock, AppError> {
        Ok(ResponseEndBlock::default())
    }

    /// Flush buffered writes of the underlying store, if any.
    fn flush(&self) -> Result<(), AppError> {
        Ok(())
    }
}
