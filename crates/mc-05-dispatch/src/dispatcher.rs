use shared_types::{
    AppError, Application, ChainApplication, ChainId, ChainRequest, RequestBeginBlock,
    RequestCheckTx, RequestCommit, RequestDeliverTx, RequestEndBlock, RequestInfo,
    RequestInitChain, RequestQuery, RequestSetOption, ResponseBeginBlock, ResponseCheckTx,
    ResponseCommit, ResponseDeliverTx, ResponseEndBlock, ResponseInfo, ResponseInitChain,
    ResponseQuery, ResponseSetOption,
};
use std::collections::hash_map::Entry;
use std::collections::HashMap;

/// Multi-chain façade over one [`ChainApplication`].
///
/// Per-chain state is created on first access and kept for the lifetime of
/// the dispatcher. The dispatcher never changes business state itself.
pub struct ChainDispatcher<A: ChainApplication> {
    app: A,
    default_chain_id: Option<ChainId>,
    registry: HashMap<ChainId, A::State>,
}

impl<A: ChainApplication> ChainDispatcher<A> {
    pub fn new(app: A, default_chain_id: Option<ChainId>) -> Self {
        Self {
            app,
            default_chain_id,
            registry: HashMap::new(),
        }
    }

    pub fn app(&self) -> &A {
        &self.app
    }

    pub fn default_chain_id(&self) -> Option<&ChainId> {
        self.default_chain_id.as_ref()
    }

    /// Chains with state in memory, sorted.
    pub fn loaded_chains(&self) -> Vec<&ChainId> {
        let mut chains: Vec<_> = self.registry.keys().collect();
        chains.sort();
        chains
    }

    /// State of `chain_id`, if it has been loaded.
    pub fn state(&self, chain_id: &ChainId) -> Option<&A::State> {
        self.registry.get(chain_id)
    }

    /// Resolve the chain of a request and fetch (or load) its state.
    fn route<R: ChainRequest>(
        &mut self,
        req: &R,
    ) -> Result<(&A, ChainId, &mut A::State), AppError> {
        let requested = req.chain_id();
        let chain_id =
            ChainId::resolve(requested, self.default_chain_id.as_ref()).inspect_err(|err| {
                tracing::warn!(requested = ?requested, error = %err, "rejected chain id")
            })?;

        let state = match self.registry.entry(chain_id.clone()) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                let state = self.app.load_state(&chain_id)?;
                tracing::debug!(chain_id = %chain_id, "registered chain");
                entry.insert(state)
            }
        };
        Ok((&self.app, chain_id, state))
    }
}

impl<A: ChainApplication> Application for ChainDispatcher<A> {
    fn flush(&mut self) -> Result<(), AppError> {
        self.app.flush()
    }

    fn info(&mut self, req: RequestInfo) -> Result<ResponseInfo, AppError> {
        let (app, chain_id, state) = self.route(&req)?;
        app.info(&chain_id, state, &req)
    }

    fn set_option(&mut self, req: RequestSetOption) -> Result<ResponseSetOption, AppError> {
        let (app, chain_id, state) = self.route(&req)?;
        app.set_option(&chain_id, state, &req)
    }

    fn init_chain(&mut self, req: RequestInitChain) -> Result<ResponseInitChain, AppError> {
        let (app, chain_id, state) = self.route(&req)?;
        app.init_chain(&chain_id, state, &req)
    }

    fn check_tx(&mut self, req: RequestCheckTx) -> Result<ResponseCheckTx, AppError> {
        let (app, chain_id, state) = self.route(&req)?;
        app.check_tx(&chain_id, state, &req)
    }

    fn deliver_tx(&mut self, req: RequestDeliverTx) -> Result<ResponseDeliverTx, AppError> {
        let (app, chain_id, state) = self.route(&req)?;
        app.deliver_tx(&chain_id, state, &req)
    }

    fn commit(&mut self, req: RequestCommit) -> Result<ResponseCommit, AppError> {
        let (app, chain_id, state) = self.route(&req)?;
        app.commit(&chain_id, state)
    }

    fn query(&mut self, req: RequestQuery) -> Result<ResponseQuery, AppError> {
        let (app, chain_id, state) = self.route(&req)?;
        app.query(&chain_id, state, &req)
    }

    fn begin_block(&mut self, req: RequestBeginBlock) -> Result<ResponseBeginBlock, AppError> {
        let (app, chain_id, state) = self.route(&req)?;
        app.begin_block(&chain_id, state, &req)
    }

    fn end_block(&mut self, req: RequestEndBlock) -> Result<ResponseEndBlock, AppError> {
        let (app, chain_id, state) = self.route(&req)?;
        app.end_block(&chain_id, state, &req)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mc_03_counter::CounterApplication;
    use shared_types::{RequestEcho, ResponseCode};

    fn counter(default: Option<&str>) -> ChainDispatcher<CounterApplication> {
        let default = default.map(|id| ChainId::new(id).unwrap());
        ChainDispatcher::new(CounterApplication::new(true), default)
    }

    fn deliver(chain_id: &str, tx: &[u8]) -> RequestDeliverTx {
        RequestDeliverTx {
            chain_id: chain_id.to_string(),
            tx: tx.to_vec(),
        }
    }

    #[test]
    fn test_empty_chain_id_without_default_is_fault() {
        let mut app = counter(None);

        let err = app.deliver_tx(deliver("", &[0])).unwrap_err();
        assert_eq!(err, AppError::EmptyChainId);
        assert!(app.loaded_chains().is_empty());
    }

    #[test]
    fn test_sentinel_chain_id_is_fault() {
        let mut app = counter(None);

        let err = app
            .commit(RequestCommit {
                chain_id: "a\0b".to_string(),
            })
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidChainId { .. }));
    }

    #[test]
    fn test_default_chain_id_is_injected() {
        let mut app = counter(Some("default-chain"));

        assert!(app.deliver_tx(deliver("", &[0])).unwrap().is_ok());
        // Same chain when named explicitly.
        let res = app.deliver_tx(deliver("default-chain", &[0])).unwrap();
        assert_eq!(res.code, ResponseCode::BadNonce.as_u32());

        let chains = app.loaded_chains();
        assert_eq!(chains.len(), 1);
        assert_eq!(chains[0].as_str(), "default-chain");
    }

    #[test]
    fn test_every_request_kind_routes_by_its_chain_id() {
        let mut app = counter(None);

        app.info(RequestInfo {
            chain_id: "info".to_string(),
            ..Default::default()
        })
        .unwrap();
        app.set_option(RequestSetOption {
            chain_id: "set-option".to_string(),
            ..Default::default()
        })
        .unwrap();
        app.init_chain(RequestInitChain {
            chain_id: "init-chain".to_string(),
            ..Default::default()
        })
        .unwrap();
        app.check_tx(RequestCheckTx {
            chain_id: "check-tx".to_string(),
            ..Default::default()
        })
        .unwrap();
        app.deliver_tx(deliver("deliver-tx", &[0])).unwrap();
        app.commit(RequestCommit {
            chain_id: "commit".to_string(),
        })
        .unwrap();
        app.query(RequestQuery {
            chain_id: "query".to_string(),
            ..Default::default()
        })
        .unwrap();
        app.begin_block(RequestBeginBlock {
            chain_id: "begin-block".to_string(),
            ..Default::default()
        })
        .unwrap();
        app.end_block(RequestEndBlock {
            chain_id: "end-block".to_string(),
            ..Default::default()
        })
        .unwrap();

        let chains: Vec<&str> = app.loaded_chains().into_iter().map(ChainId::as_str).collect();
        assert_eq!(
            chains,
            vec![
                "begin-block",
                "check-tx",
                "commit",
                "deliver-tx",
                "end-block",
                "info",
                "init-chain",
                "query",
                "set-option",
            ]
        );
    }

    #[test]
    fn test_chains_are_independent() {
        let mut app = counter(None);

        assert!(app.deliver_tx(deliver("a", &[0])).unwrap().is_ok());
        assert!(app.deliver_tx(deliver("b", &[0])).unwrap().is_ok());
        assert!(app.deliver_tx(deliver("a", &[1])).unwrap().is_ok());

        let a = ChainId::new("a").unwrap();
        let b = ChainId::new("b").unwrap();
        assert_eq!(app.state(&a).unwrap().tx_count, 2);
        assert_eq!(app.state(&b).unwrap().tx_count, 1);
        assert_eq!(app.loaded_chains(), vec![&a, &b]);
    }

    #[test]
    fn test_echo_and_flush_defaults() {
        let mut app = counter(None);

        let echo = app.echo(RequestEcho {
            message: "hello".to_string(),
        });
        assert_eq!(echo.message, "hello");
        assert!(app.flush().is_ok());
    }
}
