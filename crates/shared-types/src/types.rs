//! # Lifecycle Requests and Responses
//!
//! Semantic request/response shapes of the lifecycle calls. Every request
//! carries a raw `chain_id`; an empty value means "use the configured
//! default" and is resolved by the dispatch façade. Wire encoding is the
//! transport's concern.

use crate::codes::ResponseCode;
use serde::{Deserialize, Serialize};

// =============================================================================
// EVENTS
// =============================================================================

/// A key/value attribute attached to an [`Event`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventAttribute {
    pub key: Vec<u8>,
    pub value: Vec<u8>,
}

impl EventAttribute {
    pub fn new(key: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Structured event emitted by `DeliverTx`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    #[serde(rename = "type")]
    pub kind: String,
    pub attributes: Vec<EventAttribute>,
}

impl Event {
    pub fn new(kind: impl Into<String>, attributes: Vec<EventAttribute>) -> Self {
        Self {
            kind: kind.into(),
            attributes,
        }
    }

    /// Value of the first attribute named `key`.
    pub fn attribute(&self, key: &[u8]) -> Option<&[u8]> {
        self.attributes
            .iter()
            .find(|attr| attr.key == key)
            .map(|attr| attr.value.as_slice())
    }
}

// =============================================================================
// REQUESTS
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestEcho {
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestInfo {
    pub chain_id: String,
    pub version: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestSetOption {
    pub chain_id: String,
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestInitChain {
    pub chain_id: String,
    /// Opaque genesis application state.
    pub app_state_bytes: Vec<u8>,
}

/// Whether a `CheckTx` is a first admission or a re-check after a commit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CheckTxType {
    #[default]
    New,
    Recheck,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestCheckTx {
    pub chain_id: String,
    pub tx: Vec<u8>,
    pub kind: CheckTxType,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestDeliverTx {
    pub chain_id: String,
    pub tx: Vec<u8>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestCommit {
    pub chain_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestQuery {
    pub chain_id: String,
    pub data: Vec<u8>,
    pub path: String,
    pub height: i64,
    pub prove: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestBeginBlock {
    pub chain_id: String,
    pub height: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestEndBlock {
    pub chain_id: String,
    pub height: i64,
}

/// Implemented by every request that is routed to a chain.
pub trait ChainRequest {
    fn chain_id(&self) -> &str;
}

macro_rules! impl_chain_request {
    ($($ty:ty),* $(,)?) => {
        $(
            impl ChainRequest for $ty {
                fn chain_id(&self) -> &str {
                    &self.chain_id
                }
            }
        )*
    };
}

impl_chain_request!(
    RequestInfo,
    RequestSetOption,
    RequestInitChain,
    RequestCheckTx,
    RequestDeliverTx,
    RequestCommit,
    RequestQuery,
    RequestBeginBlock,
    RequestEndBlock,
);

// =============================================================================
// RESPONSES
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseEcho {
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseInfo {
    /// Application-defined JSON summary, e.g. `{"size":3}`.
    pub data: String,
    pub version: String,
    pub app_version: u64,
    pub last_block_height: i64,
    pub last_block_app_hash: Vec<u8>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseSetOption {
    pub code: u32,
    pub log: String,
    pub info: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseInitChain {}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseCheckTx {
    pub code: u32,
    pub data: Vec<u8>,
    pub log: String,
    pub gas_wanted: i64,
    pub gas_used: i64,
    pub events: Vec<Event>,
}

impl ResponseCheckTx {
    /// A rejection with `code` and a human-readable `log`.
    pub fn reject(code: ResponseCode, log: impl Into<String>) -> Self {
        Self {
            code: code.as_u32(),
            log: log.into(),
            ..Default::default()
        }
    }

    pub fn is_ok(&self) -> bool {
        self.code == ResponseCode::Ok.as_u32()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseDeliverTx {
    pub code: u32,
    pub data: Vec<u8>,
    pub log: String,
    pub events: Vec<Event>,
}

impl ResponseDeliverTx {
    /// A rejection with `code` and a human-readable `log`.
    pub fn reject(code: ResponseCode, log: impl Into<String>) -> Self {
        Self {
            code: code.as_u32(),
            log: log.into(),
            ..Default::default()
        }
    }

    pub fn is_ok(&self) -> bool {
        self.code == ResponseCode::Ok.as_u32()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseCommit {
    /// The new state root (app hash). Empty when nothing was committed.
    pub data: Vec<u8>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseQuery {
    pub code: u32,
    pub log: String,
    /// Proof index placeholder; `-1` when a proof was requested.
    pub index: i64,
    pub key: Vec<u8>,
    pub value: Vec<u8>,
    pub height: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseBeginBlock {
    pub events: Vec<Event>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseEndBlock {
    pub events: Vec<Event>,
}
