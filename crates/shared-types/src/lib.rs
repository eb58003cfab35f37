//! # Shared Types Crate
//!
//! Types shared by every crate of the multi-chain ABCI workspace.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: requests, responses, codes and errors are
//!   defined once here.
//! - **Validated Identity**: downstream crates only ever see a [`ChainId`],
//!   never a raw (possibly empty) chain id string.
//! - **Two Ports**: [`Application`] is the object-safe lifecycle surface the
//!   caller talks to; [`ChainApplication`] is the per-chain contract each
//!   state machine variant implements behind the dispatch façade.

pub mod application;
pub mod chain_id;
pub mod codes;
pub mod errors;
pub mod types;
pub mod version;

pub use application::{Application, ChainApplication};
pub use chain_id::{ChainId, NAMESPACE_SENTINEL};
pub use codes::ResponseCode;
pub use errors::{AppError, KVStoreError};
pub use types::*;
pub use version::{ABCI_VERSION, PROTOCOL_VERSION};
