//! # Application Dispatch (mc-05)
//!
//! The single entry point of the lifecycle calls. Resolves each request's
//! chain id, owns the registry of per-chain state and forwards to the active
//! state machine.
//!
//! ```text
//! Request{chain_id: ""}   ──→ default chain id ──┐
//! Request{chain_id: "a"}  ───────────────────────┤
//!                                                ↓ ChainId::new (validate)
//!                                     registry: HashMap<ChainId, State>
//!                                                │ miss → load_state
//!                                                ↓
//!                                    ChainApplication::<call>(id, state, req)
//! ```

pub mod dispatcher;
pub mod factory;

pub use dispatcher::ChainDispatcher;
pub use factory::{build_application, AppKind, DispatchConfig, UnknownAppKind};
