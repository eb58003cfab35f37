//! # Serial Counter Application (mc-03)
//!
//! A minimal state machine that counts delivered transactions and commits.
//! With `serial` on, every transaction must carry the next nonce as a
//! big-endian integer of at most 8 bytes.
//!
//! ## Domain Invariants
//!
//! | ID | Invariant | Enforcement Location |
//! |----|-----------|---------------------|
//! | 1 | Rejections never mutate state | `service.rs` - early return before increment |
//! | 2 | `tx_count` grows only on accepted `DeliverTx` | `domain/state.rs` - `record_tx()` |
//! | 3 | `hash_count` grows on every `Commit` | `domain/state.rs` - `record_commit()` |
//!
//! ## Nonce Rules
//!
//! | Call | Accepted when |
//! |------|---------------|
//! | `CheckTx` | `nonce >= tx_count` |
//! | `DeliverTx` | `nonce == tx_count` |
//!
//! `CheckTx` admits future nonces so a mempool can queue them; `DeliverTx`
//! only applies the next one.
//!
//! Counter state is in-memory only. A restarted process starts every chain
//! from zero.

pub mod domain;
pub mod service;

pub use domain::{decode_nonce, CounterState, NonceError, MAX_TX_BYTES};
pub use service::CounterApplication;
