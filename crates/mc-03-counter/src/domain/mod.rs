//! Domain layer: counter state and nonce decoding.

pub mod nonce;
pub mod state;

pub use nonce::{decode_nonce, NonceError, MAX_TX_BYTES};
pub use state::CounterState;
