//! # Error Types
//!
//! Faults shared across the workspace. Validation rejections (bad nonce,
//! oversized payload) are NOT errors: they travel inside responses as a
//! [`ResponseCode`](crate::ResponseCode) plus log message.

use thiserror::Error;

/// Errors raised by an ordered key-value primitive.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KVStoreError {
    /// I/O error during read/write.
    #[error("KV store I/O error: {message}")]
    IOError { message: String },

    /// Data corruption in the store.
    #[error("KV store corruption: {message}")]
    CorruptionError { message: String },

    /// The store has been closed.
    #[error("KV store is closed")]
    Closed,
}

/// Faults returned by the lifecycle calls.
///
/// Every variant is fatal for the call that produced it; the caller decides
/// whether to reject the single request or stop processing the chain.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AppError {
    /// The request carried no chain id and no default was configured.
    #[error("chain id is empty")]
    EmptyChainId,

    /// The chain id contains the namespace sentinel byte.
    #[error("chain id {chain_id:?} contains the namespace sentinel byte")]
    InvalidChainId { chain_id: String },

    /// The storage primitive failed.
    #[error("storage error: {0}")]
    Storage(#[from] KVStoreError),

    /// The persisted state record of a chain cannot be decoded.
    #[error("corrupt state for chain {chain_id}: {message}")]
    CorruptState { chain_id: String, message: String },

    /// The state record could not be encoded.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// The chain size no longer fits the fixed-width app hash.
    #[error("app hash overflow: size {size} does not fit in 8 varint bytes")]
    AppHashOverflow { size: i64 },
}

impl AppError {
    /// Whether the fault is a caller-side precondition violation.
    pub fn is_precondition(&self) -> bool {
        matches!(self, AppError::EmptyChainId | AppError::InvalidChainId { .. })
    }
}
