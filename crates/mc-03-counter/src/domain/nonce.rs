//! Nonce decoding and validation.

use shared_types::ResponseCode;

/// Largest accepted transaction payload in serial mode.
pub const MAX_TX_BYTES: usize = 8;

/// Why a transaction was refused in serial mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NonceError {
    TooLarge { len: usize },
    Mismatch { expected: u64, got: u64 },
    TooLow { expected_min: u64, got: u64 },
}

impl NonceError {
    pub fn code(&self) -> ResponseCode {
        match self {
            NonceError::TooLarge { .. } => ResponseCode::EncodingError,
            NonceError::Mismatch { .. } | NonceError::TooLow { .. } => ResponseCode::BadNonce,
        }
    }

    /// Log line returned to the caller.
    pub fn log(&self) -> String {
        match self {
            NonceError::TooLarge { len } => {
                format!("Max tx size is {} bytes, got {}", MAX_TX_BYTES, len)
            }
            NonceError::Mismatch { expected, got } => {
                format!("Invalid nonce. Expected {}, got {}", expected, got)
            }
            NonceError::TooLow { expected_min, got } => {
                format!("Invalid nonce. Expected >= {}, got {}", expected_min, got)
            }
        }
    }
}

/// Decode `tx` as a big-endian unsigned integer, left-padded to 8 bytes.
pub fn decode_nonce(tx: &[u8]) -> Result<u64, NonceError> {
    if tx.len() > MAX_TX_BYTES {
        return Err(NonceError::TooLarge { len: tx.len() });
    }
    let mut buf = [0u8; MAX_TX_BYTES];
    buf[MAX_TX_BYTES - tx.len()..].copy_from_slice(tx);
    Ok(u64::from_be_bytes(buf))
}

/// `DeliverTx` rule: the nonce must be exactly the next one.
pub fn expect_exact(tx: &[u8], tx_count: u64) -> Result<u64, NonceError> {
    let nonce = decode_nonce(tx)?;
    if nonce != tx_count {
        return Err(NonceError::Mismatch {
            expected: tx_count,
            got: nonce,
        });
    }
    Ok(nonce)
}

/// `CheckTx` rule: the nonce must not be in the past.
pub fn expect_at_least(tx: &[u8], tx_count: u64) -> Result<u64, NonceError> {
    let nonce = decode_nonce(tx)?;
    if nonce < tx_count {
        return Err(NonceError::TooLow {
            expected_min: tx_count,
            got: nonce,
        });
    }
    Ok(nonce)
}
