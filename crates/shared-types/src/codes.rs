//! Application response codes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Domain-specific result codes carried in `CheckTx`/`DeliverTx` responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u32)]
pub enum ResponseCode {
    Ok = 0,
    /// Payload too large for a fixed-width nonce.
    EncodingError = 1,
    /// Nonce does not match the expected sequence.
    BadNonce = 2,
}

impl ResponseCode {
    pub const fn as_u32(self) -> u32 {
        self as u32
    }

    /// Map a raw wire code back to a known code.
    pub fn from_u32(code: u32) -> Option<Self> {
        match code {
            0 => Some(ResponseCode::Ok),
            1 => Some(ResponseCode::EncodingError),
            2 => Some(ResponseCode::BadNonce),
            _ => None,
        }
    }
}

impl From<ResponseCode> for u32 {
    fn from(code: ResponseCode) -> Self {
        code.as_u32()
    }
}

impl fmt::Display for ResponseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResponseCode::Ok => "OK",
            ResponseCode::EncodingError => "EncodingError",
            ResponseCode::BadNonce => "BadNonce",
        };
        f.write_str(name)
    }
}
