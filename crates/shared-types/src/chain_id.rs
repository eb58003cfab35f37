//! # Chain Identifier
//!
//! A validated tenant identifier. Constructing a [`ChainId`] is the only
//! place where the "non-empty, sentinel-free" precondition is checked.

use crate::errors::AppError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Byte that separates the namespace components of a physical key.
///
/// Chain ids may not contain it, otherwise `"a\0b" + "x"` and `"a" + "b\0x"`
/// would map to the same physical key.
pub const NAMESPACE_SENTINEL: u8 = 0x00;

/// Non-empty chain identifier that never contains [`NAMESPACE_SENTINEL`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ChainId(String);

impl ChainId {
    /// Validate a raw chain id.
    ///
    /// # Errors
    ///
    /// - [`AppError::EmptyChainId`] if `raw` is empty
    /// - [`AppError::InvalidChainId`] if `raw` contains the sentinel byte
    pub fn new(raw: impl Into<String>) -> Result<Self, AppError> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(AppError::EmptyChainId);
        }
        if raw.as_bytes().contains(&NAMESPACE_SENTINEL) {
            return Err(AppError::InvalidChainId { chain_id: raw });
        }
        Ok(Self(raw))
    }

    /// Resolve the chain id of a request, falling back to `default` when the
    /// request left it empty.
    pub fn resolve(requested: &str, default: Option<&ChainId>) -> Result<Self, AppError> {
        match (requested.is_empty(), default) {
            (true, Some(default)) => Ok(default.clone()),
            _ => Self::new(requested),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ChainId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ChainId {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for ChainId {
    type Error = AppError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ChainId> for String {
    fn from(id: ChainId) -> Self {
        id.0
    }
}
