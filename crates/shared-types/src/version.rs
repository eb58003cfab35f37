//! Version constants reported by `Info`.

/// ABCI protocol version implemented by the applications.
pub const ABCI_VERSION: &str = "0.16.1";

/// Application protocol version reported as `app_version`.
pub const PROTOCOL_VERSION: u64 = 0x1;
