//! Transaction format.
//!
//! A transaction is either `key=value` (exactly one `=`) or arbitrary bytes,
//! which are then used as both key and value.

/// Logical sub-namespace of application entries.
pub const KV_PAIR_PREFIX: &[u8] = b"kvPairKey:";

const SEPARATOR: u8 = b'=';

/// Split a transaction into `(key, value)`.
pub fn parse_tx(tx: &[u8]) -> (&[u8], &[u8]) {
    let mut parts = tx.split(|b| *b == SEPARATOR);
    match (parts.next(), parts.next(), parts.next()) {
        (Some(key), Some(value), None) => (key, value),
        _ => (tx, tx),
    }
}

/// Logical key of the entry stored for `key`.
pub fn entry_key(key: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(KV_PAIR_PREFIX.len() + key.len());
    out.extend_from_slice(KV_PAIR_PREFIX);
    out.extend_from_slice(key);
    out
}
