//! # Physical Key Construction
//!
//! The only place physical keys are formatted. Nothing outside this crate
//! builds or parses them.

use shared_types::{ChainId, NAMESPACE_SENTINEL};

/// Prefix shared by every physical key of `chain_id`:
/// `0x00 ‖ chain-id ‖ 0x00`.
pub fn chain_prefix(chain_id: &ChainId) -> Vec<u8> {
    chain_prefix_key(chain_id, &[])
}

/// Physical key of `key` in the namespace of `chain_id`.
pub fn chain_prefix_key(chain_id: &ChainId, key: &[u8]) -> Vec<u8> {
    let id = chain_id.as_bytes();
    let mut out = Vec::with_capacity(2 + id.len() + key.len());
    out.push(NAMESPACE_SENTINEL);
    out.extend_from_slice(id);
    out.push(NAMESPACE_SENTINEL);
    out.extend_from_slice(key);
    out
}

/// Smallest key strictly greater than every key starting with `prefix`.
///
/// Returns a fresh buffer; `prefix` is left untouched. Trailing `0xff` bytes
/// cannot be incremented and are dropped first. `None` means the range is
/// unbounded above (the prefix is empty or all `0xff`).
pub fn prefix_end_bound(prefix: &[u8]) -> Option<Vec<u8>> {
    let mut end = prefix.to_vec();
    while let Some(last) = end.last_mut() {
        if *last < u8::MAX {
            *last += 1;
            return Some(end);
        }
        end.pop();
    }
    None
}
