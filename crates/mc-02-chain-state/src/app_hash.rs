//! App hash derivation.
//!
//! The hash is the zig-zag signed varint of the chain size written into a
//! fixed 8-byte, zero-padded buffer.

use shared_types::AppError;

/// Width of the app hash in bytes.
pub const APP_HASH_LEN: usize = 8;

/// Encode `size` as the app hash of a commit.
///
/// # Errors
///
/// [`AppError::AppHashOverflow`] if the varint needs more than
/// [`APP_HASH_LEN`] bytes (|size| ≥ 2^55).
pub fn app_hash_for_size(size: i64) -> Result<Vec<u8>, AppError> {
    let mut hash = vec![0u8; APP_HASH_LEN];
    // Zig-zag: 0, -1, 1, -2, 2 ... → 0, 1, 2, 3, 4 ...
    let mut value = ((size << 1) ^ (size >> 63)) as u64;

    let mut i = 0;
    while value >= 0x80 {
        if i == APP_HASH_LEN - 1 {
            return Err(AppError::AppHashOverflow { size });
        }
        hash[i] = (value as u8) | 0x80;
        value >>= 7;
        i += 1;
    }
    hash[i] = value as u8;

    Ok(hash)
}
