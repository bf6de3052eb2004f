//! Positional hash from strings onto ring slots.

use sha2::{Digest, Sha256};
use slotring_types::Slot;

/// Slot count used when no range is configured.
pub const DEFAULT_TOTAL_RANGE: u32 = 50;

/// Map `key` to a slot in `[0, total_range)`.
///
/// The SHA-256 digest is read as a big-endian integer truncated to its low
/// 32 bits as a signed value, reduced with a truncating remainder, then made
/// non-negative. This reproduces the slot numbering of deployed rings, so
/// `total_range` must be within `1..=i32::MAX`.
pub fn slot_for(key: &str, total_range: u32) -> Slot {
    debug_assert!(
        (1..=i32::MAX as u32).contains(&total_range),
        "total_range out of bounds: {total_range}"
    );
    let digest = Sha256::digest(key.as_bytes());
    let mut low = [0u8; 4];
    low.copy_from_slice(&digest[digest.len() - 4..]);
    let value = i64::from(i32::from_be_bytes(low));
    // |value % range| < range <= i32::MAX, so the narrowing is lossless.
    Slot::new((value % i64::from(total_range)).unsigned_abs() as u32)
}
