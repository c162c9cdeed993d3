//! Hashing helpers
//!
//! keccak256 is used for three things:
//! - deriving the fixed storage keys of the core's singletons from
//!   human-readable tags (see [`crate::state`])
//! - namespacing replay bitmaps per source channel
//! - digesting non-finalized messages for single-use tracking

use tiny_keccak::{Hasher, Keccak};

/// Compute keccak256 hash of arbitrary data
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak::v256();
    hasher.update(data);
    let mut output = [0u8; 32];
    hasher.finalize(&mut output);
    output
}
