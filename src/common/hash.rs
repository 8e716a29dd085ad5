//! Hash adapter for the sketch
//!
//! The sketch treats its hash function as a black box: any deterministic,
//! well-distributed 64-bit hash over byte strings satisfies the contract.
//! The default is xxHash64 (Yann Collet), an extremely fast
//! non-cryptographic hash with strong avalanche behavior.

use std::hash::Hasher;
use twox_hash::XxHash64;

/// XXHash 64-bit implementation
///
/// # Arguments
/// * `data` - The data to hash
/// * `seed` - The hash seed for independent hash functions
///
/// # Returns
/// A 64-bit hash value
///
/// # Examples
/// ```
/// use hyperminhash::hash::xxhash;
///
/// let hash = xxhash(b"hello world", 0);
/// assert_eq!(hash, xxhash(b"hello world", 0));
/// ```
pub fn xxhash(data: &[u8], seed: u64) -> u64 {
    let mut hasher = XxHash64::with_seed(seed);
    hasher.write(data);
    hasher.finish()
}

/// Generic 64-bit hash function
///
/// Convenience alias for the default hash backend.
pub fn hash_64(data: &[u8], seed: u64) -> u64 {
    xxhash(data, seed)
}
