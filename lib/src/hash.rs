extern crate xxhash_rust;

use xxhash_rust::xxh3::xxh3_64;

/// XXH3-64 digest of a segment payload.
#[inline]
pub fn digest(bytes: &[u8]) -> u64 {
    xxh3_64(bytes)
}

/// Fixed-width hex rendering used in segment headers.
#[inline]
pub fn digest_hex(bytes: &[u8]) -> String {
    format!("{:016x}", digest(bytes))
}
