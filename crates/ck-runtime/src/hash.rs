//! Hash functions for dictionary keys.

const FNV_OFFSET: u32 = 2_166_136_261;
const FNV_PRIME: u32 = 16_777_619;

/// FNV-1a over a byte string.
#[inline]
pub fn hash_bytes(bytes: &[u8]) -> u32 {
    let mut hash = FNV_OFFSET;
    for &b in bytes {
        hash ^= b as u32;
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}

/// Fold a 64-bit integer into 32 bits with avalanche.
#[inline]
pub fn hash_integer(value: i64) -> u32 {
    let mut x = value as u64;
    x = (!x).wrapping_add(x << 18);
    x ^= x >> 31;
    x = x.wrapping_mul(21);
    x ^= x >> 11;
    x = x.wrapping_add(x << 6);
    x ^= x >> 22;
    (x & 0x3fff_ffff) as u32
}
