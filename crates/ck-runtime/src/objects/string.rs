//! String object operations.
//!
//! Strings are immutable byte sequences. The hash is computed once when the
//! bytes are finalized and cached for dictionary lookups.

use crate::gc::{Gc, GcRef};
use crate::hash::hash_bytes;

pub struct StringObj {
    bytes: Box<[u8]>,
    hash: u32,
}

impl StringObj {
    /// Copy `bytes` into a new string.
    pub fn new(bytes: &[u8]) -> Self {
        Self::from_vec(bytes.to_vec())
    }

    /// Finalize an owned buffer into a string, hashing it.
    pub fn from_vec(bytes: Vec<u8>) -> Self {
        let hash = hash_bytes(&bytes);
        Self {
            bytes: bytes.into_boxed_slice(),
            hash,
        }
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        core::str::from_utf8(&self.bytes).ok()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    #[inline]
    pub fn hash(&self) -> u32 {
        self.hash
    }
}

impl PartialEq for StringObj {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash && self.bytes == other.bytes
    }
}

impl Eq for StringObj {}

impl core::fmt::Debug for StringObj {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "StringObj({:?})", String::from_utf8_lossy(&self.bytes))
    }
}

/// Bytes of the string `s`, or `None` if it is not a live string.
#[inline]
pub fn as_bytes(gc: &Gc, s: GcRef) -> Option<&[u8]> {
    gc.get(s)?.as_string().map(StringObj::as_bytes)
}
