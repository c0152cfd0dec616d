//! VM helper functions.

/// Convert a possibly negative logical index into an offset in `[0, len]`.
///
/// Negative values count from the end (`-1` is `len - 1`) and saturate at 0;
/// values past the end clamp to `len`.
#[inline]
pub fn normalize_index(index: isize, len: usize) -> usize {
    if index < 0 {
        len.saturating_sub(index.unsigned_abs())
    } else {
        (index as usize).min(len)
    }
}

/// Like [`normalize_index`], but rejects anything outside `[-len, len)`.
#[inline]
pub fn element_index(index: isize, len: usize) -> Option<usize> {
    let resolved = if index < 0 {
        len.checked_sub(index.unsigned_abs())?
    } else {
        index as usize
    };
    (resolved < len).then_some(resolved)
}
