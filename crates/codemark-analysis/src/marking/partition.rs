//! Contiguous corpus partitioning.

use std::ops::Range;

/// Split `0..len` into `parts` contiguous, disjoint ranges. Each part gets
/// `len / parts` samples; the last part also takes the remainder.
pub fn split_contiguous(len: usize, parts: usize) -> Vec<Range<usize>> {
    if parts == 0 {
        return Vec::new();
    }
    let size = len / parts;
    (0..parts)
        .map(|i| {
            let start = i * size;
            let end = if i + 1 == parts { len } else { start + size };
            start..end
        })
        .collect()
}
