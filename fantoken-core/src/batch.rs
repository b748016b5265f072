//! Fixed-size batching of an ordered sequence.
//!
//! The earnings query takes a bounded list of entity ids per call, so the
//! entity set is split into contiguous chunks. The iterator is lazy and
//! single-pass: chunks are produced as they are consumed, never materialized
//! up front.

/// Lazy iterator over contiguous, non-overlapping chunks of `items`.
pub struct Batches<'a, T> {
    items: &'a [T],
    size: usize,
}

impl<'a, T> Iterator for Batches<'a, T> {
    type Item = &'a [T];

    fn next(&mut self) -> Option<&'a [T]> {
        if self.items.is_empty() {
            return None;
        }
        let split = self.size.min(self.items.len());
        let (chunk, rest) = self.items.split_at(split);
        self.items = rest;
        Some(chunk)
    }
}

/// Split `items` into chunks of `size` in original order; the final chunk may
/// be shorter. `size` of zero is a programming error.
pub fn batches<T>(items: &[T], size: usize) -> Batches<'_, T> {
    assert!(size > 0, "batch size must be at least 1");
    Batches { items, size }
}
