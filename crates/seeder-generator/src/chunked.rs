//! Restartable chunked production of generated rows.
//!
//! A [`ChunkedProducer`] walks the index range `0..total` in fixed-size
//! ranges and calls a generator closure for each one. Callers that insert
//! each chunk before pulling the next keep memory bounded by the chunk
//! size instead of the size of the whole phase.

use crate::error::GeneratorError;
use std::ops::Range;

/// Finite producer of generated chunks over `0..total`.
pub struct ChunkedProducer<F> {
    total: u64,
    chunk_size: u64,
    offset: u64,
    produce: F,
}

impl<T, F> ChunkedProducer<F>
where
    F: FnMut(Range<u64>) -> Result<T, GeneratorError>,
{
    /// Create a producer; a `chunk_size` of zero is treated as one.
    pub fn new(total: u64, chunk_size: u64, produce: F) -> Self {
        Self {
            total,
            chunk_size: chunk_size.max(1),
            offset: 0,
            produce,
        }
    }

    /// Resume from `offset` instead of the beginning.
    pub fn with_start_offset(mut self, offset: u64) -> Self {
        self.offset = offset.min(self.total);
        self
    }

    /// Start over from index zero.
    pub fn restart(&mut self) {
        self.offset = 0;
    }

    /// Index of the next row to produce.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn remaining(&self) -> u64 {
        self.total - self.offset
    }

    /// Number of chunks left to produce.
    pub fn chunks_remaining(&self) -> u64 {
        self.remaining().div_ceil(self.chunk_size)
    }
}

impl<T, F> Iterator for ChunkedProducer<F>
where
    F: FnMut(Range<u64>) -> Result<T, GeneratorError>,
{
    type Item = Result<T, GeneratorError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.offset >= self.total {
            return None;
        }

        let end = (self.offset + self.chunk_size).min(self.total);
        let range = self.offset..end;
        self.offset = end;

        Some((self.produce)(range))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.chunks_remaining() as usize;
        (remaining, Some(remaining))
    }
}
