/*
 * SPDX-FileCopyrightText: 2026 The csr-kernels developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use crossbeam_utils::CachePadded;
use std::ops::Range;
use std::sync::atomic::{AtomicUsize, Ordering};

/// A shared cursor handing out consecutive chunks of a range of indices.
///
/// This is the dynamic scheduling used by all parallel loops of the crate:
/// every thread started by [`rayon::broadcast`] repeatedly calls
/// [`next`](Self::next) until the range is exhausted.
#[derive(Debug)]
pub(crate) struct ChunkCursor {
    cursor: CachePadded<AtomicUsize>,
    len: usize,
    granularity: usize,
}

impl ChunkCursor {
    pub(crate) fn new(len: usize, granularity: usize) -> Self {
        Self {
            cursor: CachePadded::new(AtomicUsize::new(0)),
            len,
            granularity: granularity.max(1),
        }
    }

    /// Returns the next chunk, or `None` if all chunks have been handed out.
    #[inline(always)]
    pub(crate) fn next(&self) -> Option<Range<usize>> {
        let start = self.cursor.fetch_add(self.granularity, Ordering::Relaxed);
        if start >= self.len {
            return None;
        }
        Some(start..self.len.min(start + self.granularity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_covers_range() {
        let chunks = ChunkCursor::new(10, 3);
        let mut covered = vec![];
        while let Some(range) = chunks.next() {
            covered.extend(range);
        }
        assert_eq!(covered, (0..10).collect::<Vec<_>>());
        assert!(chunks.next().is_none());
    }

    #[test]
    fn test_empty() {
        assert!(ChunkCursor::new(0, 5).next().is_none());
        // Zero granularity is promoted to one
        let chunks = ChunkCursor::new(2, 0);
        assert_eq!(chunks.next(), Some(0..1));
        assert_eq!(chunks.next(), Some(1..2));
        assert_eq!(chunks.next(), None);
    }
}
