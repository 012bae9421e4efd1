/*
 * SPDX-FileCopyrightText: 2026 The csr-kernels developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use crossbeam_utils::CachePadded;
use std::sync::atomic::{AtomicUsize, Ordering};
use sync_cell_slice::{SyncCell, SyncSlice};

/// A fixed-capacity buffer of nodes filled in parallel.
///
/// A frontier holds the nodes discovered at a given level of a breadth-first
/// visit. During a parallel region threads do not push nodes one at a time:
/// each thread gathers its nodes in a local buffer and then hands it to
/// [`FrontierAppender::bulk_append`], which reserves a contiguous range of
/// slots with a single atomic `fetch_add` on the length and copies the local
/// buffer there. Since reserved ranges are disjoint, the copy needs no further
/// synchronization.
///
/// The frontier does not deduplicate nodes: uniqueness is a property of the
/// visits that fill it, which claim each node exactly once.
///
/// # Examples
///
/// ```
/// use csr_kernels::visits::breadth_first::Frontier;
///
/// let mut frontier = Frontier::with_capacity(rayon::current_num_threads());
/// let appender = frontier.appender();
/// rayon::broadcast(|ctx| {
///     appender.bulk_append(&[ctx.index()]);
/// });
/// assert_eq!(frontier.len(), rayon::current_num_threads());
/// ```
#[derive(Debug)]
pub struct Frontier {
    nodes: Box<[usize]>,
    len: CachePadded<AtomicUsize>,
}

impl Frontier {
    /// Creates an empty frontier that can contain up to `capacity` nodes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: vec![0; capacity].into_boxed_slice(),
            len: CachePadded::new(AtomicUsize::new(0)),
        }
    }

    /// Returns the maximum number of nodes this frontier can hold.
    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the number of nodes in the frontier.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.len.load(Ordering::Relaxed)
    }

    /// Returns whether the frontier is empty.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Empties the frontier.
    #[inline(always)]
    pub fn clear(&mut self) {
        *self.len.get_mut() = 0;
    }

    /// Appends a single node.
    ///
    /// # Panics
    ///
    /// This method will panic if the frontier is full.
    pub fn push(&mut self, node: usize) {
        let len = self.len.get_mut();
        assert!(
            *len < self.nodes.len(),
            "Frontier overflow: capacity is {}",
            self.nodes.len()
        );
        self.nodes[*len] = node;
        *len += 1;
    }

    /// Returns the nodes in the frontier.
    #[inline(always)]
    pub fn as_slice(&self) -> &[usize] {
        &self.nodes[..self.len()]
    }

    /// Returns an iterator over the nodes in the frontier.
    pub fn iter(&self) -> std::slice::Iter<'_, usize> {
        self.as_slice().iter()
    }

    /// Returns a handle that can be shared among threads to append nodes.
    ///
    /// The handle borrows the frontier mutably, so the frontier cannot be
    /// read until all appends are completed.
    pub fn appender(&mut self) -> FrontierAppender<'_> {
        FrontierAppender {
            nodes: self.nodes.as_sync_slice(),
            len: &self.len,
        }
    }
}

impl<'a> IntoIterator for &'a Frontier {
    type Item = &'a usize;
    type IntoIter = std::slice::Iter<'a, usize>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// A shared handle for parallel appends to a [`Frontier`].
///
/// See [`Frontier::appender`].
#[derive(Clone, Copy)]
pub struct FrontierAppender<'a> {
    nodes: &'a [SyncCell<usize>],
    len: &'a AtomicUsize,
}

impl FrontierAppender<'_> {
    /// Appends all given nodes to the frontier, contiguously.
    ///
    /// # Panics
    ///
    /// This method will panic if the nodes do not fit in the frontier.
    pub fn bulk_append(&self, nodes: &[usize]) {
        if nodes.is_empty() {
            return;
        }
        let start = self.len.fetch_add(nodes.len(), Ordering::Relaxed);
        let end = start + nodes.len();
        assert!(
            end <= self.nodes.len(),
            "Frontier overflow: {end} nodes, capacity is {}",
            self.nodes.len()
        );
        for (cell, &node) in self.nodes[start..end].iter().zip(nodes) {
            // SAFETY: the range start..end has been reserved by this thread
            unsafe { cell.set(node) };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_clear() {
        let mut frontier = Frontier::with_capacity(3);
        assert!(frontier.is_empty());
        frontier.push(2);
        frontier.push(0);
        assert_eq!(frontier.as_slice(), &[2, 0]);
        frontier.clear();
        assert!(frontier.is_empty());
        assert_eq!(frontier.capacity(), 3);
    }

    #[test]
    #[should_panic]
    fn test_push_overflow() {
        let mut frontier = Frontier::with_capacity(1);
        frontier.push(0);
        frontier.push(0);
    }

    #[test]
    fn test_parallel_bulk_append() {
        let n = 10_000;
        let pool = crate::thread_pool![4];
        let mut frontier = Frontier::with_capacity(n);
        let appender = frontier.appender();
        pool.install(|| {
            let threads = rayon::current_num_threads();
            rayon::broadcast(|ctx| {
                // Each thread appends the nodes congruent to its index
                let local: Vec<usize> = (ctx.index()..n).step_by(threads).collect();
                for chunk in local.chunks(97) {
                    appender.bulk_append(chunk);
                }
            });
        });

        assert_eq!(frontier.len(), n);
        let mut nodes = frontier.as_slice().to_vec();
        nodes.sort_unstable();
        assert_eq!(nodes, (0..n).collect::<Vec<_>>());
    }

    #[test]
    #[should_panic]
    fn test_bulk_append_overflow() {
        let mut frontier = Frontier::with_capacity(2);
        frontier.appender().bulk_append(&[0, 1, 2]);
    }
}
