/*
 * SPDX-FileCopyrightText: 2026 The csr-kernels developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use super::{Frontier, UNVISITED};
use crate::traits::RandomAccessGraph;
use crate::utils::ChunkCursor;
use std::sync::atomic::{AtomicIsize, Ordering};

/// Performs a top-down step of a parallel breadth-first visit.
///
/// For each node in `frontier`, all successors still marked as
/// [`UNVISITED`] in `distances` are claimed by a compare-and-swap setting their
/// distance to that of the node plus one; each claimed node is appended to
/// `next_frontier`. Since a node can be claimed only once, `next_frontier`
/// contains no duplicates, and it contains exactly the nodes at the next
/// distance which were not visited before the step.
///
/// The nodes of `frontier` are distributed among the threads of the current
/// Rayon thread pool in chunks of `granularity` nodes. Each thread collects
/// the nodes it claims in a local buffer that is appended to `next_frontier`
/// when the thread runs out of chunks.
///
/// `next_frontier` is not cleared by this function.
pub fn top_down_step<G: RandomAccessGraph + Sync>(
    graph: &G,
    distances: &[AtomicIsize],
    frontier: &Frontier,
    next_frontier: &mut Frontier,
    granularity: usize,
) {
    let nodes = frontier.as_slice();
    let chunks = ChunkCursor::new(nodes.len(), granularity);
    let appender = next_frontier.appender();

    rayon::broadcast(|_| {
        let mut local = Vec::new();
        while let Some(range) = chunks.next() {
            for &node in &nodes[range] {
                // Set at a previous level, never modified afterwards
                let distance = distances[node].load(Ordering::Relaxed) + 1;
                for &succ in graph.successors(node) {
                    if distances[succ].load(Ordering::Relaxed) == UNVISITED
                        && distances[succ]
                            .compare_exchange(
                                UNVISITED,
                                distance,
                                Ordering::Relaxed,
                                Ordering::Relaxed,
                            )
                            .is_ok()
                    {
                        local.push(succ);
                    }
                }
            }
        }
        appender.bulk_append(&local);
    });
}
