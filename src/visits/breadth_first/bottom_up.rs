/*
 * SPDX-FileCopyrightText: 2026 The csr-kernels developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use super::{Frontier, UNVISITED};
use crate::traits::BidirectionalGraph;
use crate::utils::ChunkCursor;
use std::sync::atomic::{AtomicIsize, AtomicUsize, Ordering};

/// Returns whether `node` is unvisited and has a predecessor at distance
/// `distance`; in that case, its distance is set to `distance + 1`.
///
/// Only the thread owning `node` may call this function during a step, so
/// the distance of `node` can be written without a compare-and-swap. Other
/// threads might read it concurrently, but they are looking for nodes at
/// distance `distance`, and the value written is `distance + 1`.
#[inline(always)]
fn adopt<G: BidirectionalGraph>(
    graph: &G,
    distances: &[AtomicIsize],
    node: usize,
    distance: isize,
) -> bool {
    if distances[node].load(Ordering::Relaxed) != UNVISITED {
        return false;
    }
    let found = graph
        .predecessors(node)
        .iter()
        .any(|&pred| distances[pred].load(Ordering::Relaxed) == distance);
    if found {
        distances[node].store(distance + 1, Ordering::Relaxed);
    }
    found
}

/// Performs a bottom-up step of a parallel breadth-first visit, returning
/// the number of newly visited nodes.
///
/// Every node still marked as [`UNVISITED`] in `distances` scans its
/// predecessors, stopping at the first one at distance `level`; if such a
/// predecessor exists, the distance of the node is set to `level + 1`.
///
/// The current frontier is never consulted: at the start of the step a node
/// has distance `level` if and only if it belongs to the current frontier.
/// This is the step used by purely bottom-up visits, which thus need no
/// frontier at all.
///
/// The nodes of the graph are distributed among the threads of the current
/// Rayon thread pool in chunks of `granularity` nodes.
pub fn bottom_up_step<G: BidirectionalGraph + Sync>(
    graph: &G,
    distances: &[AtomicIsize],
    level: usize,
    granularity: usize,
) -> usize {
    let distance = level as isize;
    let chunks = ChunkCursor::new(graph.num_nodes(), granularity);
    let discovered = AtomicUsize::new(0);

    rayon::broadcast(|_| {
        let mut local = 0;
        while let Some(range) = chunks.next() {
            for node in range {
                if adopt(graph, distances, node, distance) {
                    local += 1;
                }
            }
        }
        discovered.fetch_add(local, Ordering::Relaxed);
    });

    discovered.into_inner()
}

/// Performs a bottom-up step of a parallel breadth-first visit, appending
/// the newly visited nodes to `next_frontier`.
///
/// This step is identical to [`bottom_up_step`], but it materializes the next
/// frontier, so that it can be followed by a [top-down
/// step](super::top_down_step). Each thread collects the nodes it visits in a
/// local buffer that is appended to `next_frontier` when the thread runs out
/// of chunks.
///
/// `next_frontier` is not cleared by this function.
pub fn bottom_up_step_frontier<G: BidirectionalGraph + Sync>(
    graph: &G,
    distances: &[AtomicIsize],
    level: usize,
    next_frontier: &mut Frontier,
    granularity: usize,
) {
    let distance = level as isize;
    let chunks = ChunkCursor::new(graph.num_nodes(), granularity);
    let appender = next_frontier.appender();

    rayon::broadcast(|_| {
        let mut local = Vec::new();
        while let Some(range) = chunks.next() {
            for node in range {
                if adopt(graph, distances, node, distance) {
                    local.push(node);
                }
            }
        }
        appender.bulk_append(&local);
    });
}
