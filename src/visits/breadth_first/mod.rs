/*
 * SPDX-FileCopyrightText: 2026 The csr-kernels developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Parallel breadth-first visits.
//!
//! A breadth-first visit from a root computes, for each node, its distance
//! (the minimum number of arcs of a path) from the root. The visits in this
//! module proceed by levels, and each level is computed by a parallel _step_
//! of one of two kinds:
//!
//! - a [top-down step](top_down_step) scans the successors of the nodes in
//!   the current frontier and claims, by a compare-and-swap on their
//!   distance, those that are still unvisited;
//! - a [bottom-up step](bottom_up_step) scans all unvisited nodes and looks
//!   for a predecessor at the current distance.
//!
//! Top-down steps are cheap when the frontier is small; bottom-up steps are
//! cheap when the frontier is large and few nodes remain unvisited, as most
//! unvisited nodes will find a parent among their first predecessors. The
//! [`ParBfs`] driver can perform only top-down steps, only bottom-up steps,
//! or [choose](Direction::Hybrid) at each level.
//!
//! Distances are stored in a slice of [`AtomicIsize`], with the sentinel
//! [`UNVISITED`] marking nodes not discovered yet. The following invariant
//! links distances and frontiers: at the start of the step for level *ℓ*, a
//! node has distance *ℓ* if and only if it belongs to the current frontier.
//!
//! For the simplest use cases there are three functions,
//! [`bfs_top_down`], [`bfs_bottom_up`] and [`bfs_hybrid`], writing the
//! distances from node 0 into a slice.
//!
//! [`AtomicIsize`]: std::sync::atomic::AtomicIsize

mod frontier;
pub use frontier::*;

mod top_down;
pub use top_down::*;

mod bottom_up;
pub use bottom_up::*;

mod par_bfs;
pub use par_bfs::*;

use crate::traits::BidirectionalGraph;

/// The distance of nodes that have not been visited.
pub const UNVISITED: isize = -1;

/// The direction of a [parallel breadth-first visit](ParBfs).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    /// Performs only [top-down steps](top_down_step).
    TopDown,
    /// Performs only [bottom-up steps](bottom_up_step), without materializing
    /// frontiers; the visit ends when a step discovers no nodes.
    BottomUp,
    /// Chooses the step at each level. This is the default.
    ///
    /// A [bottom-up step](bottom_up_step_frontier) is performed when the
    /// number of unvisited nodes is smaller than the size of the current
    /// frontier; otherwise, a [top-down step](top_down_step) is performed.
    /// Bottom-up steps materialize the next frontier, so that the two kinds of
    /// steps can be freely interleaved.
    #[default]
    Hybrid,
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::TopDown => f.write_str("top-down"),
            Direction::BottomUp => f.write_str("bottom-up"),
            Direction::Hybrid => f.write_str("hybrid"),
        }
    }
}

/// The kind of step performed at a level of a [parallel breadth-first
/// visit](ParBfs).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    /// A [top-down step](top_down_step) from the current frontier.
    TopDown,
    /// A bottom-up step, either [counting](bottom_up_step) or
    /// [materializing](bottom_up_step_frontier) the newly visited nodes.
    BottomUp,
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Step::TopDown => f.write_str("top-down"),
            Step::BottomUp => f.write_str("bottom-up"),
        }
    }
}

fn bfs_into<G: BidirectionalGraph + Sync>(
    graph: &G,
    direction: Direction,
    distances: &mut [isize],
) {
    let mut bfs = ParBfs::new(graph);
    bfs.direction(direction).run();
    bfs.copy_distances(distances);
}

/// Writes into `distances` the distances from node 0 computed by a
/// [top-down](Direction::TopDown) parallel visit.
///
/// Unreachable nodes have distance [`UNVISITED`].
///
/// # Panics
///
/// Panics if the length of `distances` is not the number of nodes.
pub fn bfs_top_down<G: BidirectionalGraph + Sync>(graph: &G, distances: &mut [isize]) {
    bfs_into(graph, Direction::TopDown, distances);
}

/// Writes into `distances` the distances from node 0 computed by a
/// [bottom-up](Direction::BottomUp) parallel visit.
///
/// Unreachable nodes have distance [`UNVISITED`].
///
/// # Panics
///
/// Panics if the length of `distances` is not the number of nodes.
pub fn bfs_bottom_up<G: BidirectionalGraph + Sync>(graph: &G, distances: &mut [isize]) {
    bfs_into(graph, Direction::BottomUp, distances);
}

/// Writes into `distances` the distances from node 0 computed by a
/// [hybrid](Direction::Hybrid) parallel visit.
///
/// Unreachable nodes have distance [`UNVISITED`].
///
/// # Panics
///
/// Panics if the length of `distances` is not the number of nodes.
///
/// # Examples
///
/// ```
/// use csr_kernels::graphs::CsrGraph;
/// use csr_kernels::visits::breadth_first::{bfs_hybrid, UNVISITED};
///
/// let graph = CsrGraph::from_arcs_with_nodes(3, [(0, 1)]);
/// let mut distances = vec![0; 3];
/// bfs_hybrid(&graph, &mut distances);
/// assert_eq!(distances, [0, 1, UNVISITED]);
/// ```
pub fn bfs_hybrid<G: BidirectionalGraph + Sync>(graph: &G, distances: &mut [isize]) {
    bfs_into(graph, Direction::Hybrid, distances);
}
