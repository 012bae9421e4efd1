/*
 * SPDX-FileCopyrightText: 2026 The csr-kernels developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

/*!

Basic traits to access graphs in random-access fashion.

A [random-access graph](RandomAccessGraph) exposes the number of nodes and
arcs, and for each node the slice of its successors. A [bidirectional
graph](BidirectionalGraph) exposes, additionally, the slice of the
predecessors of each node, that is, the successors in the transpose.

Nodes are always the integers in [0 . . *n*), where *n* is the number of
nodes. Self-loops and parallel arcs are allowed, and they are returned as
they are stored.

All kernels in this crate borrow the graph immutably for the whole
computation: implementations must return the same slices for the same node
as long as the graph is borrowed.

*/

use impl_tools::autoimpl;
use std::rc::Rc;

/// A graph providing random access to successor lists.
#[autoimpl(for<S: trait + ?Sized> &S, &mut S, Rc<S>)]
pub trait RandomAccessGraph {
    /// Returns the number of nodes in the graph.
    fn num_nodes(&self) -> usize;

    /// Returns the number of arcs in the graph.
    fn num_arcs(&self) -> u64;

    /// Returns the successors of a node.
    fn successors(&self, node: usize) -> &[usize];

    /// Returns the number of successors of a node.
    ///
    /// A node with outdegree zero is a _sink_ (or _dangling_ node).
    #[inline(always)]
    fn outdegree(&self, node: usize) -> usize {
        self.successors(node).len()
    }

    /// Returns whether there is an arc going from `src` to `dst`.
    ///
    /// Note that the default implementation performs a linear scan.
    fn has_arc(&self, src: usize, dst: usize) -> bool {
        self.successors(src).contains(&dst)
    }
}

/// A [random-access graph](RandomAccessGraph) providing, additionally, random
/// access to predecessor lists.
///
/// The predecessor lists must describe exactly the transpose of the successor
/// lists: in particular, the sum of the indegrees is the number of arcs.
#[autoimpl(for<S: trait + ?Sized> &S, &mut S, Rc<S>)]
pub trait BidirectionalGraph: RandomAccessGraph {
    /// Returns the predecessors of a node.
    fn predecessors(&self, node: usize) -> &[usize];

    /// Returns the number of predecessors of a node.
    #[inline(always)]
    fn indegree(&self, node: usize) -> usize {
        self.predecessors(node).len()
    }
}
