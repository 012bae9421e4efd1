/*
 * SPDX-FileCopyrightText: 2026 The csr-kernels developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use crate::traits::{BidirectionalGraph, RandomAccessGraph};

/// Errors returned when building a [`CsrGraph`] from raw parts.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CsrGraphError {
    #[error("The offsets must contain at least one element")]
    EmptyOffsets,
    #[error("The first offset must be zero, found {0}")]
    NonZeroFirstOffset(usize),
    #[error("The offsets are not monotone at node {node}: {start} > {end}")]
    NonMonotoneOffsets {
        node: usize,
        start: usize,
        end: usize,
    },
    #[error("The last offset ({last}) does not match the number of successors ({num_arcs})")]
    ArcCountMismatch { last: usize, num_arcs: usize },
    #[error("Arc {src} -> {dst} points outside of the graph ({num_nodes} nodes)")]
    NodeOutOfRange {
        src: usize,
        dst: usize,
        num_nodes: usize,
    },
}

/// A compressed sparse-row graph storing both the successor and the
/// predecessor lists.
///
/// Each direction is represented by a degree-cumulative function (the
/// _offsets_, of length *n* + 1) and a dense array of node identifiers: the
/// successors of node `x` are `successors[offsets[x]..offsets[x + 1]]`. The
/// predecessor lists are the transpose of the successor lists and are built
/// at construction time, so that algorithms that need to scan incoming arcs
/// (e.g., bottom-up breadth-first visits or PageRank) can do so without a
/// separate graph.
///
/// Successors are stored in the order in which the arcs were provided;
/// predecessors are stored in increasing order. Self-loops and parallel arcs
/// are kept.
///
/// By setting the feature `serde`, this struct can be serialized using
/// [serde](https://crates.io/crates/serde). Only the outgoing adjacency is
/// serialized; deserialization validates it as
/// [`try_from_parts`](Self::try_from_parts) does and rebuilds the
/// predecessor lists.
///
/// # Examples
///
/// ```
/// use csr_kernels::graphs::CsrGraph;
/// use csr_kernels::traits::*;
///
/// let graph = CsrGraph::from_arcs([(0, 1), (0, 2), (1, 2), (2, 0)]);
/// assert_eq!(graph.num_nodes(), 3);
/// assert_eq!(graph.num_arcs(), 4);
/// assert_eq!(graph.successors(0), &[1, 2]);
/// assert_eq!(graph.predecessors(2), &[0, 1]);
/// ```
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "CsrParts", into = "CsrParts"))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsrGraph {
    out_offsets: Box<[usize]>,
    successors: Box<[usize]>,
    in_offsets: Box<[usize]>,
    predecessors: Box<[usize]>,
}

/// The serialized form of a [`CsrGraph`].
#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
struct CsrParts {
    offsets: Box<[usize]>,
    successors: Box<[usize]>,
}

#[cfg(feature = "serde")]
impl From<CsrGraph> for CsrParts {
    fn from(graph: CsrGraph) -> Self {
        Self {
            offsets: graph.out_offsets,
            successors: graph.successors,
        }
    }
}

#[cfg(feature = "serde")]
impl TryFrom<CsrParts> for CsrGraph {
    type Error = CsrGraphError;
    fn try_from(parts: CsrParts) -> Result<Self, Self::Error> {
        Self::try_from_parts(parts.offsets, parts.successors)
    }
}

impl core::default::Default for CsrGraph {
    fn default() -> Self {
        Self::empty(0)
    }
}

impl CsrGraph {
    /// Creates a graph with `n` nodes and no arcs.
    pub fn empty(n: usize) -> Self {
        Self {
            out_offsets: vec![0; n + 1].into_boxed_slice(),
            successors: Box::default(),
            in_offsets: vec![0; n + 1].into_boxed_slice(),
            predecessors: Box::default(),
        }
    }

    /// Creates a graph from an iterator of arcs.
    ///
    /// The number of nodes is one plus the largest node appearing in an arc.
    pub fn from_arcs(arcs: impl IntoIterator<Item = (usize, usize)>) -> Self {
        let arcs: Vec<_> = arcs.into_iter().collect();
        let num_nodes = arcs
            .iter()
            .map(|&(src, dst)| src.max(dst) + 1)
            .max()
            .unwrap_or(0);
        Self::from_arcs_with_nodes(num_nodes, arcs)
    }

    /// Creates a graph with `num_nodes` nodes from an iterator of arcs.
    ///
    /// Nodes not appearing in any arc are isolated.
    ///
    /// # Panics
    ///
    /// This method will panic if an arc refers to a node greater than or equal
    /// to `num_nodes`.
    pub fn from_arcs_with_nodes(
        num_nodes: usize,
        arcs: impl IntoIterator<Item = (usize, usize)>,
    ) -> Self {
        let arcs: Vec<(usize, usize)> = arcs.into_iter().collect();
        let mut offsets = vec![0; num_nodes + 1];
        for &(src, dst) in &arcs {
            let max = src.max(dst);
            if max >= num_nodes {
                panic!("Node {max} does not exist (the graph has {num_nodes} nodes)");
            }
            offsets[src + 1] += 1;
        }
        prefix_sum(&mut offsets);

        // Stable counting sort by source
        let mut cursor = offsets[..num_nodes].to_vec();
        let mut successors = vec![0; arcs.len()];
        for (src, dst) in arcs {
            successors[cursor[src]] = dst;
            cursor[src] += 1;
        }

        Self::from_out_parts(offsets.into_boxed_slice(), successors.into_boxed_slice())
    }

    /// Creates a graph from the degree-cumulative function and the successor
    /// array of its outgoing adjacency.
    ///
    /// `offsets` must have length *n* + 1, start at zero, be monotone, and end
    /// with the length of `successors`, whose elements must be smaller than
    /// *n*. The predecessor lists are computed from these parts.
    pub fn try_from_parts(
        offsets: impl Into<Box<[usize]>>,
        successors: impl Into<Box<[usize]>>,
    ) -> Result<Self, CsrGraphError> {
        let offsets = offsets.into();
        let successors = successors.into();

        let Some(&last) = offsets.last() else {
            return Err(CsrGraphError::EmptyOffsets);
        };
        if offsets[0] != 0 {
            return Err(CsrGraphError::NonZeroFirstOffset(offsets[0]));
        }
        if last != successors.len() {
            return Err(CsrGraphError::ArcCountMismatch {
                last,
                num_arcs: successors.len(),
            });
        }

        if let Some((node, w)) = offsets.windows(2).enumerate().find(|(_, w)| w[0] > w[1]) {
            return Err(CsrGraphError::NonMonotoneOffsets {
                node,
                start: w[0],
                end: w[1],
            });
        }

        // Offsets are now bounded by the number of successors
        let num_nodes = offsets.len() - 1;
        for (node, w) in offsets.windows(2).enumerate() {
            if let Some(&dst) = successors[w[0]..w[1]].iter().find(|&&d| d >= num_nodes) {
                return Err(CsrGraphError::NodeOutOfRange {
                    src: node,
                    dst,
                    num_nodes,
                });
            }
        }

        Ok(Self::from_out_parts(offsets, successors))
    }

    /// Returns the transpose of this graph.
    pub fn transpose(&self) -> Self {
        self.clone().into_transpose()
    }

    /// Turns this graph into its transpose without copying any data.
    pub fn into_transpose(self) -> Self {
        Self {
            out_offsets: self.in_offsets,
            successors: self.predecessors,
            in_offsets: self.out_offsets,
            predecessors: self.successors,
        }
    }

    /// Returns the degree-cumulative function of the outgoing adjacency.
    pub fn out_offsets(&self) -> &[usize] {
        &self.out_offsets
    }

    /// Returns the degree-cumulative function of the incoming adjacency.
    pub fn in_offsets(&self) -> &[usize] {
        &self.in_offsets
    }

    /// Builds the incoming adjacency from valid outgoing parts.
    fn from_out_parts(out_offsets: Box<[usize]>, successors: Box<[usize]>) -> Self {
        let num_nodes = out_offsets.len() - 1;
        let mut in_offsets = vec![0; num_nodes + 1];
        for &dst in successors.iter() {
            in_offsets[dst + 1] += 1;
        }
        prefix_sum(&mut in_offsets);

        let mut cursor = in_offsets[..num_nodes].to_vec();
        let mut predecessors = vec![0; successors.len()];
        for src in 0..num_nodes {
            for &dst in &successors[out_offsets[src]..out_offsets[src + 1]] {
                predecessors[cursor[dst]] = src;
                cursor[dst] += 1;
            }
        }

        Self {
            out_offsets,
            successors,
            in_offsets: in_offsets.into_boxed_slice(),
            predecessors: predecessors.into_boxed_slice(),
        }
    }
}

fn prefix_sum(counts: &mut [usize]) {
    for i in 1..counts.len() {
        counts[i] += counts[i - 1];
    }
}

impl RandomAccessGraph for CsrGraph {
    #[inline(always)]
    fn num_nodes(&self) -> usize {
        self.out_offsets.len() - 1
    }

    #[inline(always)]
    fn num_arcs(&self) -> u64 {
        self.successors.len() as u64
    }

    #[inline(always)]
    fn successors(&self, node: usize) -> &[usize] {
        &self.successors[self.out_offsets[node]..self.out_offsets[node + 1]]
    }

    #[inline(always)]
    fn outdegree(&self, node: usize) -> usize {
        self.out_offsets[node + 1] - self.out_offsets[node]
    }
}

impl BidirectionalGraph for CsrGraph {
    #[inline(always)]
    fn predecessors(&self, node: usize) -> &[usize] {
        &self.predecessors[self.in_offsets[node]..self.in_offsets[node + 1]]
    }

    #[inline(always)]
    fn indegree(&self, node: usize) -> usize {
        self.in_offsets[node + 1] - self.in_offsets[node]
    }
}
