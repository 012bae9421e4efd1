/*
 * SPDX-FileCopyrightText: 2026 The csr-kernels developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

/// Granularity of parallel tasks, specified transparently by nodes or arcs.
///
/// The kernels of this crate distribute work dynamically: each thread
/// repeatedly grabs a chunk of consecutive items (nodes of a frontier, or
/// nodes of the graph) from a shared cursor. This enum specifies the size of
/// such chunks either directly as a number of nodes, or as a number of arcs,
/// in which case the number of nodes is computed using the average outdegree
/// of the graph.
///
/// Small chunks tolerate skewed degree distributions better, whereas large
/// chunks reduce the contention on the shared cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Granularity {
    /// Node granularity.
    ///
    /// Each task will be formed by the specified number of nodes.
    Nodes(usize),
    /// Arc granularity.
    ///
    /// Each task will be formed by a number of nodes equal to the specified
    /// number of arcs divided by the average outdegree.
    Arcs(u64),
}

impl Granularity {
    /// Returns a node granularity for a given number of nodes and arcs.
    ///
    /// For the variant [`Nodes`](Self::Nodes), the specified number of nodes is
    /// returned. For the variant [`Arcs`](Self::Arcs), the number of nodes is
    /// computed as the specified number of arcs divided by the average
    /// outdegree.
    ///
    /// The result is always at least one.
    pub fn node_granularity(&self, num_nodes: usize, num_arcs: u64) -> usize {
        match self {
            Self::Nodes(n) => (*n).max(1),
            Self::Arcs(n) => {
                let average_degree = num_arcs as f64 / num_nodes.max(1) as f64;
                if average_degree == 0.0 {
                    return num_nodes.max(1);
                }
                (*n as f64 / average_degree)
                    .min(usize::MAX as f64)
                    .ceil()
                    .max(1.) as usize
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nodes() {
        assert_eq!(Granularity::Nodes(100).node_granularity(1000, 5000), 100);
        assert_eq!(Granularity::Nodes(0).node_granularity(1000, 5000), 1);
    }

    #[test]
    fn test_arcs() {
        // Average outdegree 5
        assert_eq!(Granularity::Arcs(1000).node_granularity(1000, 5000), 200);
        assert_eq!(Granularity::Arcs(1).node_granularity(1000, 5000), 1);
        // No arcs: a single chunk
        assert_eq!(Granularity::Arcs(1000).node_granularity(10, 0), 10);
        assert_eq!(Granularity::Arcs(1000).node_granularity(0, 0), 1);
    }
}
