/*
 * SPDX-FileCopyrightText: 2026 The csr-kernels developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use csr_kernels::graphs::{CsrGraph, CsrGraphError};
use csr_kernels::traits::*;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::rc::Rc;

#[test]
fn test_from_arcs() {
    let graph = CsrGraph::from_arcs([(2, 0), (0, 2), (0, 1), (1, 2), (2, 3)]);
    assert_eq!(graph.num_nodes(), 4);
    assert_eq!(graph.num_arcs(), 5);
    // Successors keep the input order
    assert_eq!(graph.successors(0), &[2, 1]);
    assert_eq!(graph.successors(1), &[2]);
    assert_eq!(graph.successors(2), &[0, 3]);
    assert_eq!(graph.successors(3), &[] as &[usize]);
    // Predecessors are sorted
    assert_eq!(graph.predecessors(0), &[2]);
    assert_eq!(graph.predecessors(1), &[0]);
    assert_eq!(graph.predecessors(2), &[0, 1]);
    assert_eq!(graph.predecessors(3), &[2]);

    assert_eq!(graph.out_offsets(), &[0, 2, 3, 5, 5]);
    assert_eq!(graph.in_offsets(), &[0, 1, 2, 4, 5]);
}

#[test]
fn test_isolated_nodes() {
    let graph = CsrGraph::from_arcs_with_nodes(5, [(1, 3)]);
    assert_eq!(graph.num_nodes(), 5);
    assert_eq!(graph.num_arcs(), 1);
    for node in [0, 2, 4] {
        assert_eq!(graph.outdegree(node), 0);
        assert_eq!(graph.indegree(node), 0);
    }
    assert!(graph.has_arc(1, 3));
    assert!(!graph.has_arc(3, 1));
}

#[test]
#[should_panic(expected = "Node 5 does not exist")]
fn test_from_arcs_out_of_range() {
    CsrGraph::from_arcs_with_nodes(5, [(0, 1), (5, 2)]);
}

#[test]
fn test_self_loops_and_parallel_arcs() {
    let graph = CsrGraph::from_arcs([(0, 0), (0, 1), (0, 1), (1, 0)]);
    assert_eq!(graph.num_arcs(), 4);
    assert_eq!(graph.outdegree(0), 3);
    assert_eq!(graph.successors(0), &[0, 1, 1]);
    assert_eq!(graph.predecessors(0), &[0, 1]);
    assert_eq!(graph.predecessors(1), &[0, 0]);
    assert!(graph.has_arc(0, 0));
}

#[test]
fn test_empty() {
    let graph = CsrGraph::empty(0);
    assert_eq!(graph.num_nodes(), 0);
    assert_eq!(graph.num_arcs(), 0);
    assert_eq!(graph, CsrGraph::default());
    assert_eq!(CsrGraph::from_arcs([]), graph);

    let graph = CsrGraph::empty(3);
    assert_eq!(graph.num_nodes(), 3);
    assert_eq!(graph.successors(2), &[] as &[usize]);
    assert_eq!(graph.predecessors(2), &[] as &[usize]);
}

fn from_parts(offsets: &[usize], successors: &[usize]) -> Result<CsrGraph, CsrGraphError> {
    CsrGraph::try_from_parts(offsets.to_vec(), successors.to_vec())
}

#[test]
fn test_try_from_parts() -> anyhow::Result<()> {
    let graph = from_parts(&[0, 2, 3, 3], &[1, 2, 0])?;
    assert_eq!(graph, CsrGraph::from_arcs([(0, 1), (0, 2), (1, 0)]));

    assert_eq!(
        from_parts(&[], &[]),
        Err(CsrGraphError::EmptyOffsets)
    );
    assert_eq!(
        from_parts(&[1, 1], &[0]),
        Err(CsrGraphError::NonZeroFirstOffset(1))
    );
    assert_eq!(
        from_parts(&[0, 1, 3], &[0, 1]),
        Err(CsrGraphError::ArcCountMismatch {
            last: 3,
            num_arcs: 2
        })
    );
    assert_eq!(
        from_parts(&[0, 1, 2], &[1, 2]),
        Err(CsrGraphError::NodeOutOfRange {
            src: 1,
            dst: 2,
            num_nodes: 2
        })
    );
    Ok(())
}

#[test]
fn test_non_monotone_offsets() {
    let err = from_parts(&[0, 3, 2], &[0, 1]).unwrap_err();
    assert_eq!(
        err,
        CsrGraphError::NonMonotoneOffsets {
            node: 1,
            start: 3,
            end: 2
        }
    );
    assert_eq!(
        err.to_string(),
        "The offsets are not monotone at node 1: 3 > 2"
    );
}

#[test]
fn test_transpose() {
    let graph = CsrGraph::from_arcs([(0, 1), (0, 2), (1, 2), (2, 0), (3, 3)]);
    let transpose = graph.transpose();
    assert_eq!(transpose.num_nodes(), graph.num_nodes());
    assert_eq!(transpose.num_arcs(), graph.num_arcs());
    for node in 0..graph.num_nodes() {
        assert_eq!(transpose.successors(node), graph.predecessors(node));
        assert_eq!(transpose.predecessors(node), graph.successors(node));
    }
    assert_eq!(transpose.into_transpose(), graph);
}

#[test]
fn test_random() {
    let mut rng = SmallRng::seed_from_u64(0);
    let n = 1000;
    let arcs: Vec<(usize, usize)> = (0..10_000)
        .map(|_| (rng.random_range(0..n), rng.random_range(0..n)))
        .collect();
    let graph = CsrGraph::from_arcs_with_nodes(n, arcs.iter().copied());

    let mut sorted_arcs = arcs.clone();
    sorted_arcs.sort_unstable();
    let mut graph_arcs: Vec<(usize, usize)> = (0..n)
        .flat_map(|src| graph.successors(src).iter().map(move |&dst| (src, dst)))
        .collect();
    graph_arcs.sort_unstable();
    assert_eq!(graph_arcs, sorted_arcs);

    let mut graph_arcs: Vec<(usize, usize)> = (0..n)
        .flat_map(|dst| graph.predecessors(dst).iter().map(move |&src| (src, dst)))
        .collect();
    graph_arcs.sort_unstable();
    assert_eq!(graph_arcs, sorted_arcs);

    let outdegrees: usize = (0..n).map(|x| graph.outdegree(x)).sum();
    let indegrees: usize = (0..n).map(|x| graph.indegree(x)).sum();
    assert_eq!(outdegrees, arcs.len());
    assert_eq!(indegrees, arcs.len());

    for (node, preds) in (0..n).map(|x| (x, graph.predecessors(x))) {
        assert!(
            preds.windows(2).all(|w| w[0] <= w[1]),
            "Predecessors of {node} are not sorted"
        );
    }
}

#[test]
fn test_delegation() {
    fn arcs<G: BidirectionalGraph>(graph: G) -> (u64, usize, usize) {
        (graph.num_arcs(), graph.outdegree(0), graph.indegree(1))
    }
    let graph = CsrGraph::from_arcs([(0, 1), (0, 2), (2, 1)]);
    let expected = (3, 2, 2);
    assert_eq!(arcs(&graph), expected);
    assert_eq!(arcs(&mut graph.clone()), expected);
    assert_eq!(arcs(Rc::new(graph)), expected);
}

#[cfg(feature = "serde")]
#[test]
fn test_serde() -> anyhow::Result<()> {
    let graph = CsrGraph::from_arcs([(0, 1), (0, 2), (1, 2), (2, 2)]);
    let res = serde_json::to_string(&graph)?;
    let p: CsrGraph = serde_json::from_str(&res)?;
    assert_eq!(graph, p);
    Ok(())
}

#[cfg(feature = "serde")]
#[test]
fn test_serde_rebuilds_predecessors() -> anyhow::Result<()> {
    let graph = CsrGraph::from_arcs([(0, 1), (2, 1), (1, 0)]);
    let res = serde_json::to_string(&graph)?;
    assert_eq!(res, r#"{"offsets":[0,1,2,3],"successors":[1,0,1]}"#);

    let graph: CsrGraph = serde_json::from_str(r#"{"offsets":[0,1,1],"successors":[1]}"#)?;
    assert_eq!(graph.predecessors(1), &[0]);
    assert_eq!(graph, CsrGraph::from_arcs([(0, 1)]));
    Ok(())
}

#[cfg(feature = "serde")]
#[test]
fn test_serde_rejects_malformed_parts() {
    for json in [
        r#"{"offsets":[],"successors":[]}"#,
        r#"{"offsets":[1,1],"successors":[0]}"#,
        r#"{"offsets":[0,2,1],"successors":[0]}"#,
        r#"{"offsets":[0,1,2],"successors":[0]}"#,
        r#"{"offsets":[0,1,1],"successors":[2]}"#,
        // Predecessor lists are never read from the input
        r#"{"out_offsets":[0,1,1],"successors":[1],"in_offsets":[0,0,0],"predecessors":[]}"#,
    ] {
        assert!(
            serde_json::from_str::<CsrGraph>(json).is_err(),
            "{json} was accepted"
        );
    }

    let err = serde_json::from_str::<CsrGraph>(r#"{"offsets":[0,1,1],"successors":[2]}"#)
        .unwrap_err();
    assert!(err
        .to_string()
        .contains(&CsrGraphError::NodeOutOfRange {
            src: 0,
            dst: 2,
            num_nodes: 2
        }
        .to_string()));
}
