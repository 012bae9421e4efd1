/*
 * SPDX-FileCopyrightText: 2026 The csr-kernels developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use super::*;
use crate::traits::BidirectionalGraph;
use crate::utils::Granularity;
use dsi_progress_logger::{no_logging, ProgressLog};
use rayon::prelude::*;
use std::sync::atomic::{AtomicIsize, Ordering};
use std::time::Instant;

/// Parallel breadth-first visits computing distances from a root.
///
/// The visit proceeds by levels: at each level, a [step](Step) discovers all
/// nodes at the next distance from the root. Depending on the
/// [direction](Direction), steps are performed
/// [top-down](super::top_down_step) (from the frontier to its successors),
/// [bottom-up](super::bottom_up_step) (from unvisited nodes to their
/// predecessors), or choosing at each level the cheaper of the two.
///
/// The struct is configured via setters and then executed via
/// [`run`](Self::run). After completion the distances are available via the
/// [`distance`](Self::distance), [`distances`](Self::distances) and
/// [`into_distances`](Self::into_distances) methods; nodes that are not
/// reachable from the root have distance [`UNVISITED`]. A visit can be run
/// again after changing its configuration.
///
/// All parallel steps run on the current Rayon thread pool: to use a
/// specific pool, [install](rayon::ThreadPool::install) it around the call to
/// [`run`](Self::run).
///
/// # Examples
///
/// ```
/// use csr_kernels::graphs::CsrGraph;
/// use csr_kernels::thread_pool;
/// use csr_kernels::visits::breadth_first::{Direction, ParBfs, UNVISITED};
///
/// let graph = CsrGraph::from_arcs_with_nodes(5, [(0, 1), (1, 2), (2, 0), (1, 3)]);
/// let mut bfs = ParBfs::new(&graph);
/// bfs.direction(Direction::Hybrid);
/// thread_pool![4].install(|| bfs.run());
///
/// assert_eq!(&*bfs.distances(), &[0, 1, 2, 2, UNVISITED]);
/// assert_eq!(bfs.distance(3), Some(2));
/// assert_eq!(bfs.distance(4), None);
/// assert_eq!(bfs.levels(), 3);
/// assert_eq!(bfs.num_visited(), 4);
/// ```
pub struct ParBfs<'a, G: BidirectionalGraph + Sync> {
    graph: &'a G,
    root: usize,
    direction: Direction,
    granularity: Granularity,

    distances: Box<[AtomicIsize]>,
    steps: Vec<Step>,
    num_visited: usize,
}

impl<G: BidirectionalGraph + Sync> std::fmt::Debug for ParBfs<'_, G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParBfs")
            .field("root", &self.root)
            .field("direction", &self.direction)
            .field("granularity", &self.granularity)
            .field("levels", &self.steps.len())
            .field("num_visited", &self.num_visited)
            .finish_non_exhaustive()
    }
}

impl<'a, G: BidirectionalGraph + Sync> ParBfs<'a, G> {
    /// The default granularity of parallel tasks.
    pub const DEFAULT_GRANULARITY: Granularity = Granularity::Nodes(64);

    /// Creates a new breadth-first visit from node 0.
    pub fn new(graph: &'a G) -> Self {
        let n = graph.num_nodes();
        let distances = (0..n)
            .into_par_iter()
            .map(|_| AtomicIsize::new(UNVISITED))
            .collect::<Vec<_>>()
            .into_boxed_slice();
        Self {
            graph,
            root: 0,
            direction: Direction::default(),
            granularity: Self::DEFAULT_GRANULARITY,
            distances,
            steps: Vec::new(),
            num_visited: 0,
        }
    }

    /// Sets the root of the visit.
    ///
    /// # Panics
    ///
    /// Panics if `root` is not a node of the graph.
    pub fn root(&mut self, root: usize) -> &mut Self {
        let n = self.graph.num_nodes();
        assert!(
            root < n,
            "The root ({root}) must be smaller than the number of nodes ({n})"
        );
        self.root = root;
        self
    }

    /// Sets the [direction](Direction) of the visit.
    pub fn direction(&mut self, direction: Direction) -> &mut Self {
        self.direction = direction;
        self
    }

    /// Sets the parallel task granularity.
    ///
    /// The granularity expresses how many
    /// [nodes](Granularity::node_granularity) will be handed to a thread at a
    /// time, both when scanning the frontier in top-down steps and when
    /// scanning all nodes in bottom-up steps.
    pub fn granularity(&mut self, granularity: Granularity) -> &mut Self {
        self.granularity = granularity;
        self
    }

    /// Returns the distance of a node from the root, or `None` if the node is
    /// not reachable.
    pub fn distance(&self, node: usize) -> Option<usize> {
        let d = self.distances[node].load(Ordering::Relaxed);
        (d != UNVISITED).then_some(d as usize)
    }

    /// Returns a copy of the distance vector.
    ///
    /// Nodes that are not reachable from the root have distance
    /// [`UNVISITED`].
    pub fn distances(&self) -> Box<[isize]> {
        self.distances
            .par_iter()
            .map(|d| d.load(Ordering::Relaxed))
            .collect::<Vec<_>>()
            .into_boxed_slice()
    }

    /// Copies the distance vector into the given slice.
    ///
    /// # Panics
    ///
    /// Panics if the length of the slice is not the number of nodes.
    pub fn copy_distances(&self, distances: &mut [isize]) {
        assert_eq!(
            distances.len(),
            self.distances.len(),
            "The distance slice length ({}) does not match the number of nodes ({})",
            distances.len(),
            self.distances.len()
        );
        distances
            .par_iter_mut()
            .zip(self.distances.par_iter())
            .for_each(|(d, a)| *d = a.load(Ordering::Relaxed));
    }

    /// Consumes the visit and returns the distance vector.
    pub fn into_distances(self) -> Box<[isize]> {
        self.distances
            .into_vec()
            .into_par_iter()
            .map(AtomicIsize::into_inner)
            .collect::<Vec<_>>()
            .into_boxed_slice()
    }

    /// Returns the number of levels of the last visit, that is, one plus the
    /// largest distance from the root.
    pub fn levels(&self) -> usize {
        self.steps.len()
    }

    /// Returns the [steps](Step) performed by the last visit, one per level.
    ///
    /// The last step is the one which found no new nodes.
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Returns the number of nodes reachable from the root, including the
    /// root itself.
    pub fn num_visited(&self) -> usize {
        self.num_visited
    }

    /// Runs the visit.
    pub fn run(&mut self) {
        self.run_with_logging(no_logging![]);
    }

    /// Runs the visit, logging progress.
    ///
    /// `pl` is a [`ProgressLog`] counting visited nodes; it is updated once
    /// per level. Its options will be preserved, making thus possible to
    /// customize the logs.
    pub fn run_with_logging(&mut self, pl: &mut impl ProgressLog) {
        let n = self.graph.num_nodes();
        self.steps.clear();
        self.num_visited = 0;
        if n == 0 {
            return;
        }

        let node_granularity = self
            .granularity
            .node_granularity(n, self.graph.num_arcs());

        log::info!("Root: {}", self.root);
        log::info!("Direction: {}", self.direction);
        log::info!("Granularity: {} nodes", node_granularity);

        self.distances
            .par_iter()
            .with_min_len(node_granularity)
            .for_each(|d| d.store(UNVISITED, Ordering::Relaxed));
        self.distances[self.root].store(0, Ordering::Relaxed);

        pl.item_name("node");
        pl.expected_updates(Some(n));
        pl.start(format!("Visiting from node {} ({})...", self.root, self.direction));
        pl.update();

        self.num_visited = match self.direction {
            Direction::BottomUp => self.visit_bottom_up(node_granularity, pl),
            Direction::TopDown | Direction::Hybrid => {
                self.visit_with_frontier(node_granularity, pl)
            }
        };

        pl.done();

        log::info!(
            "Visited {} nodes out of {} in {} levels",
            self.num_visited,
            n,
            self.steps.len()
        );
    }

    /// Visits using explicit frontiers, either always top-down or choosing the
    /// step at each level; returns the number of visited nodes.
    fn visit_with_frontier(&mut self, granularity: usize, pl: &mut impl ProgressLog) -> usize {
        let n = self.graph.num_nodes();
        let mut curr_frontier = Frontier::with_capacity(n);
        let mut next_frontier = Frontier::with_capacity(n);
        curr_frontier.push(self.root);
        let mut num_visited = 1;
        let mut level = 0;

        while !curr_frontier.is_empty() {
            let start = Instant::now();
            next_frontier.clear();

            let step = match self.direction {
                Direction::Hybrid if n - num_visited < curr_frontier.len() => Step::BottomUp,
                _ => Step::TopDown,
            };

            match step {
                Step::TopDown => top_down_step(
                    self.graph,
                    &self.distances,
                    &curr_frontier,
                    &mut next_frontier,
                    granularity,
                ),
                Step::BottomUp => bottom_up_step_frontier(
                    self.graph,
                    &self.distances,
                    level,
                    &mut next_frontier,
                    granularity,
                ),
            }

            log::debug!(
                "Level {}: {} step, frontier {} -> {} nodes, {:?}",
                level,
                step,
                curr_frontier.len(),
                next_frontier.len(),
                start.elapsed()
            );

            num_visited += next_frontier.len();
            pl.update_with_count(next_frontier.len());
            self.steps.push(step);
            // Swap the frontiers
            std::mem::swap(&mut curr_frontier, &mut next_frontier);
            level += 1;
        }

        num_visited
    }

    /// Visits bottom-up without frontiers; returns the number of visited
    /// nodes.
    fn visit_bottom_up(&mut self, granularity: usize, pl: &mut impl ProgressLog) -> usize {
        let mut num_visited = 1;
        let mut level = 0;

        loop {
            let start = Instant::now();
            let discovered = bottom_up_step(self.graph, &self.distances, level, granularity);

            log::debug!(
                "Level {}: {} step, {} new nodes, {:?}",
                level,
                Step::BottomUp,
                discovered,
                start.elapsed()
            );

            num_visited += discovered;
            pl.update_with_count(discovered);
            self.steps.push(Step::BottomUp);
            level += 1;

            if discovered == 0 {
                break;
            }
        }

        num_visited
    }
}
