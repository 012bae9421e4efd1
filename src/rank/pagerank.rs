/*
 * SPDX-FileCopyrightText: 2026 The csr-kernels developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Parallel PageRank.
//!
//! This implementation computes PageRank by the power method (a Jacobi
//! iteration) using two vectors of doubles, one for the current approximation
//! and one for the next. It scales with the number of cores, as each
//! iteration is a single parallel pass over the predecessors of all nodes.
//!
//! Since we need to enumerate the _predecessors_ of a node, the graph must
//! implement [`BidirectionalGraph`].
//!
//! # The formula
//!
//! If we denote with *P* the row-normalized adjacency matrix of the graph
//! (with zero rows for dangling nodes), with **d** the characteristic vector of
//! dangling nodes, with *n* the number of nodes, and with α the damping
//! factor, the iteration is
//!
//! > **x**⁽*ᵗ* ⁺ ¹⁾ = α **x**⁽*ᵗ*⁾ *P*  +  (1 − α) **1** / *n*  +  α (**x**⁽*ᵗ*⁾ **d**ᵀ) **1** / *n*,
//!
//! that is, for each node *i*,
//!
//! > *xᵢ*⁽*ᵗ* ⁺ ¹⁾ = α ∑_(*j* → *i*) *xⱼ*⁽*ᵗ*⁾ / *d*⁺(*j*)  +  (1 − α) / *n*  +  *S*⁽*ᵗ*⁾,
//!
//! where *d*⁺(*j*) is the outdegree of *j* and
//!
//! > *S*⁽*ᵗ*⁾ = α ∑_(*j* dangling) *xⱼ*⁽*ᵗ*⁾ / *n*
//!
//! is the _sink mass_: the rank of dangling nodes is redistributed uniformly
//! to all nodes, as in the _weakly preferential_ formulation. Dangling nodes
//! never appear as divisors. The iteration starts from the uniform vector and
//! preserves stochasticity: the sum of the ranks is 1 at each iteration, up
//! to floating-point errors.
//!
//! # Parallelism
//!
//! Each iteration consists of two parallel passes:
//!
//! 1. the sink mass is computed by a parallel reduction on the list of
//!    dangling nodes, which is computed once, at the first run;
//! 2. each thread grabs a chunk of nodes from an
//!    [`AtomicUsize`](std::sync::atomic::AtomicUsize) cursor and computes
//!    their new ranks; ranks are written in the next vector, which is shared
//!    among threads via [`SyncCell`], and each thread accumulates the ℓ₁ norm
//!    of the difference with the current vector in a private
//!    compensated (Kahan) sum. Private sums are combined at the end of the
//!    pass.
//!
//! Then, the two vectors are swapped.
//!
//! # Stopping Criteria
//!
//! The [`run`](PageRank::run) method accepts a composable [`Predicate`] that
//! is evaluated after each iteration. The predicate receives the current
//! iteration number and the _norm delta_ ‖**x**⁽ᵗ⁾ − **x**⁽ᵗ⁻¹⁾‖₁.
//!
//! [`SyncCell`]: sync_cell_slice::SyncCell

pub mod preds {
    //! Predicates implementing stopping conditions.
    //!
    //! The implementation of [PageRank](super::PageRank) requires a
    //! [predicate](Predicate) to stop the algorithm. This module provides a few
    //! such predicates: they evaluate to true if the algorithm should be
    //! stopped.
    //!
    //! You can combine the predicates using the `and` and `or` methods provided
    //! by the [`PredicateBooleanExt`](predicates::prelude::PredicateBooleanExt)
    //! trait.
    //!
    //! # Examples
    //! ```
    //! # fn main() -> Result<(), Box<dyn std::error::Error>> {
    //! use predicates::prelude::*;
    //! use csr_kernels::rank::pagerank::preds::{L1Norm, MaxIter};
    //!
    //! let mut predicate = L1Norm::try_from(1E-7)?.boxed();
    //! predicate = predicate.or(MaxIter::from(100)).boxed();
    //! #     Ok(())
    //! # }
    //! ```

    use anyhow::ensure;
    use predicates::{reflection::PredicateReflection, Predicate};
    use std::fmt::Display;

    #[doc(hidden)]
    /// This structure is passed to stopping predicates to provide the
    /// information that is needed to evaluate them.
    #[derive(Debug)]
    pub struct PredParams {
        pub iteration: usize,
        pub norm_delta: f64,
    }

    /// Stops after at most the provided number of iterations.
    #[derive(Debug, Clone)]
    pub struct MaxIter {
        max_iter: usize,
    }

    impl MaxIter {
        pub const DEFAULT_MAX_ITER: usize = usize::MAX;
    }

    impl From<usize> for MaxIter {
        fn from(max_iter: usize) -> Self {
            MaxIter { max_iter }
        }
    }

    impl Default for MaxIter {
        fn default() -> Self {
            Self::from(Self::DEFAULT_MAX_ITER)
        }
    }

    impl Display for MaxIter {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_fmt(format_args!("(max iter: {})", self.max_iter))
        }
    }

    impl PredicateReflection for MaxIter {}

    impl Predicate<PredParams> for MaxIter {
        fn eval(&self, pred_params: &PredParams) -> bool {
            pred_params.iteration >= self.max_iter
        }
    }

    /// Stops when the ℓ₁ norm of the difference between successive
    /// approximations is smaller than a given threshold.
    #[derive(Debug, Clone)]
    pub struct L1Norm {
        threshold: f64,
    }

    impl L1Norm {
        pub const DEFAULT_THRESHOLD: f64 = 1E-7;
    }

    impl TryFrom<Option<f64>> for L1Norm {
        type Error = anyhow::Error;
        fn try_from(threshold: Option<f64>) -> anyhow::Result<Self> {
            Ok(match threshold {
                Some(threshold) => {
                    ensure!(!threshold.is_nan());
                    ensure!(threshold > 0.0, "The threshold must be positive");
                    L1Norm { threshold }
                }
                None => Self::default(),
            })
        }
    }

    impl TryFrom<f64> for L1Norm {
        type Error = anyhow::Error;
        fn try_from(threshold: f64) -> anyhow::Result<Self> {
            Some(threshold).try_into()
        }
    }

    impl Default for L1Norm {
        fn default() -> Self {
            L1Norm {
                threshold: Self::DEFAULT_THRESHOLD,
            }
        }
    }

    impl Display for L1Norm {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_fmt(format_args!("(norm: {})", self.threshold))
        }
    }

    impl PredicateReflection for L1Norm {}
    impl Predicate<PredParams> for L1Norm {
        fn eval(&self, pred_params: &PredParams) -> bool {
            pred_params.norm_delta < self.threshold
        }
    }
}

use crate::traits::BidirectionalGraph;
use crate::utils::{ChunkCursor, Granularity};
use dsi_progress_logger::{no_logging, ConcurrentProgressLog, ProgressLog};
use kahan::KahanSum;
use predicates::Predicate;
use rayon::prelude::*;
use sync_cell_slice::SyncSlice;

/// Computes PageRank using a parallel power-method iteration.
///
/// The struct is configured via setters and then executed via
/// [`run`](Self::run). After completion the rank vector is available via the
/// [`rank`](Self::rank) method.
///
/// All parallel passes run on the current Rayon thread pool: to use a
/// specific pool, [install](rayon::ThreadPool::install) it around the call to
/// [`run`](Self::run).
///
/// # Examples
///
/// ```
/// use csr_kernels::graphs::CsrGraph;
/// use csr_kernels::rank::pagerank::{PageRank, preds};
///
/// //   0 → 1, 0 → 2, 1 → 2, 2 → 0, 3 → 0, 4 → 3
/// let graph = CsrGraph::from_arcs([(0, 1), (0, 2), (1, 2), (2, 0), (3, 0), (4, 3)]);
///
/// let mut pr = PageRank::new(&graph);
/// pr.alpha(0.85);
/// pr.run(preds::L1Norm::try_from(1E-9).unwrap());
///
/// assert_eq!(pr.rank().len(), 5);
/// assert!((pr.rank().iter().sum::<f64>() - 1.0).abs() < 1E-9);
/// // Node 0 collects rank from 2 and 3
/// assert!(pr.rank()[0] > pr.rank()[3]);
/// ```
pub struct PageRank<'a, G: BidirectionalGraph + Sync> {
    graph: &'a G,
    alpha: f64,
    granularity: Granularity,
    sink_nodes: Option<Box<[usize]>>,
    norm_delta: f64,

    rank: Box<[f64]>,
    iteration: usize,
}

impl<G: BidirectionalGraph + Sync> std::fmt::Debug for PageRank<'_, G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageRank")
            .field("alpha", &self.alpha)
            .field("granularity", &self.granularity)
            .field("norm_delta", &self.norm_delta)
            .field("iteration", &self.iteration)
            .finish_non_exhaustive()
    }
}

impl<'a, G: BidirectionalGraph + Sync> PageRank<'a, G> {
    /// The default damping factor.
    pub const DEFAULT_ALPHA: f64 = 0.85;
    /// The default granularity of parallel tasks.
    pub const DEFAULT_GRANULARITY: Granularity = Granularity::Nodes(100);

    /// Creates a new PageRank computation.
    pub fn new(graph: &'a G) -> Self {
        let n = graph.num_nodes();
        let rank = vec![0.0; n].into_boxed_slice();
        Self {
            graph,
            alpha: Self::DEFAULT_ALPHA,
            granularity: Self::DEFAULT_GRANULARITY,
            sink_nodes: None,
            norm_delta: f64::INFINITY,
            rank,
            iteration: 0,
        }
    }

    /// Sets the damping factor α.
    ///
    /// # Panics
    ///
    /// Panics if `alpha` is not in the interval [0 . . 1).
    pub fn alpha(&mut self, alpha: f64) -> &mut Self {
        assert!(
            // Note that 0.0..1.0 is [0.0..1.0) in mathematical notation
            (0.0..1.0).contains(&alpha),
            "The damping factor must be in [0 . . 1), got {alpha}"
        );
        self.alpha = alpha;
        self
    }

    /// Sets the parallel task granularity.
    ///
    /// The granularity expresses how many
    /// [nodes](Granularity::node_granularity) will be passed to a Rayon task at
    /// a time.
    pub fn granularity(&mut self, granularity: Granularity) -> &mut Self {
        self.granularity = granularity;
        self
    }

    /// Returns the rank vector.
    ///
    /// After calling [`run`](Self::run), this contains the computed PageRank
    /// values.
    pub fn rank(&self) -> &[f64] {
        &self.rank
    }

    /// Consumes the computation and returns the rank vector.
    pub fn into_rank(self) -> Box<[f64]> {
        self.rank
    }

    /// Returns the number of iterations performed by the last call to
    /// [`run`](Self::run).
    pub fn iterations(&self) -> usize {
        self.iteration
    }

    /// Returns the ℓ₁ norm of the difference between the last two
    /// approximations.
    pub fn norm_delta(&self) -> f64 {
        self.norm_delta
    }

    /// Returns the dangling nodes of the graph, in increasing order, or `None`
    /// if [`run`](Self::run) has not been called yet.
    pub fn sink_nodes(&self) -> Option<&[usize]> {
        self.sink_nodes.as_deref()
    }

    /// Runs the PageRank computation until the given predicate is satisfied.
    pub fn run(&mut self, predicate: impl Predicate<preds::PredParams>) {
        self.run_with_logging(predicate, no_logging![], no_logging![]);
    }

    /// Runs the PageRank computation until the given predicate is satisfied,
    /// logging progress.
    ///
    /// `pl` is a sequential [`ProgressLog`] used for iteration counting. `cpl`
    /// is a [`ConcurrentProgressLog`] used for node-level progress inside each
    /// iteration. Their options will be preserved, making thus possible to
    /// customize the logs.
    ///
    /// It is possible to specify either `pl` or `cpl` as
    /// [`no_logging![]`](dsi_progress_logger::no_logging) if you don't want to
    /// log the corresponding part of the computation.
    pub fn run_with_logging(
        &mut self,
        predicate: impl Predicate<preds::PredParams>,
        pl: &mut impl ProgressLog,
        cpl: &mut impl ConcurrentProgressLog,
    ) {
        let n = self.graph.num_nodes();
        self.iteration = 0;
        self.norm_delta = f64::INFINITY;
        if n == 0 {
            return;
        }

        let graph = self.graph;
        let alpha = self.alpha;
        let node_granularity = self.granularity.node_granularity(n, graph.num_arcs());

        log::info!("Alpha: {}", alpha);
        log::info!("Granularity: {} nodes", node_granularity);
        log::info!("Stopping criterion: {}", predicate);

        let inv_n = 1.0 / n as f64;
        self.rank
            .par_iter_mut()
            .with_min_len(node_granularity)
            .for_each(|x| *x = inv_n);

        let sink_nodes = self.sink_nodes.get_or_insert_with(|| {
            pl.info(format_args!("Computing sink nodes..."));
            (0..n)
                .into_par_iter()
                .with_min_len(node_granularity)
                .filter(|&x| graph.outdegree(x) == 0)
                .collect::<Vec<_>>()
                .into_boxed_slice()
        });
        log::info!("{} sink nodes", sink_nodes.len());

        let teleport = (1.0 - alpha) * inv_n;
        let mut next_rank = vec![0.0; n].into_boxed_slice();

        pl.item_name("iteration");
        pl.expected_updates(None);
        pl.start(format!(
            "Computing PageRank (alpha={alpha}, granularity={node_granularity})..."
        ));

        loop {
            let rank = &self.rank;

            // Rank of dangling nodes, redistributed uniformly
            let sink_rank = sink_nodes
                .par_iter()
                .with_min_len(node_granularity)
                .fold(KahanSum::<f64>::new, |sum, &x| sum + rank[x])
                .reduce(KahanSum::<f64>::new, |sum0, sum1| sum0 + sum1)
                .sum();
            let sink_score = sink_rank * alpha / n as f64;

            let chunks = ChunkCursor::new(n, node_granularity);
            let next_rank_sync = next_rank.as_sync_slice();

            cpl.item_name("node");
            cpl.expected_updates(Some(n));
            cpl.start(format!("Iteration {}...", self.iteration + 1));

            let norm_delta = rayon::broadcast(|_| {
                let mut local_cpl = cpl.clone();
                let mut local_norm = KahanSum::<f64>::new();

                while let Some(range) = chunks.next() {
                    let len = range.len();
                    for i in range {
                        let mut sigma = 0.0;
                        for &j in graph.predecessors(i) {
                            sigma += rank[j] / graph.outdegree(j) as f64;
                        }
                        let new_rank = alpha * sigma + teleport + sink_score;
                        local_norm += (new_rank - rank[i]).abs();
                        // SAFETY: each thread writes a disjoint chunk of nodes
                        unsafe { next_rank_sync[i].set(new_rank) };
                    }
                    local_cpl.update_with_count(len);
                }

                local_norm
            })
            .into_iter()
            .fold(KahanSum::<f64>::new(), |sum, local| sum + local)
            .sum();

            cpl.done();

            std::mem::swap(&mut self.rank, &mut next_rank);
            self.norm_delta = norm_delta;
            self.iteration += 1;

            log::debug!(
                "Iteration {}: sink rank = {}, norm delta = {}",
                self.iteration,
                sink_rank,
                self.norm_delta
            );

            pl.update_and_display();

            if predicate.eval(&preds::PredParams {
                iteration: self.iteration,
                norm_delta: self.norm_delta,
            }) {
                break;
            }
        }

        pl.done();

        log::info!(
            "Completed {} iterations, norm delta = {}",
            self.iteration,
            self.norm_delta
        );
    }
}

/// Writes into `scores` the PageRank vector of `graph` with damping factor
/// `damping`, iterating until the ℓ₁ norm of the difference between successive
/// approximations is smaller than `convergence`.
///
/// Returns the number of iterations performed.
///
/// # Errors
///
/// Returns an error if `convergence` is not a positive number.
///
/// # Panics
///
/// Panics if `damping` is not in the interval [0 . . 1) or if the length of
/// `scores` is not the number of nodes.
///
/// # Examples
///
/// ```
/// # fn main() -> anyhow::Result<()> {
/// use csr_kernels::graphs::CsrGraph;
/// use csr_kernels::rank::pagerank::pagerank;
///
/// let graph = CsrGraph::from_arcs([(0, 1), (1, 0)]);
/// let mut scores = vec![0.0; 2];
/// pagerank(&graph, &mut scores, 0.85, 1E-7)?;
/// assert!((scores[0] - 0.5).abs() < 1E-9);
/// assert!((scores[1] - 0.5).abs() < 1E-9);
/// # Ok(())
/// # }
/// ```
pub fn pagerank<G: BidirectionalGraph + Sync>(
    graph: &G,
    scores: &mut [f64],
    damping: f64,
    convergence: f64,
) -> anyhow::Result<usize> {
    let n = graph.num_nodes();
    assert_eq!(
        scores.len(),
        n,
        "The score slice length ({}) does not match the number of nodes ({n})",
        scores.len()
    );
    let predicate = preds::L1Norm::try_from(convergence)?;
    let mut pr = PageRank::new(graph);
    pr.alpha(damping).run(predicate);
    scores.copy_from_slice(pr.rank());
    Ok(pr.iterations())
}
