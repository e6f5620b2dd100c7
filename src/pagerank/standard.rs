//! Standard PageRank by power iteration
//!
//! ```text
//! PR(v) = (1-α)/N + α * Σ PR(u)/out(u)  over predecessors u of v
//!                 + α * D/N              D = total mass on dangling nodes
//! ```
//!
//! Dangling nodes (no successors) spread their mass uniformly over every
//! node, which keeps the scores summing to 1. Iteration stops when the
//! total absolute change drops below `N * threshold`, or at the iteration
//! cap; hitting the cap is reported on the result, not raised. Impossible
//! parameters (damping outside [0, 1], zero iterations, non-positive
//! tolerance) are rejected before iterating.

use crate::errors::Result;
use crate::graph::builder::AdjacencyGraph;
use crate::pagerank::PageRankResult;
use crate::types::{validate_pagerank_params, StudyOrder, StudyRankConfig};
use rayon::prelude::*;

/// Graphs with at least this many nodes update nodes in parallel.
const PARALLEL_THRESHOLD: usize = 1000;

/// Uniform-teleport PageRank
#[derive(Debug, Clone)]
pub struct StandardPageRank {
    damping: f64,
    max_iterations: usize,
    threshold: f64,
}

impl Default for StandardPageRank {
    fn default() -> Self {
        Self::new()
    }
}

impl StandardPageRank {
    /// α = 0.85, 100 iterations, tolerance 1e-6
    pub fn new() -> Self {
        Self {
            damping: 0.85,
            max_iterations: 100,
            threshold: 1e-6,
        }
    }

    /// Take damping, iteration cap and tolerance from a run configuration
    pub fn from_config(config: &StudyRankConfig) -> Self {
        Self {
            damping: config.damping,
            max_iterations: config.max_iterations,
            threshold: config.convergence_threshold,
        }
    }

    pub fn with_damping(mut self, damping: f64) -> Self {
        self.damping = damping;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Reject damping outside [0, 1], a zero iteration cap or a
    /// non-positive tolerance
    pub fn validate(&self) -> Result<()> {
        validate_pagerank_params(self.damping, self.max_iterations, self.threshold)
    }

    /// Run PageRank and sort the result into a study order
    pub fn rank(&self, graph: &AdjacencyGraph) -> Result<StudyOrder> {
        Ok(self.run(graph)?.to_study_order(graph))
    }

    /// Run PageRank, returning raw per-node scores
    pub fn run(&self, graph: &AdjacencyGraph) -> Result<PageRankResult> {
        self.validate()?;

        let n = graph.node_count();
        if n == 0 {
            return Ok(PageRankResult::empty());
        }

        let out_degree: Vec<usize> = (0..n as u32).map(|id| graph.out_degree(id)).collect();
        let mut predecessors: Vec<Vec<u32>> = vec![Vec::new(); n];
        for (id, node) in graph.nodes() {
            for &succ in &node.successors {
                predecessors[succ as usize].push(id);
            }
        }

        let alpha = self.damping;
        let n_f = n as f64;
        let mut ranks = vec![1.0 / n_f; n];
        let mut delta: f64 = 0.0;
        let mut converged = false;
        let mut iterations = 0;

        for _ in 0..self.max_iterations {
            iterations += 1;

            let dangling_sum: f64 = ranks
                .iter()
                .zip(&out_degree)
                .filter(|(_, deg)| **deg == 0)
                .map(|(rank, _)| rank)
                .sum();
            let base = (1.0 - alpha) / n_f + alpha * dangling_sum / n_f;

            let update = |v: usize| -> f64 {
                let incoming: f64 = predecessors[v]
                    .iter()
                    .map(|&u| ranks[u as usize] / out_degree[u as usize] as f64)
                    .sum();
                base + alpha * incoming
            };
            let new_ranks: Vec<f64> = if n >= PARALLEL_THRESHOLD {
                (0..n).into_par_iter().map(update).collect()
            } else {
                (0..n).map(update).collect()
            };

            delta = new_ranks
                .iter()
                .zip(&ranks)
                .map(|(new, old)| (new - old).abs())
                .sum();
            ranks = new_ranks;

            if delta < n_f * self.threshold {
                converged = true;
                break;
            }
        }

        if !converged {
            tracing::warn!(
                iterations,
                delta,
                "PageRank hit the iteration cap before converging"
            );
        }
        tracing::debug!(nodes = n, iterations, converged, "PageRank finished");

        Ok(PageRankResult {
            scores: ranks,
            converged,
            iterations,
            delta,
        })
    }
}
