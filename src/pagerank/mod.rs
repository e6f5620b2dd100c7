//! PageRank over the topic graph
//!
//! [`standard::StandardPageRank`] computes the stationary distribution;
//! [`PageRankResult`] carries the per-node scores together with the
//! convergence diagnostics.

pub mod standard;

use crate::errors::{Result, StudyRankError};
use crate::graph::builder::AdjacencyGraph;
use crate::types::StudyOrder;

/// Result of a PageRank run
#[derive(Debug, Clone, PartialEq)]
pub struct PageRankResult {
    /// Score per node ID, in node enumeration order
    pub scores: Vec<f64>,
    /// Whether the tolerance was reached before the iteration cap
    pub converged: bool,
    /// Iterations performed
    pub iterations: usize,
    /// Total absolute change of the last iteration
    pub delta: f64,
}

impl PageRankResult {
    /// The result for an empty graph
    pub fn empty() -> Self {
        Self {
            scores: Vec::new(),
            converged: true,
            iterations: 0,
            delta: 0.0,
        }
    }

    /// Score for a node ID
    pub fn score(&self, node_id: u32) -> Option<f64> {
        self.scores.get(node_id as usize).copied()
    }

    /// Escalate non-convergence into an error.
    ///
    /// The engine always returns its best-effort scores; callers that need
    /// the tolerance to have been reached use this to fail instead.
    pub fn require_converged(self) -> Result<Self> {
        if self.converged {
            Ok(self)
        } else {
            Err(StudyRankError::convergence_failure(self.iterations, self.delta))
        }
    }

    /// Pair scores with the graph's topics and sort into a study order.
    ///
    /// Ties keep node enumeration order. Nodes without a score (a graph
    /// other than the one ranked) are left out.
    pub fn to_study_order(&self, graph: &AdjacencyGraph) -> StudyOrder {
        StudyOrder::from_scores(graph.nodes().filter_map(|(id, node)| {
            self.score(id).map(|score| (node.topic.clone(), score))
        }))
    }
}
