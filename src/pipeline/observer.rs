//! Pipeline observation hooks
//!
//! A [`PipelineObserver`] is notified at every stage boundary of a
//! [`StudyPlanner`](crate::pipeline::runner::StudyPlanner) run. Every method
//! has an empty default, so observers implement only what they need and
//! [`NoopObserver`] costs nothing.

use crate::graph::builder::AdjacencyGraph;
use crate::pagerank::PageRankResult;
use crate::scoring::importance::ImportanceScores;
use crate::types::TopicSet;
use std::time::{Duration, Instant};

pub const STAGE_NORMALIZE: &str = "normalize";
pub const STAGE_GRAPH: &str = "graph";
pub const STAGE_SCORE: &str = "score";
pub const STAGE_RANK: &str = "rank";
pub const STAGE_EXPORT: &str = "export";

/// Wall-clock timer for one stage
#[derive(Debug, Clone, Copy)]
pub struct StageClock {
    started: Instant,
}

impl StageClock {
    pub fn start() -> Self {
        Self {
            started: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}

/// What a stage reports when it finishes
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StageReport {
    elapsed: Duration,
    items: Option<usize>,
    nodes: Option<usize>,
    edges: Option<usize>,
    iterations: Option<usize>,
    converged: Option<bool>,
    residual: Option<f64>,
}

impl StageReport {
    pub fn new(elapsed: Duration) -> Self {
        Self {
            elapsed,
            ..Self::default()
        }
    }

    pub fn with_items(mut self, items: usize) -> Self {
        self.items = Some(items);
        self
    }

    pub fn with_graph(mut self, nodes: usize, edges: usize) -> Self {
        self.nodes = Some(nodes);
        self.edges = Some(edges);
        self
    }

    pub fn with_convergence(mut self, iterations: usize, converged: bool, residual: f64) -> Self {
        self.iterations = Some(iterations);
        self.converged = Some(converged);
        self.residual = Some(residual);
        self
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Number of items the stage produced (topics, scores, records)
    pub fn items(&self) -> Option<usize> {
        self.items
    }

    pub fn nodes(&self) -> Option<usize> {
        self.nodes
    }

    pub fn edges(&self) -> Option<usize> {
        self.edges
    }

    pub fn iterations(&self) -> Option<usize> {
        self.iterations
    }

    pub fn converged(&self) -> Option<bool> {
        self.converged
    }

    pub fn residual(&self) -> Option<f64> {
        self.residual
    }
}

/// Callbacks at each pipeline stage boundary
pub trait PipelineObserver {
    fn on_stage_start(&mut self, _stage: &'static str) {}

    fn on_stage_end(&mut self, _stage: &'static str, _report: &StageReport) {}

    /// Normalized curriculum and exam topics
    fn on_topics(&mut self, _curriculum: &TopicSet, _exam: &TopicSet) {}

    fn on_graph(&mut self, _graph: &AdjacencyGraph) {}

    fn on_importance(&mut self, _scores: &ImportanceScores) {}

    fn on_rank(&mut self, _result: &PageRankResult) {}
}

/// Ignores every callback
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl PipelineObserver for NoopObserver {}

/// Records the report of every stage in execution order
#[derive(Debug, Clone, Default)]
pub struct StageTimingObserver {
    reports: Vec<(&'static str, StageReport)>,
}

impl StageTimingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reports(&self) -> &[(&'static str, StageReport)] {
        &self.reports
    }

    /// Report for a stage, if it ran
    pub fn report(&self, stage: &str) -> Option<&StageReport> {
        self.reports
            .iter()
            .find(|(name, _)| *name == stage)
            .map(|(_, report)| report)
    }

    /// Sum of all stage durations
    pub fn total_elapsed(&self) -> Duration {
        self.reports.iter().map(|(_, r)| r.elapsed()).sum()
    }
}

impl PipelineObserver for StageTimingObserver {
    fn on_stage_end(&mut self, stage: &'static str, report: &StageReport) {
        self.reports.push((stage, report.clone()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_report_builders() {
        let report = StageReport::new(Duration::from_millis(3))
            .with_graph(4, 6)
            .with_convergence(18, true, 1e-7);
        assert_eq!(report.elapsed(), Duration::from_millis(3));
        assert_eq!(report.nodes(), Some(4));
        assert_eq!(report.edges(), Some(6));
        assert_eq!(report.iterations(), Some(18));
        assert_eq!(report.converged(), Some(true));
        assert!(report.items().is_none());
    }

    #[test]
    fn test_timing_observer_records_in_order() {
        let mut obs = StageTimingObserver::new();
        obs.on_stage_end(STAGE_GRAPH, &StageReport::new(Duration::from_millis(2)));
        obs.on_stage_end(STAGE_RANK, &StageReport::new(Duration::from_millis(5)));

        let names: Vec<&str> = obs.reports().iter().map(|(name, _)| *name).collect();
        assert_eq!(names, vec![STAGE_GRAPH, STAGE_RANK]);
        assert_eq!(obs.total_elapsed(), Duration::from_millis(7));
        assert!(obs.report(STAGE_SCORE).is_none());
    }
}
