//! Pipeline runner: Normalize → Build → Score → Rank → Export.
//!
//! [`StudyPlanner::plan`] takes a [`StudyRequest`] holding the raw
//! candidates and notes and returns a [`StudyPlan`] holding every stage's
//! output. Stages hand their results to each other as values; nothing is
//! read from or written to the file system.
//!
//! Importance scores and the PageRank order are two independent views of the
//! same topics. Scoring never reorders the study order.

use crate::errors::Result;
use crate::export::json::{ResultExporter, StudyOrderDocument};
use crate::graph::builder::{AdjacencyGraph, CooccurrenceGraphBuilder};
use crate::nlp::normalizer::{split_candidates, AcceptAll, TopicNormalizer, TopicValidator};
use crate::pagerank::standard::StandardPageRank;
use crate::pagerank::PageRankResult;
use crate::pipeline::observer::{
    NoopObserver, PipelineObserver, StageClock, StageReport, STAGE_EXPORT, STAGE_GRAPH,
    STAGE_NORMALIZE, STAGE_RANK, STAGE_SCORE,
};
use crate::scoring::importance::{ImportanceScorer, ImportanceScores};
use crate::types::{NotesCorpus, StudyOrder, StudyRankConfig, Topic, TopicSet};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use tracing::instrument;

/// Close a stage: log it and hand the report to the observer.
fn finish_stage(observer: &mut impl PipelineObserver, stage: &'static str, report: &StageReport) {
    tracing::debug!(stage, elapsed = ?report.elapsed(), "pipeline stage finished");
    observer.on_stage_end(stage, report);
}

// ============================================================================
// StudyRequest
// ============================================================================

/// Raw inputs of one run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StudyRequest {
    /// Candidate topic strings from the curriculum document
    #[serde(alias = "cdp")]
    pub curriculum: Vec<String>,
    /// Candidate topic strings from the past-exam document
    #[serde(default, alias = "pyq")]
    pub exam: Vec<String>,
    /// Notes text
    #[serde(default)]
    pub notes: String,
}

impl StudyRequest {
    /// Request from already-split candidates
    pub fn new<C, E, S, T>(curriculum: C, exam: E, notes: impl Into<String>) -> Self
    where
        C: IntoIterator<Item = S>,
        S: Into<String>,
        E: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            curriculum: curriculum.into_iter().map(Into::into).collect(),
            exam: exam.into_iter().map(Into::into).collect(),
            notes: notes.into(),
        }
    }

    /// Request from whole document texts.
    ///
    /// Curriculum and exam texts are split into candidates on `,` `.` `(`
    /// `)` and newlines; normalization happens when the request is planned.
    pub fn from_documents(curriculum_text: &str, exam_text: &str, notes_text: &str) -> Self {
        Self::new(
            split_candidates(curriculum_text),
            split_candidates(exam_text),
            notes_text,
        )
    }
}

// ============================================================================
// StudyPlan
// ============================================================================

/// Everything one run produced
#[derive(Debug, Clone)]
pub struct StudyPlan {
    /// Normalized, validated curriculum topics
    pub curriculum: TopicSet,
    /// Normalized exam topics
    pub exam: TopicSet,
    /// Co-occurrence graph over curriculum topics
    pub graph: AdjacencyGraph,
    /// Importance per curriculum topic
    pub importance: ImportanceScores,
    /// Raw PageRank output, indexed by graph node ID
    pub ranking: PageRankResult,
    /// Graph nodes by descending PageRank score
    pub study_order: StudyOrder,
    /// The exported study order artifact
    pub document: StudyOrderDocument,
    /// How many leading topics go to downstream collaborators
    pub top_n: usize,
}

impl StudyPlan {
    /// Whether PageRank converged before the iteration cap
    pub fn converged(&self) -> bool {
        self.ranking.converged
    }

    /// The first `n` topics of the study order
    pub fn top_topics(&self, n: usize) -> Vec<&Topic> {
        self.study_order.top_topics(n)
    }

    /// The leading `top_n` topics handed to downstream collaborators
    pub fn downstream_topics(&self) -> Vec<&Topic> {
        self.study_order.top_topics(self.top_n)
    }

    /// Human-readable report: study order, importance, dependencies
    pub fn summary(&self) -> String {
        let mut out = String::new();

        let _ = writeln!(out, "Final Study Order (PageRank)");
        for (i, ranked) in self.study_order.iter().enumerate() {
            let _ = writeln!(out, "{}. {} (score: {:.4})", i + 1, ranked.topic, ranked.score);
        }

        let _ = writeln!(out, "\nMost Important Topics (mentions, exam topics, term weight)");
        for entry in self.importance.ranked() {
            let _ = writeln!(out, "{}: {:.2}", entry.topic, entry.score);
        }

        let _ = writeln!(out, "\nTopic Dependencies");
        for (topic, targets) in self.graph.adjacency_list() {
            let targets: Vec<&str> = targets.iter().map(|t| t.as_str()).collect();
            let _ = writeln!(out, "{}: {}", topic, targets.join(", "));
        }

        out
    }
}

// ============================================================================
// StudyPlanner
// ============================================================================

/// Runs the study-order pipeline
#[derive(Debug, Clone)]
pub struct StudyPlanner<V = AcceptAll> {
    config: StudyRankConfig,
    normalizer: TopicNormalizer<V>,
    exporter: ResultExporter,
}

impl Default for StudyPlanner<AcceptAll> {
    fn default() -> Self {
        Self::new()
    }
}

impl StudyPlanner<AcceptAll> {
    /// Planner with default config that accepts every candidate
    pub fn new() -> Self {
        Self::with_config(StudyRankConfig::default())
    }

    /// Planner with custom config
    pub fn with_config(config: StudyRankConfig) -> Self {
        Self {
            config,
            normalizer: TopicNormalizer::new(),
            exporter: ResultExporter::new(),
        }
    }
}

impl<V: TopicValidator> StudyPlanner<V> {
    /// Filter curriculum candidates through `validator`.
    ///
    /// Exam candidates are only used for membership tests and are not
    /// validated.
    pub fn with_validator<W: TopicValidator>(self, validator: W) -> StudyPlanner<W> {
        StudyPlanner {
            config: self.config,
            normalizer: TopicNormalizer::with_validator(validator),
            exporter: self.exporter,
        }
    }

    pub fn config(&self) -> &StudyRankConfig {
        &self.config
    }

    /// Run the pipeline
    pub fn plan(&self, request: &StudyRequest) -> Result<StudyPlan> {
        let mut obs = NoopObserver;
        self.plan_with_observer(request, &mut obs)
    }

    /// Run the pipeline, notifying `observer` at each stage boundary
    #[instrument(skip_all, fields(curriculum = request.curriculum.len(), exam = request.exam.len()))]
    pub fn plan_with_observer(
        &self,
        request: &StudyRequest,
        observer: &mut impl PipelineObserver,
    ) -> Result<StudyPlan> {
        self.config.validate()?;

        // Stage 1: Normalize
        observer.on_stage_start(STAGE_NORMALIZE);
        let clock = StageClock::start();
        let curriculum = self.normalizer.normalize_all(&request.curriculum);
        let exam = TopicNormalizer::new().normalize_all(&request.exam);
        let notes = NotesCorpus::new(&request.notes);
        let report = StageReport::new(clock.elapsed()).with_items(curriculum.len());
        finish_stage(observer, STAGE_NORMALIZE, &report);
        observer.on_topics(&curriculum, &exam);

        // Stage 2: Build graph
        observer.on_stage_start(STAGE_GRAPH);
        let clock = StageClock::start();
        let graph = CooccurrenceGraphBuilder::from_config(&self.config).build(&curriculum, &notes)?;
        let report =
            StageReport::new(clock.elapsed()).with_graph(graph.node_count(), graph.edge_count());
        finish_stage(observer, STAGE_GRAPH, &report);
        observer.on_graph(&graph);

        // Stage 3: Score importance
        observer.on_stage_start(STAGE_SCORE);
        let clock = StageClock::start();
        let importance =
            ImportanceScorer::with_weights(self.config.weights).score(&curriculum, &notes, &exam)?;
        let report = StageReport::new(clock.elapsed()).with_items(importance.len());
        finish_stage(observer, STAGE_SCORE, &report);
        observer.on_importance(&importance);

        // Stage 4: Rank
        observer.on_stage_start(STAGE_RANK);
        let clock = StageClock::start();
        let ranking = StandardPageRank::from_config(&self.config).run(&graph)?;
        let study_order = ranking.to_study_order(&graph);
        let report = StageReport::new(clock.elapsed())
            .with_items(study_order.len())
            .with_convergence(ranking.iterations, ranking.converged, ranking.delta);
        finish_stage(observer, STAGE_RANK, &report);
        observer.on_rank(&ranking);

        // Stage 5: Export
        observer.on_stage_start(STAGE_EXPORT);
        let clock = StageClock::start();
        let document = self.exporter.export(study_order.as_slice());
        let report = StageReport::new(clock.elapsed()).with_items(document.len());
        finish_stage(observer, STAGE_EXPORT, &report);

        tracing::info!(
            topics = curriculum.len(),
            ranked = study_order.len(),
            converged = ranking.converged,
            "study order planned"
        );

        Ok(StudyPlan {
            curriculum,
            exam,
            graph,
            importance,
            ranking,
            study_order,
            document,
            top_n: self.config.top_n,
        })
    }

    /// Run the pipeline and render the study order as JSON
    pub fn plan_to_json(&self, request: &StudyRequest) -> Result<String> {
        let plan = self.plan(request)?;
        self.exporter.to_json_string(&plan.document)
    }
}
