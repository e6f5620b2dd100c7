//! Native Python interface
//!
//! Direct Python classes for interactive use where Python↔Rust overhead
//! is negligible compared to planning time.

use crate::nlp::normalizer;
use crate::pipeline::runner::{StudyPlan, StudyPlanner, StudyRequest};
use crate::scoring::importance::ImportanceScore;
use crate::types::{ContextScope, RankedTopic, ScoringWeights, StudyRankConfig};
use pyo3::prelude::*;

/// A topic with its PageRank score
#[pyclass(name = "RankedTopic")]
#[derive(Clone)]
pub struct PyRankedTopic {
    #[pyo3(get)]
    pub topic: String,
    #[pyo3(get)]
    pub score: f64,
    #[pyo3(get)]
    pub rank: usize,
}

#[pymethods]
impl PyRankedTopic {
    fn __repr__(&self) -> String {
        format!(
            "RankedTopic(topic='{}', score={:.4}, rank={})",
            self.topic, self.score, self.rank
        )
    }

    fn __str__(&self) -> String {
        self.topic.clone()
    }
}

impl PyRankedTopic {
    fn from_ranked(rank: usize, ranked: &RankedTopic) -> Self {
        Self {
            topic: ranked.topic.to_string(),
            score: ranked.score,
            rank,
        }
    }
}

/// Importance breakdown of one topic
#[pyclass(name = "Importance")]
#[derive(Clone)]
pub struct PyImportance {
    #[pyo3(get)]
    pub topic: String,
    #[pyo3(get)]
    pub mentions: usize,
    #[pyo3(get)]
    pub exam_bonus: f64,
    #[pyo3(get)]
    pub term_weight: f64,
    #[pyo3(get)]
    pub score: f64,
}

#[pymethods]
impl PyImportance {
    fn __repr__(&self) -> String {
        format!(
            "Importance(topic='{}', score={:.2}, mentions={})",
            self.topic, self.score, self.mentions
        )
    }
}

impl From<&ImportanceScore> for PyImportance {
    fn from(entry: &ImportanceScore) -> Self {
        Self {
            topic: entry.topic.to_string(),
            mentions: entry.mentions,
            exam_bonus: entry.exam_bonus,
            term_weight: entry.term_weight,
            score: entry.score,
        }
    }
}

/// Result of a planning run
#[pyclass(name = "StudyPlan")]
#[derive(Clone)]
pub struct PyStudyPlan {
    #[pyo3(get)]
    pub study_order: Vec<PyRankedTopic>,
    #[pyo3(get)]
    pub top_topics: Vec<String>,
    #[pyo3(get)]
    pub importance: Vec<PyImportance>,
    #[pyo3(get)]
    pub dependencies: Vec<(String, Vec<String>)>,
    #[pyo3(get)]
    pub converged: bool,
    #[pyo3(get)]
    pub iterations: usize,
    json: String,
    summary: String,
}

#[pymethods]
impl PyStudyPlan {
    fn __repr__(&self) -> String {
        format!(
            "StudyPlan(topics={}, converged={}, iterations={})",
            self.study_order.len(),
            self.converged,
            self.iterations
        )
    }

    fn __len__(&self) -> usize {
        self.study_order.len()
    }

    fn __getitem__(&self, idx: usize) -> PyResult<PyRankedTopic> {
        self.study_order
            .get(idx)
            .cloned()
            .ok_or_else(|| pyo3::exceptions::PyIndexError::new_err("index out of range"))
    }

    /// Study order as a list of (topic, score) tuples
    fn as_tuples(&self) -> Vec<(String, f64)> {
        self.study_order
            .iter()
            .map(|r| (r.topic.clone(), r.score))
            .collect()
    }

    /// The persisted `{"study_order": [...]}` document
    fn to_json(&self) -> String {
        self.json.clone()
    }

    /// Human-readable report
    fn summary(&self) -> String {
        self.summary.clone()
    }
}

impl PyStudyPlan {
    fn from_plan(plan: &StudyPlan, json: String) -> Self {
        Self {
            study_order: plan
                .study_order
                .iter()
                .enumerate()
                .map(|(i, ranked)| PyRankedTopic::from_ranked(i + 1, ranked))
                .collect(),
            top_topics: plan
                .downstream_topics()
                .into_iter()
                .map(|topic| topic.to_string())
                .collect(),
            importance: plan.importance.ranked().into_iter().map(PyImportance::from).collect(),
            dependencies: plan
                .graph
                .adjacency_list()
                .into_iter()
                .map(|(topic, targets)| {
                    (
                        topic.to_string(),
                        targets.iter().map(|t| t.to_string()).collect(),
                    )
                })
                .collect(),
            converged: plan.ranking.converged,
            iterations: plan.ranking.iterations,
            json,
            summary: plan.summary(),
        }
    }
}

/// Split a document into raw topic candidates
#[pyfunction]
#[pyo3(signature = (text))]
pub fn split_candidates(text: &str) -> Vec<String> {
    normalizer::split_candidates(text)
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Study-order planner
#[pyclass(name = "StudyPlanner")]
#[derive(Clone)]
pub struct PyStudyPlanner {
    config: StudyRankConfig,
}

#[pymethods]
impl PyStudyPlanner {
    #[new]
    #[pyo3(signature = (
        damping=0.85,
        max_iterations=100,
        convergence_threshold=1e-6,
        context="corpus",
        mention_weight=1.5,
        exam_bonus=10.0,
        term_weight=5.0,
        max_topics=None,
        top_n=10
    ))]
    #[allow(clippy::too_many_arguments)]
    fn new(
        damping: f64,
        max_iterations: usize,
        convergence_threshold: f64,
        context: &str,
        mention_weight: f64,
        exam_bonus: f64,
        term_weight: f64,
        max_topics: Option<usize>,
        top_n: usize,
    ) -> PyResult<Self> {
        let context: ContextScope = context
            .parse()
            .map_err(|e: crate::errors::StudyRankError| {
                pyo3::exceptions::PyValueError::new_err(e.to_string())
            })?;
        let config = StudyRankConfig {
            damping,
            max_iterations,
            convergence_threshold,
            weights: ScoringWeights {
                mention: mention_weight,
                exam_bonus,
                term_weight,
            },
            context,
            max_topics,
            top_n,
        };
        config
            .validate()
            .map_err(|e| pyo3::exceptions::PyValueError::new_err(e.to_string()))?;
        Ok(Self { config })
    }

    /// Plan from already-split topic lists
    #[pyo3(signature = (curriculum, notes, exam=None))]
    fn plan(
        &self,
        curriculum: Vec<String>,
        notes: &str,
        exam: Option<Vec<String>>,
    ) -> PyResult<PyStudyPlan> {
        let request = StudyRequest::new(curriculum, exam.unwrap_or_default(), notes);
        self.run(&request)
    }

    /// Plan from whole curriculum, exam and notes documents
    #[pyo3(signature = (curriculum_text, exam_text, notes_text))]
    fn plan_documents(
        &self,
        curriculum_text: &str,
        exam_text: &str,
        notes_text: &str,
    ) -> PyResult<PyStudyPlan> {
        let request = StudyRequest::from_documents(curriculum_text, exam_text, notes_text);
        self.run(&request)
    }

    fn __repr__(&self) -> String {
        format!(
            "StudyPlanner(damping={}, context={:?})",
            self.config.damping, self.config.context
        )
    }
}

impl PyStudyPlanner {
    fn run(&self, request: &StudyRequest) -> PyResult<PyStudyPlan> {
        let planner = StudyPlanner::with_config(self.config.clone());
        let plan = planner
            .plan(request)
            .map_err(|e| pyo3::exceptions::PyValueError::new_err(e.to_string()))?;
        let json = crate::export::json::ResultExporter::new()
            .to_json_string(&plan.document)
            .map_err(|e| pyo3::exceptions::PyValueError::new_err(e.to_string()))?;
        Ok(PyStudyPlan::from_plan(&plan, json))
    }
}
