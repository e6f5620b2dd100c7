//! JSON interface for batch planning
//!
//! Requests and results cross the Python boundary as JSON strings, so a
//! whole batch costs one call.

use crate::errors::StudyRankError;
use crate::export::json::{topics_from_json, StudyOrderEntry};
use crate::pipeline::runner::{StudyPlan, StudyPlanner, StudyRequest};
use crate::scoring::importance::ImportanceScore;
use crate::types::StudyRankConfig;
use pyo3::prelude::*;
use serde::{Deserialize, Serialize};

/// Input document from JSON: a study request plus an optional config
#[derive(Debug, Clone, Deserialize)]
pub struct JsonDocument {
    #[serde(flatten)]
    pub request: StudyRequest,
    #[serde(default)]
    pub config: Option<StudyRankConfig>,
}

/// Output from JSON interface
#[derive(Debug, Clone, Serialize)]
pub struct JsonResult {
    pub study_order: Vec<StudyOrderEntry>,
    /// The leading `config.top_n` topics for downstream collaborators
    pub top_topics: Vec<String>,
    pub importance: Vec<ImportanceScore>,
    pub converged: bool,
    pub iterations: usize,
}

impl From<StudyPlan> for JsonResult {
    fn from(plan: StudyPlan) -> Self {
        Self {
            top_topics: plan
                .downstream_topics()
                .into_iter()
                .map(|topic| topic.to_string())
                .collect(),
            converged: plan.ranking.converged,
            iterations: plan.ranking.iterations,
            importance: plan.importance.ranked().into_iter().cloned().collect(),
            study_order: plan.document.study_order,
        }
    }
}

fn to_py_err(err: StudyRankError) -> PyErr {
    pyo3::exceptions::PyValueError::new_err(err.to_string())
}

fn plan_document(doc: JsonDocument) -> Result<JsonResult, StudyRankError> {
    let config = doc.config.unwrap_or_default();
    let plan = StudyPlanner::with_config(config).plan(&doc.request)?;
    Ok(plan.into())
}

/// Plan a study order from a JSON request
///
/// Args:
///     json_input: JSON object with `curriculum`, `exam`, `notes` and an
///         optional `config`
///
/// Returns:
///     JSON string with the study order, importance breakdown and
///     convergence info
#[pyfunction]
#[pyo3(signature = (json_input))]
pub fn plan_from_json(json_input: &str) -> PyResult<String> {
    let doc: JsonDocument = serde_json::from_str(json_input)
        .map_err(|e| pyo3::exceptions::PyValueError::new_err(format!("Invalid JSON: {}", e)))?;

    let result = plan_document(doc).map_err(to_py_err)?;
    serde_json::to_string(&result)
        .map_err(|e| pyo3::exceptions::PyValueError::new_err(e.to_string()))
}

/// Plan study orders for an array of JSON requests
///
/// Returns:
///     JSON string with an array of results, in input order
#[pyfunction]
#[pyo3(signature = (json_input))]
pub fn plan_batch_from_json(json_input: &str) -> PyResult<String> {
    let docs: Vec<JsonDocument> = serde_json::from_str(json_input)
        .map_err(|e| pyo3::exceptions::PyValueError::new_err(format!("Invalid JSON: {}", e)))?;

    let results = docs
        .into_iter()
        .map(plan_document)
        .collect::<Result<Vec<JsonResult>, _>>()
        .map_err(to_py_err)?;

    serde_json::to_string(&results)
        .map_err(|e| pyo3::exceptions::PyValueError::new_err(e.to_string()))
}

/// Topic names of a persisted study order, in order
#[pyfunction]
#[pyo3(signature = (json_input))]
pub fn read_study_order(json_input: &str) -> PyResult<Vec<String>> {
    topics_from_json(json_input).map_err(to_py_err)
}
