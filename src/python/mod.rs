//! Python bindings via PyO3
//!
//! This module provides the Python interface for study_rank.

pub mod json;
pub mod native;

use pyo3::prelude::*;

/// Register all Python classes and functions
pub fn register_module(m: &Bound<'_, PyModule>) -> PyResult<()> {
    // Version
    m.add("__version__", env!("CARGO_PKG_VERSION"))?;

    // Native interface classes
    m.add_class::<native::PyRankedTopic>()?;
    m.add_class::<native::PyImportance>()?;
    m.add_class::<native::PyStudyPlan>()?;
    m.add_class::<native::PyStudyPlanner>()?;
    m.add_function(wrap_pyfunction!(native::split_candidates, m)?)?;

    // JSON interface functions
    m.add_function(wrap_pyfunction!(json::plan_from_json, m)?)?;
    m.add_function(wrap_pyfunction!(json::plan_batch_from_json, m)?)?;
    m.add_function(wrap_pyfunction!(json::read_study_order, m)?)?;

    Ok(())
}
