//! # study_rank
//!
//! Study-order prioritization for exam preparation.
//!
//! Given a curriculum, a list of topics from past exam papers and free-text
//! study notes, this library builds a directed topic co-occurrence graph
//! from the notes, ranks its topics with PageRank and reports a
//! multi-signal importance score next to the ranking.
//!
//! ## Features
//!
//! - **Deterministic**: equal inputs give bit-identical orders and scores
//! - **Unicode-aware**: whole-word topic matching over Unicode text
//! - **Configurable**: damping, convergence, scoring weights and context scope
//! - **Python bindings**: optional PyO3 module behind the `python` feature
//!
//! ## Example
//!
//! ```
//! use study_rank::{StudyPlanner, StudyRequest};
//!
//! let request = StudyRequest::new(
//!     ["sorting", "merge sort", "recursion"],
//!     ["merge sort"],
//!     "Sorting algorithms include merge sort. Merge sort uses recursion.",
//! );
//! let plan = StudyPlanner::new().plan(&request).unwrap();
//! assert_eq!(plan.study_order.len(), 3);
//! ```

pub mod errors;
pub mod export;
pub mod graph;
pub mod nlp;
pub mod pagerank;
pub mod pipeline;
pub mod scoring;
pub mod types;

#[cfg(feature = "python")]
pub mod python;

// Re-export commonly used types
pub use errors::{Result, StudyRankError};
pub use types::{
    ContextScope, NotesCorpus, RankedTopic, ScoringWeights, StudyOrder, StudyRankConfig, Topic,
    TopicSet,
};

// Re-export main functionality
pub use export::json::{topics_from_json, ResultExporter, StudyOrderDocument, StudyOrderEntry};
pub use graph::builder::{AdjacencyGraph, CooccurrenceGraphBuilder};
pub use nlp::{
    matcher::WholeWordMatcher,
    normalizer::{AcceptAll, TopicNormalizer, TopicValidator},
    tokenizer::Tokenizer,
};
pub use pagerank::{standard::StandardPageRank, PageRankResult};
pub use pipeline::{
    NoopObserver, PipelineObserver, StageReport, StageTimingObserver, StudyPlan, StudyPlanner,
    StudyRequest,
};
pub use scoring::importance::{ImportanceScore, ImportanceScorer, ImportanceScores};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(feature = "python")]
use pyo3::prelude::*;

/// Initialize the Python module
#[cfg(feature = "python")]
#[pymodule]
fn _rust(m: &Bound<'_, PyModule>) -> PyResult<()> {
    python::register_module(m)?;
    Ok(())
}
