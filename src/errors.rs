//! Error types for study_rank
//!
//! The core is mostly total: empty inputs produce empty results and
//! non-convergence is reported on the result. Errors are reserved for
//! configuration mistakes and the serialization boundary.

use thiserror::Error;

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, StudyRankError>;

/// Main error type for study_rank
#[derive(Error, Debug, Clone)]
pub enum StudyRankError {
    /// Input is empty where the caller required content
    #[error("Empty input: {message}")]
    EmptyInput { message: String },

    /// The topic set exceeds the configured bound for the quadratic pair scan
    #[error("Too many topics: {count} exceeds the limit of {limit}")]
    TooManyTopics { count: usize, limit: usize },

    /// PageRank did not converge within the maximum iterations.
    /// The ranking engine reports non-convergence on its result; this is
    /// raised only through `PageRankResult::require_converged`.
    #[error("Convergence failure after {iterations} iterations (delta={delta:.6})")]
    ConvergenceFailure { iterations: usize, delta: f64 },

    /// Configuration validation failed
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// A topic pattern failed to compile
    #[error("Pattern error for topic '{topic}': {message}")]
    Pattern { topic: String, message: String },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {message}")]
    Serialization { message: String },
}

impl StudyRankError {
    /// Create an empty input error
    pub fn empty_input(message: impl Into<String>) -> Self {
        Self::EmptyInput {
            message: message.into(),
        }
    }

    /// Create a too-many-topics error
    pub fn too_many_topics(count: usize, limit: usize) -> Self {
        Self::TooManyTopics { count, limit }
    }

    /// Create a convergence failure error
    pub fn convergence_failure(iterations: usize, delta: f64) -> Self {
        Self::ConvergenceFailure { iterations, delta }
    }

    /// Create an invalid config error
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create a pattern error
    pub fn pattern(topic: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Pattern {
            topic: topic.into(),
            message: message.into(),
        }
    }

    /// Create a serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }

    /// Check if this error indicates non-convergence
    pub fn is_convergence_failure(&self) -> bool {
        matches!(self, Self::ConvergenceFailure { .. })
    }
}

impl From<serde_json::Error> for StudyRankError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(err.to_string())
    }
}
