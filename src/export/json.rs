//! JSON study order artifact
//!
//! The persisted format is fixed:
//!
//! ```json
//! {
//!     "study_order": [
//!         { "topic": "recursion", "score": 0.4744 },
//!         { "topic": "merge sort", "score": 0.3412 }
//!     ]
//! }
//! ```
//!
//! Entries are written in the order given (the ranking engine's descending
//! order); the exporter never re-sorts or filters.

use crate::errors::Result;
use crate::types::RankedTopic;
use serde::{Deserialize, Serialize};
use std::io::Write;

/// One record of the study order artifact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudyOrderEntry {
    pub topic: String,
    pub score: f64,
}

/// The study order artifact
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StudyOrderDocument {
    pub study_order: Vec<StudyOrderEntry>,
}

impl StudyOrderDocument {
    /// Parse a document strictly; every entry needs `topic` and `score`
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// The first `n` topics in study order
    pub fn top_topics(&self, n: usize) -> Vec<&str> {
        self.study_order
            .iter()
            .take(n)
            .map(|entry| entry.topic.as_str())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.study_order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.study_order.is_empty()
    }
}

/// Serializes ranked topics into [`StudyOrderDocument`]s
#[derive(Debug, Clone)]
pub struct ResultExporter {
    indent: usize,
}

impl Default for ResultExporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultExporter {
    /// Exporter writing 4-space indented JSON
    pub fn new() -> Self {
        Self { indent: 4 }
    }

    /// Builder method: pretty-print indent width (0 = compact)
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    /// Build the document, preserving input order exactly
    pub fn export(&self, ranked: &[RankedTopic]) -> StudyOrderDocument {
        StudyOrderDocument {
            study_order: ranked
                .iter()
                .map(|r| StudyOrderEntry {
                    topic: r.topic.to_string(),
                    score: r.score,
                })
                .collect(),
        }
    }

    /// Write a document as JSON to `writer`
    pub fn write_json<W: Write>(&self, document: &StudyOrderDocument, writer: W) -> Result<()> {
        if self.indent == 0 {
            serde_json::to_writer(writer, document)?;
        } else {
            let indent = vec![b' '; self.indent];
            let formatter = serde_json::ser::PrettyFormatter::with_indent(&indent);
            let mut serializer = serde_json::Serializer::with_formatter(writer, formatter);
            document.serialize(&mut serializer)?;
        }
        Ok(())
    }

    /// Render a document as a JSON string
    pub fn to_json_string(&self, document: &StudyOrderDocument) -> Result<String> {
        let mut buf = Vec::new();
        self.write_json(document, &mut buf)?;
        // serde_json only ever writes UTF-8
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

/// Read just the topic names from a study order artifact.
///
/// Lenient where [`StudyOrderDocument::from_json`] is strict: entries
/// without a string `topic` are skipped and a document without a
/// `study_order` array yields no topics. Malformed JSON is still an error.
pub fn topics_from_json(json: &str) -> Result<Vec<String>> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    let topics = match value.get("study_order").and_then(|v| v.as_array()) {
        Some(entries) => entries
            .iter()
            .filter_map(|entry| entry.get("topic").and_then(|t| t.as_str()))
            .map(str::to_string)
            .collect(),
        None => {
            tracing::warn!("study order document has no study_order array");
            Vec::new()
        }
    };
    Ok(topics)
}
