//! Core types for study_rank
//!
//! This module defines the data model shared by every stage: normalized
//! topics and topic sets, the notes corpus, ranked output and the run
//! configuration.

use crate::errors::{Result, StudyRankError};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Deref;

// ============================================================================
// Topic
// ============================================================================

/// A normalized topic: lowercase, trimmed and never empty.
///
/// Identity is exact string equality after normalization, so `" Merge Sort "`
/// and `"merge sort"` are the same topic.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Topic(String);

impl Topic {
    /// Normalize a raw string into a topic.
    ///
    /// Returns `None` when nothing is left after trimming.
    pub fn new(raw: &str) -> Option<Self> {
        let normalized = raw.trim().to_lowercase();
        if normalized.is_empty() {
            None
        } else {
            Some(Self(normalized))
        }
    }

    /// The normalized text
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the topic, returning the normalized text
    pub fn into_string(self) -> String {
        self.0
    }
}

impl Deref for Topic {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Topic {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::borrow::Borrow<str> for Topic {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Topic {
    type Error = StudyRankError;

    fn try_from(value: String) -> Result<Self> {
        Topic::new(&value)
            .ok_or_else(|| StudyRankError::empty_input("topic is empty after normalization"))
    }
}

impl From<Topic> for String {
    fn from(topic: Topic) -> Self {
        topic.0
    }
}

// ============================================================================
// Topic Set
// ============================================================================

/// An insertion-ordered set of unique topics.
///
/// Iteration follows discovery order (first insertion wins), which is the
/// order the graph builder enumerates candidate pairs in and therefore the
/// tie-break order of the final ranking.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TopicSet {
    topics: Vec<Topic>,
    index: FxHashMap<Topic, usize>,
}

impl TopicSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a set with pre-allocated capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            topics: Vec::with_capacity(capacity),
            index: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
        }
    }

    /// Insert a topic, returning `false` if it was already present
    pub fn insert(&mut self, topic: Topic) -> bool {
        if self.index.contains_key(&topic) {
            return false;
        }
        self.index.insert(topic.clone(), self.topics.len());
        self.topics.push(topic);
        true
    }

    /// Normalize and insert a raw string.
    ///
    /// Strings that normalize to nothing are skipped and report `false`.
    pub fn insert_raw(&mut self, raw: &str) -> bool {
        match Topic::new(raw) {
            Some(topic) => self.insert(topic),
            None => false,
        }
    }

    /// Membership test on already-normalized text
    pub fn contains(&self, topic: &str) -> bool {
        self.index.contains_key(topic)
    }

    /// Discovery position of a topic
    pub fn position(&self, topic: &str) -> Option<usize> {
        self.index.get(topic).copied()
    }

    /// Topic at a discovery position
    pub fn get(&self, idx: usize) -> Option<&Topic> {
        self.topics.get(idx)
    }

    /// Number of topics
    pub fn len(&self) -> usize {
        self.topics.len()
    }

    /// Check if the set is empty
    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }

    /// Iterate in discovery order
    pub fn iter(&self) -> std::slice::Iter<'_, Topic> {
        self.topics.iter()
    }

    /// Topics as a slice in discovery order
    pub fn as_slice(&self) -> &[Topic] {
        &self.topics
    }
}

impl FromIterator<Topic> for TopicSet {
    fn from_iter<I: IntoIterator<Item = Topic>>(iter: I) -> Self {
        let mut set = TopicSet::new();
        for topic in iter {
            set.insert(topic);
        }
        set
    }
}

impl<'a> IntoIterator for &'a TopicSet {
    type Item = &'a Topic;
    type IntoIter = std::slice::Iter<'a, Topic>;

    fn into_iter(self) -> Self::IntoIter {
        self.topics.iter()
    }
}

impl Serialize for TopicSet {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.topics.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for TopicSet {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw: Vec<String> = Vec::deserialize(deserializer)?;
        let mut set = TopicSet::with_capacity(raw.len());
        for item in &raw {
            set.insert_raw(item);
        }
        Ok(set)
    }
}

// ============================================================================
// Notes Corpus
// ============================================================================

/// The free-form study notes, lowercased once on construction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct NotesCorpus(String);

impl NotesCorpus {
    /// Wrap notes text, lowercasing it
    pub fn new(text: &str) -> Self {
        Self(text.to_lowercase())
    }

    /// The lowercase text
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Check if the notes are empty or whitespace only
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl From<String> for NotesCorpus {
    fn from(text: String) -> Self {
        Self::new(&text)
    }
}

impl From<NotesCorpus> for String {
    fn from(notes: NotesCorpus) -> Self {
        notes.0
    }
}

// ============================================================================
// Ranked Output
// ============================================================================

/// A topic with its stationary-distribution score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedTopic {
    pub topic: Topic,
    pub score: f64,
}

impl RankedTopic {
    pub fn new(topic: Topic, score: f64) -> Self {
        Self { topic, score }
    }
}

/// Topics ordered by descending rank score.
///
/// Exactly equal scores keep the order in which the graph enumerated its
/// nodes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StudyOrder {
    entries: Vec<RankedTopic>,
}

impl StudyOrder {
    /// Sort `(topic, score)` pairs given in node enumeration order.
    pub fn from_scores(scored: impl IntoIterator<Item = (Topic, f64)>) -> Self {
        let mut entries: Vec<RankedTopic> = scored
            .into_iter()
            .map(|(topic, score)| RankedTopic::new(topic, score))
            .collect();
        // sort_by is stable, which is what preserves enumeration order on ties
        entries.sort_by(|a, b| b.score.total_cmp(&a.score));
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RankedTopic> {
        self.entries.iter()
    }

    pub fn as_slice(&self) -> &[RankedTopic] {
        &self.entries
    }

    /// Score for a topic, if it is ranked
    pub fn score_of(&self, topic: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|entry| entry.topic.as_str() == topic)
            .map(|entry| entry.score)
    }

    /// 1-indexed position of a topic in the order
    pub fn position_of(&self, topic: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|entry| entry.topic.as_str() == topic)
            .map(|idx| idx + 1)
    }

    /// The first `n` topics
    pub fn top_topics(&self, n: usize) -> Vec<&Topic> {
        self.entries.iter().take(n).map(|entry| &entry.topic).collect()
    }

    /// Sum of all scores (1.0 for a non-empty ranking)
    pub fn total_score(&self) -> f64 {
        self.entries.iter().map(|entry| entry.score).sum()
    }

    pub fn into_vec(self) -> Vec<RankedTopic> {
        self.entries
    }
}

impl<'a> IntoIterator for &'a StudyOrder {
    type Item = &'a RankedTopic;
    type IntoIter = std::slice::Iter<'a, RankedTopic>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

// ============================================================================
// Context Scope
// ============================================================================

/// Which part of the notes counts as "the context of topic A" when deciding
/// whether an edge A→B exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContextScope {
    /// A→B iff B occurs anywhere in the notes (A ≠ B)
    #[default]
    Corpus,
    /// A→B iff some sentence mentions A and then B
    Sentence,
}

impl std::str::FromStr for ContextScope {
    type Err = StudyRankError;

    fn from_str(value: &str) -> Result<Self> {
        match value.to_lowercase().as_str() {
            "corpus" | "document" => Ok(ContextScope::Corpus),
            "sentence" => Ok(ContextScope::Sentence),
            other => Err(StudyRankError::invalid_config(format!(
                "unknown context scope '{}'",
                other
            ))),
        }
    }
}

// ============================================================================
// Scoring Weights
// ============================================================================

/// Linear weights of the importance score.
///
/// `score = mentions * mention + exam_bonus (if in exam set) + term_weight * term_weight`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    /// Multiplier on the whole-word mention count
    #[serde(default = "default_mention_weight")]
    pub mention: f64,
    /// Flat bonus for topics that also appear in the exam topic set
    #[serde(default = "default_exam_bonus")]
    pub exam_bonus: f64,
    /// Multiplier on the single-document term weight
    #[serde(default = "default_term_weight")]
    pub term_weight: f64,
}

fn default_mention_weight() -> f64 {
    1.5
}
fn default_exam_bonus() -> f64 {
    10.0
}
fn default_term_weight() -> f64 {
    5.0
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            mention: default_mention_weight(),
            exam_bonus: default_exam_bonus(),
            term_weight: default_term_weight(),
        }
    }
}

impl ScoringWeights {
    /// Reject negative or non-finite weights
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("mention", self.mention),
            ("exam_bonus", self.exam_bonus),
            ("term_weight", self.term_weight),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(StudyRankError::invalid_config(format!(
                    "{} weight must be a finite number >= 0, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

// ============================================================================
// Configuration
// ============================================================================

/// Check PageRank parameters: damping in [0, 1], at least one iteration and
/// a positive tolerance.
pub fn validate_pagerank_params(damping: f64, max_iterations: usize, threshold: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&damping) {
        return Err(StudyRankError::invalid_config(format!(
            "damping must be between 0 and 1, got {}",
            damping
        )));
    }

    if max_iterations == 0 {
        return Err(StudyRankError::invalid_config("max_iterations must be > 0"));
    }

    if threshold.is_nan() || threshold <= 0.0 {
        return Err(StudyRankError::invalid_config(
            "convergence_threshold must be > 0",
        ));
    }

    Ok(())
}

/// Configuration for a study-order run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudyRankConfig {
    /// Damping factor for PageRank (typically 0.85)
    #[serde(default = "default_damping")]
    pub damping: f64,
    /// Maximum iterations for PageRank convergence
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,
    /// Convergence threshold per node (stop when total delta < N * threshold)
    #[serde(default = "default_threshold")]
    pub convergence_threshold: f64,
    /// Importance score weights
    #[serde(default)]
    pub weights: ScoringWeights,
    /// Co-occurrence context used by the graph builder
    #[serde(default)]
    pub context: ContextScope,
    /// Maximum curriculum topics before rejecting (bounds the pair scan)
    #[serde(default)]
    pub max_topics: Option<usize>,
    /// Number of leading topics handed to downstream collaborators
    #[serde(default = "default_top_n")]
    pub top_n: usize,
}

fn default_damping() -> f64 {
    0.85
}
fn default_max_iterations() -> usize {
    100
}
fn default_threshold() -> f64 {
    1e-6
}
fn default_top_n() -> usize {
    10
}

impl Default for StudyRankConfig {
    fn default() -> Self {
        Self {
            damping: default_damping(),
            max_iterations: default_max_iterations(),
            convergence_threshold: default_threshold(),
            weights: ScoringWeights::default(),
            context: ContextScope::default(),
            max_topics: None,
            top_n: default_top_n(),
        }
    }
}

impl StudyRankConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON config; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        validate_pagerank_params(self.damping, self.max_iterations, self.convergence_threshold)?;

        if self.max_topics == Some(0) {
            return Err(StudyRankError::invalid_config("max_topics must be > 0"));
        }

        self.weights.validate()
    }

    /// Builder method: set damping factor
    pub fn with_damping(mut self, damping: f64) -> Self {
        self.damping = damping;
        self
    }

    /// Builder method: set max iterations
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Builder method: set convergence threshold
    pub fn with_convergence_threshold(mut self, threshold: f64) -> Self {
        self.convergence_threshold = threshold;
        self
    }

    /// Builder method: set scoring weights
    pub fn with_weights(mut self, weights: ScoringWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Builder method: set the co-occurrence context
    pub fn with_context(mut self, context: ContextScope) -> Self {
        self.context = context;
        self
    }

    /// Builder method: set maximum curriculum topics
    pub fn with_max_topics(mut self, max: usize) -> Self {
        self.max_topics = Some(max);
        self
    }

    /// Builder method: set downstream top-N
    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }
}
