//! Multi-signal topic importance
//!
//! Each curriculum topic gets
//!
//! ```text
//! score = mentions * w_mention + exam_bonus + term_weight * w_term
//! ```
//!
//! where `mentions` is the whole-word count in the notes, `exam_bonus` is
//! `w_exam` when the topic is also an exam topic, and `term_weight` comes
//! from [`TermWeights`]. Importance is reported next to the PageRank order
//! and never changes it.

use crate::errors::Result;
use crate::nlp::matcher::compile_all;
use crate::scoring::term_weight::TermWeights;
use crate::types::{NotesCorpus, ScoringWeights, Topic, TopicSet};
use rayon::prelude::*;
use rustc_hash::FxHashMap;
use serde::Serialize;

/// Below this many topics, mention counting runs sequentially.
const PARALLEL_THRESHOLD: usize = 64;

/// Importance of one topic with its signal breakdown
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportanceScore {
    pub topic: Topic,
    /// Whole-word occurrences in the notes
    pub mentions: usize,
    /// Bonus added because the topic is an exam topic (0 otherwise)
    pub exam_bonus: f64,
    /// Single-document term weight, before its multiplier
    pub term_weight: f64,
    /// Weighted sum of the three signals
    pub score: f64,
}

/// Importance scores for a topic set, kept in discovery order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ImportanceScores {
    entries: Vec<ImportanceScore>,
    #[serde(skip)]
    index: FxHashMap<Topic, usize>,
}

impl ImportanceScores {
    fn from_entries(entries: Vec<ImportanceScore>) -> Self {
        let index = entries
            .iter()
            .enumerate()
            .map(|(i, entry)| (entry.topic.clone(), i))
            .collect();
        Self { entries, index }
    }

    /// Breakdown for a topic
    pub fn get(&self, topic: &str) -> Option<&ImportanceScore> {
        self.index.get(topic).map(|&i| &self.entries[i])
    }

    /// Final score for a topic
    pub fn score_of(&self, topic: &str) -> Option<f64> {
        self.get(topic).map(|entry| entry.score)
    }

    /// Entries by descending score; equal scores keep discovery order
    pub fn ranked(&self) -> Vec<&ImportanceScore> {
        let mut ranked: Vec<&ImportanceScore> = self.entries.iter().collect();
        ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
        ranked
    }

    /// The `n` most important topics
    pub fn top_n(&self, n: usize) -> Vec<&ImportanceScore> {
        let mut ranked = self.ranked();
        ranked.truncate(n);
        ranked
    }

    /// Entries in discovery order
    pub fn iter(&self) -> std::slice::Iter<'_, ImportanceScore> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Computes [`ImportanceScores`]
#[derive(Debug, Clone, Default)]
pub struct ImportanceScorer {
    weights: ScoringWeights,
}

impl ImportanceScorer {
    /// Scorer with the default weights (1.5, 10, 5)
    pub fn new() -> Self {
        Self::default()
    }

    /// Scorer with custom weights.
    ///
    /// Weights are validated when scoring, so a bad weight fails loudly
    /// instead of quietly producing zeros.
    pub fn with_weights(weights: ScoringWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    /// Score every curriculum topic against the notes and exam topics.
    ///
    /// An empty curriculum gives an empty result. Topics that never occur
    /// and are not exam topics score 0.
    pub fn score(
        &self,
        curriculum: &TopicSet,
        notes: &NotesCorpus,
        exam: &TopicSet,
    ) -> Result<ImportanceScores> {
        self.weights.validate()?;
        if curriculum.is_empty() {
            return Ok(ImportanceScores::default());
        }

        let matchers = compile_all(curriculum.as_slice())?;
        let text = notes.as_str();
        let mentions: Vec<usize> = if matchers.len() < PARALLEL_THRESHOLD {
            matchers.iter().map(|m| m.count(text)).collect()
        } else {
            matchers.par_iter().map(|m| m.count(text)).collect()
        };
        let term_weights = TermWeights::fit(curriculum, notes);

        let entries: Vec<ImportanceScore> = curriculum
            .iter()
            .zip(mentions)
            .map(|(topic, mentions)| {
                let exam_bonus = if exam.contains(topic.as_str()) {
                    self.weights.exam_bonus
                } else {
                    0.0
                };
                let term_weight = term_weights.weight(topic.as_str());
                let score = mentions as f64 * self.weights.mention
                    + exam_bonus
                    + term_weight * self.weights.term_weight;
                ImportanceScore {
                    topic: topic.clone(),
                    mentions,
                    exam_bonus,
                    term_weight,
                    score,
                }
            })
            .collect();

        tracing::debug!(
            topics = entries.len(),
            exam_hits = entries.iter().filter(|e| e.exam_bonus > 0.0).count(),
            "scored topic importance"
        );
        Ok(ImportanceScores::from_entries(entries))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nlp::normalizer::TopicNormalizer;

    fn topic_set(items: &[&str]) -> TopicSet {
        TopicNormalizer::new().normalize_all(items.iter().copied())
    }

    #[test]
    fn test_score_components() {
        let curriculum = topic_set(&["heap", "merge sort", "trie"]);
        let exam = topic_set(&["merge sort", "graphs"]);
        let notes = NotesCorpus::new("heap heap. merge sort splits. heap sort uses a heap");

        let scores = ImportanceScorer::new().score(&curriculum, &notes, &exam).unwrap();

        let heap = scores.get("heap").unwrap();
        assert_eq!(heap.mentions, 4);
        assert_eq!(heap.exam_bonus, 0.0);
        // "heap" is the only single-term vocabulary entry present
        assert!((heap.term_weight - 1.0).abs() < 1e-12);
        assert!((heap.score - (4.0 * 1.5 + 5.0)).abs() < 1e-12);

        let merge = scores.get("merge sort").unwrap();
        assert_eq!(merge.mentions, 1);
        assert_eq!(merge.exam_bonus, 10.0);
        assert_eq!(merge.term_weight, 0.0);
        assert!((merge.score - 11.5).abs() < 1e-12);

        assert_eq!(scores.score_of("trie"), Some(0.0));
    }

    #[test]
    fn test_ranked_and_top_n() {
        let curriculum = topic_set(&["trie", "heap", "kmp"]);
        let notes = NotesCorpus::new("heap heap heap kmp");
        let scores = ImportanceScorer::new()
            .score(&curriculum, &notes, &TopicSet::new())
            .unwrap();

        let ranked: Vec<&str> = scores.ranked().iter().map(|e| e.topic.as_str()).collect();
        assert_eq!(ranked, vec!["heap", "kmp", "trie"]);
        assert_eq!(scores.top_n(1).len(), 1);
        assert_eq!(scores.top_n(10).len(), 3);
    }

    #[test]
    fn test_empty_curriculum() {
        let scores = ImportanceScorer::new()
            .score(&TopicSet::new(), &NotesCorpus::new("heap"), &topic_set(&["heap"]))
            .unwrap();
        assert!(scores.is_empty());
    }

    #[test]
    fn test_custom_weights() {
        let weights = ScoringWeights {
            mention: 1.0,
            exam_bonus: 0.0,
            term_weight: 0.0,
        };
        let scores = ImportanceScorer::with_weights(weights)
            .score(&topic_set(&["heap"]), &NotesCorpus::new("heap heap"), &topic_set(&["heap"]))
            .unwrap();
        assert_eq!(scores.score_of("heap"), Some(2.0));
    }

    #[test]
    fn test_negative_weights_fail_loudly() {
        let weights = ScoringWeights {
            exam_bonus: -10.0,
            ..ScoringWeights::default()
        };
        let result = ImportanceScorer::with_weights(weights).score(
            &topic_set(&["heap"]),
            &NotesCorpus::new("heap"),
            &TopicSet::new(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_serializes_in_discovery_order() {
        let scores = ImportanceScorer::new()
            .score(&topic_set(&["kmp", "heap"]), &NotesCorpus::new("heap"), &TopicSet::new())
            .unwrap();
        let json = serde_json::to_value(&scores).unwrap();
        assert_eq!(json[0]["topic"], "kmp");
        assert_eq!(json[1]["topic"], "heap");
        assert_eq!(json[1]["mentions"], 1);
    }
}
