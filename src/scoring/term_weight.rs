//! Single-document term weighting
//!
//! This is TF-IDF restricted to the curriculum vocabulary, fitted on a
//! collection that contains exactly one document: the notes. With one
//! document every term that occurs has document frequency 1, so the
//! smoothed IDF `ln((1 + n) / (1 + df)) + 1` is exactly 1 and the weight
//! reduces to the L2-normalized raw term count:
//!
//! ```text
//! weight(t) = tf(t) / sqrt(Σ tf(v)²)   over vocabulary terms v
//! ```
//!
//! It is not a corpus-level relevance measure and must not be "upgraded" to
//! multi-document TF-IDF: importance scores depend on this exact shape.
//!
//! Terms are maximal word-character runs of length ≥ 2 (see
//! [`Tokenizer::terms`]). A vocabulary entry only ever receives weight if it
//! is itself a single such term, so multi-word topics, one-letter topics
//! and topics containing punctuation always weigh 0.

use crate::nlp::tokenizer::Tokenizer;
use crate::types::{NotesCorpus, TopicSet};
use rustc_hash::FxHashMap;

/// Number of documents in the collection the weights are fitted on.
const DOCUMENT_COUNT: usize = 1;

/// Smoothed inverse document frequency
fn smoothed_idf(document_count: usize, document_frequency: usize) -> f64 {
    ((1.0 + document_count as f64) / (1.0 + document_frequency as f64)).ln() + 1.0
}

/// Vocabulary-restricted term weights of the notes
#[derive(Debug, Clone, Default)]
pub struct TermWeights {
    counts: FxHashMap<String, usize>,
    weights: FxHashMap<String, f64>,
}

impl TermWeights {
    /// Fit weights for `vocabulary` on the single `notes` document
    pub fn fit(vocabulary: &TopicSet, notes: &NotesCorpus) -> Self {
        if vocabulary.is_empty() {
            return Self::default();
        }

        let mut counts: FxHashMap<String, usize> = FxHashMap::default();
        for term in Tokenizer::new().terms(notes.as_str()) {
            if vocabulary.contains(term) {
                *counts.entry(term.to_string()).or_insert(0) += 1;
            }
        }

        // Every counted term occurs in the one document, so df = 1.
        let idf = smoothed_idf(DOCUMENT_COUNT, 1);
        let mut weights: FxHashMap<String, f64> = counts
            .iter()
            .map(|(term, &tf)| (term.clone(), tf as f64 * idf))
            .collect();

        let norm = weights.values().map(|w| w * w).sum::<f64>().sqrt();
        if norm > 0.0 {
            for w in weights.values_mut() {
                *w /= norm;
            }
        }

        Self { counts, weights }
    }

    /// Weight for a vocabulary term; 0 when it never occurs as a term
    pub fn weight(&self, term: &str) -> f64 {
        self.weights.get(term).copied().unwrap_or(0.0)
    }

    /// Raw term frequency
    pub fn term_frequency(&self, term: &str) -> usize {
        self.counts.get(term).copied().unwrap_or(0)
    }

    /// Number of vocabulary terms with non-zero weight
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nlp::normalizer::TopicNormalizer;

    fn vocab(items: &[&str]) -> TopicSet {
        TopicNormalizer::new().normalize_all(items.iter().copied())
    }

    #[test]
    fn test_idf_is_one_for_single_document() {
        assert!((smoothed_idf(1, 1) - 1.0).abs() < 1e-15);
        assert!(smoothed_idf(1, 0) > 1.0);
    }

    #[test]
    fn test_l2_normalized_counts() {
        let weights = TermWeights::fit(
            &vocab(&["heap", "trie", "graph"]),
            &NotesCorpus::new("heap heap heap trie trie trie trie"),
        );
        assert!((weights.weight("heap") - 0.6).abs() < 1e-12);
        assert!((weights.weight("trie") - 0.8).abs() < 1e-12);
        assert_eq!(weights.weight("graph"), 0.0);
        assert_eq!(weights.term_frequency("trie"), 4);
        assert_eq!(weights.len(), 2);
    }

    #[test]
    fn test_multi_word_and_short_topics_weigh_zero() {
        let weights = TermWeights::fit(
            &vocab(&["merge sort", "r", "dynamic programming:", "recursion"]),
            &NotesCorpus::new("merge sort uses recursion. r is a language. dynamic programming: yes"),
        );
        assert_eq!(weights.weight("merge sort"), 0.0);
        assert_eq!(weights.weight("r"), 0.0);
        assert_eq!(weights.weight("dynamic programming:"), 0.0);
        assert!((weights.weight("recursion") - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_terms_must_match_whole_runs() {
        let weights = TermWeights::fit(&vocab(&["sort"]), &NotesCorpus::new("sorting sorted"));
        assert!(weights.is_empty());
    }

    #[test]
    fn test_empty_inputs() {
        assert!(TermWeights::fit(&TopicSet::new(), &NotesCorpus::new("heap")).is_empty());
        assert!(TermWeights::fit(&vocab(&["heap"]), &NotesCorpus::new("")).is_empty());
    }
}
