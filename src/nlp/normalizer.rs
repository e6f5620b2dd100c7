//! Topic canonicalization
//!
//! Raw candidate strings come from an external text extractor. They are
//! trimmed, lowercased and deduplicated here, optionally filtered through a
//! [`TopicValidator`], and collected into a [`TopicSet`] in discovery order.

use crate::types::{Topic, TopicSet};

/// Characters that separate candidate topics inside a document's text.
const CANDIDATE_SEPARATORS: &[char] = &[',', '.', '(', ')', '\n'];

// ============================================================================
// TopicValidator
// ============================================================================

/// Decides whether a normalized candidate string names a concept.
///
/// The production implementation is an external classifier; tests and
/// offline runs use [`AcceptAll`] or a closure.
pub trait TopicValidator {
    fn is_valid_topic(&self, candidate: &str) -> bool;
}

/// Accepts every non-empty candidate
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAll;

impl TopicValidator for AcceptAll {
    #[inline]
    fn is_valid_topic(&self, _candidate: &str) -> bool {
        true
    }
}

impl<F> TopicValidator for F
where
    F: Fn(&str) -> bool,
{
    fn is_valid_topic(&self, candidate: &str) -> bool {
        self(candidate)
    }
}

// ============================================================================
// TopicNormalizer
// ============================================================================

/// Normalizes raw candidates into a [`TopicSet`]
#[derive(Debug, Clone, Default)]
pub struct TopicNormalizer<V = AcceptAll> {
    validator: V,
}

impl TopicNormalizer<AcceptAll> {
    /// A normalizer that keeps every non-empty candidate
    pub fn new() -> Self {
        Self {
            validator: AcceptAll,
        }
    }
}

impl<V: TopicValidator> TopicNormalizer<V> {
    /// A normalizer that keeps only candidates `validator` accepts
    pub fn with_validator(validator: V) -> Self {
        Self { validator }
    }

    /// Normalize a single candidate.
    ///
    /// Empty candidates and those the validator rejects yield `None`.
    pub fn normalize(&self, raw: &str) -> Option<Topic> {
        Topic::new(raw).filter(|topic| self.validator.is_valid_topic(topic.as_str()))
    }

    /// Normalize already-split candidates, deduplicating in discovery order
    pub fn normalize_all<I, S>(&self, candidates: I) -> TopicSet
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = TopicSet::new();
        let mut rejected = 0usize;
        for raw in candidates {
            match Topic::new(raw.as_ref()) {
                Some(topic) if set.contains(topic.as_str()) => {}
                Some(topic) => {
                    if self.validator.is_valid_topic(topic.as_str()) {
                        set.insert(topic);
                    } else {
                        rejected += 1;
                    }
                }
                None => {}
            }
        }
        if rejected > 0 {
            tracing::debug!(kept = set.len(), rejected, "filtered topic candidates");
        }
        set
    }

    /// Split a whole document's text into candidates and normalize them.
    ///
    /// Candidates are separated by `,` `.` `(` `)` and newlines, the way
    /// curriculum and exam documents list their headings.
    pub fn from_document(&self, text: &str) -> TopicSet {
        self.normalize_all(split_candidates(text))
    }
}

/// Split document text on the candidate separators without normalizing
pub fn split_candidates(text: &str) -> impl Iterator<Item = &str> {
    text.split(CANDIDATE_SEPARATORS)
}
