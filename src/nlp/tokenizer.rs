//! Term and sentence segmentation for notes text
//!
//! Two views of the notes are needed downstream: the term stream that the
//! term-weight signal counts over, and sentence spans for the
//! sentence-scoped co-occurrence context.

use once_cell::sync::Lazy;
use regex::Regex;

/// Terms are maximal runs of word characters of at least two characters.
static TERM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b\w\w+\b").expect("Invalid term regex"));

/// Sentence terminators: `.`, `!` or `?` followed by whitespace or end of
/// text, or one or more newlines.
static SENTENCE_BREAK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[.!?]+(?:\s+|$)|\n+").expect("Invalid sentence regex"));

/// Splits lowercase notes into terms and sentences
#[derive(Debug, Clone, Copy, Default)]
pub struct Tokenizer;

impl Tokenizer {
    /// Create a new tokenizer
    pub fn new() -> Self {
        Self
    }

    /// Iterate over the terms of `text` in order.
    ///
    /// Single-character runs are not terms, and punctuation always separates
    /// terms, so "divide-and-conquer" yields three terms.
    pub fn terms<'t>(&self, text: &'t str) -> impl Iterator<Item = &'t str> + 't {
        TERM.find_iter(text).map(|m| m.as_str())
    }

    /// Byte spans `(start, end)` of the non-blank sentences of `text`.
    ///
    /// The terminator is excluded from the span. Text without any terminator
    /// is one sentence.
    pub fn sentence_boundaries(&self, text: &str) -> Vec<(usize, usize)> {
        let mut boundaries = Vec::new();
        let mut start = 0;

        for brk in SENTENCE_BREAK.find_iter(text) {
            if !text[start..brk.start()].trim().is_empty() {
                boundaries.push((start, brk.start()));
            }
            start = brk.end();
        }

        if start < text.len() && !text[start..].trim().is_empty() {
            boundaries.push((start, text.len()));
        }

        boundaries
    }

    /// Sentence texts, see [`Tokenizer::sentence_boundaries`]
    pub fn sentences<'t>(&self, text: &'t str) -> Vec<&'t str> {
        self.sentence_boundaries(text)
            .into_iter()
            .map(|(start, end)| &text[start..end])
            .collect()
    }
}
