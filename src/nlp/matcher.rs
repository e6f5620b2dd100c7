//! Whole-word topic matching
//!
//! A topic matches where its literal text occurs between Unicode word
//! boundaries. Topic text is always escaped before compilation, so
//! parentheses, dots and other metacharacters in curriculum headings are
//! matched literally and can never change the pattern.
//!
//! Multi-word topics match exactly as written, single spaces included:
//! "merge sort" matches in "merge sort algorithm" but not in
//! "merge sorting" or "merge  sort".

use crate::errors::{Result, StudyRankError};
use crate::types::Topic;
use regex::Regex;

/// A compiled whole-word matcher for one topic
#[derive(Debug, Clone)]
pub struct WholeWordMatcher {
    topic: Topic,
    pattern: Regex,
}

impl WholeWordMatcher {
    /// Compile a matcher for `topic`
    pub fn new(topic: &Topic) -> Result<Self> {
        let pattern = Regex::new(&whole_word_pattern(topic.as_str()))
            .map_err(|e| StudyRankError::pattern(topic.as_str(), e.to_string()))?;
        Ok(Self {
            topic: topic.clone(),
            pattern,
        })
    }

    /// The topic this matcher was built for
    pub fn topic(&self) -> &Topic {
        &self.topic
    }

    /// Whether the topic occurs at least once
    pub fn is_match(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }

    /// Number of non-overlapping occurrences
    pub fn count(&self, text: &str) -> usize {
        self.pattern.find_iter(text).count()
    }

    /// Byte offsets where each non-overlapping occurrence starts
    pub fn find_starts(&self, text: &str) -> Vec<usize> {
        self.pattern.find_iter(text).map(|m| m.start()).collect()
    }
}

/// The regex source for a whole-word match of `literal`
pub fn whole_word_pattern(literal: &str) -> String {
    format!(r"\b{}\b", regex::escape(literal))
}

/// Compile matchers for a slice of topics, in order
pub fn compile_all(topics: &[Topic]) -> Result<Vec<WholeWordMatcher>> {
    topics.iter().map(WholeWordMatcher::new).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matcher(topic: &str) -> WholeWordMatcher {
        WholeWordMatcher::new(&Topic::new(topic).unwrap()).unwrap()
    }

    #[test]
    fn test_whole_word_only() {
        let m = matcher("sort");
        assert!(m.is_match("merge sort uses recursion"));
        assert!(!m.is_match("sorting includes merging"));
        assert_eq!(m.count("sort, sorted, sort. resort sort"), 3);
    }

    #[test]
    fn test_multi_word_topic() {
        let m = matcher("merge sort");
        assert_eq!(m.count("merge sort uses recursion. sorting includes merge sort."), 2);
        assert!(m.is_match("merge sort algorithm"));
        assert!(!m.is_match("merge sorting"));
        assert!(!m.is_match("merge  sort"));
    }

    #[test]
    fn test_metacharacters_are_literal() {
        let m = matcher("o(n log n)");
        assert!(!m.is_match("on log n"));

        let m = matcher("c++");
        assert!(!m.is_match("ccc"));

        let m = matcher("a.b");
        assert!(m.is_match("see a.b here"));
        assert!(!m.is_match("see axb here"));
    }

    #[test]
    fn test_pattern_escapes() {
        assert_eq!(whole_word_pattern("a.b"), r"\ba\.b\b");
        assert_eq!(whole_word_pattern("(x)"), r"\b\(x\)\b");
    }

    #[test]
    fn test_find_starts() {
        let m = matcher("heap");
        assert_eq!(m.find_starts("heap and heap sort, heaps"), vec![0, 9]);
    }

    #[test]
    fn test_compile_all_preserves_order() {
        let topics = vec![Topic::new("kmp").unwrap(), Topic::new("np hard").unwrap()];
        let matchers = compile_all(&topics).unwrap();
        assert_eq!(matchers[0].topic().as_str(), "kmp");
        assert_eq!(matchers[1].topic().as_str(), "np hard");
    }
}
