//! Topic importance: mention counts, exam relevance and term weighting

pub mod importance;
pub mod term_weight;
