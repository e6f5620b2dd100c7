//! Text handling: topic normalization, whole-word matching and segmentation

pub mod matcher;
pub mod normalizer;
pub mod tokenizer;
