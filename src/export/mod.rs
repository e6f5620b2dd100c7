//! Study order export for downstream collaborators

pub mod json;
