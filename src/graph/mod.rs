//! Directed topic graph and its co-occurrence builder

pub mod builder;
