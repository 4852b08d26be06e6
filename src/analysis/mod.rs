//! Structural traversals over the computation graph.
pub mod topology;
