//! Core of a chart-recommendation engine for computation trees.
//!
//! A [`ComputationGraph`] records how a metric is computed from named data.
//! [`Resolver`] walks one tree of that graph leaf-to-root and groups its
//! operations into [`VisualizationContainer`]s, each one chart that explains a
//! part of the computation. Which charts exist, what they encode, and which of
//! them nest into one another comes from a [`Rulebook`].

pub mod analysis;
pub mod display;
pub mod grammar;
pub mod resolve;
pub mod store;

pub use grammar::{ChartType, Encoding, Rulebook, RulesError};
pub use resolve::{resolve, ResolveError, Resolver, VisualizationContainer};
pub use store::{ComputationGraph, DataId, GraphError, GraphRecord, NodeId, OpType, RecordError};
