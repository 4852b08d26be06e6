//! Defines the error types for tree resolution.
use crate::grammar::ChartType;
use crate::store::{DataId, GraphError, NodeId, OpType};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// Fatal: a malformed graph cannot be partially visualized.
    #[error("Unknown operation '{op_type}' at node '{node}'")]
    UnknownOperation { op_type: OpType, node: String },
    /// Recovered by leaving the container unbound.
    #[error("Chart '{chart}' for node {node:?} needs encoded inputs {missing:?}")]
    UnmetChartRequirements { chart: ChartType, node: NodeId, missing: Vec<DataId> },
    /// Recovered by treating the pair as non-mergeable.
    #[error("No composition of '{child}' into '{parent}'")]
    ImpossibleComposition { child: ChartType, parent: ChartType },
    #[error(transparent)]
    Graph(#[from] GraphError),
}
