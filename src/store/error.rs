//! Defines the error types for the graph store.
use super::types::NodeId;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("Unknown node {0:?}")]
    UnknownNode(NodeId),
    #[error("Node {child:?} already has parent {existing:?}")]
    ParentAlreadySet { child: NodeId, existing: NodeId },
    #[error("Attaching {child:?} under {parent:?} would create a cycle")]
    CycleDetected { child: NodeId, parent: NodeId },
    #[error("Node '{node}' references parent '{parent}' before it was declared")]
    UnknownParent { node: String, parent: String },
    #[error("Root node '{0}' not found")]
    UnknownRoot(String),
    #[error("Node name '{0}' is declared more than once")]
    DuplicateName(String),
}

/// Failure to read a graph from its JSON record.
#[derive(Error, Debug)]
pub enum RecordError {
    #[error("Malformed graph record: {0}")]
    Parse(#[source] serde_json::Error),
    #[error(transparent)]
    Graph(#[from] GraphError),
}
