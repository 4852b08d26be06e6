//! Bulk construction of a computation tree from a flat list of node records,
//! the shape front ends post when they have recorded an expression.

use super::error::{GraphError, RecordError};
use super::registry::ComputationGraph;
use super::types::{DataId, NodeId, OpType};
use serde::{Deserialize, Serialize};

/// A field that may be sent either as a single identifier or as a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany {
    One(DataId),
    Many(Vec<DataId>),
}

impl Default for OneOrMany {
    fn default() -> Self { OneOrMany::Many(Vec::new()) }
}

impl OneOrMany {
    pub fn into_vec(self) -> Vec<DataId> {
        match self {
            OneOrMany::One(id) => vec![id],
            OneOrMany::Many(ids) => ids,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub name: String,
    #[serde(default)]
    pub parent: Option<String>,
    /// The grammar rule the front end matched for this node.
    pub function: OpType,
    #[serde(default)]
    pub input_data: Vec<DataId>,
    #[serde(default)]
    pub output_data: OneOrMany,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphRecord {
    pub root: String,
    pub nodes: Vec<NodeRecord>,
}

impl GraphRecord {
    pub fn from_json(json: &str) -> Result<Self, RecordError> {
        serde_json::from_str(json).map_err(RecordError::Parse)
    }

    /// Parses and builds in one step.
    pub fn load(json: &str) -> Result<(ComputationGraph, NodeId), RecordError> {
        Ok(Self::from_json(json)?.build()?)
    }

    /// Builds the graph top-down. Every record's parent must already have been
    /// declared earlier in the list, and names must be unique: parents are
    /// referenced by name.
    pub fn build(self) -> Result<(ComputationGraph, NodeId), GraphError> {
        let mut graph = ComputationGraph::new();

        for record in self.nodes {
            if graph.find(&record.name).is_some() {
                return Err(GraphError::DuplicateName(record.name));
            }
            let parent = match &record.parent {
                Some(p) => Some(graph.find(p).ok_or_else(|| GraphError::UnknownParent {
                    node: record.name.clone(),
                    parent: p.clone(),
                })?),
                None => None,
            };
            graph.add_node(
                record.name,
                parent,
                record.function,
                record.input_data,
                record.output_data.into_vec(),
            )?;
        }

        let root = graph.find(&self.root).ok_or(GraphError::UnknownRoot(self.root))?;
        Ok((graph, root))
    }
}
