use super::error::GraphError;
use super::types::*;
use std::collections::{HashMap, HashSet};

/// Arena of computation nodes forming one or more trees.
///
/// Nodes are append-only. Parent links are set once, either at insertion
/// (top-down) or later through [`ComputationGraph::attach`] (bottom-up).
#[derive(Debug, Clone, Default)]
pub struct ComputationGraph {
    nodes: Vec<ComputationNode>,
    by_name: HashMap<String, NodeId>,
    used_names: HashSet<String>,
}

impl ComputationGraph {
    pub fn new() -> Self { Self::default() }
    pub fn count(&self) -> usize { self.nodes.len() }

    pub fn add_node(
        &mut self,
        name: impl Into<String>,
        parent: Option<NodeId>,
        op_type: impl Into<OpType>,
        inputs: Vec<DataId>,
        outputs: Vec<DataId>,
    ) -> Result<NodeId, GraphError> {
        if let Some(p) = parent {
            self.check(p)?;
        }
        let id = NodeId::new(self.nodes.len());

        // --- Unique Name Enforcement ---
        let original_name = name.into();
        let mut candidate_name = original_name.clone();
        let mut counter = 1;

        while self.used_names.contains(&candidate_name) {
            candidate_name = format!("{}_{}", original_name, counter);
            counter += 1;
        }
        self.used_names.insert(candidate_name.clone());
        self.by_name.insert(candidate_name.clone(), id);
        // -------------------------------

        self.nodes.push(ComputationNode {
            id,
            name: candidate_name,
            op_type: op_type.into(),
            inputs,
            outputs: outputs.into_iter().collect(),
            parent,
            children: Vec::new(),
        });

        if let Some(p) = parent {
            self.nodes[p.index()].children.push(id);
        }
        Ok(id)
    }

    /// Links an existing parentless node under `parent`, appending it to the
    /// parent's child list.
    pub fn attach(&mut self, child: NodeId, parent: NodeId) -> Result<(), GraphError> {
        self.check(child)?;
        self.check(parent)?;

        if let Some(existing) = self.nodes[child.index()].parent {
            return Err(GraphError::ParentAlreadySet { child, existing });
        }

        // Walk up from the new parent; meeting `child` means it is an ancestor.
        let mut cursor = Some(parent);
        while let Some(id) = cursor {
            if id == child {
                return Err(GraphError::CycleDetected { child, parent });
            }
            cursor = self.nodes[id.index()].parent;
        }

        self.nodes[child.index()].parent = Some(parent);
        self.nodes[parent.index()].children.push(child);
        Ok(())
    }

    pub fn node(&self, id: NodeId) -> Result<&ComputationNode, GraphError> {
        self.nodes.get(id.index()).ok_or(GraphError::UnknownNode(id))
    }

    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.by_name.get(name).copied()
    }

    #[inline(always)]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes.get(id.index()).map_or(&[], |n| n.children.as_slice())
    }

    /// Nodes without a parent, in insertion order.
    pub fn roots(&self) -> Vec<NodeId> {
        self.nodes.iter().filter(|n| n.parent.is_none()).map(|n| n.id).collect()
    }

    fn check(&self, id: NodeId) -> Result<(), GraphError> {
        if id.index() < self.nodes.len() { Ok(()) } else { Err(GraphError::UnknownNode(id)) }
    }
}
