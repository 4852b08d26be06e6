use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl NodeId {
    #[inline(always)]
    pub fn index(&self) -> usize { self.0 as usize }
    pub fn new(idx: usize) -> Self { Self(idx as u32) }
}

/// Key into the grammar table (e.g. `"vector_sum"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OpType(pub String);

/// Name of a data value flowing through the graph. The renderer resolves it to values.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DataId(pub String);

impl fmt::Display for OpType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

impl fmt::Display for DataId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

impl From<&str> for OpType {
    fn from(s: &str) -> Self { Self(s.to_string()) }
}

impl From<&str> for DataId {
    fn from(s: &str) -> Self { Self(s.to_string()) }
}

/// Most operations produce a single value.
pub type Outputs = SmallVec<[DataId; 1]>;

/// One operation in the computation tree.
///
/// Leaves are named data inputs, internal nodes are operations. The `inputs`
/// order is significant for non-commutative operations (left/right operand of
/// a difference, numerator/denominator of a ratio).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComputationNode {
    pub id: NodeId,
    pub name: String,
    pub op_type: OpType,
    pub inputs: Vec<DataId>,
    pub outputs: Outputs,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
}

impl ComputationNode {
    pub fn parent(&self) -> Option<NodeId> { self.parent }
    pub fn children(&self) -> &[NodeId] { &self.children }
    pub fn is_leaf(&self) -> bool { self.children.is_empty() }

    /// The identifier charts use when they refer to "this node's result".
    pub fn primary_output(&self) -> Option<&DataId> { self.outputs.first() }
}
