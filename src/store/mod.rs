//! The computation graph: an arena of operation nodes linked into trees.
pub mod error;
pub mod records;
pub mod registry;
pub mod types;

pub use error::{GraphError, RecordError};
pub use records::{GraphRecord, NodeRecord};
pub use registry::ComputationGraph;
pub use types::{ComputationNode, DataId, NodeId, OpType, Outputs};
