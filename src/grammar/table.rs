//! The grammar table: per-operation visual preferences.
use super::chart::ChartType;
use super::encoding::{ChannelClass, Encoding, EncodingMap, MarkKind};
use crate::store::{DataId, OpType};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataShape {
    Scalar,
    Vector,
    Any,
}

impl DataShape {
    /// Whether an operand declared as `self` can take a value of shape `produced`.
    pub fn accepts(self, produced: DataShape) -> bool {
        self == DataShape::Any || produced == DataShape::Any || self == produced
    }
}

/// One fallback choice of marks for an operation that no chart governs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkPriority {
    /// `None` accepts inputs drawn with any mark.
    #[serde(default)]
    pub input_mark: Option<MarkKind>,
    pub output_mark: MarkKind,
    pub channel: ChannelClass,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrammarEntry {
    pub input_type: DataShape,
    pub output_type: DataShape,
    #[serde(default)]
    pub chart: Option<ChartType>,
    #[serde(default)]
    pub default_output: Option<Encoding>,
    #[serde(default)]
    pub mark_priority: Vec<MarkPriority>,
}

impl GrammarEntry {
    /// Output encoding for an operation no chart or default governs: the first
    /// mark-priority choice whose input mark agrees with every input that is
    /// already encoded. Unencoded inputs never disqualify a choice.
    pub fn fallback_output(&self, inputs: &[DataId], encodings: &EncodingMap) -> Option<Encoding> {
        if self.chart.is_some() || self.default_output.is_some() {
            return None;
        }
        self.mark_priority
            .iter()
            .find(|p| match p.input_mark {
                None => true,
                Some(mark) => inputs
                    .iter()
                    .filter_map(|id| encodings.get(id))
                    .all(|e| e.mark == mark),
            })
            .map(|p| Encoding::new(p.output_mark, p.channel))
    }
}

/// Read-only map from operation type to its [`GrammarEntry`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GrammarTable(HashMap<OpType, GrammarEntry>);

impl GrammarTable {
    pub fn get(&self, op: &OpType) -> Option<&GrammarEntry> { self.0.get(op) }
    pub fn len(&self) -> usize { self.0.len() }
    pub fn is_empty(&self) -> bool { self.0.is_empty() }
}

impl FromIterator<(OpType, GrammarEntry)> for GrammarTable {
    fn from_iter<I: IntoIterator<Item = (OpType, GrammarEntry)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
