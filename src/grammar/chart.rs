//! Chart types and their fixed encoding-expansion rules.
use super::encoding::{Axis, ChannelClass, Encoding, EncodingMap, EncodingPatch, MarkKind};
use crate::store::{ComputationNode, DataId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A named composite visual template.
///
/// Known templates carry a deterministic expansion rule. Any other name is kept
/// verbatim so rule tables can mention chart types the core does not know; such
/// types expand to nothing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ChartType {
    ScatterWithDiagonal,
    StackedBar,
    BarComparison,
    BarDifference,
    Spacefilling,
    Distribution,
    Custom(String),
}

/// What a chart needs from its container before it can be bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartRequirement {
    None,
    /// Every input of the node must already carry one of these marks.
    InputsMarked(&'static [MarkKind]),
}

impl ChartType {
    pub fn name(&self) -> &str {
        match self {
            ChartType::ScatterWithDiagonal => "scatter-with-diagonal",
            ChartType::StackedBar => "stacked-bar",
            ChartType::BarComparison => "bar-comparison",
            ChartType::BarDifference => "bar-difference",
            ChartType::Spacefilling => "spacefilling",
            ChartType::Distribution => "distribution",
            ChartType::Custom(name) => name,
        }
    }

    pub fn requirement(&self) -> ChartRequirement {
        match self {
            ChartType::Distribution => ChartRequirement::InputsMarked(&[MarkKind::Line, MarkKind::Square]),
            _ => ChartRequirement::None,
        }
    }

    /// Inputs of `node` that keep this chart from being bound, given the
    /// encodings already present. Empty when the requirement holds.
    pub fn missing_inputs(&self, node: &ComputationNode, encodings: &EncodingMap) -> Vec<DataId> {
        match self.requirement() {
            ChartRequirement::None => Vec::new(),
            ChartRequirement::InputsMarked(marks) => node
                .inputs
                .iter()
                .filter(|id| !encodings.get(id).is_some_and(|e| marks.contains(&e.mark)))
                .cloned()
                .collect(),
        }
    }

    /// The canonical encodings this chart mandates for `node`'s inputs and outputs.
    pub fn expand(&self, node: &ComputationNode) -> Vec<(DataId, EncodingPatch)> {
        let inputs = node.inputs.iter();
        let outputs = node.outputs.iter();
        let each = |ids: std::slice::Iter<'_, DataId>, enc: Encoding| -> Vec<(DataId, EncodingPatch)> {
            ids.map(|id| (id.clone(), EncodingPatch::from(enc.clone()))).collect()
        };

        match self {
            ChartType::ScatterWithDiagonal => {
                let mut out = Vec::new();
                let axes = [Axis::X, Axis::Y];
                for (id, axis) in node.inputs.iter().zip(axes) {
                    let enc = Encoding::new(MarkKind::Point, ChannelClass::Position).with_axis(axis);
                    out.push((id.clone(), enc.into()));
                }
                out.extend(each(outputs, Encoding::new(MarkKind::Line, ChannelClass::Length)));
                out
            }
            ChartType::StackedBar => each(inputs, Encoding::new(MarkKind::Area, ChannelClass::ScalarLocation)),
            ChartType::BarComparison => each(inputs, Encoding::new(MarkKind::Bar, ChannelClass::Length)),
            ChartType::BarDifference => {
                let mut out = each(inputs, Encoding::new(MarkKind::Bar, ChannelClass::Length));
                out.extend(each(outputs, Encoding::new(MarkKind::Line, ChannelClass::Length)));
                out
            }
            ChartType::Spacefilling => {
                let mut out = each(inputs, Encoding::new(MarkKind::Square, ChannelClass::Area));
                out.extend(each(outputs, Encoding::new(MarkKind::Bar, ChannelClass::Length)));
                out
            }
            ChartType::Distribution => {
                // Inputs keep the mark that made them eligible; only the axis is fixed.
                let mut out: Vec<_> = inputs.map(|id| (id.clone(), EncodingPatch::axis(Axis::X))).collect();
                let mean = Encoding::new(MarkKind::Line, ChannelClass::ScalarLocation).with_axis(Axis::X);
                out.extend(each(outputs, mean));
                out
            }
            ChartType::Custom(_) => Vec::new(),
        }
    }
}

impl From<String> for ChartType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "scatter-with-diagonal" => ChartType::ScatterWithDiagonal,
            "stacked-bar" => ChartType::StackedBar,
            "bar-comparison" => ChartType::BarComparison,
            "bar-difference" => ChartType::BarDifference,
            "spacefilling" => ChartType::Spacefilling,
            "distribution" => ChartType::Distribution,
            _ => ChartType::Custom(s),
        }
    }
}

impl From<&str> for ChartType {
    fn from(s: &str) -> Self { s.to_string().into() }
}

impl From<ChartType> for String {
    fn from(c: ChartType) -> Self { c.name().to_string() }
}

impl fmt::Display for ChartType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.name()) }
}
