//! The composition table: which chart may be folded into which, and how.
use super::chart::ChartType;
use super::encoding::EncodingPatch;
use super::error::RulesError;
use crate::store::{ComputationNode, DataId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// How an absorbed chart's primary element is anchored to the absorbing chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TiedOffset {
    /// Every input of the child node is offset by the child's own output mark
    /// (e.g. squares laid out inside the bar that represents their sum).
    InputsToChildOutput,
    /// The child's outputs are offset by the parent's output mark.
    OutputToParentOutput,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompositionRule {
    pub child: ChartType,
    pub parent: ChartType,
    pub allowed: bool,
    /// Chart type of the combined container. Defaults to `parent`.
    #[serde(default)]
    pub result: Option<ChartType>,
    #[serde(default)]
    pub offset: Option<TiedOffset>,
}

impl CompositionRule {
    pub fn result_type(&self) -> &ChartType {
        self.result.as_ref().unwrap_or(&self.parent)
    }

    /// The encoding writes that tie `child`'s chart into `parent`'s.
    pub fn patch(&self, child: &ComputationNode, parent: &ComputationNode) -> Vec<(DataId, EncodingPatch)> {
        match self.offset {
            None => Vec::new(),
            Some(TiedOffset::InputsToChildOutput) => match child.primary_output() {
                Some(anchor) => child
                    .inputs
                    .iter()
                    .map(|id| (id.clone(), EncodingPatch::tied_to(anchor.clone())))
                    .collect(),
                None => Vec::new(),
            },
            Some(TiedOffset::OutputToParentOutput) => match parent.primary_output() {
                Some(anchor) => child
                    .outputs
                    .iter()
                    .map(|id| (id.clone(), EncodingPatch::tied_to(anchor.clone())))
                    .collect(),
                None => Vec::new(),
            },
        }
    }
}

/// Read-only map keyed by `(child chart, parent chart)`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<CompositionRule>", into = "Vec<CompositionRule>")]
pub struct CompositionTable {
    rules: HashMap<(ChartType, ChartType), CompositionRule>,
}

impl CompositionTable {
    pub fn get(&self, child: &ChartType, parent: &ChartType) -> Option<&CompositionRule> {
        self.rules.get(&(child.clone(), parent.clone()))
    }

    /// An allowed rule for the pair, if one exists.
    pub fn allowed(&self, child: &ChartType, parent: &ChartType) -> Option<&CompositionRule> {
        self.get(child, parent).filter(|r| r.allowed)
    }

    pub fn is_composable(&self, child: &ChartType, parent: &ChartType) -> bool {
        self.allowed(child, parent).is_some()
    }

    pub fn len(&self) -> usize { self.rules.len() }
    pub fn is_empty(&self) -> bool { self.rules.is_empty() }
}

impl TryFrom<Vec<CompositionRule>> for CompositionTable {
    type Error = RulesError;

    fn try_from(list: Vec<CompositionRule>) -> Result<Self, Self::Error> {
        let mut rules = HashMap::with_capacity(list.len());
        for rule in list {
            let key = (rule.child.clone(), rule.parent.clone());
            if rules.contains_key(&key) {
                return Err(RulesError::DuplicateComposition {
                    child: key.0.to_string(),
                    parent: key.1.to_string(),
                });
            }
            rules.insert(key, rule);
        }
        Ok(Self { rules })
    }
}

impl From<CompositionTable> for Vec<CompositionRule> {
    fn from(table: CompositionTable) -> Self {
        let mut list: Vec<_> = table.rules.into_values().collect();
        list.sort_by(|a, b| (&a.child, &a.parent).cmp(&(&b.child, &b.parent)));
        list
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::ComputationGraph;

    const RULES: &str = r#"[
        {"child": "spacefilling", "parent": "bar-comparison", "allowed": true, "offset": "inputs-to-child-output"},
        {"child": "stacked-bar", "parent": "stacked-bar", "allowed": true},
        {"child": "scatter-with-diagonal", "parent": "spacefilling", "allowed": false}
    ]"#;

    fn table() -> CompositionTable {
        serde_json::from_str(RULES).unwrap()
    }

    #[test]
    fn test_lookup_respects_allowed_flag() {
        let t = table();
        assert_eq!(t.len(), 3);
        assert!(t.is_composable(&ChartType::Spacefilling, &ChartType::BarComparison));
        assert!(!t.is_composable(&ChartType::ScatterWithDiagonal, &ChartType::Spacefilling));
        assert!(t.get(&ChartType::ScatterWithDiagonal, &ChartType::Spacefilling).is_some());
        // Direction matters.
        assert!(!t.is_composable(&ChartType::BarComparison, &ChartType::Spacefilling));
    }

    #[test]
    fn test_result_defaults_to_parent() {
        let t = table();
        let rule = t.allowed(&ChartType::StackedBar, &ChartType::StackedBar).unwrap();
        assert_eq!(rule.result_type(), &ChartType::StackedBar);
    }

    #[test]
    fn test_duplicate_rules_rejected() {
        let json = r#"[
            {"child": "stacked-bar", "parent": "stacked-bar", "allowed": true},
            {"child": "stacked-bar", "parent": "stacked-bar", "allowed": false}
        ]"#;
        let err = serde_json::from_str::<CompositionTable>(json).unwrap_err();
        assert!(err.to_string().contains("Duplicate composition"), "Msg: {}", err);
    }

    #[test]
    fn test_inputs_tied_to_child_output() {
        let mut g = ComputationGraph::new();
        let ratio = g
            .add_node("ratio", None, "ratio", vec!["ss_res".into(), "ss_tot".into()], vec!["q".into()])
            .unwrap();
        let ss_res = g
            .add_node("ss_res", Some(ratio), "vector_sum", vec!["res_sq".into()], vec!["ss_res".into()])
            .unwrap();

        let t = table();
        let rule = t.allowed(&ChartType::Spacefilling, &ChartType::BarComparison).unwrap();
        let patch = rule.patch(g.node(ss_res).unwrap(), g.node(ratio).unwrap());
        assert_eq!(patch, vec![(DataId::from("res_sq"), EncodingPatch::tied_to("ss_res".into()))]);
    }

    #[test]
    fn test_output_tied_to_parent_output() {
        let mut g = ComputationGraph::new();
        let parent = g.add_node("p", None, "scalar_difference", vec![], vec!["r2".into()]).unwrap();
        let child = g.add_node("c", Some(parent), "ratio", vec![], vec!["q".into()]).unwrap();

        let rule = CompositionRule {
            child: ChartType::BarComparison,
            parent: ChartType::BarDifference,
            allowed: true,
            result: None,
            offset: Some(TiedOffset::OutputToParentOutput),
        };
        let patch = rule.patch(g.node(child).unwrap(), g.node(parent).unwrap());
        assert_eq!(patch, vec![(DataId::from("q"), EncodingPatch::tied_to("r2".into()))]);
    }
}
