//! Loading the grammar and composition tables.
use super::chart::ChartType;
use super::composition::{CompositionRule, CompositionTable};
use super::encoding::EncodingPatch;
use super::error::RulesError;
use super::table::{GrammarEntry, GrammarTable};
use crate::store::{ComputationNode, DataId, OpType};
use std::fs;
use std::path::Path;

const STANDARD_GRAMMAR: &str = include_str!("../../rules/grammar.json");
const STANDARD_COMPOSITIONS: &str = include_str!("../../rules/compositions.json");

pub const GRAMMAR_FILE: &str = "grammar.json";
pub const COMPOSITIONS_FILE: &str = "compositions.json";

/// The immutable rule set a resolution runs against. Load once, share by reference.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Rulebook {
    pub grammar: GrammarTable,
    pub compositions: CompositionTable,
}

impl Rulebook {
    pub fn new(grammar: GrammarTable, compositions: CompositionTable) -> Self {
        Self { grammar, compositions }
    }

    /// The rule set shipped with the crate.
    pub fn standard() -> Result<Self, RulesError> {
        Self::from_json(STANDARD_GRAMMAR, STANDARD_COMPOSITIONS)
    }

    pub fn from_json(grammar: &str, compositions: &str) -> Result<Self, RulesError> {
        let grammar = serde_json::from_str(grammar)
            .map_err(|source| RulesError::Parse { table: "grammar", source })?;
        let compositions = serde_json::from_str(compositions)
            .map_err(|source| RulesError::Parse { table: "composition", source })?;
        Ok(Self { grammar, compositions })
    }

    /// Reads `grammar.json` and `compositions.json` from `dir`.
    pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self, RulesError> {
        let read = |name: &str| {
            let path = dir.as_ref().join(name);
            fs::read_to_string(&path).map_err(|source| RulesError::Io { path, source })
        };
        let rulebook = Self::from_json(&read(GRAMMAR_FILE)?, &read(COMPOSITIONS_FILE)?)?;
        tracing::info!(
            dir = %dir.as_ref().display(),
            operations = rulebook.grammar.len(),
            compositions = rulebook.compositions.len(),
            "loaded rulebook"
        );
        Ok(rulebook)
    }

    // --- Lookups ---

    pub fn preferences(&self, op: &OpType) -> Option<&GrammarEntry> {
        self.grammar.get(op)
    }

    pub fn is_composable(&self, child: &ChartType, parent: &ChartType) -> bool {
        self.compositions.is_composable(child, parent)
    }

    pub fn composition(&self, child: &ChartType, parent: &ChartType) -> Option<&CompositionRule> {
        self.compositions.allowed(child, parent)
    }

    pub fn encoding_patch_for(
        &self,
        child_chart: &ChartType,
        parent_chart: &ChartType,
        child: &ComputationNode,
        parent: &ComputationNode,
    ) -> Vec<(DataId, EncodingPatch)> {
        self.composition(child_chart, parent_chart)
            .map(|rule| rule.patch(child, parent))
            .unwrap_or_default()
    }
}
