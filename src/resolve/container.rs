//! The visualization container: one chart under assembly.
use super::error::ResolveError;
use crate::grammar::{ChartType, EncodingMap, GrammarEntry, Rulebook};
use crate::store::{ComputationGraph, ComputationNode, NodeId};
use serde::Serialize;
use std::collections::BTreeSet;

/// An emerging chart: the subgraph it explains, its chart type once bound,
/// and the encoding of every data identifier it shows.
///
/// Chart-type transitions happen only in [`VisualizationContainer::seed`] and
/// [`VisualizationContainer::merge_with_parent`]. A bound type is never reset
/// to unbound, but a composition may replace it with its result type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VisualizationContainer {
    root: NodeId,
    nodes: Vec<NodeId>,
    chart: Option<ChartType>,
    encodings: EncodingMap,
    /// Deepest tree level among absorbed nodes. Presentation order only.
    depth: usize,
}

pub(crate) fn preferences<'r>(
    rules: &'r Rulebook,
    node: &ComputationNode,
) -> Result<&'r GrammarEntry, ResolveError> {
    rules.preferences(&node.op_type).ok_or_else(|| ResolveError::UnknownOperation {
        op_type: node.op_type.clone(),
        node: node.name.clone(),
    })
}

impl VisualizationContainer {
    /// Starts a container for `node`: folds its output defaults, then binds
    /// its chart affinity (if the chart's requirements hold) and expands it.
    pub fn seed(node: &ComputationNode, depth: usize, rules: &Rulebook) -> Result<Self, ResolveError> {
        let entry = preferences(rules, node)?;
        let mut container = Self {
            root: node.id,
            nodes: vec![node.id],
            chart: None,
            encodings: EncodingMap::new(),
            depth,
        };

        container.fold_output_defaults(entry, node);
        if let Some(chart) = &entry.chart {
            if let Err(e) = container.bind(chart, node) {
                tracing::debug!(node = %node.name, error = %e, "seeded unbound");
            }
        }
        Ok(container)
    }

    /// Whether this container may be folded into `parent`'s chart.
    pub fn is_mergeable_with_parent(
        &self,
        parent: &ComputationNode,
        rules: &Rulebook,
    ) -> Result<bool, ResolveError> {
        let entry = preferences(rules, parent)?;
        let (Some(own), Some(parent_chart)) = (&self.chart, &entry.chart) else {
            return Ok(true);
        };
        match Self::composition_check(own, parent_chart, rules) {
            Ok(()) => Ok(true),
            Err(e) => {
                tracing::debug!(parent = %parent.name, error = %e, "not mergeable");
                Ok(false)
            }
        }
    }

    /// Extends this container with `parent`. Call once per parent, and only
    /// after [`is_mergeable_with_parent`](Self::is_mergeable_with_parent) returned true.
    pub fn merge_with_parent(
        &mut self,
        parent: &ComputationNode,
        graph: &ComputationGraph,
        rules: &Rulebook,
    ) -> Result<(), ResolveError> {
        let entry = preferences(rules, parent)?;
        self.fold_output_defaults(entry, parent);

        match (self.chart.clone(), &entry.chart) {
            (None, Some(parent_chart)) => {
                if let Err(e) = self.bind(parent_chart, parent) {
                    tracing::debug!(parent = %parent.name, error = %e, "type adoption refused");
                }
            }
            (Some(own), Some(parent_chart)) => {
                Self::composition_check(&own, parent_chart, rules)?;
                let child = graph.node(self.root)?;
                for (id, patch) in rules.encoding_patch_for(&own, parent_chart, child, parent) {
                    self.encodings.apply(&id, &patch);
                }
                if let Some(rule) = rules.composition(&own, parent_chart) {
                    let result = rule.result_type().clone();
                    for (id, patch) in result.expand(parent) {
                        self.encodings.apply(&id, &patch);
                    }
                    self.chart = Some(result);
                }
            }
            // Parent declares no chart: keep whatever we have.
            (_, None) => {}
        }

        self.nodes.push(parent.id);
        Ok(())
    }

    /// Whether `chart` may be bound on behalf of `parent` given the encodings
    /// this container already carries.
    pub fn chart_reqs_met(&self, chart: &ChartType, parent: &ComputationNode) -> Result<(), ResolveError> {
        let missing = chart.missing_inputs(parent, &self.encodings);
        if missing.is_empty() {
            Ok(())
        } else {
            Err(ResolveError::UnmetChartRequirements { chart: chart.clone(), node: parent.id, missing })
        }
    }

    /// Takes over the running accumulator of a family merge.
    ///
    /// `acc`'s writes land last. Its chart type wins when this container is
    /// unbound or only carries the parent's plain declared type, so a
    /// composition result survives whichever head produced it.
    pub(crate) fn absorb(&mut self, acc: VisualizationContainer, parent_chart: Option<&ChartType>) {
        // Both lists hold the parent and nothing else in common. Move the
        // shorter one so a long chain stays linear.
        let parent = acc.root;
        let mut other = acc.nodes;
        if other.len() > self.nodes.len() {
            std::mem::swap(&mut other, &mut self.nodes);
        }
        self.nodes.extend(other.into_iter().filter(|&n| n != parent));
        self.encodings.union(&acc.encodings);
        self.root = acc.root;
        self.depth = self.depth.max(acc.depth);

        if let Some(chart) = acc.chart {
            if self.chart.is_none() || self.chart.as_ref() == parent_chart {
                self.chart = Some(chart);
            }
        }
    }

    fn bind(&mut self, chart: &ChartType, node: &ComputationNode) -> Result<(), ResolveError> {
        self.chart_reqs_met(chart, node)?;
        self.chart = Some(chart.clone());
        for (id, patch) in chart.expand(node) {
            self.encodings.apply(&id, &patch);
        }
        Ok(())
    }

    fn fold_output_defaults(&mut self, entry: &GrammarEntry, node: &ComputationNode) {
        let encoding = match &entry.default_output {
            Some(default) => default.clone(),
            None => match entry.fallback_output(&node.inputs, &self.encodings) {
                Some(fallback) => fallback,
                None => return,
            },
        };
        for id in &node.outputs {
            self.encodings.merge(id, &encoding);
        }
    }

    fn composition_check(own: &ChartType, parent: &ChartType, rules: &Rulebook) -> Result<(), ResolveError> {
        if rules.is_composable(own, parent) {
            Ok(())
        } else {
            Err(ResolveError::ImpossibleComposition { child: own.clone(), parent: parent.clone() })
        }
    }

    // --- Accessors ---
    pub fn root(&self) -> NodeId { self.root }
    pub fn nodes(&self) -> &[NodeId] { &self.nodes }
    pub fn node_set(&self) -> BTreeSet<NodeId> { self.nodes.iter().copied().collect() }
    pub fn contains(&self, node: NodeId) -> bool { self.nodes.contains(&node) }
    pub fn chart(&self) -> Option<&ChartType> { self.chart.as_ref() }
    pub fn encodings(&self) -> &EncodingMap { &self.encodings }
    pub fn depth(&self) -> usize { self.depth }
}
