use super::container::VisualizationContainer;
use super::error::ResolveError;
use super::family::merge_family;
use crate::analysis::topology;
use crate::grammar::Rulebook;
use crate::store::{ComputationGraph, NodeId};
use rayon::prelude::*;

/// Resolves computation trees into the ordered list of charts that explain them.
///
/// Holds the graph and rules by shared reference; both stay frozen for the
/// resolver's lifetime and every call owns the containers it builds.
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    graph: &'a ComputationGraph,
    rules: &'a Rulebook,
}

impl<'a> Resolver<'a> {
    pub fn new(graph: &'a ComputationGraph, rules: &'a Rulebook) -> Self {
        Self { graph, rules }
    }

    /// Resolves the subtree under `root`, deepest containers first.
    pub fn resolve(&self, root: NodeId) -> Result<Vec<VisualizationContainer>, ResolveError> {
        let order = topology::post_order(self.graph, root)?;
        let mut slots: Vec<Option<Vec<VisualizationContainer>>> = Vec::new();
        slots.resize_with(self.graph.count(), || None);

        for visit in &order {
            let node = self.graph.node(visit.node)?;

            if node.is_leaf() {
                let seed = VisualizationContainer::seed(node, visit.depth, self.rules)?;
                slots[node.id.index()] = Some(vec![seed]);
                continue;
            }

            // Each child hands up its list; the last entry is its head.
            let mut heads = Vec::with_capacity(node.children().len());
            let mut carried = Vec::new();
            for &child in node.children() {
                let list = slots[child.index()].take().unwrap_or_default();
                let head_at = list.len().checked_sub(1);
                for (i, container) in list.into_iter().enumerate() {
                    if Some(i) == head_at {
                        heads.push(container);
                    } else {
                        carried.push(container);
                    }
                }
            }

            carried.extend(merge_family(node, visit.depth, heads, self.graph, self.rules)?);
            slots[node.id.index()] = Some(carried);
        }

        let mut result = slots.get_mut(root.index()).and_then(Option::take).unwrap_or_default();
        result.sort_by(|a, b| b.depth().cmp(&a.depth()));

        tracing::info!(
            root = %self.graph.node(root)?.name,
            nodes = order.len(),
            containers = result.len(),
            "resolved tree"
        );
        Ok(result)
    }

    /// Resolves independent roots in parallel. Results keep the order of `roots`.
    pub fn resolve_many(&self, roots: &[NodeId]) -> Vec<Result<Vec<VisualizationContainer>, ResolveError>> {
        roots.par_iter().map(|&root| self.resolve(root)).collect()
    }
}

/// Resolves one tree with a throwaway [`Resolver`].
pub fn resolve(
    graph: &ComputationGraph,
    rules: &Rulebook,
    root: NodeId,
) -> Result<Vec<VisualizationContainer>, ResolveError> {
    Resolver::new(graph, rules).resolve(root)
}
