//! The family-merge step run at every internal node.
use super::container::{preferences, VisualizationContainer};
use super::error::ResolveError;
use crate::grammar::Rulebook;
use crate::store::{ComputationGraph, ComputationNode};

/// Folds the head containers of `parent`'s children into one container
/// seeded from `parent`.
///
/// Heads that cannot be merged are returned untouched ahead of the merged
/// container, so the result holds between 1 and `heads.len() + 1` entries.
/// Orphans are listed and mergeable heads folded in ascending root order,
/// making the outcome independent of the order the heads arrive in.
pub fn merge_family(
    parent: &ComputationNode,
    depth: usize,
    heads: Vec<VisualizationContainer>,
    graph: &ComputationGraph,
    rules: &Rulebook,
) -> Result<Vec<VisualizationContainer>, ResolveError> {
    let entry = preferences(rules, parent)?;
    let parent_chart = entry.chart.clone();
    for &child in parent.children() {
        let child = graph.node(child)?;
        let produced = preferences(rules, child)?.output_type;
        if !entry.input_type.accepts(produced) {
            tracing::warn!(
                parent = %parent.name,
                child = %child.name,
                expected = ?entry.input_type,
                produced = ?produced,
                "data shape mismatch"
            );
        }
    }
    let mut acc = VisualizationContainer::seed(parent, depth, rules)?;

    let mut mergeable = Vec::with_capacity(heads.len());
    let mut out = Vec::new();
    for head in heads {
        if head.is_mergeable_with_parent(parent, rules)? {
            mergeable.push(head);
        } else {
            tracing::debug!(
                parent = %parent.name,
                chart = ?head.chart(),
                "orphaned child container"
            );
            out.push(head);
        }
    }
    out.sort_by_key(|c| c.root());
    mergeable.sort_by_key(|c| c.root());

    for mut head in mergeable {
        head.merge_with_parent(parent, graph, rules)?;
        head.absorb(acc, parent_chart.as_ref());
        acc = head;
    }

    out.push(acc);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::ChartType;
    use crate::store::{DataId, NodeId};

    fn ids(names: &[&str]) -> Vec<DataId> {
        names.iter().map(|n| DataId::from(*n)).collect()
    }

    fn seed(g: &ComputationGraph, id: NodeId, depth: usize, rules: &Rulebook) -> VisualizationContainer {
        VisualizationContainer::seed(g.node(id).unwrap(), depth, rules).unwrap()
    }

    #[test]
    fn test_no_heads_yields_parent_seed() {
        let rules = Rulebook::standard().unwrap();
        let mut g = ComputationGraph::new();
        let p = g.add_node("p", None, "ratio", ids(&["a", "b"]), ids(&["q"])).unwrap();

        let out = merge_family(g.node(p).unwrap(), 0, Vec::new(), &g, &rules).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].nodes(), &[p]);
        assert_eq!(out[0].chart(), Some(&ChartType::BarComparison));
    }

    #[test]
    fn test_conflicting_head_is_orphaned_unchanged() {
        let rules = Rulebook::standard().unwrap();
        let mut g = ComputationGraph::new();
        let ss = g.add_node("ss", None, "vector_sum", ids(&["res"]), ids(&["ss"])).unwrap();
        let res = g.add_node("res", Some(ss), "vector_difference", ids(&["y", "y_hat"]), ids(&["res"])).unwrap();

        let scatter = seed(&g, res, 1, &rules);
        let out = merge_family(g.node(ss).unwrap(), 0, vec![scatter.clone()], &g, &rules).unwrap();

        assert_eq!(out.len(), 2);
        assert_eq!(out[0], scatter);
        assert_eq!(out[1].nodes(), &[ss]);
        assert_eq!(out[1].chart(), Some(&ChartType::Spacefilling));
    }

    #[test]
    fn test_heads_fold_into_one() {
        let rules = Rulebook::standard().unwrap();
        let mut g = ComputationGraph::new();
        let sum = g.add_node("sum", None, "scalar_sum", ids(&["a", "b", "c"]), ids(&["s"])).unwrap();
        let leaves: Vec<_> = ["a", "b", "c"]
            .into_iter()
            .map(|n| g.add_node(n, Some(sum), "scalar", vec![], ids(&[n])).unwrap())
            .collect();

        // Hand the heads over in reverse; the fold order is by root id anyway.
        let heads = leaves.iter().rev().map(|&l| seed(&g, l, 1, &rules)).collect();
        let out = merge_family(g.node(sum).unwrap(), 0, heads, &g, &rules).unwrap();

        assert_eq!(out.len(), 1);
        let merged = &out[0];
        assert_eq!(merged.root(), sum);
        assert_eq!(merged.nodes().len(), 4);
        assert_eq!(merged.depth(), 1);
        assert_eq!(merged.chart(), Some(&ChartType::StackedBar));
        assert_eq!(merged.encodings().len(), 3);
    }

    #[test]
    fn test_head_order_does_not_matter() {
        let rules = Rulebook::standard().unwrap();
        let mut g = ComputationGraph::new();
        let ratio = g.add_node("ratio", None, "ratio", ids(&["ss", "k", "d1", "d2"]), ids(&["q"])).unwrap();
        let ss = g.add_node("ss", Some(ratio), "vector_sum", ids(&["sq"]), ids(&["ss"])).unwrap();
        let k = g.add_node("k", Some(ratio), "scalar", vec![], ids(&["k"])).unwrap();
        let d1 = g.add_node("d1", Some(ratio), "vector_difference", ids(&["y", "a"]), ids(&["d1"])).unwrap();
        let d2 = g.add_node("d2", Some(ratio), "vector_difference", ids(&["y", "b"]), ids(&["d2"])).unwrap();
        let children = [ss, k, d1, d2];

        let forward = children.iter().map(|&c| seed(&g, c, 1, &rules)).collect();
        let reversed = children.iter().rev().map(|&c| seed(&g, c, 1, &rules)).collect();
        let parent = g.node(ratio).unwrap();
        let forward = merge_family(parent, 0, forward, &g, &rules).unwrap();
        let reversed = merge_family(parent, 0, reversed, &g, &rules).unwrap();

        assert_eq!(forward, reversed);
        // Two scatter orphans, then the composed bar comparison.
        assert_eq!(forward.len(), 3);
        assert_eq!(forward[0].root(), d1);
        assert_eq!(forward[1].root(), d2);
        assert_eq!(forward[2].chart(), Some(&ChartType::BarComparison));
        assert_eq!(forward[2].node_set(), [ratio, ss, k].into_iter().collect());
    }

    #[test]
    fn test_shape_mismatch_still_merges() {
        let rules = Rulebook::standard().unwrap();
        let mut g = ComputationGraph::new();
        let total = g.add_node("total", None, "vector_sum", ids(&["x"]), ids(&["t"])).unwrap();
        let x = g.add_node("x", Some(total), "scalar", vec![], ids(&["x"])).unwrap();

        let out = merge_family(g.node(total).unwrap(), 0, vec![seed(&g, x, 1, &rules)], &g, &rules).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].chart(), Some(&ChartType::Spacefilling));
    }

    #[test]
    fn test_unknown_parent_operation_is_fatal() {
        let rules = Rulebook::standard().unwrap();
        let mut g = ComputationGraph::new();
        let p = g.add_node("p", None, "convolve", ids(&["a"]), ids(&["c"])).unwrap();
        let a = g.add_node("a", Some(p), "scalar", vec![], ids(&["a"])).unwrap();

        let heads = vec![seed(&g, a, 1, &rules)];
        let err = merge_family(g.node(p).unwrap(), 0, heads, &g, &rules).unwrap_err();
        assert!(matches!(err, ResolveError::UnknownOperation { .. }));
    }
}
