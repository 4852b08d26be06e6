use crate::store::{ComputationGraph, GraphError, NodeId};

/// A node scheduled by [`post_order`], with its distance from the walk's root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Visit {
    pub node: NodeId,
    pub depth: usize,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum VisitState {
    None,
    Visiting,
    Visited,
}

/// Depth-first post-order over the subtree rooted at `root`.
///
/// Every child appears before its parent and siblings appear in child-list
/// order. Uses an explicit work stack so arbitrarily deep trees do not exhaust
/// the call stack.
pub fn post_order(graph: &ComputationGraph, root: NodeId) -> Result<Vec<Visit>, GraphError> {
    graph.node(root)?;

    let mut order = Vec::new();
    let mut state = vec![VisitState::None; graph.count()];
    // (node, depth, children already pushed)
    let mut stack = vec![(root, 0usize, false)];

    while let Some((node, depth, expanded)) = stack.pop() {
        let idx = node.index();
        if expanded {
            state[idx] = VisitState::Visited;
            order.push(Visit { node, depth });
            continue;
        }

        match state[idx] {
            VisitState::None => state[idx] = VisitState::Visiting,
            // Parent links are set once, so a node reached twice means the
            // arena was tampered with.
            VisitState::Visiting | VisitState::Visited => {
                return Err(GraphError::CycleDetected { child: node, parent: node });
            }
        }

        stack.push((node, depth, true));
        // Reverse so the first child is popped (and finished) first.
        for &child in graph.children(node).iter().rev() {
            stack.push((child, depth + 1, false));
        }
    }

    Ok(order)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::DataId;

    fn leaf(g: &mut ComputationGraph, name: &str, parent: NodeId) -> NodeId {
        g.add_node(name, Some(parent), "scalar", vec![], vec![DataId::from(name)]).unwrap()
    }

    #[test]
    fn test_post_order_children_before_parent() {
        // Shape: r -> (x -> (a, b), c)
        let mut g = ComputationGraph::new();
        let r = g.add_node("r", None, "ratio", vec![], vec![]).unwrap();
        let x = g.add_node("x", Some(r), "scalar_sum", vec![], vec![]).unwrap();
        let a = leaf(&mut g, "a", x);
        let b = leaf(&mut g, "b", x);
        let c = leaf(&mut g, "c", r);

        let order = post_order(&g, r).unwrap();
        let nodes: Vec<NodeId> = order.iter().map(|v| v.node).collect();
        assert_eq!(nodes, vec![a, b, x, c, r]);

        let depth_of = |id: NodeId| order.iter().find(|v| v.node == id).unwrap().depth;
        assert_eq!(depth_of(r), 0);
        assert_eq!(depth_of(x), 1);
        assert_eq!(depth_of(a), 2);
        assert_eq!(depth_of(c), 1);
    }

    #[test]
    fn test_post_order_of_subtree_starts_at_zero() {
        let mut g = ComputationGraph::new();
        let r = g.add_node("r", None, "ratio", vec![], vec![]).unwrap();
        let x = g.add_node("x", Some(r), "scalar_sum", vec![], vec![]).unwrap();
        leaf(&mut g, "a", x);

        let order = post_order(&g, x).unwrap();
        assert_eq!(order.len(), 2);
        assert_eq!(order.last().unwrap(), &Visit { node: x, depth: 0 });
        assert_eq!(post_order(&g, r).unwrap().len(), 3);
    }

    #[test]
    fn test_deep_chain_does_not_recurse() {
        let mut g = ComputationGraph::new();
        let mut parent = g.add_node("n0", None, "vector_square", vec![], vec![]).unwrap();
        for i in 1..100_000 {
            parent = g.add_node(format!("n{}", i), Some(parent), "vector_square", vec![], vec![]).unwrap();
        }
        let order = post_order(&g, NodeId(0)).unwrap();
        assert_eq!(order.len(), 100_000);
        assert_eq!(order[0], Visit { node: parent, depth: 99_999 });
    }

    #[test]
    fn test_unknown_root() {
        let g = ComputationGraph::new();
        assert_eq!(post_order(&g, NodeId(3)).unwrap_err(), GraphError::UnknownNode(NodeId(3)));
    }
}
