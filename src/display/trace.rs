use crate::resolve::VisualizationContainer;
use crate::store::{ComputationGraph, NodeId};
use std::fmt::Write;

/// Plain-text outline of a resolution result, one block per container.
///
/// ```text
/// RESOLUTION (2 containers):
/// --------------------------------------------------
/// [0] scatter-with-diagonal (depth 2)
/// |-- nodes: res, y, y_hat
/// `-- encodings:
///     |-- res: line/length
///     ...
/// ```
pub fn format_resolution(graph: &ComputationGraph, containers: &[VisualizationContainer]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "RESOLUTION ({} containers):", containers.len());
    let _ = writeln!(out, "--------------------------------------------------");

    for (i, container) in containers.iter().enumerate() {
        let chart = container.chart().map_or("unbound", |c| c.name());
        let _ = writeln!(out, "[{}] {} (depth {})", i, chart, container.depth());

        let mut ids = container.nodes().to_vec();
        ids.sort();
        let names: Vec<String> = ids.into_iter().map(|id| node_name(graph, id)).collect();
        let _ = writeln!(out, "|-- nodes: {}", names.join(", "));

        if container.encodings().is_empty() {
            let _ = writeln!(out, "`-- encodings: (none)");
            continue;
        }
        let _ = writeln!(out, "`-- encodings:");
        let last = container.encodings().len() - 1;
        for (j, (id, enc)) in container.encodings().iter().enumerate() {
            let connector = if j == last { "`--" } else { "|--" };
            let mut line = format!("    {} {}: {}/{}", connector, id, enc.mark.as_str(), enc.channel.as_str());
            if let Some(axis) = enc.axis {
                let _ = write!(line, " axis={:?}", axis);
            }
            if enc.skip == Some(true) {
                line.push_str(" [skip]");
            }
            if let Some(anchor) = &enc.tied_offset_of {
                let _ = write!(line, " (offset from {})", anchor);
            }
            let _ = writeln!(out, "{}", line);
        }
    }
    out
}

fn node_name(graph: &ComputationGraph, id: NodeId) -> String {
    match graph.node(id) {
        Ok(node) => node.name.clone(),
        Err(_) => format!("<invalid {:?}>", id),
    }
}
