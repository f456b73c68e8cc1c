//! Internal ranked graph built fresh for every layout call.

use std::collections::HashMap;

use crate::ir::{Diagram, Size};
use crate::size::{SizeEstimator, resolve_size};

use super::types::{LayoutDiagnostics, SkippedEdge};

#[derive(Debug, Clone)]
pub(super) struct Vertex {
    /// Index into the caller's node list; `None` for dummies on long links.
    pub node: Option<usize>,
    pub size: Size,
}

impl Vertex {
    pub fn is_dummy(&self) -> bool {
        self.node.is_none()
    }
}

/// One distinct ordered vertex pair. Parallel input edges share a link.
#[derive(Debug, Clone)]
pub(super) struct Link {
    pub from: usize,
    pub to: usize,
    pub edges: Vec<usize>,
}

#[derive(Debug, Clone, Default)]
pub(super) struct RankGraph {
    pub vertices: Vec<Vertex>,
    pub links: Vec<Link>,
    /// Vertex per input node. Duplicate keys map to the first occurrence.
    pub node_vertex: Vec<usize>,
    /// Link per input edge, `None` for dangling edges and self-loops.
    pub edge_link: Vec<Option<usize>>,
    /// Vertex carrying each self-loop, indexed like the input edges.
    pub self_loop_vertex: Vec<Option<usize>>,
    /// Count of vertices backed by input nodes. Dummies are appended after them.
    pub real_vertices: usize,
}

impl RankGraph {
    pub fn build(
        diagram: &Diagram,
        sizer: &dyn SizeEstimator,
        diagnostics: &mut LayoutDiagnostics,
    ) -> Self {
        let mut graph = RankGraph::default();
        let mut by_id: HashMap<&str, usize> = HashMap::with_capacity(diagram.nodes.len());

        for (idx, node) in diagram.nodes.iter().enumerate() {
            if let Some(&existing) = by_id.get(node.id.as_str()) {
                log::warn!("duplicate node key `{}` at index {idx}", node.id);
                diagnostics.duplicate_nodes.push(idx);
                graph.node_vertex.push(existing);
                continue;
            }
            let vertex = graph.vertices.len();
            graph.vertices.push(Vertex {
                node: Some(idx),
                size: resolve_size(sizer, node),
            });
            by_id.insert(node.id.as_str(), vertex);
            graph.node_vertex.push(vertex);
        }
        graph.real_vertices = graph.vertices.len();

        let mut pair_link: HashMap<(usize, usize), usize> = HashMap::new();
        for (idx, edge) in diagram.edges.iter().enumerate() {
            let from = by_id.get(edge.from.as_str()).copied();
            let to = by_id.get(edge.to.as_str()).copied();
            let (Some(from), Some(to)) = (from, to) else {
                let missing: Vec<String> = [(&edge.from, from), (&edge.to, to)]
                    .into_iter()
                    .filter(|(_, vertex)| vertex.is_none())
                    .map(|(id, _)| id.clone())
                    .collect();
                log::warn!(
                    "edge {idx} ({} -> {}) references unknown node(s) {missing:?}; skipped",
                    edge.from,
                    edge.to
                );
                diagnostics.skipped_edges.push(SkippedEdge {
                    edge: idx,
                    from: edge.from.clone(),
                    to: edge.to.clone(),
                    missing,
                });
                graph.edge_link.push(None);
                graph.self_loop_vertex.push(None);
                continue;
            };
            if from == to {
                diagnostics.self_loops.push(idx);
                graph.edge_link.push(None);
                graph.self_loop_vertex.push(Some(from));
                continue;
            }
            graph.self_loop_vertex.push(None);
            match pair_link.get(&(from, to)) {
                Some(&link) => {
                    diagnostics.duplicate_edges.push(idx);
                    graph.links[link].edges.push(idx);
                    graph.edge_link.push(Some(link));
                }
                None => {
                    let link = graph.links.len();
                    graph.links.push(Link {
                        from,
                        to,
                        edges: vec![idx],
                    });
                    pair_link.insert((from, to), link);
                    graph.edge_link.push(Some(link));
                }
            }
        }

        graph
    }

    pub fn add_dummy(&mut self) -> usize {
        let vertex = self.vertices.len();
        self.vertices.push(Vertex {
            node: None,
            size: Size::new(0.0, 0.0),
        });
        vertex
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::NodeKind;
    use crate::size::HeuristicSizer;

    fn diagram() -> Diagram {
        let mut diagram = Diagram::new();
        diagram
            .add_node("A", NodeKind::StartEvent, "")
            .add_node("B", NodeKind::Task, "Check")
            .add_node("A", NodeKind::Task, "shadow")
            .add_edge("A", "B")
            .add_edge("A", "B")
            .add_edge("B", "B")
            .add_edge("B", "ghost");
        diagram
    }

    #[test]
    fn collapses_parallel_edges_and_sets_aside_bad_ones() {
        let mut diagnostics = LayoutDiagnostics::default();
        let graph = RankGraph::build(&diagram(), &HeuristicSizer, &mut diagnostics);

        assert_eq!(graph.real_vertices, 2);
        assert_eq!(graph.node_vertex, vec![0, 1, 0]);
        assert_eq!(graph.links.len(), 1);
        assert_eq!(graph.links[0].edges, vec![0, 1]);
        assert_eq!(graph.edge_link, vec![Some(0), Some(0), None, None]);
        assert_eq!(graph.self_loop_vertex[2], Some(1));

        assert_eq!(diagnostics.duplicate_nodes, vec![2]);
        assert_eq!(diagnostics.duplicate_edges, vec![1]);
        assert_eq!(diagnostics.self_loops, vec![2]);
        assert_eq!(diagnostics.skipped_edges.len(), 1);
        assert_eq!(diagnostics.skipped_edges[0].missing, vec!["ghost".to_string()]);
    }

    #[test]
    fn vertices_carry_estimated_sizes() {
        let mut diagnostics = LayoutDiagnostics::default();
        let graph = RankGraph::build(&diagram(), &HeuristicSizer, &mut diagnostics);
        assert_eq!(graph.vertices[0].size, Size::new(60.0, 60.0));
        assert_eq!(graph.vertices[1].size, Size::new(180.0, 60.0));
        assert!(!graph.vertices[0].is_dummy());
    }
}
